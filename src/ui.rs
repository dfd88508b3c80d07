// UI layer: the interactive search -> pick -> recommend flow.
// Prompts go through the `Console` trait so the same flow runs on a real
// terminal (dialoguer + indicatif) or on plain line-based streams (piped
// stdin, tests).

use std::io::{self, BufRead, Write};
use std::time::Duration;

use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::TmdbClient;
use crate::error::Result;
use crate::models::{MovieSummary, UNKNOWN};
use crate::ranking::{self, RECOMMENDATION_LIMIT, SEARCH_LIMIT};

/// Minimal interaction surface used by `run`.
pub trait Console {
    /// Show `prompt` and read one line of input (without the newline).
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Print one line of output.
    fn say(&mut self, line: &str) -> Result<()>;

    /// Spinner shown while waiting on the network. Hidden by default.
    fn spinner(&self, _message: &str) -> ProgressBar {
        ProgressBar::hidden()
    }
}

/// Interactive terminal: `dialoguer` prompts and `indicatif` spinners.
#[derive(Debug, Default)]
pub struct Terminal;

impl Console for Terminal {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(answer)
    }

    fn say(&mut self, line: &str) -> Result<()> {
        println!("{line}");
        Ok(())
    }

    fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// Plain line-based console over any reader/writer pair.
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        LineConsole { input, output }
    }

    /// Give back the reader and writer (tests inspect the output).
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl LineConsole<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        LineConsole::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed").into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }
}

/// How a session ended. Every variant is a normal (exit 0) ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Empty title at the first prompt.
    NoQuery,
    NoSearchResults,
    NoRecommendations,
    /// The genre filter removed every recommendation.
    FilterEmptied,
    /// Printed this many recommendations.
    Recommended(usize),
}

/// `"<title> (<release_date>) — rating: <rating>"` with placeholders for
/// missing fields.
pub fn movie_line(movie: &MovieSummary) -> String {
    let rating = movie
        .vote_average
        .map(|r| format!("{r:.1}"))
        .unwrap_or_else(|| UNKNOWN.to_string());
    format!(
        "{} ({}) — rating: {}",
        movie.display_title(),
        movie.display_date(),
        rating
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    NotANumber,
    OutOfRange,
}

/// Accept only a trimmed, digits-only answer within `[min, max]`.
pub fn parse_choice(raw: &str, min: usize, max: usize) -> Result<usize, ChoiceError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ChoiceError::NotANumber);
    }
    // All digits but too large for usize is still just out of range.
    match raw.parse::<usize>() {
        Ok(n) if (min..=max).contains(&n) => Ok(n),
        _ => Err(ChoiceError::OutOfRange),
    }
}

/// Ask until the user gives a valid number in `[min, max]`.
pub fn pick_number<C: Console>(console: &mut C, prompt: &str, min: usize, max: usize) -> Result<usize> {
    loop {
        let raw = console.read_line(prompt)?;
        match parse_choice(&raw, min, max) {
            Ok(n) => return Ok(n),
            Err(ChoiceError::NotANumber) => console.say("Dame un número, por favor.")?,
            Err(ChoiceError::OutOfRange) => {
                console.say(&format!("Elige un número entre {min} y {max}."))?
            }
        }
    }
}

// Run `f` with the console's spinner visible.
fn waiting<C: Console, T>(console: &C, message: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = console.spinner(message);
    let out = f();
    spinner.finish_and_clear();
    out
}

/// The whole interactive session: search a title, pick a match, show its
/// genres, optionally filter by a genre name and print the best rated
/// recommendations.
pub fn run<C: Console>(api: &TmdbClient, console: &mut C) -> Result<Ending> {
    console.say("TMDB mini-agente (buscador + recomendador)\n")?;

    let query = console
        .read_line("Dime una película para buscar (para entender tu estilo)")?
        .trim()
        .to_string();
    if query.is_empty() {
        console.say("No me has dado nada. Fin.")?;
        return Ok(Ending::NoQuery);
    }

    let mut results = waiting(console, "Buscando...", || api.search_movie(&query))?.results;
    results.truncate(SEARCH_LIMIT);
    tracing::info!(query = %query, found = results.len(), "search done");
    if results.is_empty() {
        console.say("No encontré nada con ese título.")?;
        return Ok(Ending::NoSearchResults);
    }

    console.say("\nResultados:")?;
    for (i, movie) in results.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, movie_line(movie)))?;
    }

    console.say("")?;
    let choice = pick_number(
        console,
        "Elige la peli que querías decir (número)",
        1,
        results.len(),
    )?;
    let movie_id = results[choice - 1].id;

    let details = waiting(console, "Cargando detalles...", || api.movie_details(movie_id))?;
    let base_title = details.title.as_deref().unwrap_or("esa peli");
    console.say(&format!("\nOK. Tomo como referencia: {base_title}"))?;
    console.say(&format!("Géneros de esa peli: {}\n", details.genre_names()))?;

    let catalog = waiting(console, "Cargando géneros...", || api.genres())?;
    let genre_input = console
        .read_line(
            "Si quieres, dime un género para afinar (ej: Ciencia ficción, Acción, Thriller). \
             Si no, pulsa Enter",
        )?
        .trim()
        .to_string();

    let mut genre_id = None;
    if !genre_input.is_empty() {
        genre_id = ranking::find_genre_id(&catalog, &genre_input);
        match genre_id {
            Some(id) => {
                tracing::debug!(genre_id = id, "genre matched");
                console.say(&format!("Perfecto. Filtro por género: {genre_input}\n"))?;
            }
            None => console.say("No pillé ese género tal cual. Sigo sin filtrar por género.\n")?,
        }
    }

    let recs = waiting(console, "Buscando recomendaciones...", || {
        api.recommendations(movie_id)
    })?
    .results;
    if recs.is_empty() {
        console.say("No tengo recomendaciones para esa película.")?;
        return Ok(Ending::NoRecommendations);
    }

    let ranked = ranking::rank(recs, genre_id, RECOMMENDATION_LIMIT);
    if ranked.is_empty() {
        console.say(
            "Con ese filtro de género no me queda nada. Prueba otro género o quita el filtro.",
        )?;
        return Ok(Ending::FilterEmptied);
    }

    console.say("Recomendaciones:")?;
    for (i, movie) in ranked.iter().enumerate() {
        console.say(&format!("{}. {}", i + 1, movie_line(movie)))?;
    }
    Ok(Ending::Recommended(ranked.len()))
}
