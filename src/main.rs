// Entrypoint for the CLI application.
// - Loads `.env` and the `TMDB_*` settings, then sets up logging on stderr.
// - Missing credentials is the one error reported nicely (exit code 1);
//   anything else bubbles up through `anyhow`.
// - Credentials are checked before the first prompt, so a run without them
//   exits 1 even if the user would have typed an empty title.

use std::io::IsTerminal;
use std::str::FromStr;

use tracing::Level;

use tmdb_recomienda::api::TmdbClient;
use tmdb_recomienda::config::{Config, Settings};
use tmdb_recomienda::ui::{run, LineConsole, Terminal};
use tmdb_recomienda::Error;

fn main() -> anyhow::Result<()> {
    // A missing .env is fine: the variables may come from the environment.
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    init_logging(&settings);

    let config = match Config::from_settings(settings) {
        Ok(config) => config,
        Err(Error::MissingCredentials) => {
            eprintln!("{}", Error::MissingCredentials);
            eprintln!("Revisa que tu archivo .env exista y tenga una de estas variables.");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };
    tracing::debug!(?config, "configuration loaded");

    let api = TmdbClient::new(&config)?;

    // Fancy prompts only when a human is typing; plain lines otherwise.
    let ending = if std::io::stdin().is_terminal() {
        run(&api, &mut Terminal)?
    } else {
        run(&api, &mut LineConsole::stdio())?
    };
    tracing::info!(?ending, "session finished");
    Ok(())
}

fn init_logging(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_max_level(Level::from_str(&settings.log_level).unwrap_or(Level::WARN))
        .with_writer(std::io::stderr)
        .init();
}
