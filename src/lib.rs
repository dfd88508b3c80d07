// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) loads the configuration and hands an API client to the
// interactive session.
//
// Module responsibilities:
// - `config`: Environment / `.env` settings and the resolved credentials.
// - `error`: The crate-wide error type.
// - `models`: Typed shapes of the TMDB responses we care about.
// - `api`: Blocking HTTP client for the four TMDB endpoints we use.
// - `ranking`: Genre matching and recommendation filtering/sorting.
// - `ui`: The interactive flow (prompts, numeric picker, output lines).
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod ranking;
pub mod ui;

pub use error::{Error, Result};
