// Crate-wide error type. HTTP failures are split into network, status and
// decode errors so callers can tell them apart.

use thiserror::Error;

/// Everything that can go wrong while talking to TMDB or the terminal.
///
/// Only `MissingCredentials` is handled gracefully by the binary; the rest
/// propagate to `main` and end the process with a failure status.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No se encontró TMDB_API_KEY ni TMDB_READ_ACCESS_TOKEN en tu .env")]
    MissingCredentials,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} from {path}: {body}")]
    Http {
        status: reqwest::StatusCode,
        path: String,
        body: String,
    },

    #[error("Could not decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
