// Configuration: everything the CLI needs comes from the environment (a
// `.env` file is loaded into it by `main`). Settings are read once at
// startup and turned into an immutable `Config` that the API client owns.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "es-ES";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Raw settings as found in the environment under the `TMDB_` prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub read_access_token: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Settings {
    /// Read settings from the process environment (`TMDB_API_KEY`,
    /// `TMDB_READ_ACCESS_TOKEN`, `TMDB_BASE_URL`, ...).
    pub fn load() -> Result<Self> {
        Self::from_env(config::Environment::with_prefix("TMDB"))
    }

    /// Same as `load` but from an explicit set of variables instead of the
    /// real environment.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self> {
        Self::from_env(config::Environment::with_prefix("TMDB").source(Some(vars)))
    }

    fn from_env(env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

/// How requests are authenticated. Exactly one form is active per run.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// v4 read access token, sent as `Authorization: Bearer <token>`.
    Bearer(String),
    /// v3 API key, sent as the `api_key` query parameter.
    ApiKey(String),
}

impl Credentials {
    /// Pick the credential form. The bearer token wins over the API key;
    /// empty values count as missing.
    pub fn resolve(api_key: Option<&str>, bearer: Option<&str>) -> Result<Self> {
        let api_key = api_key.filter(|k| !k.is_empty());
        let bearer = bearer.filter(|t| !t.is_empty());

        match (bearer, api_key) {
            (Some(token), key) => {
                if key.is_some() {
                    tracing::warn!(
                        "Both TMDB_READ_ACCESS_TOKEN and TMDB_API_KEY are set; using the bearer token"
                    );
                }
                Ok(Credentials::Bearer(token.to_string()))
            }
            (None, Some(key)) => Ok(Credentials::ApiKey(key.to_string())),
            (None, None) => Err(Error::MissingCredentials),
        }
    }

    /// Query parameters every request must carry for this credential.
    pub fn base_params(&self) -> Vec<(&'static str, String)> {
        match self {
            Credentials::Bearer(_) => Vec::new(),
            Credentials::ApiKey(key) => vec![("api_key", key.clone())],
        }
    }

    /// Token for the `Authorization` header, if any.
    pub fn bearer_token(&self) -> Option<&str> {
        match self {
            Credentials::Bearer(token) => Some(token),
            Credentials::ApiKey(_) => None,
        }
    }
}

// Never print secrets, not even in debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer(***)"),
            Credentials::ApiKey(_) => f.write_str("ApiKey(***)"),
        }
    }
}

/// Resolved, immutable configuration handed to the API client.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub base_url: String,
    pub language: String,
    pub timeout: Duration,
}

impl Config {
    /// Config with the default base URL, language and timeout.
    pub fn new(credentials: Credentials) -> Self {
        Config {
            credentials,
            base_url: default_base_url(),
            language: default_language(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let credentials = Credentials::resolve(
            settings.api_key.as_deref(),
            settings.read_access_token.as_deref(),
        )?;
        Ok(Config {
            credentials,
            base_url: settings.base_url,
            language: settings.language,
            timeout: Duration::from_secs(settings.timeout_secs),
        })
    }
}
