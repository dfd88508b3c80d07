// API client module: a small blocking HTTP client for the handful of TMDB
// endpoints the CLI needs. One request at a time, no retries; failures
// are classified into `Error` and handed back to the caller.

use std::collections::BTreeMap;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::models::{Genre, GenreList, MovieDetail, MovieSummary, Page};

/// Blocking TMDB client. Holds the reqwest client, the base URL, the
/// resolved credentials and the language used for every request.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(TmdbClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
            language: config.language.clone(),
        })
    }

    /// Credential params first, then the caller's; the caller wins on
    /// a key collision.
    fn query_params(&self, params: &[(&str, &str)]) -> BTreeMap<String, String> {
        let mut merged: BTreeMap<String, String> = self
            .credentials
            .base_params()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        for (k, v) in params {
            merged.insert(k.to_string(), v.to_string());
        }
        merged
    }

    /// GET `{base_url}{path}` and decode the JSON body into `T`.
    ///
    /// Non-2xx answers become `Error::Http`, transport failures and
    /// timeouts `Error::Network`, unexpected bodies `Error::Decode`.
    pub fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.get(&url).query(&self.query_params(params));
        if let Some(token) = self.credentials.bearer_token() {
            req = req.bearer_auth(token);
        }

        tracing::debug!(path, "GET");
        let res = req.send()?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            tracing::debug!(path, %status, "request failed");
            return Err(Error::Http {
                status,
                path: path.to_string(),
                body,
            });
        }

        let body = res.text()?;
        serde_json::from_str(&body).map_err(|source| Error::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// First page of `/search/movie` for `query`.
    pub fn search_movie(&self, query: &str) -> Result<Page<MovieSummary>> {
        self.get(
            "/search/movie",
            &[
                ("query", query),
                ("include_adult", "false"),
                ("language", &self.language),
                ("page", "1"),
            ],
        )
    }

    pub fn movie_details(&self, movie_id: u64) -> Result<MovieDetail> {
        self.get(&format!("/movie/{movie_id}"), &[("language", &self.language)])
    }

    /// First page of recommendations for `movie_id`.
    pub fn recommendations(&self, movie_id: u64) -> Result<Page<MovieSummary>> {
        self.get(
            &format!("/movie/{movie_id}/recommendations"),
            &[("language", &self.language), ("page", "1")],
        )
    }

    /// The movie genre catalog; empty if the response has no `genres`.
    pub fn genres(&self) -> Result<Vec<Genre>> {
        let list: GenreList = self.get("/genre/movie/list", &[("language", &self.language)])?;
        Ok(list.genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(server: &Server, credentials: Credentials) -> TmdbClient {
        let mut config = Config::new(credentials);
        config.base_url = server.url();
        TmdbClient::new(&config).unwrap()
    }

    #[test]
    fn bearer_mode_sends_header_and_no_api_key() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/genre/movie/list")
            .match_header("authorization", "Bearer tok")
            .match_query(Matcher::Exact("language=es-ES".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"genres":[{"id":28,"name":"Acción"}]}"#)
            .create();

        let api = client(&server, Credentials::Bearer("tok".into()));
        let genres = api.genres().unwrap();
        assert_eq!(genres, vec![Genre { id: 28, name: "Acción".into() }]);
        assert!(!api.query_params(&[]).contains_key("api_key"));
        mock.assert();
    }

    #[test]
    fn api_key_mode_sends_param_and_no_header() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/movie/438631")
            .match_header("authorization", Matcher::Missing)
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api_key".into(), "k3y".into()),
                Matcher::UrlEncoded("language".into(), "es-ES".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id":438631,"title":"Dune","genres":[]}"#)
            .create();

        let api = client(&server, Credentials::ApiKey("k3y".into()));
        let detail = api.movie_details(438631).unwrap();
        assert_eq!(detail.title.as_deref(), Some("Dune"));
        mock.assert();
    }

    #[test]
    fn caller_params_override_credential_params() {
        let server = Server::new();
        let api = client(&server, Credentials::ApiKey("k3y".into()));
        let params = api.query_params(&[("api_key", "other"), ("page", "1")]);
        assert_eq!(params.get("api_key").map(String::as_str), Some("other"));
        assert_eq!(params.get("page").map(String::as_str), Some("1"));
    }

    #[test]
    fn search_sends_expected_params() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "dune".into()),
                Matcher::UrlEncoded("include_adult".into(), "false".into()),
                Matcher::UrlEncoded("language".into(), "es-ES".into()),
                Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"page":1,"results":[{"id":1,"title":"Dune"}]}"#)
            .create();

        let api = client(&server, Credentials::ApiKey("k".into()));
        let page = api.search_movie("dune").unwrap();
        assert_eq!(page.results.len(), 1);
        mock.assert();
    }

    #[test]
    fn missing_genres_key_is_empty_catalog() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/genre/movie/list")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .create();

        let api = client(&server, Credentials::ApiKey("k".into()));
        assert!(api.genres().unwrap().is_empty());
    }

    #[test]
    fn http_error_status_is_reported() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/movie/1/recommendations")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"status_message":"Invalid API key"}"#)
            .create();

        let api = client(&server, Credentials::ApiKey("bad".into()));
        match api.recommendations(1) {
            Err(Error::Http { status, path, body }) => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(path, "/movie/1/recommendations");
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("expected HTTP error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/search/movie")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create();

        let api = client(&server, Credentials::ApiKey("k".into()));
        assert!(matches!(
            api.search_movie("x"),
            Err(Error::Decode { .. })
        ));
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        let mut config = Config::new(Credentials::ApiKey("k".into()));
        config.base_url = "http://127.0.0.1:9".into();
        let api = TmdbClient::new(&config).unwrap();
        assert!(matches!(api.genres(), Err(Error::Network(_))));
    }
}
