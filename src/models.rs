// Typed shapes of the TMDB responses. Only the fields the CLI uses are
// declared; serde ignores the rest. Missing-field fallbacks live here so
// the rest of the crate never has to look at raw JSON.

use serde::{Deserialize, Deserializer};

pub const UNTITLED: &str = "Sin título";
pub const UNKNOWN: &str = "¿?";

/// A movie as returned by `/search/movie` and `/movie/{id}/recommendations`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Option<Vec<u64>>,
}

impl MovieSummary {
    /// `title`, then `name`, then a placeholder. Empty strings are skipped.
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .unwrap_or(UNTITLED)
    }

    pub fn display_date(&self) -> &str {
        non_empty(&self.release_date).unwrap_or(UNKNOWN)
    }

    /// Rating used for ranking; a missing rating counts as 0.
    pub fn rating(&self) -> f64 {
        self.vote_average.unwrap_or(0.0)
    }

    pub fn genre_ids(&self) -> &[u64] {
        self.genre_ids.as_deref().unwrap_or(&[])
    }
}

/// `/movie/{id}` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl MovieDetail {
    /// Comma separated genre names, or the placeholder when there are none.
    pub fn genre_names(&self) -> String {
        if self.genres.is_empty() {
            return UNKNOWN.to_string();
        }
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Genre {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// `/genre/movie/list` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// One page of a paginated listing. We only ever ask for page 1.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// TMDB sends a number here, but anything else is treated as "no rating"
// instead of failing the whole page.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn summary(value: serde_json::Value) -> MovieSummary {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn title_falls_back_to_name_then_placeholder() {
        let m = summary(json!({"id": 1, "name": "Only name"}));
        assert_eq!(m.display_title(), "Only name");

        let m = summary(json!({"id": 1, "title": "", "name": "Name"}));
        assert_eq!(m.display_title(), "Name");

        let m = summary(json!({"id": 1}));
        assert_eq!(m.display_title(), UNTITLED);
    }

    #[test]
    fn empty_release_date_is_unknown() {
        let m = summary(json!({"id": 1, "release_date": ""}));
        assert_eq!(m.display_date(), UNKNOWN);
    }

    #[test]
    fn non_numeric_rating_is_ignored() {
        let m = summary(json!({"id": 1, "vote_average": "8.0"}));
        assert_eq!(m.vote_average, None);
        assert_eq!(m.rating(), 0.0);

        let m = summary(json!({"id": 1, "vote_average": 7}));
        assert_eq!(m.vote_average, Some(7.0));
    }

    #[test]
    fn null_genre_ids_is_empty() {
        let m = summary(json!({"id": 1, "genre_ids": null}));
        assert!(m.genre_ids().is_empty());
    }

    #[test]
    fn detail_genre_names() {
        let detail: MovieDetail = serde_json::from_value(json!({
            "id": 438631,
            "title": "Dune",
            "genres": [{"id": 878, "name": "Ciencia ficción"}, {"id": 12, "name": "Aventura"}]
        }))
        .unwrap();
        assert_eq!(detail.genre_names(), "Ciencia ficción, Aventura");

        let bare: MovieDetail = serde_json::from_value(json!({"id": 1})).unwrap();
        assert_eq!(bare.genre_names(), UNKNOWN);
    }

    #[test]
    fn page_without_results_is_empty() {
        let page: Page<MovieSummary> = serde_json::from_value(json!({"page": 1})).unwrap();
        assert!(page.results.is_empty());
    }
}
