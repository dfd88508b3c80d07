// Genre matching and recommendation ranking. This is the only part of the
// CLI that does anything with the data beyond printing it.

use crate::models::{Genre, MovieSummary};

/// How many search results are offered to pick from.
pub const SEARCH_LIMIT: usize = 7;
/// How many recommendations are printed.
pub const RECOMMENDATION_LIMIT: usize = 10;

pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Exact (case and surrounding whitespace insensitive) match of `name`
/// against the catalog. No partial matches.
pub fn find_genre_id(catalog: &[Genre], name: &str) -> Option<u64> {
    let wanted = normalize(name);
    catalog
        .iter()
        .find(|g| normalize(&g.name) == wanted)
        .map(|g| g.id)
}

/// Keep only the movies tagged with `genre_id`.
pub fn filter_by_genre(movies: Vec<MovieSummary>, genre_id: u64) -> Vec<MovieSummary> {
    movies
        .into_iter()
        .filter(|m| m.genre_ids().contains(&genre_id))
        .collect()
}

/// Optionally filter by genre, then sort by rating (highest first, ties
/// keep their original order) and keep the first `limit`.
pub fn rank(movies: Vec<MovieSummary>, genre_id: Option<u64>, limit: usize) -> Vec<MovieSummary> {
    let mut movies = match genre_id {
        Some(id) => filter_by_genre(movies, id),
        None => movies,
    };
    // sort_by is stable
    movies.sort_by(|a, b| b.rating().total_cmp(&a.rating()));
    movies.truncate(limit);
    movies
}
