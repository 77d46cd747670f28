use serde::{Deserialize, Serialize};

use super::rating::parse_star_rating;

/// One rated entry scraped from a user's Letterboxd history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub title: String,
    pub film_id: String,
    pub slug: String,
    /// Star glyphs exactly as shown on the site, empty when unrated
    pub rating: String,
}

/// A film from the user's watch history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedFilm {
    pub title: String,
    pub film_id: String,
    pub slug: String,
    pub rating: Option<String>,
    /// 0-5 in half-star steps, `None` when the film was logged without a rating
    pub numerical_rating: Option<f32>,
}

impl From<HistoryEntry> for WatchedFilm {
    fn from(entry: HistoryEntry) -> Self {
        let numerical_rating = parse_star_rating(Some(entry.rating.as_str()));
        let rating = (!entry.rating.is_empty()).then_some(entry.rating);

        WatchedFilm {
            title: entry.title,
            film_id: entry.film_id,
            slug: entry.slug,
            rating,
            numerical_rating,
        }
    }
}

/// A watched film matched against TMDb
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedFilm {
    pub film: WatchedFilm,
    pub tmdb_id: u64,
    pub tmdb_title: String,
    pub genres: Vec<String>,
    pub overview: Option<String>,
    pub director: Option<String>,
    /// Top-billed cast, in billing order
    pub cast: Vec<String>,
}

impl EnrichedFilm {
    /// True when the user rated this film at least `min_rating` and TMDb has a plot overview
    pub fn is_highly_rated(&self, min_rating: f32) -> bool {
        self.overview.is_some()
            && self
                .film
                .numerical_rating
                .is_some_and(|rating| rating >= min_rating)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}
