//! Taste profile derived from a user's highly rated films.

use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::EnrichedFilm,
    services::embedding::{mean_vector, Embedder},
};

/// A user's preferences, rebuilt for every request
#[derive(Debug, Clone, PartialEq)]
pub struct TasteProfile {
    /// Mean embedding of the highly rated films' overviews
    pub vector: Vec<f32>,
    /// Most frequent genres, most frequent first
    pub top_genres: Vec<String>,
    pub top_directors: Vec<String>,
    pub top_actors: Vec<String>,
}

/// How many names to keep for each part of the profile
#[derive(Debug, Clone, Copy)]
pub struct ProfileLimits {
    pub genres: usize,
    pub directors: usize,
    pub actors: usize,
}

impl Default for ProfileLimits {
    fn default() -> Self {
        Self {
            genres: 5,
            directors: 3,
            actors: 5,
        }
    }
}

impl TasteProfile {
    /// Builds the profile from films already filtered to the highly rated set
    ///
    /// Callers must pass at least one film, each with an overview.
    pub async fn build(
        films: &[EnrichedFilm],
        embedder: &dyn Embedder,
        limits: ProfileLimits,
    ) -> AppResult<Self> {
        let top_genres = top_n(
            films.iter().flat_map(|f| f.genres.iter().map(String::as_str)),
            limits.genres,
        );
        let top_directors = top_n(
            films.iter().filter_map(|f| f.director.as_deref()),
            limits.directors,
        );
        let top_actors = top_n(
            films.iter().flat_map(|f| f.cast.iter().map(String::as_str)),
            limits.actors,
        );

        tracing::info!(genres = ?top_genres, "User's top genres determined");
        tracing::info!(directors = ?top_directors, "User's top directors determined");
        tracing::info!(actors = ?top_actors, "User's top actors determined");

        let overviews: Vec<String> = films
            .iter()
            .filter_map(|f| f.overview.clone())
            .collect();

        tracing::info!(films = overviews.len(), "Generating plot embeddings for top-rated films");
        let vectors = embedder.encode(&overviews).await?;
        let vector = mean_vector(&vectors)?;

        Ok(Self {
            vector,
            top_genres,
            top_directors,
            top_actors,
        })
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.top_genres.iter().any(|g| g == genre)
    }

    pub fn has_director(&self, director: &str) -> bool {
        self.top_directors.iter().any(|d| d == director)
    }

    pub fn has_actor(&self, actor: &str) -> bool {
        self.top_actors.iter().any(|a| a == actor)
    }
}

/// The `n` most frequent values, most frequent first
///
/// Ties keep the order in which values were first seen.
pub fn top_n<'a, I>(values: I, n: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&'a str, (usize, usize)> = HashMap::new();
    for (position, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first_seen))| (value, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    ranked
        .into_iter()
        .take(n)
        .map(|(value, _, _)| value.to_string())
        .collect()
}
