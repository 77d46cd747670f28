use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{MovieDetails, Recommendation},
    services::{
        embedding::{cosine_similarities, Embedder},
        profile::TasteProfile,
    },
};

/// Weights of the hybrid score; they sum to 1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub plot: f32,
    pub genre: f32,
    pub director: f32,
    pub actor: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            plot: 0.55,
            genre: 0.20,
            director: 0.15,
            actor: 0.10,
        }
    }
}

/// Keeps overlap ratios finite when a profile set is empty
pub const OVERLAP_EPSILON: f32 = 1e-6;

/// The four components of a candidate's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub plot: f32,
    pub genre: f32,
    pub director: f32,
    pub actor: f32,
}

impl SubScores {
    pub fn combine(&self, weights: &ScoreWeights) -> f32 {
        weights.plot * self.plot
            + weights.genre * self.genre
            + weights.director * self.director
            + weights.actor * self.actor
    }
}

/// Genre, director and actor overlap between a candidate and the profile
pub fn overlap_scores(
    profile: &TasteProfile,
    candidate: &MovieDetails,
    cast_size: usize,
    plot: f32,
) -> SubScores {
    let genre_hits = candidate
        .genres
        .iter()
        .flatten()
        .filter(|g| profile.has_genre(&g.name))
        .count();
    let genre = genre_hits as f32 / (profile.top_genres.len() as f32 + OVERLAP_EPSILON);

    let director = match candidate.director() {
        Some(name) if profile.has_director(&name) => 1.0,
        _ => 0.0,
    };

    let actor_hits = candidate
        .top_cast(cast_size)
        .iter()
        .filter(|a| profile.has_actor(a))
        .count();
    let actor = actor_hits as f32 / (profile.top_actors.len() as f32 + OVERLAP_EPSILON);

    SubScores {
        plot,
        genre,
        director,
        actor,
    }
}

/// Scores candidates against the profile and returns the best `limit`, highest first
///
/// Candidates missing an overview, genres or credits are skipped, as is any
/// candidate whose title exactly matches a title in the watch history.
pub async fn score_and_rank(
    profile: &TasteProfile,
    candidates: Vec<MovieDetails>,
    watched_titles: &HashSet<String>,
    embedder: &dyn Embedder,
    weights: &ScoreWeights,
    cast_size: usize,
    limit: usize,
) -> AppResult<Vec<Recommendation>> {
    let valid: Vec<MovieDetails> = candidates.into_iter().filter(|c| c.is_scorable()).collect();
    if valid.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(
        candidates = valid.len(),
        "Scoring and ranking candidates with hybrid model (plot + genre + director + actor)"
    );

    let overviews: Vec<String> = valid
        .iter()
        .map(|c| c.overview_text().unwrap_or_default().to_string())
        .collect();
    let vectors = embedder.encode(&overviews).await?;
    let plot_scores = cosine_similarities(&profile.vector, &vectors)?;

    let mut recommendations: Vec<Recommendation> = valid
        .into_iter()
        .zip(plot_scores)
        .filter(|(candidate, _)| !watched_titles.contains(&candidate.title))
        .map(|(candidate, plot)| {
            let score = overlap_scores(profile, &candidate, cast_size, plot).combine(weights);
            Recommendation {
                director: candidate.director(),
                genres: candidate.genre_names(),
                overview: candidate.overview_text().unwrap_or_default().to_string(),
                title: candidate.title,
                score,
                poster_path: candidate.poster_path,
                tmdb_id: candidate.id,
            }
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendations.truncate(limit);

    tracing::info!(recommendations = recommendations.len(), "Candidates ranked");

    Ok(recommendations)
}
