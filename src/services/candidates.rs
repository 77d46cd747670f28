use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{
    models::{EnrichedFilm, MovieSummary},
    services::{batch::gather_isolated, profile::top_n, providers::MovieDatabase},
};

/// Picks the highly rated films used to discover candidates
///
/// For each of the `seed_genres` most frequent genres (in rank order), every
/// highly rated film carrying that genre becomes a seed, in original order and
/// without repeats. Falls back to the first film when no genre data exists.
pub fn select_seeds(highly_rated: &[EnrichedFilm], seed_genres: usize) -> Vec<&EnrichedFilm> {
    let top_genres = top_n(
        highly_rated
            .iter()
            .flat_map(|f| f.genres.iter().map(String::as_str)),
        seed_genres,
    );

    let mut seeds = Vec::new();
    let mut seen_ids = HashSet::new();
    for genre in &top_genres {
        for film in highly_rated {
            if film.has_genre(genre) && seen_ids.insert(film.tmdb_id) {
                seeds.push(film);
            }
        }
    }

    if seeds.is_empty() {
        seeds.extend(highly_rated.first());
    }

    seeds
}

/// Merges recommendation pages into one pool keyed by movie id
///
/// Pool order is first appearance across pages; a repeated id keeps its
/// position but takes the later summary. Summaries without an overview are skipped.
pub fn merge_candidate_pages(pages: Vec<Vec<MovieSummary>>) -> Vec<MovieSummary> {
    let mut pool: Vec<MovieSummary> = Vec::new();
    let mut positions: HashMap<u64, usize> = HashMap::new();

    for movie in pages.into_iter().flatten() {
        if !movie.has_overview() {
            continue;
        }

        match positions.get(&movie.id) {
            Some(&index) => pool[index] = movie,
            None => {
                positions.insert(movie.id, pool.len());
                pool.push(movie);
            }
        }
    }

    pool
}

/// Builds the candidate pool from the database's recommendations for each seed
///
/// A seed whose lookup fails contributes nothing; if every lookup fails the
/// pool is empty.
pub async fn generate_candidates(
    db: Arc<dyn MovieDatabase>,
    highly_rated: &[EnrichedFilm],
    seed_genres: usize,
) -> Vec<MovieSummary> {
    let seeds = select_seeds(highly_rated, seed_genres);

    tracing::info!(
        seeds = seeds.len(),
        seed_titles = ?seeds.iter().map(|s| s.tmdb_title.as_str()).collect::<Vec<_>>(),
        "Fetching candidates using diverse seed movies"
    );

    let tasks: Vec<_> = seeds
        .iter()
        .map(|seed| {
            let db = db.clone();
            let seed_id = seed.tmdb_id;
            async move {
                db.recommendations(seed_id).await.inspect_err(|e| {
                    tracing::warn!(seed_id = seed_id, error = %e, "Could not fetch recommendations for seed");
                })
            }
        })
        .collect();

    let pages: Vec<Vec<MovieSummary>> = gather_isolated("seed_recommendations", tasks)
        .await
        .into_iter()
        .flatten()
        .collect();

    let candidates = merge_candidate_pages(pages);
    tracing::info!(candidates = candidates.len(), "Fetched unique candidate summaries");

    candidates
}
