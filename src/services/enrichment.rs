use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{EnrichedFilm, MovieDetails, MovieSummary, WatchedFilm},
    services::{batch::gather_isolated, providers::MovieDatabase},
};

/// Matches each watched film against the movie database
///
/// Lookups run concurrently. A film is dropped when the title search finds
/// nothing or any lookup fails; the rest of the batch is unaffected. Output keeps
/// the history order.
pub async fn enrich_watched_films(
    db: Arc<dyn MovieDatabase>,
    films: Vec<WatchedFilm>,
    request_delay: Duration,
    cast_size: usize,
) -> Vec<EnrichedFilm> {
    let total = films.len();
    tracing::info!(films = total, "Fetching TMDb details for watched films");

    let tasks: Vec<_> = films
        .into_iter()
        .map(|film| {
            let db = db.clone();
            async move {
                let title = film.title.clone();
                enrich_watched_film(db.as_ref(), film, request_delay, cast_size)
                    .await
                    .inspect_err(|e| {
                        tracing::warn!(title = %title, error = %e, "Could not fetch details for film");
                    })
            }
        })
        .collect();

    let enriched: Vec<EnrichedFilm> = gather_isolated("watched_details", tasks)
        .await
        .into_iter()
        .flatten()
        .flatten()
        .collect();

    tracing::info!(
        films = total,
        enriched = enriched.len(),
        "Watched films enriched"
    );

    enriched
}

/// Looks up one film: first search hit, then its details with credits
async fn enrich_watched_film(
    db: &dyn MovieDatabase,
    film: WatchedFilm,
    request_delay: Duration,
    cast_size: usize,
) -> AppResult<Option<EnrichedFilm>> {
    if !request_delay.is_zero() {
        tokio::time::sleep(request_delay).await;
    }

    let Some(best_match) = db.search_movies(&film.title).await?.into_iter().next() else {
        tracing::debug!(title = %film.title, "No TMDb match for film");
        return Ok(None);
    };

    let details = db.movie_details(best_match.id).await?;
    Ok(Some(to_enriched(film, &details, cast_size)))
}

fn to_enriched(film: WatchedFilm, details: &MovieDetails, cast_size: usize) -> EnrichedFilm {
    EnrichedFilm {
        film,
        tmdb_id: details.id,
        tmdb_title: details.title.clone(),
        genres: details.genre_names(),
        overview: details.overview_text().map(str::to_string),
        director: details.director(),
        cast: details.top_cast(cast_size),
    }
}

/// Fetches full details (with credits) for every candidate summary
///
/// Failed lookups are dropped; output keeps candidate order.
pub async fn enrich_candidates(
    db: Arc<dyn MovieDatabase>,
    candidates: Vec<MovieSummary>,
) -> Vec<MovieDetails> {
    let total = candidates.len();
    tracing::info!(candidates = total, "Enriching candidate films with full details");

    let tasks: Vec<_> = candidates
        .into_iter()
        .map(|candidate| {
            let db = db.clone();
            async move {
                db.movie_details(candidate.id).await.inspect_err(|e| {
                    tracing::warn!(
                        movie_id = candidate.id,
                        title = %candidate.title,
                        error = %e,
                        "Could not fetch candidate details"
                    );
                })
            }
        })
        .collect();

    let details: Vec<MovieDetails> = gather_isolated("candidate_details", tasks)
        .await
        .into_iter()
        .flatten()
        .collect();

    tracing::info!(
        candidates = total,
        enriched = details.len(),
        "Candidates enriched"
    );

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{CastMember, Credits, CrewMember, Genre};
    use crate::services::providers::MockMovieDatabase;

    fn watched(title: &str, rating: f32) -> WatchedFilm {
        WatchedFilm {
            title: title.to_string(),
            film_id: title.to_lowercase(),
            slug: title.to_lowercase(),
            rating: None,
            numerical_rating: Some(rating),
        }
    }

    fn summary(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: title.to_string(),
            overview: Some(format!("{} overview", title)),
            poster_path: None,
            release_date: None,
        }
    }

    fn details(id: u64, title: &str) -> MovieDetails {
        MovieDetails {
            id,
            title: title.to_string(),
            overview: Some(format!("{} overview", title)),
            poster_path: None,
            genres: Some(vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }]),
            credits: Some(Credits {
                cast: (1..=7)
                    .map(|i| CastMember {
                        name: format!("Actor {}", i),
                        character: None,
                        order: Some(i),
                    })
                    .collect(),
                crew: vec![CrewMember {
                    name: "Director A".to_string(),
                    job: Some("Director".to_string()),
                    department: Some("Directing".to_string()),
                }],
            }),
        }
    }

    #[tokio::test]
    async fn test_enrich_takes_first_search_result() {
        let mut db = MockMovieDatabase::new();
        db.expect_search_movies()
            .returning(|title| Ok(vec![summary(1, title), summary(2, "Other")]));
        db.expect_movie_details()
            .times(1)
            .returning(|id| Ok(details(id, "Heat")));

        let enriched = enrich_watched_films(
            Arc::new(db),
            vec![watched("Heat", 5.0)],
            Duration::ZERO,
            5,
        )
        .await;

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].tmdb_id, 1);
        assert_eq!(enriched[0].genres, vec!["Drama"]);
        assert_eq!(enriched[0].director.as_deref(), Some("Director A"));
        assert_eq!(enriched[0].cast.len(), 5);
        assert_eq!(enriched[0].cast[0], "Actor 1");
    }

    #[tokio::test]
    async fn test_unmatched_and_failed_films_are_dropped() {
        let mut db = MockMovieDatabase::new();
        db.expect_search_movies().returning(|title| match title {
            "Nothing" => Ok(Vec::new()),
            "Broken" => Err(AppError::ExternalApi("timeout".to_string())),
            other => Ok(vec![summary(7, other)]),
        });
        db.expect_movie_details()
            .returning(|id| Ok(details(id, "Heat")));

        let films = vec![
            watched("Nothing", 4.0),
            watched("Heat", 4.5),
            watched("Broken", 3.0),
        ];
        let enriched = enrich_watched_films(Arc::new(db), films, Duration::ZERO, 5).await;

        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].film.title, "Heat");
    }

    #[tokio::test]
    async fn test_output_keeps_history_order() {
        let mut db = MockMovieDatabase::new();
        db.expect_search_movies().returning(|title| {
            let id = match title {
                "A" => 1,
                "B" => 2,
                _ => 3,
            };
            Ok(vec![summary(id, title)])
        });
        db.expect_movie_details()
            .returning(|id| Ok(details(id, "any")));

        let films = vec![watched("C", 4.0), watched("A", 4.0), watched("B", 4.0)];
        let enriched = enrich_watched_films(Arc::new(db), films, Duration::ZERO, 5).await;

        let ids: Vec<u64> = enriched.iter().map(|f| f.tmdb_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_candidate_failures_are_dropped() {
        let mut db = MockMovieDatabase::new();
        db.expect_movie_details().returning(|id| {
            if id == 2 {
                Err(AppError::NotFound("TMDb resource movie/2".to_string()))
            } else {
                Ok(details(id, "Candidate"))
            }
        });

        let candidates = vec![summary(1, "One"), summary(2, "Two"), summary(3, "Three")];
        let enriched = enrich_candidates(Arc::new(db), candidates).await;

        let ids: Vec<u64> = enriched.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
