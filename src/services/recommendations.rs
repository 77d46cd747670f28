use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    error::AppResult,
    models::{EnrichedFilm, Recommendation, WatchedFilm},
    services::{
        candidates::generate_candidates,
        embedding::Embedder,
        enrichment::{enrich_candidates, enrich_watched_films},
        history::HistorySource,
        profile::{ProfileLimits, TasteProfile},
        providers::MovieDatabase,
        scoring::{score_and_rank, ScoreWeights},
    },
};

/// Tunables for one recommendation run
#[derive(Debug, Clone)]
pub struct RecommenderSettings {
    /// Ratings at or above this count as "highly rated"
    pub min_rating: f32,
    pub profile_limits: ProfileLimits,
    /// Number of top genres used to choose seed films
    pub seed_genres: usize,
    /// Billed cast members considered per film
    pub cast_size: usize,
    pub max_results: usize,
    pub weights: ScoreWeights,
    /// Pause before each watched-film title search
    pub request_delay: Duration,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            min_rating: 4.0,
            profile_limits: ProfileLimits::default(),
            seed_genres: 3,
            cast_size: 5,
            max_results: 50,
            weights: ScoreWeights::default(),
            request_delay: Duration::from_millis(100),
        }
    }
}

/// Generates personalized film recommendations from a user's watch history
///
/// Pipeline: history → TMDb enrichment → taste profile → seed-driven
/// candidate pool → candidate details → hybrid scoring.
#[derive(Clone)]
pub struct Recommender {
    history: Arc<dyn HistorySource>,
    movie_db: Arc<dyn MovieDatabase>,
    embedder: Arc<dyn Embedder>,
    settings: RecommenderSettings,
}

impl Recommender {
    pub fn new(
        history: Arc<dyn HistorySource>,
        movie_db: Arc<dyn MovieDatabase>,
        embedder: Arc<dyn Embedder>,
        settings: RecommenderSettings,
    ) -> Self {
        Self {
            history,
            movie_db,
            embedder,
            settings,
        }
    }

    /// The user's rated films with numeric ratings attached
    ///
    /// Any fetch error fails the whole call; partial history is never returned.
    pub async fn watched_films(&self, username: &str) -> AppResult<Vec<WatchedFilm>> {
        tracing::info!(username = %username, "Fetching films");

        let entries = self.history.fetch_rated_films(username).await?;
        Ok(entries.into_iter().map(WatchedFilm::from).collect())
    }

    /// Ranked recommendations for `username`, best first
    ///
    /// Returns an empty list when the user has no highly rated films with an
    /// overview, or when no candidates could be found.
    pub async fn recommend(&self, username: &str) -> AppResult<Vec<Recommendation>> {
        let watched = self.watched_films(username).await?;
        if watched.is_empty() {
            tracing::info!(username = %username, "No rated films found");
            return Ok(Vec::new());
        }

        let watched_titles: HashSet<String> = watched.iter().map(|f| f.title.clone()).collect();

        let enriched = enrich_watched_films(
            self.movie_db.clone(),
            watched,
            self.settings.request_delay,
            self.settings.cast_size,
        )
        .await;

        let highly_rated: Vec<EnrichedFilm> = enriched
            .into_iter()
            .filter(|f| f.is_highly_rated(self.settings.min_rating))
            .collect();

        if highly_rated.is_empty() {
            tracing::info!(username = %username, "Not enough highly rated films to create profile");
            return Ok(Vec::new());
        }

        tracing::info!(
            username = %username,
            highly_rated = highly_rated.len(),
            "Building taste profile"
        );

        let profile = TasteProfile::build(
            &highly_rated,
            self.embedder.as_ref(),
            self.settings.profile_limits,
        )
        .await?;

        let candidates = generate_candidates(
            self.movie_db.clone(),
            &highly_rated,
            self.settings.seed_genres,
        )
        .await;

        if candidates.is_empty() {
            tracing::info!(username = %username, "No candidate films found");
            return Ok(Vec::new());
        }

        let candidate_details = enrich_candidates(self.movie_db.clone(), candidates).await;

        score_and_rank(
            &profile,
            candidate_details,
            &watched_titles,
            self.embedder.as_ref(),
            &self.settings.weights,
            self.settings.cast_size,
            self.settings.max_results,
        )
        .await
    }
}
