//! Movie metadata provider abstraction
//!
//! The recommendation pipeline only needs three lookups from a movie database:
//! title search, full details with credits, and the "recommended" list for a
//! movie. Keeping them behind a trait lets tests swap in fakes.
use crate::{
    error::AppResult,
    models::{MovieDetails, MovieSummary},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieDatabase: Send + Sync {
    /// Search movies by title, best match first
    async fn search_movies(&self, title: &str) -> AppResult<Vec<MovieSummary>>;

    /// Fetch full details for a movie, credits included
    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails>;

    /// Fetch the first page of movies the provider recommends for `movie_id`
    async fn recommendations(&self, movie_id: u64) -> AppResult<Vec<MovieSummary>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
