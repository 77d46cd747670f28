//! TMDb (The Movie Database) v3 provider
//!
//! API Flow:
//! 1. Title Search: /search/movie?query= → ranked movie summaries
//! 2. Details: /movie/{id}?append_to_response=credits → genres, overview, cast, crew
//! 3. Recommendations: /movie/{id}/recommendations → first page of related movies
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{MovieDetails, MovieSummary, Page},
    services::providers::MovieDatabase,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const SEARCH_CACHE_TTL: u64 = 86400; // 1 day
const DETAILS_CACHE_TTL: u64 = 604800; // 1 week
const RECS_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Issues a GET against the API and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .http_client
            .get(self.endpoint(path))
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDb resource {}", path)));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MovieDatabase for TmdbProvider {
    async fn search_movies(&self, title: &str) -> AppResult<Vec<MovieSummary>> {
        if title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(title.to_string()),
            SEARCH_CACHE_TTL,
            async move {
                let page: Page<MovieSummary> =
                    self.get_json("search/movie", &[("query", title)]).await?;

                tracing::debug!(
                    query = %title,
                    results = page.results.len(),
                    provider = self.name(),
                    "Title search completed"
                );

                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let details: MovieDetails = self
                    .get_json(
                        &format!("movie/{}", movie_id),
                        &[("append_to_response", "credits")],
                    )
                    .await?;

                tracing::debug!(
                    movie_id = movie_id,
                    title = %details.title,
                    provider = self.name(),
                    "Movie details fetched"
                );

                Ok::<_, AppError>(details)
            }
        )
    }

    async fn recommendations(&self, movie_id: u64) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::Recommendations(movie_id),
            RECS_CACHE_TTL,
            async move {
                let page: Page<MovieSummary> = self
                    .get_json(&format!("movie/{}/recommendations", movie_id), &[])
                    .await?;

                tracing::debug!(
                    movie_id = movie_id,
                    results = page.results.len(),
                    provider = self.name(),
                    "Recommendations fetched"
                );

                Ok::<_, AppError>(page.results)
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
