use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{Recommendation, RecommendationRequest, WatchedFilm},
};

use super::AppState;

const RECOMMENDATION_FAILED: &str = "Failed to generate recommendations.";

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Ranked film recommendations for a Letterboxd user
///
/// Any pipeline failure is logged and reported as a generic 500.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(request_id = %request_id, error = %rejection, "Rejected request body");
        AppError::InvalidInput(rejection.body_text())
    })?;

    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Username is required".to_string()))?;

    tracing::info!(
        request_id = %request_id,
        username = %username,
        "Processing recommendation request"
    );

    let recommendations = state
        .recommender
        .recommend(username)
        .await
        .map_err(|e| {
            tracing::error!(
                request_id = %request_id,
                username = %username,
                error = %e,
                "Recommendation pipeline failed"
            );
            AppError::Internal(RECOMMENDATION_FAILED.to_string())
        })?;

    tracing::info!(
        request_id = %request_id,
        count = recommendations.len(),
        "Recommendations generated"
    );

    Ok(Json(recommendations))
}

/// A user's rated films with numeric ratings
pub async fn user_films(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<WatchedFilm>>> {
    let films = state.recommender.watched_films(&username).await?;
    Ok(Json(films))
}
