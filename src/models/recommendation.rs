use serde::{Deserialize, Serialize};

/// Body of POST /recommend
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub username: Option<String>,
}

/// A ranked candidate returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    /// Weighted hybrid score, higher is better
    pub score: f32,
    pub overview: String,
    pub poster_path: Option<String>,
    pub tmdb_id: u64,
    pub director: Option<String>,
    pub genres: Vec<String>,
}
