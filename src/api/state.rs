use crate::services::Recommender;

/// Shared application state
///
/// Built once at startup; every collaborator inside the recommender is an
/// injected trait object, so tests can assemble it from fakes.
pub struct AppState {
    pub recommender: Recommender,
}

impl AppState {
    pub fn new(recommender: Recommender) -> Self {
        Self { recommender }
    }
}
