pub mod film;
pub mod rating;
pub mod recommendation;
pub mod tmdb;

pub use film::{EnrichedFilm, HistoryEntry, WatchedFilm};
pub use rating::parse_star_rating;
pub use recommendation::{Recommendation, RecommendationRequest};
pub use tmdb::{CastMember, Credits, CrewMember, Genre, MovieDetails, MovieSummary, Page};
