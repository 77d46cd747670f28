pub mod batch;
pub mod candidates;
pub mod embedding;
pub mod enrichment;
pub mod history;
pub mod profile;
pub mod providers;
pub mod recommendations;
pub mod scoring;

pub use embedding::{Embedder, HttpEmbedder};
pub use history::{HistorySource, LetterboxdScraper};
pub use providers::{MovieDatabase, TmdbProvider};
pub use recommendations::{Recommender, RecommenderSettings};
