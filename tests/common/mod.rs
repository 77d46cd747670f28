use std::collections::HashMap;
use std::sync::Arc;

use axum_test::TestServer;

use cinematch_api::{
    api::{create_router, AppState},
    error::{AppError, AppResult},
    models::{
        CastMember, Credits, CrewMember, Genre, HistoryEntry, MovieDetails, MovieSummary,
    },
    services::{Embedder, HistorySource, MovieDatabase, Recommender, RecommenderSettings},
};

/// In-memory watch histories keyed by username; unknown users are a 404
#[derive(Default)]
pub struct FakeHistory {
    pub users: HashMap<String, Vec<HistoryEntry>>,
    pub unavailable: bool,
}

impl FakeHistory {
    pub fn with_user(username: &str, films: &[(&str, &str)]) -> Self {
        let entries = films
            .iter()
            .map(|(title, rating)| HistoryEntry {
                title: title.to_string(),
                film_id: title.to_lowercase().replace(' ', "-"),
                slug: title.to_lowercase().replace(' ', "-"),
                rating: rating.to_string(),
            })
            .collect();

        let mut users = HashMap::new();
        users.insert(username.to_string(), entries);
        Self {
            users,
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            users: HashMap::new(),
            unavailable: true,
        }
    }
}

#[async_trait::async_trait]
impl HistorySource for FakeHistory {
    async fn fetch_rated_films(&self, username: &str) -> AppResult<Vec<HistoryEntry>> {
        if self.unavailable {
            return Err(AppError::ExternalApi("Letterboxd unavailable".to_string()));
        }

        self.users
            .get(username)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Letterboxd user {}", username)))
    }
}

/// Catalog of films with per-seed recommendation lists
#[derive(Default)]
pub struct FakeMovieDatabase {
    pub movies: Vec<MovieDetails>,
    pub recommendations: HashMap<u64, Vec<u64>>,
}

impl FakeMovieDatabase {
    pub fn add(&mut self, id: u64, title: &str, genres: &[&str], director: &str, cast: &[&str]) {
        self.movies.push(movie(id, title, genres, director, cast));
    }

    pub fn recommend(&mut self, seed: u64, ids: &[u64]) {
        self.recommendations.insert(seed, ids.to_vec());
    }

    fn find(&self, id: u64) -> Option<&MovieDetails> {
        self.movies.iter().find(|m| m.id == id)
    }
}

fn summary_of(movie: &MovieDetails) -> MovieSummary {
    MovieSummary {
        id: movie.id,
        title: movie.title.clone(),
        overview: movie.overview.clone(),
        poster_path: movie.poster_path.clone(),
        release_date: None,
    }
}

#[async_trait::async_trait]
impl MovieDatabase for FakeMovieDatabase {
    async fn search_movies(&self, title: &str) -> AppResult<Vec<MovieSummary>> {
        Ok(self
            .movies
            .iter()
            .filter(|m| m.title == title)
            .map(summary_of)
            .collect())
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<MovieDetails> {
        self.find(movie_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Movie {}", movie_id)))
    }

    async fn recommendations(&self, movie_id: u64) -> AppResult<Vec<MovieSummary>> {
        Ok(self
            .recommendations
            .get(&movie_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.find(*id))
            .map(summary_of)
            .collect())
    }

    fn name(&self) -> &'static str {
        "Fake"
    }
}

/// Embeds overviews by keyword: "heist" texts point one way, everything else the other
pub struct KeywordEmbedder;

#[async_trait::async_trait]
impl Embedder for KeywordEmbedder {
    async fn encode(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains("heist") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                }
            })
            .collect())
    }
}

pub fn movie(id: u64, title: &str, genres: &[&str], director: &str, cast: &[&str]) -> MovieDetails {
    let overview = if genres.contains(&"Crime") {
        format!("{} is a heist story", title)
    } else {
        format!("{} is a quiet story", title)
    };

    MovieDetails {
        id,
        title: title.to_string(),
        overview: Some(overview),
        poster_path: Some(format!("/poster-{}.jpg", id)),
        genres: Some(
            genres
                .iter()
                .enumerate()
                .map(|(i, g)| Genre {
                    id: i as u64,
                    name: g.to_string(),
                })
                .collect(),
        ),
        credits: Some(Credits {
            cast: cast
                .iter()
                .enumerate()
                .map(|(i, name)| CastMember {
                    name: name.to_string(),
                    character: None,
                    order: Some(i as u32),
                })
                .collect(),
            crew: vec![CrewMember {
                name: director.to_string(),
                job: Some("Director".to_string()),
                department: Some("Directing".to_string()),
            }],
        }),
    }
}

pub fn test_server(history: FakeHistory, db: FakeMovieDatabase) -> TestServer {
    let settings = RecommenderSettings {
        request_delay: std::time::Duration::ZERO,
        ..RecommenderSettings::default()
    };
    let recommender = Recommender::new(
        Arc::new(history),
        Arc::new(db),
        Arc::new(KeywordEmbedder),
        settings,
    );

    let app = create_router(Arc::new(AppState::new(recommender)));
    TestServer::new(app).unwrap()
}
