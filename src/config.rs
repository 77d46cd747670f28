use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDb v3 API key
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Pause before each watched-film title search, in milliseconds
    #[serde(default = "default_tmdb_request_delay_ms")]
    pub tmdb_request_delay_ms: u64,

    /// Letterboxd base URL
    #[serde(default = "default_letterboxd_url")]
    pub letterboxd_url: String,

    /// Base URL of an OpenAI-compatible embeddings server
    #[serde(default = "default_embedding_api_url")]
    pub embedding_api_url: String,

    /// Bearer token for the embeddings server, if it needs one
    #[serde(default)]
    pub embedding_api_key: Option<String>,

    /// Sentence embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Redis connection URL; caching is disabled when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_request_delay_ms() -> u64 {
    100
}

fn default_letterboxd_url() -> String {
    "https://letterboxd.com".to_string()
}

fn default_embedding_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
