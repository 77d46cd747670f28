//! Sentence embeddings for plot overviews
//!
//! Embeddings come from any server that speaks the OpenAI `/v1/embeddings`
//! protocol (text-embeddings-inference, Ollama, vLLM, ...) hosting a sentence
//! model such as all-MiniLM-L6-v2.
use crate::error::{AppError, AppResult};
use reqwest::{header, Client as HttpClient};
use serde::Deserialize;
use serde_json::json;

const MAX_BATCH_SIZE: usize = 64;

/// Trait for text embedding models
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Encode each text into a fixed-length vector, preserving input order
    async fn encode(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;
}

#[derive(Clone)]
pub struct HttpEmbedder {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpEmbedder {
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    async fn encode_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let body = json!({
            "model": self.model,
            "input": texts,
        });

        let mut request = self
            .http_client
            .post(format!("{}/v1/embeddings", self.api_url))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", api_key));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Embedding(format!(
                "Embedding API returned status {}: {}",
                status, body
            )));
        }

        let result: EmbeddingResponse = response.json().await?;
        result.into_vectors(texts.len())
    }
}

#[async_trait::async_trait]
impl Embedder for HttpEmbedder {
    async fn encode(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(MAX_BATCH_SIZE) {
            vectors.extend(self.encode_batch(chunk).await?);
        }

        tracing::debug!(
            texts = texts.len(),
            model = %self.model,
            "Generated embeddings"
        );

        Ok(vectors)
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

impl EmbeddingResponse {
    /// Orders vectors by their reported index and checks one came back per input
    fn into_vectors(mut self, expected: usize) -> AppResult<Vec<Vec<f32>>> {
        if self.data.len() != expected {
            return Err(AppError::Embedding(format!(
                "Embedding count mismatch: expected {}, got {}",
                expected,
                self.data.len()
            )));
        }

        if self.data.iter().all(|d| d.index.is_some()) {
            self.data.sort_by_key(|d| d.index);
        }

        Ok(self.data.into_iter().map(|d| d.embedding).collect())
    }
}

/// Cosine similarity between two vectors; 0.0 if either has zero norm
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> AppResult<f32> {
    if a.len() != b.len() {
        return Err(AppError::Embedding(format!(
            "Embedding dimensions must match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x.powi(2)).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x.powi(2)).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (norm_a * norm_b))
}

/// Similarity of `query` against every row of `matrix`
pub fn cosine_similarities(query: &[f32], matrix: &[Vec<f32>]) -> AppResult<Vec<f32>> {
    matrix
        .iter()
        .map(|row| cosine_similarity(query, row))
        .collect()
}

/// Element-wise arithmetic mean of equally sized vectors
pub fn mean_vector(vectors: &[Vec<f32>]) -> AppResult<Vec<f32>> {
    let first = vectors
        .first()
        .ok_or_else(|| AppError::Embedding("Cannot average zero vectors".to_string()))?;

    let mut sum = vec![0.0f32; first.len()];
    for vector in vectors {
        if vector.len() != sum.len() {
            return Err(AppError::Embedding(format!(
                "Embedding dimensions must match: {} vs {}",
                sum.len(),
                vector.len()
            )));
        }
        for (acc, value) in sum.iter_mut().zip(vector) {
            *acc += value;
        }
    }

    let count = vectors.len() as f32;
    Ok(sum.into_iter().map(|v| v / count).collect())
}
