use serde::{Deserialize, Serialize};

use super::Embedder;
use super::error::EmbeddingError;
use crate::constants::DEFAULT_EMBEDDING_DIM;

/// Connection settings for [`HttpEmbedder`].
#[derive(Debug, Clone)]
pub struct EmbedderConfig {
    /// Base URL of the OpenAI-compatible API (without the `/embeddings` suffix).
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// Expected vector width; responses of any other width are rejected.
    pub embedding_dim: usize,
}

impl EmbedderConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }

    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Clone)]
/// Embeddings client for an OpenAI-compatible `POST /embeddings` endpoint.
pub struct HttpEmbedder {
    http: reqwest::Client,
    config: EmbedderConfig,
    endpoint: String,
}

impl HttpEmbedder {
    /// Creates a client from `config`.
    pub fn new(config: EmbedderConfig) -> Self {
        let endpoint = format!("{}/embeddings", config.base_url.trim_end_matches('/'));
        Self {
            http: reqwest::Client::new(),
            config,
            endpoint,
        }
    }

    /// Returns the resolved endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let body = EmbeddingRequest {
            model: &self.config.model,
            input: [text],
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::RequestFailed {
                url: self.endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::BadStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::RequestFailed {
                    url: self.endpoint.clone(),
                    message: e.to_string(),
                })?;

        let vector = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or(EmbeddingError::EmptyResponse)?;

        if vector.len() != self.config.embedding_dim {
            return Err(EmbeddingError::InvalidDimension {
                expected: self.config.embedding_dim,
                actual: vector.len(),
            });
        }

        Ok(vector)
    }
}

impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_text(text).await
    }

    fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }
}
