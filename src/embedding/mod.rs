//! Query embedding against an OpenAI-compatible embeddings endpoint.

pub mod client;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{EmbedderConfig, HttpEmbedder};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;

/// Minimal async interface used by the recommendation pipeline.
pub trait Embedder: Send + Sync {
    /// Embeds `text` into a dense vector of [`Embedder::embedding_dim`] floats.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;

    /// Expected vector width.
    fn embedding_dim(&self) -> usize;
}

impl<T: Embedder> Embedder for std::sync::Arc<T> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        (**self).embed(text).await
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }
}
