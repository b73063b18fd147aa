//! Qdrant vector database integration.

pub mod client;
pub mod error;
pub mod model;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{QdrantClient, VectorSearchClient};
pub use error::VectorDbError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockVectorSearchClient, cosine_similarity};
pub use model::{DocumentPoint, SearchHit};

/// Payload key carrying a document's raw text.
pub const PAYLOAD_TEXT_KEY: &str = "text";

/// Payload key carrying a document's benefit category.
pub const PAYLOAD_CATEGORY_KEY: &str = "category";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConsistency {
    /// Wait for the operation to be fully indexed and searchable.
    /// Maps to `wait=true`.
    Strong,
    /// Return immediately after the server acknowledges receipt.
    /// Maps to `wait=false`.
    Eventual,
}

impl From<WriteConsistency> for bool {
    fn from(c: WriteConsistency) -> bool {
        matches!(c, WriteConsistency::Strong)
    }
}
