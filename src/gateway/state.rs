use std::sync::Arc;

use crate::embedding::Embedder;
use crate::llm::LlmClient;
use crate::recommend::Recommender;
use crate::repository::{RecommendationRepository, StoreDirectory};
use crate::vectordb::VectorSearchClient;

/// Shared handler state: the pipeline behind an `Arc`.
pub struct HandlerState<E, V, L, R> {
    pub recommender: Arc<Recommender<E, V, L, R>>,
}

impl<E, V, L, R> HandlerState<E, V, L, R>
where
    E: Embedder,
    V: VectorSearchClient,
    L: LlmClient,
    R: RecommendationRepository + StoreDirectory,
{
    pub fn new(recommender: Recommender<E, V, L, R>) -> Self {
        Self {
            recommender: Arc::new(recommender),
        }
    }
}

impl<E, V, L, R> Clone for HandlerState<E, V, L, R> {
    fn clone(&self) -> Self {
        Self {
            recommender: self.recommender.clone(),
        }
    }
}
