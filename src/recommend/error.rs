use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::llm::LlmError;
use crate::repository::RepositoryError;
use crate::vectordb::VectorDbError;

#[derive(Debug, Error)]
/// Terminal pipeline failures. None of these are retried here; the gateway
/// maps them to client-visible responses.
pub enum RecommendError {
    /// The question tripped the forbidden-word filter.
    #[error("question contains a forbidden word")]
    ForbiddenWord,

    /// Neither the corpus nor the classifier produced a category.
    #[error("no category could be determined for the question")]
    NoCategoryFound,

    /// No partner stores exist for the resolved category.
    #[error("no partner stores found for category '{category}'")]
    NoStoreFound {
        /// Resolved category.
        category: String,
    },

    /// The user id does not resolve.
    #[error("user not found: {user_id}")]
    UserNotFound {
        /// Offending user id.
        user_id: i64,
    },

    /// Embedding the query failed.
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    /// Vector search failed.
    #[error(transparent)]
    VectorDb(#[from] VectorDbError),

    /// The LLM provider failed.
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// A repository operation failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for RecommendError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::UserNotFound { user_id } => Self::UserNotFound { user_id },
            other => Self::Repository(other),
        }
    }
}
