//! Perkflow library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`Recommender`], [`RecommenderConfig`] - The recommendation pipeline
//! - [`Recommendation`], [`NewRecommendation`] - Persisted batch rows
//! - [`QuestionRecommendation`], [`PartnerSummary`] - Question-flow response
//!
//! ## External Seams
//! - [`Embedder`], [`HttpEmbedder`] - Query embedding
//! - [`VectorSearchClient`], [`QdrantClient`] - Vector similarity search
//! - [`LlmClient`], [`GenaiLlm`] - Categorization and explanation fallbacks
//! - [`RecommendationRepository`], [`StoreDirectory`], [`PgRepository`] - Persistence
//! - [`ForbiddenWordFilter`] - Input moderation
//!
//! ## Constants
//! Placeholder strings and selection limits are exported from [`constants`]
//! so callers and tests agree with the pipeline.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod llm;
pub mod moderation;
pub mod recommend;
pub mod repository;
pub mod vectordb;

pub use config::{Config, ConfigError};
pub use constants::{CacheStatus, DEFAULT_TOP_K, PERKFLOW_CACHE_HEADER, UNKNOWN};
pub use embedding::{Embedder, EmbedderConfig, EmbeddingError, HttpEmbedder};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use gateway::{HandlerState, create_router_with_state};
pub use llm::{GenaiLlm, LlmClient, LlmError};
#[cfg(any(test, feature = "mock"))]
pub use llm::MockLlm;
pub use moderation::{ForbiddenWordFilter, REJECTION_SENTINEL};
pub use recommend::{
    Candidate, PartnerSummary, QuestionRecommendation, RecommendError, Recommender,
    RecommenderConfig, UserFeature,
};
pub use repository::{
    NewRecommendation, PgRepository, Recommendation, RecommendationRepository, RepositoryError,
    StoreDirectory, StoreRecord,
};
#[cfg(any(test, feature = "mock"))]
pub use repository::MockRepository;
pub use vectordb::{
    DocumentPoint, QdrantClient, SearchHit, VectorDbError, VectorSearchClient, WriteConsistency,
};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockVectorSearchClient;
