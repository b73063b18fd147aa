//! The recommendation pipeline: candidate retrieval, category resolution,
//! top-K selection, explanation synthesis, and the freshness cache.

pub mod candidate;
pub mod error;
pub mod feature;
pub mod pipeline;

#[cfg(test)]
mod tests;

pub use candidate::Candidate;
pub use error::RecommendError;
pub use feature::UserFeature;
pub use pipeline::{PartnerSummary, QuestionRecommendation, Recommender, RecommenderConfig};
