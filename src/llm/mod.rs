//! LLM fallbacks: question categorization and explanation generation.

pub mod client;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::GenaiLlm;
pub use error::LlmError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockLlm;

/// Minimal async interface used by the recommendation pipeline.
pub trait LlmClient: Send + Sync {
    /// Classifies a free-text question into a benefit category.
    ///
    /// `None` means the model could not name a category; the caller decides
    /// whether that is fatal.
    fn categorize(
        &self,
        question: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, LlmError>> + Send;

    /// Produces a human-readable justification for recommending `partner_names`.
    fn generate_reasons(
        &self,
        question: &str,
        category: &str,
        partner_names: &[String],
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}

impl<T: LlmClient> LlmClient for std::sync::Arc<T> {
    async fn categorize(&self, question: &str) -> Result<Option<String>, LlmError> {
        (**self).categorize(question).await
    }

    async fn generate_reasons(
        &self,
        question: &str,
        category: &str,
        partner_names: &[String],
    ) -> Result<String, LlmError> {
        (**self).generate_reasons(question, category, partner_names).await
    }
}
