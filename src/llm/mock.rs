use std::sync::atomic::{AtomicUsize, Ordering};

use super::LlmClient;
use super::error::LlmError;

/// Scripted LLM double with call counters.
pub struct MockLlm {
    category: Option<String>,
    reason: String,
    categorize_calls: AtomicUsize,
    reason_calls: AtomicUsize,
}

impl MockLlm {
    /// A mock whose classifier answers `category` and whose explanation is a
    /// fixed string.
    pub fn new(category: Option<&str>) -> Self {
        Self {
            category: category.map(str::to_string),
            reason: "These partners match what you asked for.".to_string(),
            categorize_calls: AtomicUsize::new(0),
            reason_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Number of `categorize` invocations so far.
    pub fn categorize_count(&self) -> usize {
        self.categorize_calls.load(Ordering::SeqCst)
    }

    /// Number of `generate_reasons` invocations so far.
    pub fn reason_count(&self) -> usize {
        self.reason_calls.load(Ordering::SeqCst)
    }
}

impl LlmClient for MockLlm {
    async fn categorize(&self, _question: &str) -> Result<Option<String>, LlmError> {
        self.categorize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .category
            .clone()
            .filter(|c| !c.trim().is_empty()))
    }

    async fn generate_reasons(
        &self,
        _question: &str,
        _category: &str,
        _partner_names: &[String],
    ) -> Result<String, LlmError> {
        self.reason_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reason.clone())
    }
}
