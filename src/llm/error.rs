use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by LLM operations.
pub enum LlmError {
    /// The chat request to the provider failed.
    #[error("llm provider call failed for model '{model}': {message}")]
    ProviderFailed {
        /// Model name.
        model: String,
        /// Error message.
        message: String,
    },

    /// The provider answered, but with no usable text.
    #[error("llm returned an empty response for model '{model}'")]
    EmptyResponse {
        /// Model name.
        model: String,
    },
}
