use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by embedding operations.
pub enum EmbeddingError {
    /// The HTTP request to the embeddings endpoint failed outright.
    #[error("embeddings request to '{url}' failed: {message}")]
    RequestFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The endpoint answered with a non-success status.
    #[error("embeddings endpoint returned status {status}: {body}")]
    BadStatus {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated by the caller if needed).
        body: String,
    },

    /// The response parsed but contained no embedding.
    #[error("embeddings response contained no data")]
    EmptyResponse,

    /// The returned vector had an unexpected width.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },
}
