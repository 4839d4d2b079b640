//! Errors raised while talking to a chat-completion endpoint

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Chat-completion failure
///
/// Error statuses from the endpoint map onto dedicated variants through
/// [`LLMError::from_status`]; anything unrecognised is `RequestFailed`.
#[derive(Error, Debug)]
pub enum LLMError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// HTTP 401
    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    /// HTTP 429; carries the endpoint's message
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// HTTP 400; carries the endpoint's message
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// HTTP 404; carries the requested model id
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Body did not look like a chat completion
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Missing credential or malformed provider settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl LLMError {
    /// Error for a non-success `status` answering a request for `model`
    pub fn from_status(status: u16, body: String, model: &str) -> Self {
        match status {
            401 => Self::AuthenticationFailed,
            429 => Self::RateLimitExceeded(body),
            400 => Self::InvalidRequest(body),
            404 => Self::ModelNotFound(model.to_string()),
            _ => Self::RequestFailed(format!("HTTP {status}: {body}")),
        }
    }
}
