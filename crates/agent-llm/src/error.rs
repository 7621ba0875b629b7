//! Error types for LLM operations

use thiserror::Error;

/// Result type for LLM operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LLMError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid API key or authentication failed")]
    AuthenticationFailed,

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Model server unreachable (e.g. Ollama not running)
    #[error("LLM service unavailable at {url}: {reason}")]
    ServiceUnavailable { url: String, reason: String },

    /// Every strategy in a fallback chain failed
    #[error("Unable to generate a response using any available method: {}", .0.join("; "))]
    AllProvidersFailed(Vec<String>),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The provider cannot serve this kind of request at all
    #[error("{provider} does not support {feature}")]
    Unsupported {
        provider: &'static str,
        feature: &'static str,
    },
}

impl LLMError {
    /// Whether another attempt against the same endpoint could succeed
    ///
    /// Any failed HTTP exchange counts, including error statuses and
    /// unparsable bodies. Only problems with the request or the client
    /// setup are final.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::AuthenticationFailed
                | Self::SerializationError(_)
                | Self::ConfigurationError(_)
                | Self::AllProvidersFailed(_)
                | Self::Unsupported { .. }
        )
    }
}

impl From<LLMError> for agent_core::Error {
    fn from(err: LLMError) -> Self {
        agent_core::Error::ProcessingFailed(format!("LLM error: {err}"))
    }
}
