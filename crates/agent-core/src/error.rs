//! Error types for agent-core

use thiserror::Error;

/// Result type alias for agent-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for agent operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Agent or runtime could not be constructed
    #[error("Agent initialization failed: {0}")]
    InitializationFailed(String),

    /// Agent failed while handling an input
    #[error("Agent processing failed: {0}")]
    ProcessingFailed(String),

    /// A named resource (agent, task, property) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid or inconsistent configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether the error came from bad setup rather than a failed run
    pub fn is_setup_error(&self) -> bool {
        matches!(self, Self::InitializationFailed(_) | Self::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::NotFound("property 99999".into()).to_string(),
            "Not found: property 99999"
        );
        assert_eq!(
            Error::ProcessingFailed("boom".into()).to_string(),
            "Agent processing failed: boom"
        );
    }

    #[test]
    fn test_setup_error_classification() {
        assert!(Error::Configuration("x".into()).is_setup_error());
        assert!(Error::InitializationFailed("x".into()).is_setup_error());
        assert!(!Error::ProcessingFailed("x".into()).is_setup_error());
    }
}
