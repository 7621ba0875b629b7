//! Error types for property research operations

use thiserror::Error;

/// Property research specific errors
#[derive(Debug, Error)]
pub enum PropertyError {
    /// The dataset could not be loaded or is malformed
    #[error("Failed to load property data: {0}")]
    DataLoad(String),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error while reading data or writing reports
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No record with the requested stock number
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// No search provider is configured
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    /// A search request failed
    #[error("Search error: {0}")]
    Search(String),

    /// Model call failed
    #[error("LLM error: {0}")]
    Llm(#[from] agent_llm::LLMError),

    /// Template missing or failed to render
    #[error("Prompt error: {0}")]
    Prompt(#[from] agent_prompt::PromptError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Agent or task graph failure
    #[error("Agent error: {0}")]
    Agent(String),

    /// JSON error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for property operations
pub type Result<T> = std::result::Result<T, PropertyError>;

impl From<PropertyError> for agent_core::Error {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::PropertyNotFound(id) => agent_core::Error::NotFound(format!("property {id}")),
            PropertyError::Config(msg) => agent_core::Error::Configuration(msg),
            other => agent_core::Error::ProcessingFailed(other.to_string()),
        }
    }
}

impl From<agent_core::Error> for PropertyError {
    fn from(err: agent_core::Error) -> Self {
        PropertyError::Agent(err.to_string())
    }
}

impl From<agent_workflow::WorkflowError> for PropertyError {
    fn from(err: agent_workflow::WorkflowError) -> Self {
        PropertyError::Agent(err.to_string())
    }
}

impl From<reqwest::Error> for PropertyError {
    fn from(err: reqwest::Error) -> Self {
        PropertyError::Search(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PropertyError::PropertyNotFound("99999".to_string());
        assert_eq!(err.to_string(), "Property not found: 99999");

        let err = PropertyError::DataLoad("missing StockNumber column".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to load property data: missing StockNumber column"
        );
    }

    #[test]
    fn test_error_conversion() {
        let agent_err: agent_core::Error = PropertyError::PropertyNotFound("12345".into()).into();
        assert!(matches!(agent_err, agent_core::Error::NotFound(ref m) if m == "property 12345"));

        let agent_err: agent_core::Error = PropertyError::Search("HTTP 503".into()).into();
        match agent_err {
            agent_core::Error::ProcessingFailed(msg) => assert!(msg.contains("Search error")),
            other => panic!("Expected ProcessingFailed, got {other:?}"),
        }

        let back: PropertyError = agent_core::Error::Generic("boom".into()).into();
        assert!(matches!(back, PropertyError::Agent(ref m) if m == "boom"));
    }
}
