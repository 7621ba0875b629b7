//! Error types for prompt operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromptError>;

#[derive(Error, Debug)]
pub enum PromptError {
    /// The template has no body for the requested language
    #[error("Template '{name}' has no '{language}' variant")]
    LanguageMissing { name: String, language: String },

    #[error("Failed to parse template '{name}' ({language}): {detail}")]
    ParseFailed {
        name: String,
        language: String,
        detail: String,
    },

    #[error("Failed to render template '{name}': {detail}")]
    RenderFailed { name: String, detail: String },

    #[error("No template bodies provided for '{0}'")]
    Empty(String),

    #[error("Template '{0}' not registered")]
    NotRegistered(String),
}

impl From<PromptError> for agent_core::Error {
    fn from(err: PromptError) -> Self {
        agent_core::Error::ProcessingFailed(err.to_string())
    }
}
