//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// A source of completions
///
/// Implemented by the Ollama and OpenAI-compatible HTTP clients, by the
/// canned mock model, and by [`FallbackProvider`](crate::providers::FallbackProvider)
/// which wraps an ordered list of other providers.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g. "ollama", "openai-compatible")
    fn name(&self) -> &str;
}
