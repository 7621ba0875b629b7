//! LLM provider abstraction layer
//!
//! Provider-agnostic request/response types plus the concrete completion
//! strategies used by the property agents:
//!
//! - [`providers::OllamaProvider`]: native `/api/generate` calls against a
//!   local Ollama server, with retries (feature `ollama`)
//! - [`providers::OpenAICompatibleProvider`]: chat completions against any
//!   OpenAI-style endpoint, including Ollama's `/v1` (feature `openai`)
//! - [`providers::FallbackProvider`]: an ordered list of strategies tried
//!   until one succeeds
//! - [`providers::MockProvider`]: deterministic canned answers

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod tools;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{ContentBlock, Message, MessageContent, Role};
pub use provider::LLMProvider;
pub use tools::ToolDefinition;
