//! Concrete LLM provider implementations

pub mod fallback;
pub mod mock;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

pub use fallback::FallbackProvider;
pub use mock::MockProvider;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

#[cfg(feature = "openai")]
pub use openai::{OpenAICompatibleConfig, OpenAICompatibleProvider};
