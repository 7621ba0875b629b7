//! Simple agent implementation (LLM only, no tools)

use super::AgentProfile;
use agent_core::{Agent, Context, Result};
use agent_llm::{CompletionRequest, LLMProvider, Message};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Configuration for a simple agent
#[derive(Debug, Clone)]
pub struct SimpleConfig {
    pub model: String,

    /// Overrides the profile-derived system prompt
    pub system_prompt: Option<String>,

    pub max_tokens: usize,

    pub temperature: f32,
}

impl Default for SimpleConfig {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// An agent that answers with a single completion
pub struct SimpleAgent {
    provider: Arc<dyn LLMProvider>,
    config: SimpleConfig,
    profile: AgentProfile,
    name: String,
}

impl SimpleAgent {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        config: SimpleConfig,
        profile: AgentProfile,
        name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            config,
            profile,
            name: name.into(),
        }
    }

    pub fn config(&self) -> &SimpleConfig {
        &self.config
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }
}

#[async_trait]
impl Agent for SimpleAgent {
    async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
        let system = self
            .config
            .system_prompt
            .clone()
            .unwrap_or_else(|| self.profile.system_prompt());

        let request = CompletionRequest::builder(&self.config.model)
            .add_message(Message::user(input))
            .system(system)
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        let response = self.provider.complete(request).await?;
        debug!(agent = %self.name, tokens = response.usage.total(), "simple agent replied");

        Ok(response.message.text().unwrap_or_default())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &str {
        &self.profile.role
    }
}
