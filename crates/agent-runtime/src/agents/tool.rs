//! Tool agent implementation (wraps AgentExecutor)

use super::AgentProfile;
use crate::executor::AgentExecutor;
use agent_core::{Agent, Context, Result};
use async_trait::async_trait;

/// An agent that runs the executor loop and may call tools
pub struct ToolAgent {
    executor: AgentExecutor,
    profile: AgentProfile,
    name: String,
}

impl ToolAgent {
    pub fn new(executor: AgentExecutor, profile: AgentProfile, name: impl Into<String>) -> Self {
        Self {
            executor,
            profile,
            name: name.into(),
        }
    }

    pub fn executor(&self) -> &AgentExecutor {
        &self.executor
    }

    pub fn profile(&self) -> &AgentProfile {
        &self.profile
    }
}

#[async_trait]
impl Agent for ToolAgent {
    async fn process(&self, input: String, _context: &mut Context) -> Result<String> {
        self.executor.run(input).await
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn role(&self) -> &str {
        &self.profile.role
    }
}
