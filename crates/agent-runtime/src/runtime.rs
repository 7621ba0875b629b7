//! Runtime for executing agents with dependency injection
//!
//! The AgentRuntime owns the shared LLM provider and tool registry and
//! builds agents from role profiles.

use agent_core::Result;
use agent_llm::LLMProvider;
use agent_tools::ToolRegistry;
use std::sync::Arc;
use tracing::info;

use crate::agents::{AgentProfile, SimpleAgent, SimpleConfig, ToolAgent};
use crate::executor::{AgentExecutor, ExecutorConfig};

/// Defaults applied to every agent the runtime creates
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub default_max_iterations: usize,
    pub default_model: String,
    pub default_max_tokens: usize,
    pub default_temperature: f32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_max_iterations: 10,
            default_model: "llama3".to_string(),
            default_max_tokens: 4096,
            default_temperature: 0.7,
        }
    }
}

/// Shared provider, tools and defaults
///
/// ```no_run
/// use agent_runtime::{AgentProfile, AgentRuntime};
/// use agent_llm::providers::MockProvider;
/// use std::sync::Arc;
///
/// # fn example() -> agent_core::Result<()> {
/// let runtime = AgentRuntime::builder()
///     .provider(Arc::new(MockProvider::new()))
///     .build()?;
///
/// let analyst = runtime.create_simple_agent(
///     AgentProfile::new("Property Data Analyst", "Extract key facts from parcel data"),
///     "data_analyst",
/// );
/// # Ok(())
/// # }
/// ```
pub struct AgentRuntime {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: RuntimeConfig,
}

impl AgentRuntime {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: RuntimeConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    pub fn builder() -> AgentRuntimeBuilder {
        AgentRuntimeBuilder::new()
    }

    pub fn provider(&self) -> &Arc<dyn LLMProvider> {
        &self.provider
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Single-completion agent using the runtime defaults
    pub fn create_simple_agent(&self, profile: AgentProfile, name: impl Into<String>) -> SimpleAgent {
        let config = SimpleConfig {
            model: self.config.default_model.clone(),
            system_prompt: None,
            max_tokens: self.config.default_max_tokens,
            temperature: self.config.default_temperature,
        };
        self.create_simple_agent_with(config, profile, name)
    }

    pub fn create_simple_agent_with(
        &self,
        config: SimpleConfig,
        profile: AgentProfile,
        name: impl Into<String>,
    ) -> SimpleAgent {
        let name = name.into();
        info!(agent = %name, role = %profile.role, "creating simple agent");
        SimpleAgent::new(self.provider.clone(), config, profile, name)
    }

    /// Tool-using agent restricted to `tools` from the registry
    pub fn create_tool_agent(
        &self,
        profile: AgentProfile,
        tools: &[&str],
        name: impl Into<String>,
    ) -> ToolAgent {
        let config = ExecutorConfig {
            max_iterations: self.config.default_max_iterations,
            model: self.config.default_model.clone(),
            system_prompt: Some(profile.system_prompt()),
            max_tokens: self.config.default_max_tokens,
            temperature: Some(self.config.default_temperature),
            allowed_tools: Some(tools.iter().map(ToString::to_string).collect()),
        };
        self.create_tool_agent_with(config, profile, name)
    }

    pub fn create_tool_agent_with(
        &self,
        config: ExecutorConfig,
        profile: AgentProfile,
        name: impl Into<String>,
    ) -> ToolAgent {
        let name = name.into();
        info!(
            agent = %name,
            role = %profile.role,
            tools = ?config.allowed_tools,
            "creating tool agent"
        );
        let executor =
            AgentExecutor::new(self.provider.clone(), self.tool_registry.clone(), config);
        ToolAgent::new(executor, profile, name)
    }
}

/// Builder for AgentRuntime
pub struct AgentRuntimeBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Option<Arc<ToolRegistry>>,
    config: RuntimeConfig,
}

impl AgentRuntimeBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: None,
            config: RuntimeConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = Some(registry);
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn default_max_iterations(mut self, max: usize) -> Self {
        self.config.default_max_iterations = max;
        self
    }

    pub fn default_model(mut self, model: impl Into<String>) -> Self {
        self.config.default_model = model.into();
        self
    }

    pub fn default_temperature(mut self, temperature: f32) -> Self {
        self.config.default_temperature = temperature;
        self
    }

    pub fn default_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.default_max_tokens = max_tokens;
        self
    }

    pub fn build(self) -> Result<AgentRuntime> {
        let provider = self.provider.ok_or_else(|| {
            agent_core::Error::InitializationFailed("Provider not set".to_string())
        })?;

        let tool_registry = self
            .tool_registry
            .unwrap_or_else(|| Arc::new(ToolRegistry::new()));

        Ok(AgentRuntime::new(provider, tool_registry, self.config))
    }
}

impl Default for AgentRuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
