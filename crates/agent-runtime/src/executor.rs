//! Agent executor for running agent loops
//!
//! The loop:
//! 1. Call the LLM with the conversation and the tools this agent may use
//! 2. If it asks for tools, run them and append the results
//! 3. Otherwise return the reply text

use agent_core::{Error, Result};
use agent_llm::{
    CompletionRequest, ContentBlock, LLMProvider, Message, StopReason, TokenUsage, ToolDefinition,
};
use agent_tools::ToolRegistry;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful real estate research assistant.";

/// Configuration for agent execution
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum LLM round trips before giving up
    pub max_iterations: usize,

    pub model: String,

    pub system_prompt: Option<String>,

    /// Max tokens per completion
    pub max_tokens: usize,

    pub temperature: Option<f32>,

    /// Restrict the agent to these registry tools; `None` exposes all
    pub allowed_tools: Option<Vec<String>>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            model: "llama3".to_string(),
            system_prompt: None,
            max_tokens: 4096,
            temperature: Some(0.7),
            allowed_tools: None,
        }
    }
}

/// Result of one executor run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Final assistant text
    pub text: String,
    /// LLM round trips used
    pub iterations: usize,
    /// Tool calls executed, in order
    pub tool_calls: Vec<String>,
    /// Tokens summed over all round trips
    pub usage: TokenUsage,
    /// Whether the model stopped because of the token limit
    pub truncated: bool,
}

/// Executes an agent loop: LLM, tool calls, LLM again
pub struct AgentExecutor {
    provider: Arc<dyn LLMProvider>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tool_registry: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tool_registry,
            config,
        }
    }

    pub fn builder() -> AgentExecutorBuilder {
        AgentExecutorBuilder::new()
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run the loop for one user message and return the reply text
    pub async fn run(&self, user_message: String) -> Result<String> {
        Ok(self.run_detailed(vec![Message::user(user_message)]).await?.text)
    }

    /// Run the loop after earlier turns
    pub async fn run_with_history(
        &self,
        user_message: String,
        history: Vec<Message>,
    ) -> Result<String> {
        let mut conversation = history;
        conversation.push(Message::user(user_message));
        Ok(self.run_detailed(conversation).await?.text)
    }

    /// Run the loop over a conversation, keeping iteration and usage details
    pub async fn run_detailed(&self, initial_conversation: Vec<Message>) -> Result<ExecutionOutcome> {
        let mut conversation = initial_conversation;
        let mut usage = TokenUsage::default();
        let mut tool_calls = Vec::new();
        let tools = self.tool_definitions();
        let system = self
            .config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        for iteration in 1..=self.config.max_iterations {
            info!(
                iteration,
                max_iterations = self.config.max_iterations,
                model = %self.config.model,
                tool_count = tools.len(),
                "agent iteration started"
            );

            let mut builder = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .system(system.clone())
                .max_tokens(self.config.max_tokens)
                .tools(tools.clone());
            if let Some(temperature) = self.config.temperature {
                builder = builder.temperature(temperature);
            }

            let response = self.provider.complete(builder.build()).await?;
            usage.input_tokens += response.usage.input_tokens;
            usage.output_tokens += response.usage.output_tokens;

            let text = response.message.text().unwrap_or_default();
            debug!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                preview = %text.chars().take(200).collect::<String>(),
                "LLM response received"
            );

            let wants_tools =
                response.stop_reason == StopReason::ToolUse || response.message.has_tool_uses();
            if wants_tools {
                let results = self.execute_tools(&response.message, &mut tool_calls).await;
                conversation.push(response.message);
                if results.is_empty() {
                    warn!("tool use requested without any tool calls");
                    return Ok(ExecutionOutcome {
                        text,
                        iterations: iteration,
                        tool_calls,
                        usage,
                        truncated: false,
                    });
                }
                conversation.extend(results);
                continue;
            }

            let truncated = response.stop_reason == StopReason::MaxTokens;
            if truncated {
                warn!(max_tokens = self.config.max_tokens, "response truncated by token limit");
            }
            info!(iteration, response_length = text.len(), "agent completed");
            return Ok(ExecutionOutcome {
                text,
                iterations: iteration,
                tool_calls,
                usage,
                truncated,
            });
        }

        Err(Error::ProcessingFailed(format!(
            "no final answer after {} iterations",
            self.config.max_iterations
        )))
    }

    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry
            .list_tools()
            .iter()
            .filter(|tool| self.tool_allowed(tool.name()))
            .map(|tool| ToolDefinition::new(tool.name(), tool.description(), tool.input_schema()))
            .collect()
    }

    fn tool_allowed(&self, name: &str) -> bool {
        self.config
            .allowed_tools
            .as_ref()
            .is_none_or(|allowed| allowed.iter().any(|n| n == name))
    }

    /// Run every tool call in the message; failures become error results
    async fn execute_tools(&self, message: &Message, executed: &mut Vec<String>) -> Vec<Message> {
        let mut results = Vec::new();

        for block in message.tool_uses() {
            let ContentBlock::ToolUse { id, name, input } = block else {
                continue;
            };
            executed.push(name.clone());

            let started = Instant::now();
            let outcome = if self.tool_allowed(name) {
                self.tool_registry.execute(name, input.clone()).await
            } else {
                Err(Error::NotFound(format!("tool '{name}' is not available to this agent")))
            };
            let duration_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(value) => {
                    let body = value.to_string();
                    info!(tool = %name, duration_ms, result_length = body.len(), "tool succeeded");
                    results.push(Message::tool_result(id.clone(), body));
                }
                Err(e) => {
                    warn!(tool = %name, duration_ms, error = %e, "tool failed");
                    results.push(Message::tool_error(id.clone(), format!("Error: {e}")));
                }
            }
        }

        results
    }
}

/// Builder for AgentExecutor
pub struct AgentExecutorBuilder {
    provider: Option<Arc<dyn LLMProvider>>,
    tool_registry: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tool_registry: Arc::new(ToolRegistry::new()),
            config: ExecutorConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool_registry(mut self, registry: Arc<ToolRegistry>) -> Self {
        self.tool_registry = registry;
        self
    }

    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn allowed_tools<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_tools = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<AgentExecutor> {
        let provider = self
            .provider
            .ok_or_else(|| Error::InitializationFailed("Provider not set".to_string()))?;

        Ok(AgentExecutor::new(provider, self.tool_registry, self.config))
    }
}

impl Default for AgentExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
