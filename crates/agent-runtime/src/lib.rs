//! Agent runtime: executor loop, shared dependencies and agent types
//!
//! [`AgentRuntime`] holds the LLM provider and the tool registry and hands
//! out [`SimpleAgent`]s and [`ToolAgent`]s built from an [`AgentProfile`].

pub mod agents;
pub mod executor;
pub mod runtime;

#[cfg(test)]
mod testing;

pub use agents::{AgentProfile, SimpleAgent, SimpleConfig, ToolAgent};
pub use executor::{AgentExecutor, AgentExecutorBuilder, ExecutionOutcome, ExecutorConfig};
pub use runtime::{AgentRuntime, AgentRuntimeBuilder, RuntimeConfig};
