//! Core Agent trait definition

use crate::{Context, Result};
use async_trait::async_trait;

/// A role that turns a task description into free text
///
/// Agents receive the rendered task prompt as `input` and may read or
/// write the shared [`Context`], which is how upstream task outputs reach
/// downstream tasks.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Process input and return output
    async fn process(&self, input: String, context: &mut Context) -> Result<String>;

    /// Get the agent's name
    fn name(&self) -> &str;

    /// Short role label shown in logs and reports
    fn role(&self) -> &str {
        self.name()
    }

    /// Initialize the agent (optional)
    async fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    /// Shutdown the agent (optional)
    async fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
