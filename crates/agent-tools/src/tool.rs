//! Tool trait definition

use agent_core::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Trait for tools that agents can execute
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with JSON parameters matching [`Tool::input_schema`]
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Unique name within a registry; the model calls the tool by this name
    fn name(&self) -> &str;

    /// Tells the model when the tool is useful
    fn description(&self) -> &str;

    /// JSON Schema of the expected parameters
    ///
    /// ```
    /// use serde_json::json;
    ///
    /// let schema = json!({
    ///     "type": "object",
    ///     "properties": {
    ///         "stock_number": { "type": "string" }
    ///     },
    ///     "required": ["stock_number"]
    /// });
    /// assert_eq!(schema["required"][0], "stock_number");
    /// ```
    fn input_schema(&self) -> Value;
}
