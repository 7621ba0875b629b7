//! Execution context for agents
//!
//! The `Context` struct is a key-value store that travels with a run. Task
//! graphs use it to hand the output of one task to the tasks that declared
//! it as context, and the property crew uses it to remember which property
//! is being analysed.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Identifier of the property under analysis
    pub const PROPERTY_ID: &str = "property_id";
    /// Directory that report files are written to
    pub const OUTPUT_DIR: &str = "output_dir";
    /// Map of task name to that task's output
    pub const TASK_OUTPUTS: &str = "task_outputs";
    /// Identifier for one analysis run
    pub const RUN_ID: &str = "run_id";
    /// Set when agents are backed by the canned mock model
    pub const MOCK_MODE: &str = "mock_mode";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use agent_core::Context;
///
/// let mut ctx = Context::new().with_property_id("12345");
/// ctx.record_task_output("data_analysis", "3.5 acres, zoned R1");
///
/// assert_eq!(ctx.property_id(), Some("12345"));
/// assert_eq!(ctx.task_output("data_analysis"), Some("3.5 acres, zoned R1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    // =========== Builder Methods ===========

    /// Set the property under analysis
    pub fn with_property_id(mut self, id: impl Into<String>) -> Self {
        self.insert(keys::PROPERTY_ID, Value::String(id.into()));
        self
    }

    /// Set the report output directory
    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.insert(keys::OUTPUT_DIR, Value::String(dir.into()));
        self
    }

    /// Set the run identifier
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.insert(keys::RUN_ID, Value::String(run_id.into()));
        self
    }

    /// Mark the run as using the mock model
    pub fn with_mock_mode(mut self, enabled: bool) -> Self {
        self.insert(keys::MOCK_MODE, Value::Bool(enabled));
        self
    }

    // =========== Common Accessors ===========

    pub fn property_id(&self) -> Option<&str> {
        self.get(keys::PROPERTY_ID).and_then(Value::as_str)
    }

    pub fn output_dir(&self) -> Option<&str> {
        self.get(keys::OUTPUT_DIR).and_then(Value::as_str)
    }

    pub fn run_id(&self) -> Option<&str> {
        self.get(keys::RUN_ID).and_then(Value::as_str)
    }

    pub fn mock_mode(&self) -> bool {
        self.get(keys::MOCK_MODE)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    // =========== Task Outputs ===========

    /// Store the output of a finished task
    ///
    /// Outputs are kept under [`keys::TASK_OUTPUTS`] so that later tasks can
    /// read them back by name.
    pub fn record_task_output(&mut self, task: impl Into<String>, output: impl Into<String>) {
        let entry = self
            .data
            .entry(keys::TASK_OUTPUTS.to_string())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));

        if !entry.is_object() {
            *entry = Value::Object(serde_json::Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(task.into(), Value::String(output.into()));
        }
    }

    /// Output of a finished task, if recorded
    pub fn task_output(&self, task: &str) -> Option<&str> {
        self.get(keys::TASK_OUTPUTS)
            .and_then(|v| v.get(task))
            .and_then(Value::as_str)
    }

    /// Names of all tasks with recorded output
    pub fn completed_tasks(&self) -> Vec<&str> {
        self.get(keys::TASK_OUTPUTS)
            .and_then(Value::as_object)
            .map(|map| map.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        self.data
            .get(key)
            .map(|value| {
                serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value '{key}': {e}"
                    ))
                })
            })
            .transpose()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge another context into this one (other values override)
    pub fn merge(&mut self, other: Context) {
        self.data.extend(other.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Parcel {
        acres: f64,
        zoning: String,
    }

    #[test]
    fn test_basic_operations() {
        let mut ctx = Context::new();
        assert!(ctx.is_empty());

        ctx.insert("key", serde_json::json!("value"));
        assert_eq!(ctx.len(), 1);
        assert!(ctx.contains_key("key"));

        ctx.remove("key");
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_typed_insert_get() {
        let mut ctx = Context::new();
        let parcel = Parcel {
            acres: 1.5,
            zoning: "R1".to_string(),
        };

        ctx.insert_typed("parcel", &parcel).unwrap();

        let back: Parcel = ctx.get_typed("parcel").unwrap().unwrap();
        assert_eq!(back, parcel);
    }

    #[test]
    fn test_get_typed_missing_key() {
        let ctx = Context::new();
        let result: crate::Result<Option<Parcel>> = ctx.get_typed("missing");
        assert!(result.unwrap().is_none());
    }

    #[test]
    fn test_get_typed_wrong_shape() {
        let mut ctx = Context::new();
        ctx.insert("parcel", serde_json::json!("not a parcel"));
        let result: crate::Result<Option<Parcel>> = ctx.get_typed("parcel");
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_chain() {
        let ctx = Context::new()
            .with_property_id("12345")
            .with_output_dir("outputs")
            .with_run_id("20240101_120000")
            .with_mock_mode(true);

        assert_eq!(ctx.property_id(), Some("12345"));
        assert_eq!(ctx.output_dir(), Some("outputs"));
        assert_eq!(ctx.run_id(), Some("20240101_120000"));
        assert!(ctx.mock_mode());
    }

    #[test]
    fn test_task_outputs() {
        let mut ctx = Context::new();
        assert!(ctx.completed_tasks().is_empty());

        ctx.record_task_output("data_analysis", "first");
        ctx.record_task_output("market_research", "second");
        ctx.record_task_output("data_analysis", "rewritten");

        assert_eq!(ctx.task_output("data_analysis"), Some("rewritten"));
        assert_eq!(ctx.task_output("market_research"), Some("second"));
        assert_eq!(ctx.task_output("missing"), None);
        assert_eq!(ctx.completed_tasks().len(), 2);
    }

    #[test]
    fn test_task_outputs_replaces_bad_value() {
        let mut ctx = Context::new();
        ctx.insert(keys::TASK_OUTPUTS, serde_json::json!(42));
        ctx.record_task_output("a", "b");
        assert_eq!(ctx.task_output("a"), Some("b"));
    }

    #[test]
    fn test_merge() {
        let mut ctx1 = Context::new().with_property_id("1");
        let ctx2 = Context::new().with_property_id("2").with_run_id("run");

        ctx1.merge(ctx2);
        assert_eq!(ctx1.property_id(), Some("2"));
        assert_eq!(ctx1.run_id(), Some("run"));
    }
}
