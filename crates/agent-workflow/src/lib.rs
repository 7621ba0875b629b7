//! Task graphs for multi-agent runs
//!
//! A [`TaskGraph`] holds [`Task`]s, each bound to an agent and optionally
//! depending on ("context") earlier tasks. The graph is validated when it is
//! built and executed one task at a time in dependency order; every prompt
//! carries the outputs of the tasks it depends on.

mod error;
mod graph;
mod task;

pub use error::{Result, WorkflowError};
pub use graph::{FailurePolicy, TaskGraph, TaskGraphBuilder, TaskOutput, TaskOutputs};
pub use task::Task;
