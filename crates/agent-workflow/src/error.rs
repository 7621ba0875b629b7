//! Workflow errors

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Task '{task}' depends on unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Task '{0}' is defined more than once")]
    DuplicateTask(String),

    /// Tasks that could not be ordered
    #[error("Dependency cycle between tasks: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("Task '{task}' failed: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: agent_core::Error,
    },
}

impl From<WorkflowError> for agent_core::Error {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::TaskFailed { source, .. } => source,
            other => agent_core::Error::Configuration(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let err = WorkflowError::Cycle(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Dependency cycle between tasks: a, b");
    }

    #[test]
    fn test_into_core_error() {
        let core: agent_core::Error = WorkflowError::TaskFailed {
            task: "report".into(),
            source: agent_core::Error::ProcessingFailed("model down".into()),
        }
        .into();
        assert!(matches!(core, agent_core::Error::ProcessingFailed(_)));

        let core: agent_core::Error = WorkflowError::DuplicateTask("x".into()).into();
        assert!(core.is_setup_error());
    }
}
