//! Dependency-ordered task execution

use crate::{Result, Task, WorkflowError};
use agent_core::Context;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// What to do when an agent returns an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run with [`WorkflowError::TaskFailed`]
    #[default]
    Abort,
    /// Store `"Error in <task>: <error>"` as the task output and keep going
    RecordError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutput {
    pub task: String,
    pub agent: String,
    pub output: String,
    pub failed: bool,
}

/// Outputs of one run, in execution order
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskOutputs {
    entries: Vec<TaskOutput>,
}

impl TaskOutputs {
    pub fn get(&self, task: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.task == task)
            .map(|entry| entry.output.as_str())
    }

    /// Output of the last task executed
    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(|entry| entry.output.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskOutput> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn any_failed(&self) -> bool {
        self.entries.iter().any(|entry| entry.failed)
    }
}

/// A validated set of tasks with a fixed execution order
///
/// Tasks run one at a time. Among tasks whose dependencies are satisfied the
/// one declared first runs next, so a linear declaration runs in declaration
/// order.
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    order: Vec<usize>,
    policy: FailurePolicy,
}

impl TaskGraph {
    pub fn builder() -> TaskGraphBuilder {
        TaskGraphBuilder::default()
    }

    pub fn execution_order(&self) -> Vec<&str> {
        self.order
            .iter()
            .map(|&index| self.tasks[index].name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Execute every task, recording each output in `context` under its task name
    pub async fn run(&self, context: &mut Context) -> Result<TaskOutputs> {
        let mut outputs = TaskOutputs::default();

        for (step, &index) in self.order.iter().enumerate() {
            let task = &self.tasks[index];
            info!(
                task = %task.name,
                agent = %task.agent.name(),
                step = step + 1,
                total = self.order.len(),
                "running task"
            );

            let upstream: Vec<(&str, &str)> = task
                .context
                .iter()
                .filter_map(|dep| outputs.get(dep).map(|out| (dep.as_str(), out)))
                .collect();
            let prompt = task.prompt(upstream);

            let (output, failed) = match task.agent.process(prompt, context).await {
                Ok(output) => (output, false),
                Err(source) => match self.policy {
                    FailurePolicy::Abort => {
                        return Err(WorkflowError::TaskFailed {
                            task: task.name.clone(),
                            source,
                        });
                    }
                    FailurePolicy::RecordError => {
                        warn!(task = %task.name, error = %source, "task failed, continuing");
                        (format!("Error in {}: {source}", task.name), true)
                    }
                },
            };

            context.record_task_output(task.name.clone(), output.clone());
            outputs.entries.push(TaskOutput {
                task: task.name.clone(),
                agent: task.agent.name().to_string(),
                output,
                failed,
            });
        }

        Ok(outputs)
    }
}

#[derive(Default)]
pub struct TaskGraphBuilder {
    tasks: Vec<Task>,
    policy: FailurePolicy,
}

impl TaskGraphBuilder {
    pub fn task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject duplicate names, unknown dependencies and cycles
    pub fn build(self) -> Result<TaskGraph> {
        let mut names = HashSet::new();
        for task in &self.tasks {
            if !names.insert(task.name.as_str()) {
                return Err(WorkflowError::DuplicateTask(task.name.clone()));
            }
        }
        for task in &self.tasks {
            if let Some(dep) = task.context.iter().find(|d| !names.contains(d.as_str())) {
                return Err(WorkflowError::UnknownDependency {
                    task: task.name.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        let order = topological_order(&self.tasks)?;
        Ok(TaskGraph {
            tasks: self.tasks,
            order,
            policy: self.policy,
        })
    }
}

fn topological_order(tasks: &[Task]) -> Result<Vec<usize>> {
    let mut done: HashSet<&str> = HashSet::with_capacity(tasks.len());
    let mut order = Vec::with_capacity(tasks.len());
    let mut pending: Vec<usize> = (0..tasks.len()).collect();

    while !pending.is_empty() {
        let ready = pending.iter().position(|&index| {
            tasks[index]
                .context
                .iter()
                .all(|dep| done.contains(dep.as_str()))
        });

        let Some(position) = ready else {
            return Err(WorkflowError::Cycle(
                pending.iter().map(|&i| tasks[i].name.clone()).collect(),
            ));
        };

        let index = pending.remove(position);
        done.insert(tasks[index].name.as_str());
        order.push(index);
    }

    Ok(order)
}
