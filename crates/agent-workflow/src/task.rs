//! A single unit of prompted work

use agent_core::Agent;
use std::sync::Arc;

/// Description, expected output hint, agent and context dependencies
#[derive(Clone)]
pub struct Task {
    pub name: String,
    pub description: String,
    pub expected_output: String,
    pub agent: Arc<dyn Agent>,
    /// Names of tasks whose outputs are fed into this one
    pub context: Vec<String>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        agent: Arc<dyn Agent>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: String::new(),
            agent,
            context: Vec::new(),
        }
    }

    pub fn expected_output(mut self, expected: impl Into<String>) -> Self {
        self.expected_output = expected.into();
        self
    }

    pub fn context<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = tasks.into_iter().map(Into::into).collect();
        self
    }

    /// Prompt sent to the agent, given the outputs of the context tasks
    pub fn prompt<'a>(&self, upstream: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
        let mut prompt = self.description.trim().to_string();
        if !self.expected_output.is_empty() {
            prompt.push_str("\n\nExpected output: ");
            prompt.push_str(self.expected_output.trim());
        }
        for (task, output) in upstream {
            prompt.push_str("\n\n## Context from ");
            prompt.push_str(task);
            prompt.push_str("\n\n");
            prompt.push_str(output.trim());
        }
        prompt
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("agent", &self.agent.name())
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
