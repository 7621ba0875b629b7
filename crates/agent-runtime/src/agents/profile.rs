//! Role description for an agent

use serde::{Deserialize, Serialize};

/// Who an agent is: role title, goal and background
///
/// The profile becomes the agent's system prompt unless an explicit prompt
/// overrides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    #[serde(default)]
    pub backstory: String,
}

impl AgentProfile {
    pub fn new(role: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            goal: goal.into(),
            backstory: String::new(),
        }
    }

    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    /// System prompt derived from the profile
    pub fn system_prompt(&self) -> String {
        let mut prompt = format!("You are a {}.\nYour goal: {}", self.role, self.goal);
        if !self.backstory.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.backstory);
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt() {
        let profile = AgentProfile::new(
            "Real Estate Market Analyst",
            "Analyze market trends and identify optimal property development strategies",
        );
        assert_eq!(
            profile.system_prompt(),
            "You are a Real Estate Market Analyst.\nYour goal: Analyze market trends and identify optimal property development strategies"
        );

        let with_story = profile.with_backstory("Twenty years in land development.");
        assert!(with_story.system_prompt().ends_with("\n\nTwenty years in land development."));
    }
}
