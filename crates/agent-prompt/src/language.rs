//! Language selection for prompt templates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Language of a template body
///
/// ```
/// use agent_prompt::Language;
///
/// assert_eq!(Language::from_code("EN"), Language::English);
/// assert_eq!(Language::from_code("es").code(), "es");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    /// Any other ISO 639-1 code, stored lowercase
    Other(String),
}

impl Language {
    pub fn code(&self) -> &str {
        match self {
            Language::English => "en",
            Language::Other(code) => code,
        }
    }

    /// Parse an ISO 639-1 code or a language name; unknown values become `Other`
    pub fn from_code(s: &str) -> Self {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "" | "en" | "english" | "en-us" | "en-gb" => Language::English,
            _ => Language::Other(lower),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::English => f.write_str("English"),
            Language::Other(code) => f.write_str(code),
        }
    }
}

impl From<&str> for Language {
    fn from(s: &str) -> Self {
        Language::from_code(s)
    }
}
