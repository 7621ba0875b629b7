//! The [`PromptTemplate`] trait

use crate::{Language, Result};

/// A named prompt with one body per language
///
/// Variables are passed as `serde_json::Value` so the trait stays object safe.
pub trait PromptTemplate: Send + Sync {
    fn name(&self) -> &str;

    fn languages(&self) -> Vec<Language>;

    fn supports_language(&self, lang: &Language) -> bool {
        self.languages().contains(lang)
    }

    /// Render the body for `lang`, failing if that body does not exist
    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String>;

    /// Render `lang`, falling back to English
    fn render_with_fallback(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        if self.supports_language(lang) {
            self.render(lang, vars)
        } else {
            self.render(&Language::English, vars)
        }
    }

    fn raw_template(&self, lang: &Language) -> Option<&str>;
}
