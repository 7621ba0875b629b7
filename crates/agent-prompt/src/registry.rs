//! Shared, thread-safe template registry

use crate::{Language, PromptError, PromptTemplate, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Name-to-template map with a default render language
///
/// Registering a name twice replaces the earlier template.
pub struct PromptRegistry {
    templates: RwLock<BTreeMap<String, Arc<dyn PromptTemplate>>>,
    language: Language,
}

impl PromptRegistry {
    pub fn new() -> Self {
        Self::with_language(Language::English)
    }

    pub fn with_language(language: Language) -> Self {
        Self {
            templates: RwLock::new(BTreeMap::new()),
            language,
        }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn register<T: PromptTemplate + 'static>(&self, template: T) {
        self.register_arc(Arc::new(template));
    }

    pub fn register_arc(&self, template: Arc<dyn PromptTemplate>) {
        self.templates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(template.name().to_string(), template);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PromptTemplate>> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Render with the registry language, falling back to English
    pub fn render(&self, name: &str, vars: &serde_json::Value) -> Result<String> {
        self.render_with_lang(name, &self.language, vars)
    }

    pub fn render_with_lang(
        &self,
        name: &str,
        lang: &Language,
        vars: &serde_json::Value,
    ) -> Result<String> {
        self.get(name)
            .ok_or_else(|| PromptError::NotRegistered(name.to_string()))?
            .render_with_fallback(lang, vars)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("language", &self.language)
            .field("templates", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JinjaTemplate;
    use serde_json::json;

    #[test]
    fn test_register_and_render() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("property.greeting", "Hi {{ who }}").unwrap());

        assert!(registry.contains("property.greeting"));
        assert_eq!(
            registry.render("property.greeting", &json!({ "who": "analyst" })).unwrap(),
            "Hi analyst"
        );
    }

    #[test]
    fn test_unknown_template() {
        let registry = PromptRegistry::new();
        assert!(matches!(
            registry.render("missing", &json!({})),
            Err(PromptError::NotRegistered(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_replace_and_sorted_names() {
        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("b", "v1").unwrap());
        registry.register(JinjaTemplate::new("a", "A").unwrap());
        registry.register(JinjaTemplate::new("b", "v2").unwrap());

        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.render("b", &json!({})).unwrap(), "v2");
    }

    #[test]
    fn test_registry_language_falls_back_to_english() {
        let registry = PromptRegistry::with_language(Language::from_code("es"));
        registry.register(JinjaTemplate::new("t", "English body").unwrap());
        assert_eq!(registry.render("t", &json!({})).unwrap(), "English body");
    }
}
