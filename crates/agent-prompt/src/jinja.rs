//! MiniJinja-backed templates
//!
//! Bodies use Jinja2 syntax. Besides the minijinja builtins (`default`,
//! `round`, `upper`, ...) every template gets a `money` filter that renders
//! numbers and `"$1,250,000"`-style strings as whole dollars with thousands
//! separators.

use crate::{Language, PromptError, PromptTemplate, Result};
use minijinja::{Environment, Value};
use std::collections::BTreeMap;

/// A prompt template rendered with MiniJinja
///
/// ```
/// use agent_prompt::{JinjaTemplate, Language, PromptTemplate};
/// use serde_json::json;
///
/// let template = JinjaTemplate::new("price", "Listed at {{ price | money }}").unwrap();
/// let text = template.render(&Language::English, &json!({ "price": 1250000 })).unwrap();
/// assert_eq!(text, "Listed at $1,250,000");
/// ```
pub struct JinjaTemplate {
    name: String,
    bodies: BTreeMap<Language, String>,
}

impl JinjaTemplate {
    pub fn builder(name: impl Into<String>) -> JinjaTemplateBuilder {
        JinjaTemplateBuilder::new(name)
    }

    /// Single English body
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Result<Self> {
        Self::builder(name).english(body).build()
    }

    fn environment() -> Environment<'static> {
        let mut env = Environment::new();
        env.add_filter("money", money_filter);
        env
    }
}

impl PromptTemplate for JinjaTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn languages(&self) -> Vec<Language> {
        self.bodies.keys().cloned().collect()
    }

    fn render(&self, lang: &Language, vars: &serde_json::Value) -> Result<String> {
        let body = self
            .bodies
            .get(lang)
            .ok_or_else(|| PromptError::LanguageMissing {
                name: self.name.clone(),
                language: lang.code().to_string(),
            })?;

        Self::environment()
            .render_str(body, Value::from_serialize(vars))
            .map_err(|e| PromptError::RenderFailed {
                name: self.name.clone(),
                detail: e.to_string(),
            })
    }

    fn raw_template(&self, lang: &Language) -> Option<&str> {
        self.bodies.get(lang).map(String::as_str)
    }
}

impl std::fmt::Debug for JinjaTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JinjaTemplate")
            .field("name", &self.name)
            .field("languages", &self.bodies.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct JinjaTemplateBuilder {
    name: String,
    bodies: BTreeMap<Language, String>,
}

impl JinjaTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bodies: BTreeMap::new(),
        }
    }

    pub fn body(mut self, lang: Language, body: impl Into<String>) -> Self {
        self.bodies.insert(lang, body.into());
        self
    }

    pub fn english(self, body: impl Into<String>) -> Self {
        self.body(Language::English, body)
    }

    /// Parse every body once so syntax errors surface at registration time
    pub fn build(self) -> Result<JinjaTemplate> {
        if self.bodies.is_empty() {
            return Err(PromptError::Empty(self.name));
        }

        let env = JinjaTemplate::environment();
        for (lang, body) in &self.bodies {
            env.template_from_str(body)
                .map_err(|e| PromptError::ParseFailed {
                    name: self.name.clone(),
                    language: lang.code().to_string(),
                    detail: e.to_string(),
                })?;
        }

        Ok(JinjaTemplate {
            name: self.name,
            bodies: self.bodies,
        })
    }
}

fn money_filter(value: Value) -> String {
    let amount = match value.as_str() {
        Some(text) => text.replace(['$', ','], "").trim().parse::<f64>().ok(),
        None => f64::try_from(value.clone()).ok(),
    };
    amount.map_or_else(|| "N/A".to_string(), format_money)
}

/// Whole dollars with thousands separators, e.g. `$1,250,000`
pub fn format_money(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_property_fields() {
        let template = JinjaTemplate::new(
            "location",
            "{{ address }}, {{ city }}, {{ state }} ({{ zoning | default('N/A') }})",
        )
        .unwrap();

        let text = template
            .render(
                &Language::English,
                &json!({ "address": "123 Test St", "city": "Austin", "state": "TX" }),
            )
            .unwrap();
        assert_eq!(text, "123 Test St, Austin, TX (N/A)");
    }

    #[test]
    fn test_money_filter() {
        let template = JinjaTemplate::new("m", "{{ a | money }} {{ b | money }} {{ c | money }}").unwrap();
        let text = template
            .render(
                &Language::English,
                &json!({ "a": 192_500.4, "b": "$1,000,000", "c": "call for price" }),
            )
            .unwrap();
        assert_eq!(text, "$192,500 $1,000,000 N/A");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "$0");
        assert_eq!(format_money(999.0), "$999");
        assert_eq!(format_money(1000.0), "$1,000");
        assert_eq!(format_money(-55_000.0), "-$55,000");
    }

    #[test]
    fn test_invalid_body_rejected() {
        assert!(matches!(
            JinjaTemplate::new("broken", "{{ unclosed"),
            Err(PromptError::ParseFailed { .. })
        ));
        assert!(matches!(
            JinjaTemplate::builder("empty").build(),
            Err(PromptError::Empty(_))
        ));
    }

    #[test]
    fn test_language_fallback() {
        let template = JinjaTemplate::builder("greeting")
            .english("Hello")
            .body(Language::from_code("es"), "Hola")
            .build()
            .unwrap();

        let es = Language::from_code("es");
        let fr = Language::from_code("fr");
        assert_eq!(template.render(&es, &json!({})).unwrap(), "Hola");
        assert!(template.render(&fr, &json!({})).is_err());
        assert_eq!(template.render_with_fallback(&fr, &json!({})).unwrap(), "Hello");
        assert_eq!(template.raw_template(&es), Some("Hola"));
    }

    #[test]
    fn test_loop_over_properties() {
        let template = JinjaTemplate::new(
            "list",
            "{% for p in properties %}Property {{ loop.index }}: {{ p.address }}\n{% endfor %}",
        )
        .unwrap();
        let text = template
            .render(
                &Language::English,
                &json!({ "properties": [{ "address": "A" }, { "address": "B" }] }),
            )
            .unwrap();
        assert_eq!(text, "Property 1: A\nProperty 2: B\n");
    }
}
