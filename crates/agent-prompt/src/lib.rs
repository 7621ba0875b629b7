//! Prompt templates for the property research agents
//!
//! Templates are MiniJinja bodies keyed by [`Language`] and collected in a
//! [`PromptRegistry`] that the domain crates fill at start-up.
//!
//! ```
//! use agent_prompt::{JinjaTemplate, PromptRegistry};
//! use serde_json::json;
//!
//! let registry = PromptRegistry::new();
//! registry.register(
//!     JinjaTemplate::new("summary", "{{ acres }} acres in {{ city }}").unwrap(),
//! );
//! let text = registry.render("summary", &json!({ "acres": 12.5, "city": "Batavia" })).unwrap();
//! assert_eq!(text, "12.5 acres in Batavia");
//! ```

mod error;
mod jinja;
mod language;
mod registry;
mod template;

pub use error::{PromptError, Result};
pub use jinja::{JinjaTemplate, JinjaTemplateBuilder, format_money};
pub use language::Language;
pub use registry::PromptRegistry;
pub use template::PromptTemplate;
