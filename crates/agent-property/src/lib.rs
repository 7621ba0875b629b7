//! Property research agents
//!
//! Loads a CSV of land parcels and runs role agents over them to produce
//! development analysis reports. It includes:
//!
//! - Dataset loading, lookup, free-text search and structured filters
//! - Location-aware categorized news search with relevance scoring and a
//!   running meta-analysis
//! - Address-level web research with page fetching and signal extraction
//! - Prompt templates rendered from a parcel's fields
//! - A crew of four agents (data analyst, web researcher, market analyst,
//!   report generator) run as task graphs
//! - Markdown report assembly and demographic tables
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_property::{PropertyAnalysisCrew, PropertyConfig, PropertyDataLoader};
//! use agent_llm::providers::MockProvider;
//! use agent_prompt::PromptRegistry;
//! use agent_runtime::AgentRuntime;
//! use agent_tools::ToolRegistry;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Arc::new(PropertyConfig::from_env());
//!     let loader = Arc::new(PropertyDataLoader::from_path(&config.data_path)?);
//!
//!     let registry = Arc::new(ToolRegistry::new());
//!     agent_property::tools::register_property_tools(&registry, loader.clone(), None, &config)?;
//!     let runtime = AgentRuntime::builder()
//!         .provider(Arc::new(MockProvider::new()))
//!         .tool_registry(registry)
//!         .build()?;
//!
//!     let prompts = Arc::new(PromptRegistry::new());
//!     agent_property::prompts::register_prompts(&prompts)?;
//!
//!     let crew = PropertyAnalysisCrew::new(&runtime, prompts, loader, config)?;
//!     let outcome = crew.analyze_property("12345").await?;
//!     println!("Report saved to {}", outcome.path.display());
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod cache;
pub mod charts;
pub mod config;
pub mod crew;
pub mod error;
pub mod loader;
pub mod location;
pub mod prompts;
pub mod record;
pub mod reports;
pub mod search;
pub mod tools;
pub mod web_research;

pub use agents::PropertyAgents;
pub use config::PropertyConfig;
pub use crew::{AnalysisOutcome, ComparisonOutcome, PipelineOutcome, PropertyAnalysisCrew};
pub use error::{PropertyError, Result};
pub use loader::{PropertyDataLoader, PropertyFilter};
pub use location::{LocationContext, Specificity};
pub use record::{LotEconomics, PropertyRecord};
pub use reports::{PropertyReport, assemble_report};
pub use search::{EnhancedWebResearch, SearchCategory, SearchHit, SearchProvider, StrategyOutcome};
pub use web_research::{InfoType, WebResearchTool};
