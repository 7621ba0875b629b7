//! Property research tools for LLM agents

pub mod lookup;
pub mod research;

pub use lookup::{PropertyLookupTool, PropertySearchTool};
pub use research::{CategorizedSearchTool, PropertyWebResearchTool};

use agent_tools::ToolRegistry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::PropertyConfig;
use crate::error::Result;
use crate::loader::PropertyDataLoader;
use crate::search::{EnhancedWebResearch, SearchProvider};
use crate::web_research::WebResearchTool;

pub const PROPERTY_LOOKUP: &str = "property_lookup";
pub const PROPERTY_SEARCH: &str = "property_search";
pub const CATEGORIZED_SEARCH: &str = "categorized_search";
pub const PROPERTY_WEB_RESEARCH: &str = "property_web_research";

/// Register the dataset and research tools
///
/// Without a search provider `categorized_search` still registers and
/// answers with the "Search unavailable" payload; `property_web_research`
/// is left out.
pub fn register_property_tools(
    registry: &ToolRegistry,
    loader: Arc<PropertyDataLoader>,
    search: Option<Arc<dyn SearchProvider>>,
    config: &PropertyConfig,
) -> Result<()> {
    registry.register(Arc::new(PropertyLookupTool::new(loader.clone())));
    registry.register(Arc::new(PropertySearchTool::new(loader.clone())));

    let research = EnhancedWebResearch::with_provider(search.clone());
    registry.register(Arc::new(CategorizedSearchTool::new(
        Arc::new(Mutex::new(research)),
        loader.clone(),
        config.max_results_per_query,
        config.max_queries,
    )));

    match search {
        Some(provider) => {
            let web = WebResearchTool::new(provider)?;
            registry.register(Arc::new(PropertyWebResearchTool::new(Arc::new(web), loader)));
        }
        None => warn!("no search provider, property_web_research disabled"),
    }

    Ok(())
}
