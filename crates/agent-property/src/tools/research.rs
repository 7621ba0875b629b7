//! Web research tools exposed to the researcher agent

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::PropertyError;
use crate::loader::PropertyDataLoader;
use crate::record::PropertyRecord;
use crate::search::{EnhancedWebResearch, SearchCategory};
use crate::web_research::{InfoType, WebResearchTool};

/// Categorized, location-aware search around a parcel
///
/// One [`EnhancedWebResearch`] is shared by every call, so queries already
/// sent in this session are not repeated and the meta-analysis keeps
/// growing.
pub struct CategorizedSearchTool {
    research: Arc<Mutex<EnhancedWebResearch>>,
    loader: Arc<PropertyDataLoader>,
    max_results_per_query: usize,
    max_queries: usize,
}

#[derive(Debug, Deserialize)]
struct CategorizedParams {
    #[serde(default)]
    stock_number: Option<String>,
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl CategorizedSearchTool {
    pub fn new(
        research: Arc<Mutex<EnhancedWebResearch>>,
        loader: Arc<PropertyDataLoader>,
        max_results_per_query: usize,
        max_queries: usize,
    ) -> Self {
        Self {
            research,
            loader,
            max_results_per_query,
            max_queries,
        }
    }

    async fn run(&self, params: CategorizedParams) -> crate::error::Result<Value> {
        let category = params
            .category
            .as_deref()
            .map(str::parse::<SearchCategory>)
            .transpose()
            .map_err(PropertyError::Config)?;

        if let Some(stock_number) = params.stock_number {
            let record = self.loader.require(&stock_number)?.clone();
            let mut research = self.research.lock().await;
            let outcome = research
                .execute_search_strategy(
                    &record,
                    category,
                    self.max_results_per_query,
                    self.max_queries,
                )
                .await;
            return Ok(serde_json::to_value(outcome)?);
        }

        let Some(query) = params.query.filter(|q| !q.trim().is_empty()) else {
            return Err(PropertyError::Config(
                "categorized_search needs `stock_number` or `query`".to_string(),
            ));
        };
        let query = match category {
            Some(category) => format!("{category}: {query}"),
            None => query,
        };
        let hits = self
            .research
            .lock()
            .await
            .search(&query, self.max_results_per_query)
            .await?;
        Ok(json!({ "query": query, "results": hits }))
    }
}

#[async_trait]
impl Tool for CategorizedSearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: CategorizedParams = serde_json::from_value(params)
            .map_err(|e| agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}")))?;

        Ok(self.run(params).await?)
    }

    fn name(&self) -> &'static str {
        "categorized_search"
    }

    fn description(&self) -> &'static str {
        "Search local news around a property by category (economic_development, \
         housing_market, infrastructure, government_policy, community_factors). \
         Pass a stock_number to search around that parcel, or a free-text query. \
         Returns summarized hits with relevance scores and a running meta-analysis."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock_number": {
                    "type": "string",
                    "description": "Search around this property's city, county and state"
                },
                "query": {
                    "type": "string",
                    "description": "Free-text query, used when no stock_number is given"
                },
                "category": {
                    "type": "string",
                    "enum": SearchCategory::ALL.iter().map(|c| c.as_str()).collect::<Vec<_>>(),
                    "description": "Limit the search to one category; all five when omitted"
                }
            }
        })
    }
}

/// Address-level research: zoning, environmental, market and demographic pages
pub struct PropertyWebResearchTool {
    research: Arc<WebResearchTool>,
    loader: Arc<PropertyDataLoader>,
}

#[derive(Debug, Deserialize)]
struct WebResearchParams {
    stock_number: String,
    #[serde(default)]
    info_type: Option<String>,
}

impl PropertyWebResearchTool {
    pub fn new(research: Arc<WebResearchTool>, loader: Arc<PropertyDataLoader>) -> Self {
        Self { research, loader }
    }

    async fn run(&self, params: WebResearchParams) -> crate::error::Result<Value> {
        let record: PropertyRecord = self.loader.require(&params.stock_number)?.clone();

        match params.info_type.as_deref() {
            Some(raw) => {
                let info_type: InfoType = raw.parse().map_err(PropertyError::Config)?;
                let hits = self.research.search_property_info(&record, info_type).await?;
                Ok(json!({
                    "property": record.display_location(),
                    "info_type": info_type,
                    "search_results": hits,
                }))
            }
            None => Ok(serde_json::to_value(
                self.research.research_property(&record).await,
            )?),
        }
    }
}

#[async_trait]
impl Tool for PropertyWebResearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: WebResearchParams = serde_json::from_value(params)
            .map_err(|e| agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}")))?;

        Ok(self.run(params).await?)
    }

    fn name(&self) -> &'static str {
        "property_web_research"
    }

    fn description(&self) -> &'static str {
        "Search the web about a specific property address. With info_type \
         (general, zoning, environmental, market, demographics) runs one search; \
         without it researches all five and extracts zoning and demographic signals."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock_number": { "type": "string" },
                "info_type": {
                    "type": "string",
                    "enum": InfoType::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>()
                }
            },
            "required": ["stock_number"]
        })
    }
}
