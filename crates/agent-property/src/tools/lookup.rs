//! Dataset tools: lookup by stock number, free-text search and filters

use agent_core::Result as AgentResult;
use agent_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::PropertyError;
use crate::loader::{PropertyDataLoader, PropertyFilter};
use crate::record::PropertyRecord;

/// Full dataset row for one stock number
pub struct PropertyLookupTool {
    loader: Arc<PropertyDataLoader>,
}

#[derive(Debug, Deserialize)]
struct LookupParams {
    stock_number: String,
}

impl PropertyLookupTool {
    pub fn new(loader: Arc<PropertyDataLoader>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl Tool for PropertyLookupTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: LookupParams = serde_json::from_value(params)
            .map_err(|e| agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}")))?;

        let record = self.loader.require(&params.stock_number)?;
        Ok(json!({
            "stock_number": record.stock_number(),
            "location": record.display_location(),
            "fields": record.fields(),
            "lot_economics": record.lot_economics(),
        }))
    }

    fn name(&self) -> &'static str {
        "property_lookup"
    }

    fn description(&self) -> &'static str {
        "Look up a property in the dataset by stock number. Returns every column \
         of the row, including demographics, plus lot economics."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock_number": {
                    "type": "string",
                    "description": "Property stock number, e.g. \"12345\""
                }
            },
            "required": ["stock_number"]
        })
    }
}

/// Free-text search and structured filtering over the dataset
pub struct PropertySearchTool {
    loader: Arc<PropertyDataLoader>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    text: Option<String>,
    #[serde(flatten)]
    filter: PropertyFilter,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    20
}

impl PropertySearchTool {
    pub fn new(loader: Arc<PropertyDataLoader>) -> Self {
        Self { loader }
    }

    fn summary(record: &PropertyRecord) -> Value {
        json!({
            "stock_number": record.stock_number(),
            "address": record.address(),
            "city": record.city(),
            "county": record.county(),
            "state": record.state(),
            "acres": record.land_area_acres(),
            "price": record.for_sale_price(),
        })
    }
}

#[async_trait]
impl Tool for PropertySearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = serde_json::from_value(params)
            .map_err(|e| agent_core::Error::ProcessingFailed(format!("Invalid parameters: {e}")))?;

        let text = params.text.as_deref().map(str::trim).filter(|t| !t.is_empty());
        if text.is_none() && params.filter.is_empty() {
            return Err(PropertyError::Config(
                "property_search needs `text` or at least one filter".to_string(),
            )
            .into());
        }

        let candidates = match text {
            Some(text) => self.loader.search_properties(text),
            None => self.loader.property_list().iter().collect(),
        };
        let matches: Vec<&PropertyRecord> = candidates
            .into_iter()
            .filter(|record| params.filter.matches(record))
            .collect();

        Ok(json!({
            "total": matches.len(),
            "properties": matches
                .iter()
                .take(params.limit)
                .map(|record| Self::summary(record))
                .collect::<Vec<_>>(),
        }))
    }

    fn name(&self) -> &'static str {
        "property_search"
    }

    fn description(&self) -> &'static str {
        "Search the property dataset by address, city, state, zip or county text, \
         optionally narrowed by acreage, price, state, city or county filters."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Case-insensitive text to match" },
                "min_acres": { "type": "number" },
                "max_acres": { "type": "number" },
                "min_price": { "type": "number" },
                "max_price": { "type": "number" },
                "state": { "type": "string", "description": "Exact state code, e.g. \"TX\"" },
                "cities": { "type": "array", "items": { "type": "string" } },
                "counties": { "type": "array", "items": { "type": "string" } },
                "limit": { "type": "integer", "default": 20 }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> Arc<PropertyDataLoader> {
        let csv = "\
StockNumber,Property Address,City,County Name,State,Zip,Land Area (AC),For Sale Price
12345.0,123 Test St,Austin,Travis,TX,78701,10.5,\"$250,000\"
67890,456 Oak Ave,Dallas,Dallas,TX,75201,3,\"$90,000\"
";
        Arc::new(PropertyDataLoader::from_reader(csv.as_bytes()).unwrap())
    }

    #[tokio::test]
    async fn test_lookup() {
        let tool = PropertyLookupTool::new(loader());
        let found = tool.execute(json!({ "stock_number": "12345" })).await.unwrap();
        assert_eq!(found["location"], "123 Test St, Austin, TX");
        assert_eq!(found["fields"]["Zip"], "78701");
        assert!((found["lot_economics"]["potential_lots"].as_f64().unwrap() - 36.75).abs() < 1e-9);

        let missing = tool.execute(json!({ "stock_number": "1" })).await;
        assert!(matches!(missing, Err(agent_core::Error::NotFound(_))));

        let invalid = tool.execute(json!({ "id": "12345" })).await;
        assert!(invalid.unwrap_err().to_string().contains("Invalid parameters"));
    }

    #[tokio::test]
    async fn test_search_with_filter() {
        let tool = PropertySearchTool::new(loader());

        let by_text = tool.execute(json!({ "text": "tx" })).await.unwrap();
        assert_eq!(by_text["total"], 2);

        let filtered = tool
            .execute(json!({ "text": "tx", "min_acres": 5.0 }))
            .await
            .unwrap();
        assert_eq!(filtered["total"], 1);
        assert_eq!(filtered["properties"][0]["stock_number"], "12345");

        let by_filter = tool
            .execute(json!({ "cities": ["Dallas"], "max_price": 100000 }))
            .await
            .unwrap();
        assert_eq!(by_filter["properties"][0]["city"], "Dallas");

        assert!(tool.execute(json!({})).await.is_err());
    }
}
