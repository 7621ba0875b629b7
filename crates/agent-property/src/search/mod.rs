//! Categorized web research
//!
//! Queries are built from a fixed table of phrases per [`SearchCategory`],
//! prefixed with the parcel's location at several specificities. Hits are
//! shaped into [`SearchResultRecord`]s, scored with a keyword heuristic and
//! folded into a running [`MetaAnalysis`].
//!
//! The network sits behind [`SearchProvider`]; [`DuckDuckGoSearch`] is the
//! production implementation.

mod category;
mod duckduckgo;
pub mod extract;
mod meta;
mod result;
mod strategy;

pub use category::SearchCategory;
pub use duckduckgo::{DuckDuckGoConfig, DuckDuckGoSearch, parse_results};
pub(crate) use duckduckgo::decode_entities;
pub use meta::{EconomicClimate, FeatureList, GrowthIndicators, MetaAnalysis, ProjectList, TrendList};
pub use result::{CategoryResult, Entities, SearchResultRecord};
pub use strategy::{EnhancedWebResearch, SearchQuery, StrategyOutcome, StructuredResults, plan_queries};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One raw hit from a search engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
    pub body: String,
}

/// A text search engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Up to `max_results` hits for `query`
    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}
