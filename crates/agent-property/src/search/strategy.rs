use super::{CategoryResult, MetaAnalysis, SearchCategory, SearchHit, SearchProvider};
use crate::error::{PropertyError, Result};
use crate::location::{LocationContext, Specificity, build_location_query};
use crate::record::PropertyRecord;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One concrete query and the category and tier it serves
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SearchQuery {
    pub category: SearchCategory,
    pub specificity: Specificity,
    pub text: String,
}

/// Queries for one category at one tier, first `max_queries` phrases only
///
/// Empty when the location has nothing to offer at that tier.
pub fn plan_queries(
    location: &LocationContext,
    category: SearchCategory,
    specificity: Specificity,
    max_queries: usize,
) -> Vec<SearchQuery> {
    let location_query = build_location_query(location, specificity);
    if location_query.is_empty() {
        return Vec::new();
    }

    category
        .phrases()
        .iter()
        .take(max_queries)
        .map(|phrase| SearchQuery {
            category,
            specificity,
            text: format!("{location_query} {phrase}"),
        })
        .collect()
}

/// Everything gathered by one research instance
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredResults {
    pub search_results: Vec<CategoryResult>,
    pub meta_analysis: MetaAnalysis,
    pub location_context: Option<LocationContext>,
}

/// What a strategy run produced
///
/// Serializes to the bare payload, so an unavailable provider reads as
/// `{"error": "Search unavailable", "message": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StrategyOutcome {
    Unavailable { error: String, message: String },
    Completed(StructuredResults),
}

impl StrategyOutcome {
    fn unavailable() -> Self {
        Self::Unavailable {
            error: "Search unavailable".to_string(),
            message: "No search provider is configured; web research is disabled.".to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Location-aware, category-driven search with per-instance memory
///
/// A query string is sent at most once per instance; results and the
/// meta-analysis accumulate across calls.
pub struct EnhancedWebResearch {
    provider: Option<Arc<dyn SearchProvider>>,
    executed: HashSet<String>,
    results: Vec<CategoryResult>,
    meta: MetaAnalysis,
    location: Option<LocationContext>,
}

impl EnhancedWebResearch {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self::with_provider(Some(provider))
    }

    /// Research instance with no search engine; every strategy run reports
    /// [`StrategyOutcome::Unavailable`]
    pub fn unavailable() -> Self {
        Self::with_provider(None)
    }

    pub fn with_provider(provider: Option<Arc<dyn SearchProvider>>) -> Self {
        Self {
            provider,
            executed: HashSet::new(),
            results: Vec::new(),
            meta: MetaAnalysis::default(),
            location: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Search one category, or all five, around the record's location
    ///
    /// Tiers are tried Medium, High, Low. Within a tier the first
    /// `max_queries` phrases are tried in order until one returns hits; once
    /// a category has any result the remaining tiers are skipped. Provider
    /// errors are logged and the next phrase is tried.
    pub async fn execute_search_strategy(
        &mut self,
        record: &PropertyRecord,
        category: Option<SearchCategory>,
        max_results_per_query: usize,
        max_queries: usize,
    ) -> StrategyOutcome {
        let location = LocationContext::from_record(record);
        self.run(location, category, max_results_per_query, max_queries)
            .await
    }

    async fn run(
        &mut self,
        location: LocationContext,
        category: Option<SearchCategory>,
        max_results_per_query: usize,
        max_queries: usize,
    ) -> StrategyOutcome {
        let Some(provider) = self.provider.clone() else {
            return StrategyOutcome::unavailable();
        };

        let categories = category.map_or_else(|| SearchCategory::ALL.to_vec(), |c| vec![c]);
        info!(
            location = %location.full_location,
            categories = categories.len(),
            "running search strategy"
        );

        for category in categories {
            for tier in Specificity::SEARCH_ORDER {
                for query in plan_queries(&location, category, tier, max_queries) {
                    if self.executed.contains(&query.text) {
                        debug!(query = %query.text, "skipping executed query");
                        continue;
                    }

                    match provider.text(&query.text, max_results_per_query).await {
                        Ok(hits) => {
                            self.executed.insert(query.text.clone());
                            if hits.is_empty() {
                                continue;
                            }
                            self.record(&query, &hits);
                            break;
                        }
                        Err(e) => {
                            warn!(
                                category = %category,
                                specificity = %tier,
                                query = %query.text,
                                error = %e,
                                "search failed"
                            );
                        }
                    }
                }

                if self.has_results_for(category) {
                    break;
                }
            }
        }

        self.location = Some(location);
        StrategyOutcome::Completed(self.structured_results())
    }

    fn record(&mut self, query: &SearchQuery, hits: &[SearchHit]) {
        let result = CategoryResult::from_hits(query.category, query.text.clone(), hits);
        debug!(
            category = %query.category,
            specificity = %query.specificity,
            query = %result.query,
            hits = result.results.len(),
            "category satisfied"
        );
        self.meta.update(&result);
        self.results.push(result);
    }

    fn has_results_for(&self, category: SearchCategory) -> bool {
        self.results.iter().any(|r| r.category == category)
    }

    /// Snapshot of results, meta-analysis and the last location searched
    pub fn structured_results(&self) -> StructuredResults {
        StructuredResults {
            search_results: self.results.clone(),
            meta_analysis: self.meta.clone(),
            location_context: self.location.clone(),
        }
    }

    pub fn results_by_category(&self, category: SearchCategory) -> Vec<&CategoryResult> {
        self.results.iter().filter(|r| r.category == category).collect()
    }

    pub fn meta_analysis(&self) -> &MetaAnalysis {
        &self.meta
    }

    /// Number of distinct queries sent so far
    pub fn executed_queries(&self) -> usize {
        self.executed.len()
    }

    /// Free-form search
    ///
    /// `"<category>: <place>"` with exactly one colon and a known category
    /// runs the strategy for that category around `<place>` and flattens its
    /// hits; anything else goes straight to the provider.
    pub async fn search(&mut self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let Some(provider) = self.provider.clone() else {
            return Err(PropertyError::SearchUnavailable(
                "no search provider is configured".to_string(),
            ));
        };

        let routed = query
            .split_once(':')
            .filter(|(_, place)| !place.contains(':'))
            .and_then(|(prefix, place)| Some((prefix.parse::<SearchCategory>().ok()?, place)));

        if let Some((category, place)) = routed {
            let location = LocationContext::from_free_text(place);
            let outcome = self.run(location, Some(category), 3, 3).await;
            let StrategyOutcome::Completed(results) = outcome else {
                return Ok(Vec::new());
            };
            return Ok(results
                .search_results
                .iter()
                .flat_map(|c| c.results.iter())
                .map(|r| SearchHit {
                    title: r.title.clone(),
                    href: r.url.clone(),
                    body: r.summary.clone(),
                })
                .collect());
        }

        provider.text(query, max_results).await
    }
}
