use super::extract::{aggregate_insights, extract_amounts, key_points, relevance_score, source_from_url, summarize};
use super::{SearchCategory, SearchHit};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Named things mentioned in a hit
///
/// Only `amounts` is populated; the other lists stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entities {
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
    pub amounts: Vec<String>,
}

/// A search hit with derived signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    pub title: String,
    pub url: String,
    pub source: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub entities: Entities,
    pub relevance_score: f64,
    pub confidence_rating: String,
}

impl SearchResultRecord {
    pub fn from_hit(hit: &SearchHit, category: SearchCategory) -> Self {
        Self {
            title: hit.title.clone(),
            url: hit.href.clone(),
            source: source_from_url(&hit.href),
            summary: summarize(&hit.body),
            key_points: key_points(&hit.body),
            entities: Entities {
                amounts: extract_amounts(&hit.body),
                ..Entities::default()
            },
            relevance_score: relevance_score(&hit.title, &hit.body, category),
            confidence_rating: "medium".to_string(),
        }
    }
}

/// All hits from the query that satisfied one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: SearchCategory,
    pub query: String,
    pub timestamp: DateTime<Local>,
    pub results: Vec<SearchResultRecord>,
    pub aggregate_insights: Vec<String>,
}

impl CategoryResult {
    pub fn from_hits(category: SearchCategory, query: impl Into<String>, hits: &[SearchHit]) -> Self {
        let results: Vec<SearchResultRecord> = hits
            .iter()
            .map(|hit| SearchResultRecord::from_hit(hit, category))
            .collect();
        let aggregate_insights =
            aggregate_insights(results.iter().map(|r| r.summary.as_str()), category);

        Self {
            category,
            query: query.into(),
            timestamp: Local::now(),
            results,
            aggregate_insights,
        }
    }

    /// Amounts mentioned across all hits, in order
    pub fn amounts(&self) -> impl Iterator<Item = &str> {
        self.results
            .iter()
            .flat_map(|r| r.entities.amounts.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hits() {
        let hits = vec![
            SearchHit {
                title: "Austin housing shortage deepens".into(),
                href: "https://www.kut.org/housing/2024".into(),
                body: "The city faces a shortage of 20,000 homes. A $450,000 grant was approved. More to come."
                    .into(),
            },
            SearchHit {
                title: "Rents".into(),
                href: String::new(),
                body: String::new(),
            },
        ];

        let result = CategoryResult::from_hits(SearchCategory::HousingMarket, "Austin TX housing", &hits);
        assert_eq!(result.results.len(), 2);

        let first = &result.results[0];
        assert_eq!(first.source, "Kut");
        assert_eq!(first.key_points.len(), 3);
        assert_eq!(first.entities.amounts, vec!["$450,000"]);
        assert_eq!(first.confidence_rating, "medium");
        assert!(first.relevance_score > 0.5);

        let second = &result.results[1];
        assert_eq!(second.source, "Unknown source");
        assert!((second.relevance_score - 0.5).abs() < 1e-9);

        assert_eq!(
            result.aggregate_insights,
            vec!["Indicators of housing shortage in the market"]
        );
        assert_eq!(result.amounts().collect::<Vec<_>>(), vec!["$450,000"]);
    }
}
