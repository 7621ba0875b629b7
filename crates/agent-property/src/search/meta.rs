use super::{CategoryResult, SearchCategory};
use serde::{Deserialize, Serialize};

/// Project and investment signals from economic development hits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthIndicators {
    pub detected_projects: usize,
    pub mentioned_investments: Vec<String>,
    pub confidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomicClimate {
    pub growth_indicators: Option<GrowthIndicators>,
    pub detected_trends: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendList {
    pub detected_trends: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectList {
    pub detected_projects: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureList {
    pub notable_features: Vec<String>,
}

/// Signals accumulated across every category searched so far
///
/// The shape is fixed and updates only ever add.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAnalysis {
    pub economic_climate: EconomicClimate,
    pub housing_market: TrendList,
    pub government_policy: TrendList,
    pub infrastructure: ProjectList,
    pub community_factors: FeatureList,
}

impl MetaAnalysis {
    /// Fold one category result in
    pub fn update(&mut self, result: &CategoryResult) {
        if result.results.is_empty() {
            return;
        }

        let summaries: Vec<String> = result
            .results
            .iter()
            .map(|r| r.summary.to_lowercase())
            .collect();
        let mentions = |term: &str| summaries.iter().any(|s| s.contains(term));

        match result.category {
            SearchCategory::EconomicDevelopment => {
                let detected_projects = summaries
                    .iter()
                    .filter(|s| ["project", "development", "investment"].iter().any(|t| s.contains(*t)))
                    .count();
                self.economic_climate.growth_indicators = Some(GrowthIndicators {
                    detected_projects,
                    mentioned_investments: result.amounts().take(3).map(str::to_string).collect(),
                    confidence: "medium".to_string(),
                });
            }
            SearchCategory::HousingMarket => {
                let mut trends = Vec::new();
                for summary in &summaries {
                    if summary.contains("affordable") {
                        trends.push("Focus on affordable housing solutions");
                    }
                    if summary.contains("shortage") {
                        trends.push("Housing shortage indicated");
                    }
                    if summary.contains("growth") {
                        trends.push("Housing market growth mentioned");
                    }
                }
                push_unique(&mut self.housing_market.detected_trends, trends);
            }
            SearchCategory::Infrastructure => {
                let projects: Vec<String> = result
                    .results
                    .iter()
                    .flat_map(|r| r.key_points.iter())
                    .filter(|point| {
                        let lower = point.to_lowercase();
                        lower.contains("project") || lower.contains("expansion") || lower.contains("upgrade")
                    })
                    .cloned()
                    .collect();
                push_unique(&mut self.infrastructure.detected_projects, projects);
            }
            SearchCategory::GovernmentPolicy => {
                let mut trends = Vec::new();
                if mentions("zoning") {
                    trends.push("Zoning changes under discussion");
                }
                if mentions("incentive") {
                    trends.push("Development incentives available");
                }
                push_unique(&mut self.government_policy.detected_trends, trends);
            }
            SearchCategory::CommunityFactors => {
                let mut features = Vec::new();
                if mentions("school") {
                    features.push("Schools referenced in local coverage");
                }
                if mentions("hospital") || mentions("healthcare") {
                    features.push("Healthcare access mentioned");
                }
                if mentions("park") || mentions("recreation") {
                    features.push("Recreational amenities mentioned");
                }
                push_unique(&mut self.community_factors.notable_features, features);
            }
        }
    }
}

fn push_unique<S: Into<String>>(target: &mut Vec<String>, items: impl IntoIterator<Item = S>) {
    for item in items {
        let item = item.into();
        if !target.contains(&item) {
            target.push(item);
        }
    }
}
