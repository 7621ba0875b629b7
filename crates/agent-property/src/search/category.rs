//! Research categories and their query phrases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A research angle on the area around a parcel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
    EconomicDevelopment,
    HousingMarket,
    Infrastructure,
    GovernmentPolicy,
    CommunityFactors,
}

impl SearchCategory {
    pub const ALL: [SearchCategory; 5] = [
        Self::EconomicDevelopment,
        Self::HousingMarket,
        Self::Infrastructure,
        Self::GovernmentPolicy,
        Self::CommunityFactors,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EconomicDevelopment => "economic_development",
            Self::HousingMarket => "housing_market",
            Self::Infrastructure => "infrastructure",
            Self::GovernmentPolicy => "government_policy",
            Self::CommunityFactors => "community_factors",
        }
    }

    /// Name with spaces, as used in prose
    pub fn label(self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Query suffixes appended to the location phrase, most useful first
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            Self::EconomicDevelopment => &[
                "economic development news past year",
                "new business opening 2023 2024",
                "major employer hiring expanding",
                "economic growth statistics recent",
                "upcoming development projects",
                "job market trends",
            ],
            Self::HousingMarket => &[
                "housing market analysis 2024",
                "affordable housing initiative",
                "housing shortage statistics",
                "new housing development project",
                "manufactured home community zoning",
                "rental market trends 2024",
            ],
            Self::Infrastructure => &[
                "infrastructure improvement plan",
                "road expansion project",
                "utilities upgrade plan",
                "transportation development",
                "broadband expansion rural",
                "water sewer capacity development",
            ],
            Self::GovernmentPolicy => &[
                "zoning changes residential development",
                "new property development regulations",
                "tax incentives housing development",
                "permitting process development",
                "planning commission decisions recent",
                "development impact fees",
            ],
            Self::CommunityFactors => &[
                "school district performance ranking",
                "crime statistics trends",
                "quality of life ranking",
                "recreational facilities development",
                "community sentiment growth survey",
                "healthcare facilities access",
            ],
        }
    }

    /// Words that mark a hit as on-topic for relevance scoring
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::EconomicDevelopment => {
                &["business", "economy", "job", "employment", "growth", "industry"]
            }
            Self::HousingMarket => &["housing", "home", "apartment", "rent", "mortgage", "residential"],
            Self::Infrastructure => &[
                "road",
                "transit",
                "utility",
                "infrastructure",
                "transportation",
                "development",
            ],
            Self::GovernmentPolicy => {
                &["zoning", "regulation", "permit", "tax", "incentive", "government"]
            }
            Self::CommunityFactors => {
                &["school", "education", "crime", "recreation", "healthcare", "park"]
            }
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchCategory {
    type Err = String;

    /// Accepts the snake_case name in any case, with surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown search category '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_table_shape() {
        for category in SearchCategory::ALL {
            assert_eq!(category.phrases().len(), 6, "{category}");
            assert_eq!(category.keywords().len(), 6, "{category}");
        }
        assert_eq!(SearchCategory::HousingMarket.phrases()[0], "housing market analysis 2024");
    }

    #[test]
    fn test_parse_and_label() {
        assert_eq!(
            " Housing_Market ".parse::<SearchCategory>(),
            Ok(SearchCategory::HousingMarket)
        );
        assert!("weather".parse::<SearchCategory>().is_err());
        assert_eq!(SearchCategory::GovernmentPolicy.label(), "government policy");
        assert_eq!(
            serde_json::to_value(SearchCategory::CommunityFactors).unwrap(),
            "community_factors"
        );
    }
}
