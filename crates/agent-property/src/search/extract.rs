//! Signals pulled out of search hits
//!
//! All of these are plain keyword and pattern passes. They are deterministic
//! functions of their input and make no attempt at language understanding.

use super::SearchCategory;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static DOLLAR_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\s*\d+(?:,\d+)*(?:\.\d+)?(?:\s*(?:million|billion|m|b))?")
        .expect("dollar amount pattern is valid")
});

const RECENCY_TERMS: [&str; 8] = [
    "2024", "2023", "recent", "new", "latest", "update", "month", "week",
];

const GROWTH_TERMS: [&str; 5] = ["expansion", "growth", "new jobs", "hiring", "investment"];
const DECLINE_TERMS: [&str; 5] = ["layoff", "closing", "downturn", "recession", "struggling"];
const SHORTAGE_TERMS: [&str; 5] = [
    "shortage",
    "crisis",
    "lack of housing",
    "insufficient",
    "limited supply",
];
const BUILDING_TERMS: [&str; 5] = ["development", "construction", "new homes", "building", "project"];

/// Baseline relevance and the ceiling no hit can exceed
pub const RELEVANCE_FLOOR: f64 = 0.5;
pub const RELEVANCE_CAP: f64 = 0.95;

pub const SUMMARY_CHARS: usize = 500;

/// Publisher name from a URL: `https://www.example.com/a` gives `Example`
pub fn source_from_url(url: &str) -> String {
    const UNKNOWN: &str = "Unknown source";

    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) else {
        return UNKNOWN.to_string();
    };
    let domain = host.strip_prefix("www.").unwrap_or(&host);
    let labels: Vec<&str> = domain.split('.').collect();
    let name = if labels.len() >= 2 {
        labels[labels.len() - 2]
    } else {
        domain
    };

    if name.is_empty() {
        UNKNOWN.to_string()
    } else {
        capitalize(name)
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// First 500 characters of the body
pub fn summarize(body: &str) -> String {
    body.chars().take(SUMMARY_CHARS).collect()
}

/// First three `". "`-separated sentences, each ending in a period
pub fn key_points(text: &str) -> Vec<String> {
    text.split(". ")
        .take(3)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.ends_with('.') {
                s.to_string()
            } else {
                format!("{s}.")
            }
        })
        .collect()
}

/// Dollar amounts such as `$450,000` or `$3.5 million`, at most five
pub fn extract_amounts(text: &str) -> Vec<String> {
    DOLLAR_AMOUNT
        .find_iter(text)
        .take(5)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Keyword heuristic in `[0.5, 0.95]`
///
/// 0.5 for an empty body. Otherwise each category keyword found in the
/// title or body adds 0.1 (at most 0.4) and each recency word adds 0.05 (at
/// most 0.2).
pub fn relevance_score(title: &str, body: &str, category: SearchCategory) -> f64 {
    if body.trim().is_empty() {
        return RELEVANCE_FLOOR;
    }

    let content = format!("{title} {body}").to_lowercase();
    let keyword_hits = count_present(&content, category.keywords());
    let recency_hits = count_present(&content, &RECENCY_TERMS);

    let score = RELEVANCE_FLOOR
        + (0.1 * keyword_hits as f64).min(0.4)
        + (0.05 * recency_hits as f64).min(0.2);
    score.min(RELEVANCE_CAP)
}

fn count_present(content: &str, terms: &[&str]) -> usize {
    terms.iter().filter(|term| content.contains(*term)).count()
}

fn any_mentions<'a>(summaries: impl IntoIterator<Item = &'a str>, terms: &[&str]) -> bool {
    summaries.into_iter().any(|summary| {
        let lower = summary.to_lowercase();
        terms.iter().any(|term| lower.contains(*term))
    })
}

/// Headline findings for one category's summaries
///
/// Never empty: with no specific signal the category itself is reported.
pub fn aggregate_insights<'a, I>(summaries: I, category: SearchCategory) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let summaries = summaries.into_iter();
    let mut insights = Vec::new();

    match category {
        SearchCategory::EconomicDevelopment => {
            if any_mentions(summaries.clone(), &GROWTH_TERMS) {
                insights.push("Evidence of economic growth in the area".to_string());
            }
            if any_mentions(summaries, &DECLINE_TERMS) {
                insights.push("Potential economic challenges in the area".to_string());
            }
        }
        SearchCategory::HousingMarket => {
            if any_mentions(summaries.clone(), &SHORTAGE_TERMS) {
                insights.push("Indicators of housing shortage in the market".to_string());
            }
            if any_mentions(summaries, &BUILDING_TERMS) {
                insights.push("Active housing development in the area".to_string());
            }
        }
        _ => {}
    }

    if insights.is_empty() {
        insights.push(format!("Information found related to {}", category.label()));
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_url() {
        assert_eq!(source_from_url("https://www.bizjournals.com/austin/news"), "Bizjournals");
        assert_eq!(source_from_url("https://news.KXAN.com/story"), "Kxan");
        assert_eq!(source_from_url("http://localhost:8080/x"), "Localhost");
        assert_eq!(source_from_url(""), "Unknown source");
        assert_eq!(source_from_url("not a url"), "Unknown source");
    }

    #[test]
    fn test_key_points() {
        let points = key_points("Jobs grew 4%. A plant opened. Rents rose. Taxes fell.");
        assert_eq!(points, vec!["Jobs grew 4%.", "A plant opened.", "Rents rose."]);
        assert_eq!(key_points("Single claim"), vec!["Single claim."]);
        assert!(key_points("").is_empty());
    }

    #[test]
    fn test_extract_amounts() {
        let text = "A $450,000 grant and a $3.5 million bond, plus $ 12M and 5000 units.";
        assert_eq!(extract_amounts(text), vec!["$450,000", "$3.5 million", "$ 12M"]);
        assert!(extract_amounts("Population 120,000 and 3.5 million visitors").is_empty());

        let many = "$1 $2 $3 $4 $5 $6 $7";
        assert_eq!(extract_amounts(many).len(), 5);
    }

    #[test]
    fn test_relevance_bounds() {
        let category = SearchCategory::HousingMarket;
        assert!((relevance_score("Housing", "", category) - 0.5).abs() < 1e-9);
        assert!((relevance_score("", "nothing relevant here", category) - 0.5).abs() < 1e-9);

        let two_keywords = relevance_score("", "home rent", category);
        assert!((two_keywords - 0.7).abs() < 1e-9);

        let saturated = relevance_score(
            "Housing home apartment rent mortgage residential",
            "2024 2023 recent new latest update month week",
            category,
        );
        assert!((saturated - RELEVANCE_CAP).abs() < 1e-9);

        for body in ["", "x", "housing 2024", "school crime park"] {
            let score = relevance_score("t", body, SearchCategory::CommunityFactors);
            assert!((RELEVANCE_FLOOR..=RELEVANCE_CAP).contains(&score), "{body}: {score}");
        }
    }

    #[test]
    fn test_aggregate_insights() {
        let economic = aggregate_insights(
            ["Major hiring push downtown", "Factory closing next year"],
            SearchCategory::EconomicDevelopment,
        );
        assert_eq!(
            economic,
            vec![
                "Evidence of economic growth in the area",
                "Potential economic challenges in the area"
            ]
        );

        let housing = aggregate_insights(["New construction starts"], SearchCategory::HousingMarket);
        assert_eq!(housing, vec!["Active housing development in the area"]);

        let fallback = aggregate_insights(["Quiet town"], SearchCategory::GovernmentPolicy);
        assert_eq!(fallback, vec!["Information found related to government policy"]);
    }

    #[test]
    fn test_summarize_is_char_safe() {
        let body = "é".repeat(600);
        assert_eq!(summarize(&body).chars().count(), 500);
    }
}
