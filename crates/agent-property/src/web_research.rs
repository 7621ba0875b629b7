//! Per-property web research
//!
//! A coarser companion to the categorized search: one query per
//! [`InfoType`] built from the parcel's address, then the top hit's page is
//! fetched and scanned for a few obvious signals.

use crate::error::{PropertyError, Result};
use crate::record::PropertyRecord;
use crate::search::{SearchHit, SearchProvider, decode_entities};
use chrono::Local;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("script/style pattern is valid")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const RAW_TEXT_CHARS: usize = 500;
const SEARCH_RESULTS: usize = 5;
const KEPT_RESULTS: usize = 3;

/// What aspect of a property a query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoType {
    General,
    Zoning,
    Environmental,
    Market,
    Demographics,
}

impl InfoType {
    pub const ALL: [InfoType; 5] = [
        Self::General,
        Self::Zoning,
        Self::Environmental,
        Self::Market,
        Self::Demographics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Zoning => "zoning",
            Self::Environmental => "environmental",
            Self::Market => "market",
            Self::Demographics => "demographics",
        }
    }

    /// Search query for this aspect of `record`
    pub fn query(self, record: &PropertyRecord) -> String {
        let (address, city, state) = (record.address(), record.city(), record.state());
        match self {
            Self::General => format!("{address} {city} {state} property information"),
            Self::Zoning => format!("{city} {state} zoning map regulations {address}"),
            Self::Environmental => {
                format!("{address} {city} {state} flood zone environmental assessment")
            }
            Self::Market => format!("{city} {state} real estate market trends analysis"),
            Self::Demographics => format!("{city} {state} demographics population statistics income"),
        }
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InfoType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown info type '{}'", s.trim()))
    }
}

/// Signals pulled from page text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedInfo {
    #[serde(rename = "type")]
    pub info_type: InfoType,
    pub source: String,
    pub extracted_data: ExtractedData,
    pub raw_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoning_type: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub population_mentioned: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub income_mentioned: bool,
}

/// Findings for one [`InfoType`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoResearch {
    pub search_results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_information: Option<ExtractedInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output of [`WebResearchTool::research_property`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyResearch {
    pub property: String,
    pub timestamp: String,
    pub categories: BTreeMap<InfoType, InfoResearch>,
}

pub struct WebResearchTool {
    provider: Arc<dyn SearchProvider>,
    client: Client,
}

impl WebResearchTool {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Result<Self> {
        let client = Client::builder()
            .timeout(PAGE_TIMEOUT)
            .build()
            .map_err(|e| PropertyError::Config(format!("Failed to build page client: {e}")))?;
        Ok(Self { provider, client })
    }

    pub async fn search_property_info(
        &self,
        record: &PropertyRecord,
        info_type: InfoType,
    ) -> Result<Vec<SearchHit>> {
        let query = info_type.query(record);
        debug!(%info_type, %query, "property info search");
        self.provider.text(&query, SEARCH_RESULTS).await
    }

    /// Visible text of a page, one non-empty line per source line
    pub async fn fetch_page_content(&self, url: &str) -> Result<String> {
        let url = Url::parse(url).map_err(|e| PropertyError::Search(format!("invalid url '{url}': {e}")))?;

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PropertyError::Search(format!(
                "page returned {}",
                response.status()
            )));
        }
        Ok(page_text(&response.text().await?))
    }

    /// Every [`InfoType`] for one record
    ///
    /// Search failures are recorded per type. When the top page cannot be
    /// fetched the hit's snippet is scanned instead.
    pub async fn research_property(&self, record: &PropertyRecord) -> PropertyResearch {
        let mut categories = BTreeMap::new();

        for info_type in InfoType::ALL {
            info!(%info_type, property = %record.stock_number(), "researching");

            let hits = match self.search_property_info(record, info_type).await {
                Ok(hits) => hits,
                Err(e) => {
                    warn!(%info_type, error = %e, "property info search failed");
                    Vec::new()
                }
            };

            let entry = match hits.first() {
                Some(top) => {
                    let content = match self.fetch_page_content(&top.href).await {
                        Ok(text) if !text.is_empty() => text,
                        Ok(_) => top.body.clone(),
                        Err(e) => {
                            debug!(url = %top.href, error = %e, "page fetch failed, using snippet");
                            top.body.clone()
                        }
                    };
                    InfoResearch {
                        extracted_information: Some(extract_key_information(&content, info_type)),
                        search_results: hits.into_iter().take(KEPT_RESULTS).collect(),
                        error: None,
                    }
                }
                None => InfoResearch {
                    search_results: Vec::new(),
                    extracted_information: None,
                    error: Some("No results found".to_string()),
                },
            };
            categories.insert(info_type, entry);
        }

        PropertyResearch {
            property: record.display_location(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            categories,
        }
    }
}

/// Strip scripts, styles and tags from HTML
pub fn page_text(html: &str) -> String {
    let without_code = SCRIPT_OR_STYLE.replace_all(html, " ");
    let text = decode_entities(&TAG.replace_all(&without_code, " "));

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pattern scan of page text for the signals relevant to `info_type`
pub fn extract_key_information(content: &str, info_type: InfoType) -> ExtractedInfo {
    let lower = content.to_lowercase();
    let mut data = ExtractedData::default();

    match info_type {
        InfoType::Zoning => {
            if content.contains("R-1") || lower.contains("residential") {
                data.zoning_type = Some("Residential".to_string());
            } else if content.contains("C-") || lower.contains("commercial") {
                data.zoning_type = Some("Commercial".to_string());
            }
        }
        InfoType::Demographics => {
            data.population_mentioned = lower.contains("population");
            data.income_mentioned = lower.contains("median income");
        }
        _ => {}
    }

    let raw_text = if content.chars().count() > RAW_TEXT_CHARS {
        format!("{}...", content.chars().take(RAW_TEXT_CHARS).collect::<String>())
    } else {
        content.to_string()
    };

    ExtractedInfo {
        info_type,
        source: "web extraction".to_string(),
        extracted_data: data,
        raw_text,
    }
}
