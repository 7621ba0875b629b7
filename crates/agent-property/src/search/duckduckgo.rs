//! DuckDuckGo HTML endpoint
//!
//! Uses the JavaScript-free results page, so no API key is needed. Requests
//! are rate limited and identical queries are served from a timed cache.

use super::{SearchHit, SearchProvider};
use crate::cache::{SearchCache, SearchKey};
use crate::error::{PropertyError, Result};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use regex::Regex;
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const DEFAULT_ENDPOINT: &str = "https://html.duckduckgo.com/html/";
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static RESULT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__a"[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("result link pattern is valid")
});
static RESULT_SNIPPET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a[^>]*class="result__snippet"[^>]*>(.*?)</a>"#)
        .expect("result snippet pattern is valid")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

#[derive(Debug, Clone)]
pub struct DuckDuckGoConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub requests_per_minute: u32,
    pub cache_ttl: Duration,
}

impl Default for DuckDuckGoConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(15),
            requests_per_minute: 20,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

/// [`SearchProvider`] backed by html.duckduckgo.com
pub struct DuckDuckGoSearch {
    client: Client,
    endpoint: String,
    rate_limiter: SharedRateLimiter,
    cache: SearchCache,
}

impl DuckDuckGoSearch {
    pub fn new() -> Result<Self> {
        Self::with_config(DuckDuckGoConfig::default())
    }

    pub fn with_config(config: DuckDuckGoConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PropertyError::Config(format!("Failed to build search client: {e}")))?;

        let quota = Quota::per_minute(
            NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN),
        );

        Ok(Self {
            client,
            endpoint: config.endpoint,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            cache: SearchCache::new(config.cache_ttl),
        })
    }

    async fn fetch(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| PropertyError::Search(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(PropertyError::Search(format!(
                "search endpoint returned {}",
                response.status()
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| PropertyError::Search(format!("failed to read results page: {e}")))?;

        let mut hits = parse_results(&html);
        hits.truncate(max_results);
        Ok(hits)
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    #[instrument(skip(self), fields(provider = "duckduckgo"))]
    async fn text(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let hits = self
            .cache
            .get_or_fetch(SearchKey::new(query, max_results), || {
                self.fetch(query, max_results)
            })
            .await?;
        debug!(count = hits.len(), "search returned");
        Ok(hits)
    }
}

/// Extract hits from a results page
///
/// Each `result__a` link starts a hit; the first `result__snippet` before
/// the next link is its body.
pub fn parse_results(html: &str) -> Vec<SearchHit> {
    let links: Vec<_> = RESULT_LINK.captures_iter(html).collect();

    links
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let whole = caps.get(0)?;
            let href = decode_href(caps.get(1)?.as_str());
            let title = clean_text(caps.get(2)?.as_str());
            if href.is_empty() || title.is_empty() {
                return None;
            }

            let end = links
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(html.len(), |m| m.start());
            let body = RESULT_SNIPPET
                .captures(&html[whole.end()..end])
                .and_then(|c| c.get(1))
                .map(|m| clean_text(m.as_str()))
                .unwrap_or_default();

            Some(SearchHit { title, href, body })
        })
        .collect()
}

/// Resolve DuckDuckGo's `/l/?uddg=` redirect to the target URL
fn decode_href(raw: &str) -> String {
    let raw = decode_entities(raw);
    let absolute = if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.clone()
    };

    Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, target)| target.into_owned())
        })
        .unwrap_or(raw)
}

/// Strip tags, decode entities and collapse whitespace
fn clean_text(fragment: &str) -> String {
    let text = TAG.replace_all(fragment, "");
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
