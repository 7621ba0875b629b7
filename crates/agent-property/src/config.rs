//! Configuration for property research operations

use crate::error::{PropertyError, Result};
use agent_utils::config::{env_flag, env_or, env_string};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the property research crew
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyConfig {
    /// CSV dataset of parcels
    pub data_path: PathBuf,

    /// Root directory for reports and charts
    pub output_dir: PathBuf,

    /// Use the canned mock model instead of a model server
    pub use_mock: bool,

    /// Hits requested per search query
    pub max_results_per_query: usize,

    /// Phrases tried per category and specificity tier
    pub max_queries: usize,

    /// How long search results stay cached
    pub search_cache_ttl: Duration,

    /// Search requests allowed per minute
    pub search_requests_per_minute: u32,

    /// Executor iterations for tool-using agents
    pub max_iterations: usize,

    pub max_tokens: usize,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/master.csv"),
            output_dir: PathBuf::from("outputs"),
            use_mock: true,
            max_results_per_query: 3,
            max_queries: 3,
            search_cache_ttl: Duration::from_secs(3600),
            search_requests_per_minute: 20,
            max_iterations: 10,
            max_tokens: 4096,
        }
    }
}

impl PropertyConfig {
    /// Create a new configuration builder
    pub fn builder() -> PropertyConfigBuilder {
        PropertyConfigBuilder::default()
    }

    /// Defaults overridden by `PROPERTY_DATA_PATH`, `PROPERTY_OUTPUT_DIR`,
    /// `USE_MOCK_LLM`, `SEARCH_MAX_RESULTS`, `SEARCH_MAX_QUERIES`,
    /// `SEARCH_CACHE_TTL`, `SEARCH_RATE_PER_MINUTE`, `AGENT_MAX_ITERATIONS`
    /// and `AGENT_MAX_TOKENS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_path: env_string("PROPERTY_DATA_PATH").map_or(defaults.data_path, PathBuf::from),
            output_dir: env_string("PROPERTY_OUTPUT_DIR").map_or(defaults.output_dir, PathBuf::from),
            use_mock: env_flag("USE_MOCK_LLM", defaults.use_mock),
            max_results_per_query: env_or("SEARCH_MAX_RESULTS", defaults.max_results_per_query),
            max_queries: env_or("SEARCH_MAX_QUERIES", defaults.max_queries),
            search_cache_ttl: Duration::from_secs(env_or(
                "SEARCH_CACHE_TTL",
                defaults.search_cache_ttl.as_secs(),
            )),
            search_requests_per_minute: env_or(
                "SEARCH_RATE_PER_MINUTE",
                defaults.search_requests_per_minute,
            ),
            max_iterations: env_or("AGENT_MAX_ITERATIONS", defaults.max_iterations),
            max_tokens: env_or("AGENT_MAX_TOKENS", defaults.max_tokens),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_results_per_query == 0 {
            return Err(PropertyError::Config(
                "max_results_per_query must be greater than 0".to_string(),
            ));
        }
        if self.max_queries == 0 {
            return Err(PropertyError::Config(
                "max_queries must be greater than 0".to_string(),
            ));
        }
        if self.search_requests_per_minute == 0 {
            return Err(PropertyError::Config(
                "search_requests_per_minute must be greater than 0".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(PropertyError::Config(
                "max_iterations must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// `<output_dir>/reports`
    pub fn reports_dir(&self) -> PathBuf {
        self.output_dir.join("reports")
    }

    /// `<output_dir>/charts`
    pub fn charts_dir(&self) -> PathBuf {
        self.output_dir.join("charts")
    }
}

/// Builder for PropertyConfig
#[derive(Debug, Default)]
pub struct PropertyConfigBuilder {
    data_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    use_mock: Option<bool>,
    max_results_per_query: Option<usize>,
    max_queries: Option<usize>,
    search_cache_ttl: Option<Duration>,
    search_requests_per_minute: Option<u32>,
    max_iterations: Option<usize>,
    max_tokens: Option<usize>,
}

impl PropertyConfigBuilder {
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn use_mock(mut self, enabled: bool) -> Self {
        self.use_mock = Some(enabled);
        self
    }

    pub fn max_results_per_query(mut self, max: usize) -> Self {
        self.max_results_per_query = Some(max);
        self
    }

    pub fn max_queries(mut self, max: usize) -> Self {
        self.max_queries = Some(max);
        self
    }

    pub fn search_cache_ttl(mut self, ttl: Duration) -> Self {
        self.search_cache_ttl = Some(ttl);
        self
    }

    pub fn search_requests_per_minute(mut self, rate: u32) -> Self {
        self.search_requests_per_minute = Some(rate);
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    pub fn max_tokens(mut self, max: usize) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<PropertyConfig> {
        let defaults = PropertyConfig::default();
        let config = PropertyConfig {
            data_path: self.data_path.unwrap_or(defaults.data_path),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            use_mock: self.use_mock.unwrap_or(defaults.use_mock),
            max_results_per_query: self
                .max_results_per_query
                .unwrap_or(defaults.max_results_per_query),
            max_queries: self.max_queries.unwrap_or(defaults.max_queries),
            search_cache_ttl: self.search_cache_ttl.unwrap_or(defaults.search_cache_ttl),
            search_requests_per_minute: self
                .search_requests_per_minute
                .unwrap_or(defaults.search_requests_per_minute),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
        };

        config.validate()?;
        Ok(config)
    }
}
