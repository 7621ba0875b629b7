//! Model and search provider selection

use agent_llm::LLMProvider;
use agent_llm::providers::ollama::model_installed;
use agent_llm::providers::{
    FallbackProvider, MockProvider, OllamaConfig, OllamaProvider, OpenAICompatibleConfig,
    OpenAICompatibleProvider,
};
use agent_property::PropertyConfig;
use agent_property::search::{DuckDuckGoConfig, DuckDuckGoSearch, SearchProvider};
use anyhow::{Context as _, Result, bail};
use std::sync::Arc;
use tracing::{info, warn};

/// The model provider plus the model name agents should request
pub struct ModelChoice {
    pub provider: Arc<dyn LLMProvider>,
    pub model: String,
}

/// Mock model, or native Ollama with its OpenAI-compatible endpoint as fallback
///
/// Requests that carry tools go to the OpenAI-compatible endpoint, since
/// `/api/generate` has no function calling. Fails when the Ollama server
/// does not answer.
pub async fn select_model(config: &PropertyConfig) -> Result<ModelChoice> {
    if config.use_mock {
        info!("using mock model");
        return Ok(ModelChoice {
            provider: Arc::new(MockProvider::new()),
            model: "mock".to_string(),
        });
    }

    let ollama_config = OllamaConfig::from_env();
    let ollama = OllamaProvider::with_config(ollama_config.clone())
        .context("failed to create the Ollama client")?;
    if !ollama.check_available().await {
        bail!(
            "Ollama is not running at {}. Start it with `ollama serve`, or pass --mock",
            ollama_config.base_url
        );
    }
    match ollama.ensure_model().await {
        Ok(true) => info!(model = %ollama_config.model, "model pulled"),
        Ok(false) => {}
        Err(e) => warn!(model = %ollama_config.model, error = %e, "could not verify model"),
    }

    let compatible = OpenAICompatibleProvider::with_config(
        OpenAICompatibleConfig::new(ollama_config.openai_compatible_base())
            .with_model(ollama_config.model.clone())
            .with_timeout(ollama_config.timeout_secs),
    )
    .context("failed to create the OpenAI-compatible client")?;

    let chain = FallbackProvider::new(vec![Arc::new(ollama), Arc::new(compatible)])
        .context("failed to build the provider chain")?;
    Ok(ModelChoice {
        provider: Arc::new(chain),
        model: ollama_config.model,
    })
}

/// DuckDuckGo search with the configured rate limit and cache lifetime
pub fn web_search(config: &PropertyConfig) -> Result<Arc<dyn SearchProvider>> {
    let search = DuckDuckGoSearch::with_config(DuckDuckGoConfig {
        requests_per_minute: config.search_requests_per_minute,
        cache_ttl: config.search_cache_ttl,
        ..DuckDuckGoConfig::default()
    })
    .context("failed to create the search client")?;
    Ok(Arc::new(search))
}

/// Ollama reachability and installed models, as printed by `--check-ollama`
pub async fn ollama_status() -> Result<String> {
    let config = OllamaConfig::from_env();
    let ollama = OllamaProvider::with_config(config.clone())?;

    if !ollama.check_available().await {
        return Ok(format!(
            "Ollama is not reachable at {}\nStart it with `ollama serve`.",
            config.base_url
        ));
    }

    let models = ollama.list_models().await?;
    let installed = model_installed(&models, &config.model);
    Ok(format!(
        "Ollama is running at {}\nInstalled models: {}\nConfigured model {}: {}",
        config.base_url,
        if models.is_empty() { "none".to_string() } else { models.join(", ") },
        config.model,
        if installed { "installed" } else { "missing (pulled on first analysis)" },
    ))
}
