//! Ordered completion strategies
//!
//! A [`FallbackProvider`] holds a prioritized list of providers and returns
//! the first successful completion. The typical chain for a local setup is
//! native Ollama, then Ollama's OpenAI-compatible endpoint.

use crate::{CompletionRequest, CompletionResponse, LLMError, LLMProvider, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Tries each provider in order until one succeeds
pub struct FallbackProvider {
    strategies: Vec<Arc<dyn LLMProvider>>,
    name: String,
}

impl FallbackProvider {
    /// Create a chain; the first provider has the highest priority
    pub fn new(strategies: Vec<Arc<dyn LLMProvider>>) -> Result<Self> {
        if strategies.is_empty() {
            return Err(LLMError::ConfigurationError(
                "fallback chain needs at least one provider".to_string(),
            ));
        }
        let name = format!(
            "fallback({})",
            strategies
                .iter()
                .map(|s| s.name().to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        Ok(Self { strategies, name })
    }

    /// Providers in priority order
    pub fn strategies(&self) -> &[Arc<dyn LLMProvider>] {
        &self.strategies
    }
}

#[async_trait]
impl LLMProvider for FallbackProvider {
    #[instrument(skip(self, request), fields(chain = %self.name))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let mut failures = Vec::with_capacity(self.strategies.len());

        for (position, strategy) in self.strategies.iter().enumerate() {
            match strategy.complete(request.clone()).await {
                Ok(response) => {
                    if position > 0 {
                        info!(provider = strategy.name(), position, "fallback strategy succeeded");
                    }
                    return Ok(response);
                }
                Err(e) => {
                    warn!(provider = strategy.name(), error = %e, "completion strategy failed");
                    failures.push(format!("{}: {e}", strategy.name()));
                }
            }
        }

        Err(LLMError::AllProvidersFailed(failures))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Message, TokenUsage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider with a fixed outcome that counts its calls
    struct Scripted {
        name: &'static str,
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(name: &'static str, reply: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                reply: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LLMProvider for Scripted {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Some(text) => Ok(CompletionResponse::text(text, TokenUsage::default())),
                None => Err(LLMError::RequestFailed("HTTP 500: boom".into())),
            }
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    fn as_dyn(provider: &Arc<Scripted>) -> Arc<dyn LLMProvider> {
        provider.clone()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::builder("llama3")
            .add_message(Message::user("hello"))
            .build()
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(matches!(
            FallbackProvider::new(vec![]),
            Err(LLMError::ConfigurationError(_))
        ));
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let direct = Scripted::ok("ollama", "direct");
        let chat = Scripted::ok("openai-compatible", "chat");
        let chain = FallbackProvider::new(vec![as_dyn(&direct), as_dyn(&chat)]).unwrap();

        let response = chain.complete(request()).await.unwrap();
        assert_eq!(response.message.text().as_deref(), Some("direct"));
        assert_eq!(chain.name(), "fallback(ollama -> openai-compatible)");
        assert_eq!(direct.calls(), 1);
        assert_eq!(chat.calls(), 0);
    }

    #[tokio::test]
    async fn test_falls_through_in_order() {
        let direct = Scripted::failing("ollama");
        let chat = Scripted::ok("openai-compatible", "chat");
        let chain = FallbackProvider::new(vec![as_dyn(&direct), as_dyn(&chat)]).unwrap();

        let response = chain.complete(request()).await.unwrap();
        assert_eq!(response.message.text().as_deref(), Some("chat"));
        assert_eq!(direct.calls(), 1);
        assert_eq!(chat.calls(), 1);
        assert_eq!(chain.strategies().len(), 2);
    }

    #[tokio::test]
    async fn test_all_failing_reports_each() {
        let chain =
            FallbackProvider::new(vec![as_dyn(&Scripted::failing("a")), as_dyn(&Scripted::failing("b"))])
                .unwrap();

        match chain.complete(request()).await {
            Err(LLMError::AllProvidersFailed(failures)) => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].starts_with("a: "));
                assert!(failures[1].starts_with("b: "));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
