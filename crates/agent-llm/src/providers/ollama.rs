//! Ollama provider implementation
//!
//! Talks to the native Ollama HTTP API:
//!
//! - `POST /api/generate` for completions (non-streaming)
//! - `GET /api/tags` to check the server and list installed models
//! - `POST /api/pull` to fetch a missing model
//!
//! The generate endpoint takes a single prompt, so a conversation is
//! flattened into `User:` / `Assistant:` turns with the system message sent
//! separately. It has no function calling: requests that carry tool
//! definitions are refused with [`LLMError::Unsupported`] so a
//! [`FallbackProvider`](super::FallbackProvider) hands them to the
//! OpenAI-compatible endpoint.

use crate::{
    CompletionRequest, CompletionResponse, LLMError, LLMProvider, Message, Result, Role,
    StopReason, TokenUsage,
};
use agent_utils::{env_or, env_string};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const DEFAULT_MODEL: &str = "llama3";
const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_RETRY_COUNT: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
const PULL_TIMEOUT_SECS: u64 = 300;
const PROBE_TIMEOUT_SECS: u64 = 2;

/// Connection and sampling settings for a local Ollama server
///
/// Built once and passed to [`OllamaProvider::with_config`]; nothing reads
/// the environment after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Model name as known to Ollama (default: `llama3`)
    pub model: String,
    /// Server root without trailing slash (default: `http://localhost:11434`)
    pub base_url: String,
    pub temperature: f32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Total attempts per completion, at least one
    pub retry_count: u32,
    /// Pause between attempts
    pub retry_delay: Duration,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl OllamaConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Read `OLLAMA_MODEL`, `OLLAMA_API_BASE`, `CREW_TEMPERATURE`,
    /// `OLLAMA_TIMEOUT`, `OLLAMA_RETRY_COUNT` and `OLLAMA_RETRY_DELAY`
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            model: env_string("OLLAMA_MODEL").unwrap_or(defaults.model),
            base_url: env_string("OLLAMA_API_BASE").unwrap_or(defaults.base_url),
            temperature: env_or("CREW_TEMPERATURE", defaults.temperature),
            timeout_secs: env_or("OLLAMA_TIMEOUT", defaults.timeout_secs),
            retry_count: env_or("OLLAMA_RETRY_COUNT", defaults.retry_count),
            retry_delay: Duration::from_secs(env_or("OLLAMA_RETRY_DELAY", DEFAULT_RETRY_DELAY_SECS)),
        }
        .normalized()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.normalized()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_retries(mut self, retry_count: u32, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self.normalized()
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        self.retry_count = self.retry_count.max(1);
        self
    }

    /// Base URL of Ollama's OpenAI-compatible API
    pub fn openai_compatible_base(&self) -> String {
        format!("{}/v1", self.base_url)
    }
}

/// Native Ollama completion strategy
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

impl OllamaProvider {
    pub fn with_config(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::with_config(OllamaConfig::from_env())
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Whether the server answers `/api/tags` within two seconds
    pub async fn check_available(&self) -> bool {
        let probe = self
            .client
            .get(format!("{}/api/tags", self.config.base_url))
            .timeout(Duration::from_secs(PROBE_TIMEOUT_SECS))
            .send()
            .await;

        matches!(probe, Ok(response) if response.status().is_success())
    }

    /// Names of the models installed on the server
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.config.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            LLMError::ServiceUnavailable {
                url: self.config.base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(LLMError::RequestFailed(format!(
                "HTTP {} listing models",
                response.status()
            )));
        }

        let tags: TagsResponse = response.json().await.map_err(|e| {
            LLMError::UnexpectedResponse(format!("Failed to parse model list: {e}"))
        })?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Make sure the configured model is installed, pulling it if needed
    ///
    /// Returns `true` when a pull was performed.
    pub async fn ensure_model(&self) -> Result<bool> {
        let models = self.list_models().await?;
        if model_installed(&models, &self.config.model) {
            debug!(model = %self.config.model, "model available");
            return Ok(false);
        }

        warn!(
            model = %self.config.model,
            available = %models.join(", "),
            "model not installed, pulling"
        );
        let response = self
            .client
            .post(format!("{}/api/pull", self.config.base_url))
            .timeout(Duration::from_secs(PULL_TIMEOUT_SECS))
            .json(&PullRequest {
                name: &self.config.model,
                stream: false,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LLMError::ModelNotFound(format!(
                "{} (pull failed with HTTP {})",
                self.config.model,
                response.status()
            )));
        }

        info!(model = %self.config.model, "model pulled");
        Ok(true)
    }

    async fn generate_once(&self, body: &GenerateRequest<'_>) -> Result<GenerateResponse> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.config.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                404 => LLMError::ModelNotFound(body.model.to_string()),
                400 => LLMError::InvalidRequest(error_text),
                _ => LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        }

        response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl LLMProvider for OllamaProvider {
    #[instrument(skip(self, request), fields(model = %self.config.model, base_url = %self.config.base_url))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        if request.tools.is_some() {
            return Err(LLMError::Unsupported {
                provider: "ollama /api/generate",
                feature: "tool definitions",
            });
        }

        let (prompt, message_system) = format_prompt(&request.messages);
        let system = request.system.clone().or(message_system);
        let body = GenerateRequest {
            model: &self.config.model,
            prompt: &prompt,
            system: system.as_deref(),
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature.unwrap_or(self.config.temperature),
                num_predict: request.max_tokens,
                stop: request.stop_sequences.as_deref(),
            },
        };

        let attempts = self.config.retry_count;
        let mut last_error = None;
        for attempt in 1..=attempts {
            match self.generate_once(&body).await {
                Ok(generated) => {
                    debug!(
                        attempt,
                        done_reason = generated.done_reason.as_deref().unwrap_or("stop"),
                        "generate finished"
                    );
                    return Ok(generated.into_completion());
                }
                Err(e) if attempt < attempts && e.is_retryable() => {
                    warn!(attempt, attempts, error = %e, "ollama request failed, retrying");
                    tokio::time::sleep(self.config.retry_delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LLMError::RequestFailed("no attempts were made".to_string())
        }))
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

/// Flatten a conversation into a single generate prompt
///
/// Returns the prompt and the last system message, if any. Messages without
/// text (bare tool calls) are left out. The prompt always ends with
/// `"Assistant: "` so the model continues as the assistant.
pub fn format_prompt(messages: &[Message]) -> (String, Option<String>) {
    let mut prompt = String::new();
    let mut system = None;

    for message in messages {
        let Some(content) = message.text() else {
            continue;
        };
        if message.role == Role::System {
            system = Some(content);
            continue;
        }
        prompt.push_str(message.role.label());
        prompt.push_str(": ");
        prompt.push_str(&content);
        prompt.push_str("\n\n");
    }

    prompt.push_str("Assistant: ");
    (prompt, system)
}

/// Ollama reports tags like `llama3:latest`; a bare name matches its `latest` tag
pub fn model_installed(installed: &[String], model: &str) -> bool {
    installed
        .iter()
        .any(|name| name == model || name.strip_suffix(":latest") == Some(model))
}

// ============================================================================
// Ollama wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    options: GenerateOptions<'a>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions<'a> {
    temperature: f32,
    num_predict: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a [String]>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl GenerateResponse {
    fn into_completion(self) -> CompletionResponse {
        let stop_reason = match self.done_reason.as_deref() {
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        };
        CompletionResponse {
            message: Message::assistant(self.response),
            stop_reason,
            usage: TokenUsage {
                input_tokens: self.prompt_eval_count,
                output_tokens: self.eval_count,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    name: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FallbackProvider;
    use crate::{ContentBlock, MessageContent, ToolDefinition};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Read one HTTP request: headers plus a `Content-Length` body
    async fn read_request(socket: &mut TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                return;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let body_len = text[..header_end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + body_len {
                return;
            }
        }
    }

    /// Local server answering every request with `status` and `body`
    ///
    /// Returns the base URL and a counter of requests served.
    async fn stub_server(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                read_request(&mut socket).await;
                counter.fetch_add(1, Ordering::SeqCst);
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn provider_for(base_url: &str) -> OllamaProvider {
        let config = OllamaConfig::default()
            .with_base_url(base_url)
            .with_timeout(5)
            .with_retries(3, Duration::ZERO);
        OllamaProvider::with_config(config).unwrap()
    }

    fn hello() -> CompletionRequest {
        CompletionRequest::builder("llama3")
            .add_message(Message::user("hello"))
            .build()
    }

    fn research_request() -> CompletionRequest {
        CompletionRequest::builder("llama3")
            .add_message(Message::user("research parcel 12345"))
            .tools(vec![ToolDefinition::new(
                "categorized_search",
                "Location-aware news search",
                json!({"type": "object", "properties": {"stock_number": {"type": "string"}}}),
            )])
            .build()
    }

    /// Records every request it is given and answers with fixed text
    struct Recorder {
        requests: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LLMProvider for Recorder {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            self.requests.lock().unwrap().push(request);
            Ok(CompletionResponse::text("searched", TokenUsage::default()))
        }

        fn name(&self) -> &'static str {
            "openai-compatible"
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.base_url, "http://localhost:11434");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.timeout_secs, 120);
        assert_eq!(config.retry_count, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_config_builder_normalizes() {
        let config = OllamaConfig::new("mistral")
            .with_base_url("http://gpu-box:11434/")
            .with_retries(0, Duration::ZERO)
            .with_timeout(30)
            .with_temperature(0.2);

        assert_eq!(config.model, "mistral");
        assert_eq!(config.base_url, "http://gpu-box:11434");
        assert_eq!(config.retry_count, 1);
        assert_eq!(config.openai_compatible_base(), "http://gpu-box:11434/v1");
    }

    #[test]
    fn test_format_prompt() {
        let messages = vec![
            Message::system("You are a Property Data Analyst"),
            Message::user("Describe parcel 12345"),
            Message::assistant("It is 1.5 acres."),
            Message::user("Zoning?"),
        ];

        let (prompt, system) = format_prompt(&messages);
        assert_eq!(system.as_deref(), Some("You are a Property Data Analyst"));
        assert_eq!(
            prompt,
            "User: Describe parcel 12345\n\nAssistant: It is 1.5 acres.\n\nUser: Zoning?\n\nAssistant: "
        );
    }

    #[test]
    fn test_format_prompt_empty() {
        let (prompt, system) = format_prompt(&[]);
        assert_eq!(prompt, "Assistant: ");
        assert!(system.is_none());
    }

    #[test]
    fn test_model_installed_matches_latest_tag() {
        let installed = vec!["llama3:latest".to_string(), "mistral:7b".to_string()];
        assert!(model_installed(&installed, "llama3"));
        assert!(model_installed(&installed, "mistral:7b"));
        assert!(!model_installed(&installed, "mistral"));
    }

    #[test]
    fn test_generate_response_mapping() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"model":"llama3","response":"Zoned R1.","done":true,"done_reason":"length","prompt_eval_count":12,"eval_count":3}"#,
        )
        .unwrap();
        let completion = parsed.into_completion();
        assert_eq!(completion.message.text().as_deref(), Some("Zoned R1."));
        assert_eq!(completion.stop_reason, StopReason::MaxTokens);
        assert_eq!(completion.usage.total(), 15);
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_after_retries() {
        let config = OllamaConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(2)
            .with_retries(2, Duration::ZERO);
        let provider = OllamaProvider::with_config(config).unwrap();

        assert!(!provider.check_available().await);

        let request = CompletionRequest::builder("llama3")
            .add_message(Message::user("hello"))
            .build();
        assert!(provider.complete(request).await.is_err());
        assert!(matches!(
            provider.list_models().await,
            Err(LLMError::ServiceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_error_status_is_retried() {
        let (base_url, hits) = stub_server("404 Not Found", r#"{"error":"model not found"}"#).await;

        let result = provider_for(&base_url).complete(hello()).await;
        assert!(matches!(result, Err(LLMError::ModelNotFound(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_unparsable_body_is_retried() {
        let (base_url, hits) = stub_server("200 OK", "not json").await;

        let result = provider_for(&base_url).complete(hello()).await;
        assert!(matches!(result, Err(LLMError::UnexpectedResponse(_))));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_generate_success() {
        let (base_url, hits) = stub_server(
            "200 OK",
            r#"{"model":"llama3","response":"Zoned C-2.","done":true,"done_reason":"stop","prompt_eval_count":5,"eval_count":4}"#,
        )
        .await;

        let response = provider_for(&base_url).complete(hello()).await.unwrap();
        assert_eq!(response.message.text().as_deref(), Some("Zoned C-2."));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tool_requests_are_refused() {
        let (base_url, hits) = stub_server("200 OK", r#"{"response":"ignored"}"#).await;

        let result = provider_for(&base_url).complete(research_request()).await;
        assert!(matches!(result, Err(LLMError::Unsupported { .. })));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tool_requests_reach_next_strategy() {
        let (base_url, hits) = stub_server("200 OK", r#"{"response":"no tools here"}"#).await;
        let recorder = Arc::new(Recorder {
            requests: Mutex::new(Vec::new()),
        });
        let direct: Arc<dyn LLMProvider> = Arc::new(provider_for(&base_url));
        let chat: Arc<dyn LLMProvider> = recorder.clone();
        let chain = FallbackProvider::new(vec![direct, chat]).unwrap();

        let response = chain.complete(research_request()).await.unwrap();
        assert_eq!(response.message.text().as_deref(), Some("searched"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        let seen = recorder.requests.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let tools = seen[0].tools.as_ref().unwrap();
        assert_eq!(tools[0].name, "categorized_search");
    }

    #[test]
    fn test_format_prompt_skips_bare_tool_calls() {
        let tool_call = Message {
            role: Role::Assistant,
            content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "property_lookup".to_string(),
                input: json!({"stock_number": "12345"}),
            }])),
        };
        let messages = vec![
            Message::user("Describe parcel 12345"),
            tool_call,
            Message::tool_result("call_1".to_string(), "1.5 acres in Batavia".to_string()),
        ];

        let (prompt, _) = format_prompt(&messages);
        assert_eq!(
            prompt,
            "User: Describe parcel 12345\n\nUser: 1.5 acres in Batavia\n\nAssistant: "
        );
    }
}
