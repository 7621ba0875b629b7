//! Scripted LLM used by the runtime tests

use agent_llm::{
    CompletionRequest, CompletionResponse, ContentBlock, LLMError, LLMProvider, Message,
    MessageContent, Result, Role, StopReason, TokenUsage,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

pub(crate) struct ScriptedStep(CompletionResponse);

impl ScriptedStep {
    pub(crate) fn reply(text: &str) -> Self {
        Self(CompletionResponse::text(text, TokenUsage::default()))
    }

    pub(crate) fn truncated(text: &str) -> Self {
        let mut response = CompletionResponse::text(text, TokenUsage::default());
        response.stop_reason = StopReason::MaxTokens;
        Self(response)
    }

    pub(crate) fn tool_call(id: &str, name: &str, input: Value) -> Self {
        Self(CompletionResponse {
            message: Message {
                role: Role::Assistant,
                content: Some(MessageContent::Blocks(vec![ContentBlock::ToolUse {
                    id: id.to_string(),
                    name: name.to_string(),
                    input,
                }])),
            },
            stop_reason: StopReason::ToolUse,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        })
    }
}

/// Replays responses in order and records every request
pub(crate) struct ScriptedProvider {
    steps: Mutex<VecDeque<ScriptedStep>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub(crate) fn new(steps: Vec<ScriptedStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        self.steps
            .lock()
            .unwrap()
            .pop_front()
            .map(|step| step.0)
            .ok_or_else(|| LLMError::RequestFailed("script exhausted".into()))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
