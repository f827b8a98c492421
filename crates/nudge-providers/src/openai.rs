//! OpenAI-compatible reply generator.
//!
//! Works with OpenAI's API and any compatible `/chat/completions` endpoint.

use async_trait::async_trait;
use nudge_core::{
    config::GeneratorConfig,
    error::NudgeError,
    message::{ReplyFragmentSet, ReplyIntent},
    traits::ReplyGenerator,
};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Upper bound on fragments sent for one reply.
const MAX_FRAGMENTS: usize = 4;

/// OpenAI-compatible generator.
pub struct OpenAiGenerator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
}

impl OpenAiGenerator {
    /// Create from config values.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Option<Vec<ChatChoice>>,
    pub usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ChatMessage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatUsage {
    pub total_tokens: Option<u64>,
}

/// Build the chat messages for a reply intent.
pub(crate) fn build_messages(system: &str, intent: &ReplyIntent) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: format!(
            "[{}] Reply reason: {}\n{}",
            intent.timestamp.format("%Y-%m-%d %H:%M:%S"),
            intent.reason_text,
            intent.auxiliary_prompt
        ),
    });
    messages
}

/// Split model output into message-sized fragments.
///
/// Each non-empty line becomes one fragment; anything past the cap is folded
/// into the last fragment so no text is lost.
pub(crate) fn split_fragments(text: &str) -> ReplyFragmentSet {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut fragments: Vec<String> = lines
        .iter()
        .take(MAX_FRAGMENTS)
        .map(|l| l.to_string())
        .collect();
    if lines.len() > MAX_FRAGMENTS {
        let tail = lines[MAX_FRAGMENTS..].join(" ");
        if let Some(last) = fragments.last_mut() {
            last.push(' ');
            last.push_str(&tail);
        }
    }
    ReplyFragmentSet::new(fragments)
}

#[async_trait]
impl ReplyGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, intent: &ReplyIntent) -> Result<ReplyFragmentSet, NudgeError> {
        let start = Instant::now();
        let body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: build_messages(&self.system_prompt, intent),
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!("openai: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| NudgeError::Generator(format!("openai request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(NudgeError::Generator(format!(
                "openai returned {status}: {text}"
            )));
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| NudgeError::Generator(format!("openai: failed to parse response: {e}")))?;

        let text = parsed
            .choices
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let fragments = split_fragments(&text);
        if fragments.is_empty() {
            return Err(NudgeError::Generator("openai returned an empty reply".to_string()));
        }

        debug!(
            "openai: {} fragment(s) in {}ms, tokens={:?}",
            fragments.len(),
            start.elapsed().as_millis(),
            parsed.usage.as_ref().and_then(|u| u.total_tokens)
        );
        Ok(fragments)
    }
}
