// src/core/completion.rs
//! Completion client boundary: role-tagged messages in, schema-validated
//! JSON out. The expected response shape is a per-call type parameter, so
//! no agent carries mutable response-schema state between calls.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info};

use crate::config::{CompletionConfig, ModelSettings};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// One request/response exchange with a text-generation service. Returns the
/// parsed JSON object; a response that is not valid JSON is a call failure.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<serde_json::Value>;
}

/// Issue a completion call and validate the response against `T`. A response
/// that fails validation is a call failure, never a partial success.
pub async fn request<T: DeserializeOwned>(
    backend: &dyn Completion,
    model: &str,
    messages: &[ChatMessage],
) -> Result<T> {
    let value = backend.complete(model, messages).await?;
    serde_json::from_value(value).context("Completion response failed schema validation")
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// HTTP completion client speaking the chat-completions protocol. Always
/// requests a JSON-object-shaped response.
pub struct CompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    temperature: f64,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig, settings: &ModelSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        })
    }
}

#[async_trait]
impl Completion for CompletionClient {
    async fn complete(&self, model: &str, messages: &[ChatMessage]) -> Result<serde_json::Value> {
        let url = format!("{}/chat/completions", self.base_url);
        let payload = serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "response_format": {"type": "json_object"},
        });

        debug!("Starting completion call to model: {}", model);
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("Failed to send completion request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read completion response body")?;

        if !status.is_success() {
            error!("Completion endpoint returned {}: {}", status, body);
            anyhow::bail!("Completion endpoint returned {}: {}", status, body);
        }

        info!(
            "Completion call finished in {:.2} seconds",
            started.elapsed().as_secs_f64()
        );

        let completion: ChatCompletionResponse =
            serde_json::from_str(&body).context("Failed to parse completion envelope")?;
        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .context("Completion response contained no choices")?;

        let content = strip_code_fences(content);
        debug!("Raw completion content: {}", content);

        serde_json::from_str(content).context("Completion content is not a JSON object")
    }
}

/// Strip Markdown code-fence markers some models wrap around JSON content.
fn strip_code_fences(content: &str) -> &str {
    let content = content.trim();
    if !content.starts_with("```") {
        return content;
    }

    let inner = match content.split_once('\n') {
        Some((_, rest)) => rest,
        None => return content,
    };
    match inner.rfind("```") {
        Some(idx) => inner[..idx].trim(),
        None => inner.trim(),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences_plain_content() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_json_block() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_code_fences_bare_block() {
        let fenced = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"a\": 1}");
    }

    #[tokio::test]
    async fn test_request_rejects_schema_mismatch() {
        use script::ScriptedCompletion;

        #[derive(serde::Deserialize)]
        struct Expected {
            #[allow(dead_code)]
            summary: String,
        }

        let backend =
            ScriptedCompletion::new(vec![Ok(serde_json::json!({"unexpected": true}))]);
        let result: Result<Expected> =
            request(&backend, "test-model", &[ChatMessage::user("hi")]).await;
        assert!(result.is_err());
    }
}
