//! Blocking chat-completions client for OpenAI-compatible endpoints (Groq).
//!
//! The pipeline is synchronous and page-at-a-time, so the client uses
//! reqwest's blocking API. Responses from hosted providers vary in shape;
//! content extraction tolerates the common variants (`message.content`,
//! `text`, streaming `delta.content`, and a `messages` array fallback).

use crate::core::{FillResult, FormFillError, LlmConfig};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// One chat message.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// "system" or "user".
    pub role: String,
    /// Message body.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: String,
}

/// HTTP client for the configured chat-completions endpoint.
#[derive(Debug)]
pub struct LlmClient {
    client: reqwest::blocking::Client,
    config: LlmConfig,
    api_key: String,
}

impl LlmClient {
    /// Creates a client, resolving the API key from config or environment.
    ///
    /// # Errors
    ///
    /// Returns `FormFillError::ConfigError` when no API key is available.
    pub fn new(config: LlmConfig) -> FillResult<Self> {
        let api_key = config.resolve_api_key()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Sends a chat request and returns the assistant's content string.
    ///
    /// `json_mode` asks the provider for a JSON object response; providers
    /// that ignore the hint are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `FormFillError::Llm` for non-success statuses and
    /// `FormFillError::InvalidResponse` when no content can be extracted
    /// from the response body.
    pub fn chat(&self, messages: &[ChatMessage], json_mode: bool) -> FillResult<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            response_format: json_mode.then(|| ResponseFormat {
                r#type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(&self.config.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let preview: String = body.chars().take(500).collect();
            return Err(FormFillError::llm(format!("status {}: {}", status, preview)));
        }

        let body: Value = response.json()?;
        debug!("LLM response keys: {:?}", body.as_object().map(|o| o.keys().collect::<Vec<_>>()));

        extract_content(&body).ok_or_else(|| {
            FormFillError::invalid_response("no content found in any choice of the response")
        })
    }
}

/// Pulls the assistant content out of a chat-completions response body,
/// tolerating the shapes different providers emit.
pub fn extract_content(response: &Value) -> Option<String> {
    let first = response.get("choices")?.as_array()?.first()?;

    let non_blank = |v: &Value| {
        v.as_str()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    };

    if let Some(content) = first
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(|c| non_blank(c))
    {
        return Some(content);
    }
    if let Some(content) = first.get("text").and_then(|c| non_blank(c)) {
        return Some(content);
    }
    if let Some(content) = first
        .get("delta")
        .and_then(|d| d.get("content"))
        .and_then(|c| non_blank(c))
    {
        return Some(content);
    }
    if let Some(messages) = first.get("messages").and_then(Value::as_array) {
        for message in messages {
            if let Some(content) = message.get("content").and_then(|c| non_blank(c)) {
                return Some(content);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_content_message_shape() {
        let body = json!({"choices": [{"message": {"content": "{\"name\": \"A\"}"}}]});
        assert_eq!(extract_content(&body).as_deref(), Some("{\"name\": \"A\"}"));
    }

    #[test]
    fn test_extract_content_text_and_delta_shapes() {
        let body = json!({"choices": [{"text": "plain"}]});
        assert_eq!(extract_content(&body).as_deref(), Some("plain"));

        let body = json!({"choices": [{"delta": {"content": "stream"}}]});
        assert_eq!(extract_content(&body).as_deref(), Some("stream"));
    }

    #[test]
    fn test_extract_content_skips_blank_and_missing() {
        let body = json!({"choices": [{"message": {"content": "   "}, "text": "fallback"}]});
        assert_eq!(extract_content(&body).as_deref(), Some("fallback"));

        let body = json!({"choices": []});
        assert_eq!(extract_content(&body), None);

        let body = json!({"error": "rate limited"});
        assert_eq!(extract_content(&body), None);
    }

    #[test]
    fn test_chat_request_serialization() {
        let messages = vec![ChatMessage::user("hello")];
        let request = ChatRequest {
            model: "m",
            messages: &messages,
            temperature: 0.0,
            max_tokens: 64,
            response_format: Some(ResponseFormat {
                r#type: "json_object".to_string(),
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["response_format"]["type"], "json_object");
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
