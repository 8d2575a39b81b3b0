//! Gemini generateContent responder

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::{
    extract_suggestions, http_client, ChatError, ChatReply, ChatResponder, ChatRole, ChatTurn,
    THERAPEUTIC_PROMPT,
};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const TEMPERATURE: f64 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1000;

pub struct GeminiResponder {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiResponder {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ChatError> {
        Ok(Self {
            http_client: http_client(timeout)?,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ChatResponder for GeminiResponder {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn send(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply, ChatError> {
        let url = format!("{}/models/{}:generateContent", BASE_URL, self.model);
        let body = build_request_body(message, history);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::Api(status.as_u16(), error_text));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        let text = response_text(&data).ok_or(ChatError::EmptyResponse)?;
        debug!(length = text.len(), "Gemini reply received");

        let (reply, suggestions) = extract_suggestions(&text);
        Ok(ChatReply { reply, suggestions })
    }
}

/// Gemini role names, with a leading user turn guaranteed
pub fn format_history(history: &[ChatTurn]) -> Vec<Value> {
    let mut contents = Vec::with_capacity(history.len() + 1);

    if history.first().is_some_and(|turn| turn.role != ChatRole::User) {
        contents.push(json!({ "role": "user", "parts": [{ "text": "Hello" }] }));
    }

    contents.extend(history.iter().map(|turn| {
        let role = if turn.role == ChatRole::User { "user" } else { "model" };
        json!({ "role": role, "parts": [{ "text": turn.content }] })
    }));

    contents
}

pub fn build_request_body(message: &str, history: &[ChatTurn]) -> Value {
    let prompt = if history.is_empty() {
        format!("{}\n\nUser message: {}", THERAPEUTIC_PROMPT, message)
    } else {
        message.to_string()
    };

    let mut contents = format_history(history);
    contents.push(json!({ "role": "user", "parts": [{ "text": prompt }] }));

    json!({
        "contents": contents,
        "generationConfig": {
            "temperature": TEMPERATURE,
            "maxOutputTokens": MAX_OUTPUT_TOKENS,
        },
    })
}

/// Concatenated text parts of the first candidate
fn response_text(data: &Value) -> Option<String> {
    let parts = data
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
