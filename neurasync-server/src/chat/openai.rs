//! OpenAI chat completions responder

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, ChatError, ChatReply, ChatResponder, ChatRole, ChatTurn, THERAPEUTIC_PROMPT};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

const JSON_FORMAT_INSTRUCTION: &str = "Format your response as JSON with 'reply' containing your main message and 'suggestions' as an array of brief, actionable steps.";

pub struct OpenAiResponder {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiResponder {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self, ChatError> {
        Ok(Self {
            http_client: http_client(timeout)?,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl ChatResponder for OpenAiResponder {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn send(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply, ChatError> {
        let body = build_request_body(&self.model, message, history);

        let response = self
            .http_client
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ChatError::Api(status.as_u16(), error_text));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Parse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatError::EmptyResponse)?;

        debug!(length = content.len(), "OpenAI reply received");
        Ok(parse_reply_content(&content))
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn role_name(role: ChatRole) -> &'static str {
    match role {
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
        ChatRole::System => "system",
    }
}

/// System prompt, then history, then the new message
pub fn build_request_body(model: &str, message: &str, history: &[ChatTurn]) -> Value {
    let mut messages = vec![json!({
        "role": "system",
        "content": format!("{}\n\n{}", THERAPEUTIC_PROMPT, JSON_FORMAT_INSTRUCTION),
    })];
    messages.extend(
        history
            .iter()
            .map(|turn| json!({ "role": role_name(turn.role), "content": turn.content })),
    );
    messages.push(json!({ "role": "user", "content": message }));

    json!({
        "model": model,
        "messages": messages,
        "response_format": { "type": "json_object" },
    })
}

/// Parse `{reply, suggestions}` content, keeping raw text when it isn't JSON
pub fn parse_reply_content(content: &str) -> ChatReply {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => {
            let reply = value
                .get("reply")
                .and_then(Value::as_str)
                .unwrap_or(content)
                .to_string();
            let suggestions = value
                .get("suggestions")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            ChatReply { reply, suggestions }
        }
        Err(_) => ChatReply {
            reply: content.to_string(),
            suggestions: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_layout() {
        let history = vec![
            ChatTurn::new(ChatRole::Assistant, "Welcome"),
            ChatTurn::new(ChatRole::User, "I feel tense"),
        ];
        let body = build_request_body("gpt-4o", "Still tense", &history);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["response_format"]["type"], "json_object");

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"].as_str().unwrap().contains("JSON"));
        assert_eq!(messages[1]["role"], "assistant");
        assert_eq!(messages[2]["content"], "I feel tense");
        assert_eq!(messages[3]["role"], "user");
        assert_eq!(messages[3]["content"], "Still tense");
    }

    #[test]
    fn test_json_content_parsed() {
        let reply = parse_reply_content(
            r#"{"reply":"That sounds stressful.","suggestions":["Take a walk","Breathe slowly"]}"#,
        );
        assert_eq!(reply.reply, "That sounds stressful.");
        assert_eq!(reply.suggestions, vec!["Take a walk", "Breathe slowly"]);
    }

    #[test]
    fn test_plain_text_content_kept() {
        let reply = parse_reply_content("Just text, not JSON");
        assert_eq!(reply.reply, "Just text, not JSON");
        assert!(reply.suggestions.is_empty());
    }

    #[test]
    fn test_json_without_suggestions() {
        let reply = parse_reply_content(r#"{"reply":"Hi"}"#);
        assert_eq!(reply.reply, "Hi");
        assert!(reply.suggestions.is_empty());
    }
}
