//! Chat responders for the therapy assistant
//!
//! A responder turns a user message plus prior conversation into a reply
//! with optional suggestions. Hosted models are used when configured; the
//! scripted responder works offline.

mod gemini;
mod openai;
mod scripted;
mod suggestions;

pub use gemini::GeminiResponder;
pub use openai::OpenAiResponder;
pub use scripted::ScriptedResponder;
pub use suggestions::extract_suggestions;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use neurasync_common::config::{ChatConfig, ChatProviderKind};
use neurasync_common::models::{Message, Sender};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

const USER_AGENT: &str = concat!("neurasync/", env!("CARGO_PKG_VERSION"));

pub(crate) const THERAPEUTIC_PROMPT: &str = "\
You are a supportive and empathetic therapeutic assistant for Neurasync, a mental wellness platform.

Respond with a warm, compassionate tone that encourages growth and self-reflection.
Your responses should:
- Be supportive and non-judgmental
- Acknowledge emotions and validate feelings
- Offer practical coping strategies when relevant
- Ask thoughtful questions that promote self-reflection when appropriate

Keep responses concise (under 150 words) but warm and helpful.
Include 2-4 practical suggestions when appropriate.
Never claim to be a licensed therapist or provide medical advice, and do not diagnose conditions.";

const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble processing your message right now. Could you try again?";
const FALLBACK_SUGGESTIONS: [&str; 2] = [
    "Try refreshing the page",
    "Contact support if the problem persists",
];

/// Role of a turn in the conversation history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn from_message(message: &Message) -> Self {
        let role = match message.sender {
            Sender::User => ChatRole::User,
            Sender::Ai => ChatRole::Assistant,
        };
        Self::new(role, message.content.clone())
    }
}

/// Assistant reply with follow-up suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ChatReply {
    /// Reply shown when the responder could not answer
    pub fn unavailable() -> Self {
        Self {
            reply: FALLBACK_REPLY.to_string(),
            suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response from chat provider")]
    EmptyResponse,
}

#[async_trait]
pub trait ChatResponder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Answer `message` given the earlier conversation, oldest turn first
    async fn send(&self, message: &str, history: &[ChatTurn]) -> Result<ChatReply, ChatError>;
}

/// Ask the responder, substituting the fallback reply on any error
pub async fn respond_or_fallback(
    responder: &dyn ChatResponder,
    message: &str,
    history: &[ChatTurn],
) -> ChatReply {
    match responder.send(message, history).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(provider = responder.name(), error = %e, "Chat responder failed, using fallback reply");
            ChatReply::unavailable()
        }
    }
}

/// Select the responder named in the chat config
///
/// A hosted provider without an API key degrades to the scripted responder.
pub fn responder_from_config(config: &ChatConfig) -> Result<Arc<dyn ChatResponder>, ChatError> {
    let timeout = Duration::from_secs(config.timeout_secs.max(1));

    let responder: Arc<dyn ChatResponder> = match config.provider {
        ChatProviderKind::OpenAi => match &config.openai_api_key {
            Some(key) => Arc::new(OpenAiResponder::new(
                key.clone(),
                config.openai_model.clone(),
                timeout,
            )?),
            None => {
                warn!("OpenAI chat selected but no API key configured, using scripted replies");
                Arc::new(ScriptedResponder)
            }
        },
        ChatProviderKind::Gemini => match &config.gemini_api_key {
            Some(key) => Arc::new(GeminiResponder::new(
                key.clone(),
                config.gemini_model.clone(),
                timeout,
            )?),
            None => {
                warn!("Gemini chat selected but no API key configured, using scripted replies");
                Arc::new(ScriptedResponder)
            }
        },
        ChatProviderKind::Scripted => Arc::new(ScriptedResponder),
    };

    info!(provider = responder.name(), "Chat responder ready");
    Ok(responder)
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, ChatError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| ChatError::Network(e.to_string()))
}
