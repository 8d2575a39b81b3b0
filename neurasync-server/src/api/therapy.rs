//! Therapy assistant conversation

use axum::{extract::State, Json};
use neurasync_common::models::{Message, NewMessage, Sender, TherapySession, DEMO_USER_ID};
use serde::Deserialize;
use tracing::{debug, info};

use crate::chat::{respond_or_fallback, ChatTurn};
use crate::{ApiError, ApiResult, AppState};

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm your AI therapy assistant. How are you feeling today?";

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// GET /api/therapy/messages
///
/// An empty conversation is opened with the assistant's welcome message.
pub async fn messages(State(state): State<AppState>) -> ApiResult<Json<Vec<Message>>> {
    let messages = state.store.messages(DEMO_USER_ID).await?;
    if !messages.is_empty() {
        return Ok(Json(messages));
    }

    let welcome = state
        .store
        .create_message(NewMessage {
            user_id: DEMO_USER_ID,
            sender: Sender::Ai,
            content: WELCOME_MESSAGE.to_string(),
            suggestions: Vec::new(),
        })
        .await?;

    debug!("Started conversation with welcome message");
    Ok(Json(vec![welcome]))
}

/// POST /api/therapy/message
///
/// Stores the user's message, asks the responder with the conversation so
/// far, and returns the stored reply.
pub async fn send_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> ApiResult<Json<Message>> {
    let content = body.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest(
            "Message content is required".to_string(),
        ));
    }

    let history: Vec<ChatTurn> = state
        .store
        .messages(DEMO_USER_ID)
        .await?
        .iter()
        .map(ChatTurn::from_message)
        .collect();

    state
        .store
        .create_message(NewMessage {
            user_id: DEMO_USER_ID,
            sender: Sender::User,
            content: content.to_string(),
            suggestions: Vec::new(),
        })
        .await?;

    let reply = respond_or_fallback(state.chat.as_ref(), content, &history).await;

    let message = state
        .store
        .create_message(NewMessage {
            user_id: DEMO_USER_ID,
            sender: Sender::Ai,
            content: reply.reply,
            suggestions: reply.suggestions,
        })
        .await?;

    info!(
        provider = state.chat.name(),
        history_len = history.len(),
        "Therapy reply sent"
    );
    Ok(Json(message))
}

/// GET /api/therapy/sessions
pub async fn sessions(State(state): State<AppState>) -> ApiResult<Json<Vec<TherapySession>>> {
    Ok(Json(state.store.therapy_sessions(DEMO_USER_ID).await?))
}
