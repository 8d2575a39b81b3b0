//! Offline keyword-driven responder

use async_trait::async_trait;
use neurasync_common::recommendations::coping_suggestions;

use super::{ChatError, ChatReply, ChatResponder, ChatTurn};

/// Keywords mapped to the emotion whose suggestions they call for
const KEYWORDS: &[(&str, &[&str])] = &[
    ("angry", &["angry", "furious", "mad", "frustrated", "annoyed", "irritated"]),
    ("fear", &["anxious", "anxiety", "afraid", "scared", "worried", "nervous", "panic"]),
    ("sad", &["sad", "down", "depressed", "lonely", "unhappy", "crying", "hopeless"]),
    ("disgust", &["disgusted", "gross", "sick of"]),
    ("surprise", &["surprised", "shocked", "unexpected"]),
    ("happy", &["happy", "great", "good", "excited", "grateful", "calm"]),
];

/// Works without network access or API keys
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptedResponder;

/// First emotion whose keyword appears in the message
pub fn detect_emotion(message: &str) -> Option<&'static str> {
    let lower = message.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();

    KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords.iter().any(|keyword| {
                if keyword.contains(' ') {
                    lower.contains(keyword)
                } else {
                    words.contains(keyword)
                }
            })
        })
        .map(|(emotion, _)| *emotion)
}

fn reply_for(emotion: Option<&str>) -> &'static str {
    match emotion {
        Some("angry") => "It sounds like something has really frustrated you. Anger is a valid signal that something matters to you. Would you like to talk about what happened?",
        Some("fear") => "It sounds like you're carrying a lot of worry right now. That can be exhausting. Let's slow down together and take it one step at a time.",
        Some("sad") => "I'm sorry you're feeling this way. It's okay to feel low, and you don't have to go through it alone. What has been weighing on you?",
        Some("disgust") => "It sounds like something really didn't sit right with you. Naming that feeling is a good first step. What would help you feel more settled?",
        Some("surprise") => "That sounds unexpected. Surprises can leave us unsettled even when they aren't bad. How are you feeling about it now?",
        Some("happy") => "It's wonderful to hear you're feeling good. Noticing these moments helps them last. What contributed to this feeling today?",
        _ => "Thank you for sharing that with me. I'm here to listen. Could you tell me a little more about how you're feeling?",
    }
}

#[async_trait]
impl ChatResponder for ScriptedResponder {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn send(&self, message: &str, _history: &[ChatTurn]) -> Result<ChatReply, ChatError> {
        let emotion = detect_emotion(message);
        Ok(ChatReply {
            reply: reply_for(emotion).to_string(),
            suggestions: coping_suggestions(emotion.unwrap_or("neutral")),
        })
    }
}
