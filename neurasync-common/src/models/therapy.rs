use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::iso8601;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    pub sender: Sender,
    pub content: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessage {
    pub user_id: i64,
    pub sender: Sender,
    pub content: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapySession {
    pub id: i64,
    pub user_id: i64,
    #[serde(with = "iso8601")]
    pub date: DateTime<Utc>,
    /// Minutes
    pub duration: u32,
    pub summary: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTherapySession {
    pub user_id: i64,
    pub duration: u32,
    pub summary: Option<String>,
}
