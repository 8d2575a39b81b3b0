use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EmotionAnalysisResult;
use crate::time::iso8601;

/// Lightweight stress projection used by the trend charts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressRecord {
    pub id: i64,
    pub user_id: i64,
    pub stress_level: u32,
    pub mood: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

/// Insert form of [`StressRecord`]
#[derive(Debug, Clone)]
pub struct NewStressRecord {
    pub user_id: i64,
    pub stress_level: u32,
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

impl NewStressRecord {
    /// Project an analysis onto its stress record (mood is the primary emotion)
    pub fn from_analysis(user_id: i64, result: &EmotionAnalysisResult) -> Self {
        Self {
            user_id,
            stress_level: result.stress_level,
            mood: result.primary_emotion.name.clone(),
            timestamp: result.timestamp,
        }
    }
}

/// Response body for the "current stress" widget
#[derive(Debug, Clone, Serialize)]
pub struct CurrentStress {
    pub level: u32,
    pub mood: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

impl CurrentStress {
    /// Shown before any stress has been recorded
    pub fn neutral(now: DateTime<Utc>) -> Self {
        Self {
            level: 0,
            mood: "Neutral".to_string(),
            timestamp: now,
        }
    }
}

impl From<&StressRecord> for CurrentStress {
    fn from(record: &StressRecord) -> Self {
        Self {
            level: record.stress_level,
            mood: record.mood.clone(),
            timestamp: record.timestamp,
        }
    }
}
