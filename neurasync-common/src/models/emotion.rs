use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::time::iso8601;

/// One detected emotion label with its confidence percentage
///
/// Confidence deserializes leniently: missing, null, non-numeric or NaN
/// values become 0, fractions are rounded and the result is clamped to
/// 0..=100. A malformed confidence never fails the surrounding payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionObservation {
    #[serde(default = "default_label")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_confidence")]
    pub confidence: u32,
}

impl EmotionObservation {
    pub fn new(name: impl Into<String>, confidence: u32) -> Self {
        Self {
            name: name.into(),
            confidence: confidence.min(100),
        }
    }

    /// Build from a detector's 0.0-1.0 probability
    pub fn from_probability(name: impl Into<String>, probability: f64) -> Self {
        Self {
            name: name.into(),
            confidence: clamp_percent(probability * 100.0),
        }
    }
}

fn default_label() -> String {
    "Unknown".to_string()
}

/// Round a percentage into 0..=100, mapping non-finite input to 0
pub fn clamp_percent(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u32
}

fn confidence_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_f64().map(clamp_percent).unwrap_or(0),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(clamp_percent)
            .unwrap_or(0),
        _ => 0,
    }
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(confidence_from_value).unwrap_or(0))
}

/// Output of the emotion-to-stress scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysisResult {
    pub stress_level: u32,
    pub primary_emotion: EmotionObservation,
    pub secondary_emotion: EmotionObservation,
    pub insight: String,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

/// A persisted analysis: scorer output plus store-assigned identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionAnalysis {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    pub result: EmotionAnalysisResult,
}
