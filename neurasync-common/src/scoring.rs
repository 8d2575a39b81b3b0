//! Emotion-to-stress scoring
//!
//! Turns a detector's emotion list into a single 0-100 stress level plus
//! a templated insight. Every detection path (live provider, local service,
//! mock fallback) goes through [`score_emotions`] so they cannot drift apart.

use chrono::{DateTime, Utc};

use crate::insight::generate_insight;
use crate::models::{EmotionAnalysisResult, EmotionObservation};

/// Base stress contribution per emotion label (lowercase)
pub const EMOTION_STRESS_TABLE: [(&str, u32); 8] = [
    ("angry", 90),
    ("fear", 85),
    ("disgust", 75),
    ("sad", 70),
    ("surprise", 50),
    ("neutral", 30),
    ("happy", 15),
    ("joy", 10),
];

/// Contribution for labels missing from the table
pub const DEFAULT_BASE_STRESS: u32 = 30;

/// Stress level reported when there is nothing to weigh
pub const NEUTRAL_STRESS_LEVEL: u32 = 30;

/// Number of ranked emotions that contribute to the aggregate
const WEIGHTED_EMOTIONS: usize = 3;

/// Positional weight: 100, 70, 40
fn positional_weight(rank: usize) -> u64 {
    100 - 30 * rank as u64
}

/// Look up an emotion's base stress contribution, ignoring case
pub fn base_stress(label: &str) -> u32 {
    let label = label.trim().to_lowercase();
    EMOTION_STRESS_TABLE
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, stress)| *stress)
        .unwrap_or(DEFAULT_BASE_STRESS)
}

pub fn default_primary() -> EmotionObservation {
    EmotionObservation::new("Neutral", 50)
}

pub fn default_secondary() -> EmotionObservation {
    EmotionObservation::new("Calm", 30)
}

/// Sort a copy of `emotions` by confidence, highest first
///
/// `sort_by` is stable, so equal confidences keep their detector order.
pub fn rank_emotions(emotions: &[EmotionObservation]) -> Vec<EmotionObservation> {
    let mut ranked = emotions.to_vec();
    ranked.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    ranked
}

/// Weighted stress level over the top three of an already ranked list
pub fn stress_level(ranked: &[EmotionObservation]) -> u32 {
    let (numerator, denominator) = ranked
        .iter()
        .take(WEIGHTED_EMOTIONS)
        .enumerate()
        .fold((0u64, 0u64), |(num, den), (rank, emotion)| {
            let weighted = u64::from(emotion.confidence) * positional_weight(rank);
            (
                num + u64::from(base_stress(&emotion.name)) * weighted,
                den + weighted,
            )
        });

    if denominator == 0 {
        return NEUTRAL_STRESS_LEVEL;
    }

    let level = (numerator as f64 / denominator as f64).round();
    level.clamp(0.0, 100.0) as u32
}

/// Score a detector's emotion list, stamped with the current time
pub fn score_emotions(emotions: &[EmotionObservation]) -> EmotionAnalysisResult {
    score_emotions_at(emotions, crate::time::now())
}

/// Score a detector's emotion list with an explicit timestamp
pub fn score_emotions_at(
    emotions: &[EmotionObservation],
    timestamp: DateTime<Utc>,
) -> EmotionAnalysisResult {
    let ranked = rank_emotions(emotions);

    let primary_emotion = ranked.first().cloned().unwrap_or_else(default_primary);
    let secondary_emotion = ranked.get(1).cloned().unwrap_or_else(default_secondary);
    let stress_level = stress_level(&ranked);
    let insight = generate_insight(&primary_emotion, &secondary_emotion, stress_level);

    tracing::debug!(
        emotions = emotions.len(),
        primary = %primary_emotion.name,
        stress_level,
        "Scored emotion observations"
    );

    EmotionAnalysisResult {
        stress_level,
        primary_emotion,
        secondary_emotion,
        insight,
        timestamp,
    }
}
