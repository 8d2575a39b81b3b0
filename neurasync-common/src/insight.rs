//! Insight templates
//!
//! One sentence per stress band naming both emotions and the primary's
//! confidence, followed by a band-appropriate suggestion.

use serde::{Deserialize, Serialize};

use crate::models::EmotionObservation;

/// Stress level bands shared by insights, music and dashboard colours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressBand {
    Low,
    Moderate,
    High,
}

impl StressBand {
    /// `> 70` is high, `> 30` is moderate, anything else is low
    pub fn from_level(stress_level: u32) -> Self {
        if stress_level > 70 {
            StressBand::High
        } else if stress_level > 30 {
            StressBand::Moderate
        } else {
            StressBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StressBand::Low => "low",
            StressBand::Moderate => "moderate",
            StressBand::High => "high",
        }
    }

    fn suggestion(&self) -> &'static str {
        match self {
            StressBand::High => {
                "Try stepping away for a few minutes of slow, deep breathing or a short guided meditation to bring your stress down."
            }
            StressBand::Moderate => {
                "You are coping, but a brief relaxation exercise such as stretching or a mindful pause could help you stay balanced."
            }
            StressBand::Low => {
                "You seem calm and settled. Keep doing what you are doing, it appears to be supporting your well-being."
            }
        }
    }
}

/// Render the insight text for a scored analysis
pub fn generate_insight(
    primary: &EmotionObservation,
    secondary: &EmotionObservation,
    stress_level: u32,
) -> String {
    let band = StressBand::from_level(stress_level);
    format!(
        "Your facial expressions suggest a {} stress level. The strongest emotion detected is {} ({}% confidence), followed by {}. {}",
        band.as_str(),
        primary.name.to_lowercase(),
        primary.confidence,
        secondary.name.to_lowercase(),
        band.suggestion(),
    )
}
