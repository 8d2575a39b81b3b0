//! Mock emotion generation
//!
//! Used when no real detector is reachable. It only invents the emotion
//! pair; stress and insight still come from [`crate::scoring`].

use rand::Rng;

use crate::models::{EmotionAnalysisResult, EmotionObservation};
use crate::scoring::score_emotions;

/// Labels the mock generator draws from, in cycle order
pub const MOCK_EMOTIONS: [&str; 6] = ["Neutral", "Happy", "Sad", "Surprise", "Angry", "Fear"];

/// Primary confidence range (inclusive)
pub const PRIMARY_CONFIDENCE: (u32, u32) = (60, 99);

/// Secondary confidence range (inclusive)
pub const SECONDARY_CONFIDENCE: (u32, u32) = (20, 49);

/// Generate a plausible primary/secondary pair
///
/// The secondary label is the next entry after the primary in
/// [`MOCK_EMOTIONS`], so the two always differ.
pub fn generate_mock_emotions<R: Rng>(rng: &mut R) -> Vec<EmotionObservation> {
    let index = rng.gen_range(0..MOCK_EMOTIONS.len());
    let secondary_index = (index + 1) % MOCK_EMOTIONS.len();

    vec![
        EmotionObservation::new(
            MOCK_EMOTIONS[index],
            rng.gen_range(PRIMARY_CONFIDENCE.0..=PRIMARY_CONFIDENCE.1),
        ),
        EmotionObservation::new(
            MOCK_EMOTIONS[secondary_index],
            rng.gen_range(SECONDARY_CONFIDENCE.0..=SECONDARY_CONFIDENCE.1),
        ),
    ]
}

/// Generate a mock pair and run it through the scorer
pub fn generate_mock_analysis<R: Rng>(rng: &mut R) -> EmotionAnalysisResult {
    score_emotions(&generate_mock_emotions(rng))
}
