//! Mood-based music selection

use crate::insight::StressBand;
use crate::models::StressRecord;

/// Mood used before any stress has been recorded
pub const DEFAULT_MUSIC_MOOD: &str = "relaxed";

/// Pick the song mood that counters the given stress level
///
/// High stress gets calming music, moderate gets relaxing music and low
/// stress can take something more energetic.
pub fn mood_for_stress(stress_level: u32) -> &'static str {
    match StressBand::from_level(stress_level) {
        StressBand::High => "calm",
        StressBand::Moderate => "relaxed",
        StressBand::Low => "energetic",
    }
}

/// Mood for the latest stress record, if any
pub fn recommended_mood(latest: Option<&StressRecord>) -> &'static str {
    latest
        .map(|record| mood_for_stress(record.stress_level))
        .unwrap_or(DEFAULT_MUSIC_MOOD)
}
