//! Domain models
//!
//! JSON field names are camelCase to match the dashboard's contract.

mod emotion;
mod music;
mod stress;
mod therapy;
mod user;

pub use emotion::{
    clamp_percent, EmotionAnalysis, EmotionAnalysisResult, EmotionObservation,
};
pub use music::{NewSong, Playlist, PlaylistSong, PlaylistSummary, Song};
pub use stress::{CurrentStress, NewStressRecord, StressRecord};
pub use therapy::{NewMessage, NewTherapySession, Message, Sender, TherapySession};
pub use user::{NewUser, Preferences, User, UserUpdate};

/// User id used by every endpoint until accounts exist
pub const DEMO_USER_ID: i64 = 1;
