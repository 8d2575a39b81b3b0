//! Persistence layer
//!
//! Handlers only see [`WellnessStore`]; the in-memory implementation can be
//! swapped for a relational one without touching them.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    EmotionAnalysis, EmotionAnalysisResult, Message, NewMessage, NewSong, NewStressRecord,
    NewTherapySession, NewUser, Playlist, PlaylistSong, Song, StressRecord, TherapySession, User,
    UserUpdate,
};
use crate::Result;

#[async_trait]
pub trait WellnessStore: Send + Sync {
    // Users
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;
    /// Returns `None` when the user does not exist
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>>;

    // Stress records
    /// Newest first
    async fn stress_records(&self, user_id: i64) -> Result<Vec<StressRecord>>;
    /// Inclusive range, oldest first
    async fn stress_records_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StressRecord>>;
    async fn create_stress_record(&self, record: NewStressRecord) -> Result<StressRecord>;
    async fn latest_stress_record(&self, user_id: i64) -> Result<Option<StressRecord>>;

    // Emotion analyses
    /// Newest first
    async fn emotion_analyses(&self, user_id: i64) -> Result<Vec<EmotionAnalysis>>;
    /// Store an analysis together with its stress record projection
    async fn record_analysis(
        &self,
        user_id: i64,
        result: EmotionAnalysisResult,
    ) -> Result<EmotionAnalysis>;

    // Messages
    /// Oldest first
    async fn messages(&self, user_id: i64) -> Result<Vec<Message>>;
    async fn create_message(&self, message: NewMessage) -> Result<Message>;

    // Therapy sessions
    /// Newest first
    async fn therapy_sessions(&self, user_id: i64) -> Result<Vec<TherapySession>>;
    async fn create_therapy_session(&self, session: NewTherapySession) -> Result<TherapySession>;

    // Songs
    async fn songs(&self) -> Result<Vec<Song>>;
    /// Case-insensitive mood match
    async fn songs_by_mood(&self, mood: &str) -> Result<Vec<Song>>;
    async fn create_song(&self, song: NewSong) -> Result<Song>;

    // Playlists
    async fn playlists(&self, user_id: i64) -> Result<Vec<Playlist>>;
    async fn create_playlist(
        &self,
        user_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Playlist>;
    async fn playlist_songs(&self, playlist_id: i64) -> Result<Vec<PlaylistSong>>;
    async fn songs_in_playlist(&self, playlist_id: i64) -> Result<Vec<Song>>;
    async fn add_song_to_playlist(&self, playlist_id: i64, song_id: i64) -> Result<PlaylistSong>;
    /// No-op when the song is not in the playlist
    async fn remove_song_from_playlist(&self, playlist_id: i64, song_id: i64) -> Result<()>;
}
