//! In-memory store
//!
//! Each table is an ordered map keyed by id with its own counter. All
//! writes take the single write lock, so per-user append order matches the
//! order requests arrive in.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::WellnessStore;
use crate::models::{
    EmotionAnalysis, EmotionAnalysisResult, Message, NewMessage, NewSong, NewStressRecord,
    NewTherapySession, NewUser, Playlist, PlaylistSong, Preferences, Song, StressRecord,
    TherapySession, User, UserUpdate, DEMO_USER_ID,
};
use crate::{time, Error, Result};

const DEFAULT_PROFILE_IMAGE: &str = "https://images.unsplash.com/photo-1494790108377-be9c29b29330?auto=format&fit=crop&w=120&h=120&q=80";

/// Rows of one table plus its id counter
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        let row = build(id);
        self.rows.insert(id, row.clone());
        row
    }

    fn filtered(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| keep(row)).cloned().collect()
    }
}

#[derive(Debug, Default)]
struct Tables {
    users: Table<User>,
    stress_records: Table<StressRecord>,
    emotion_analyses: Table<EmotionAnalysis>,
    messages: Table<Message>,
    therapy_sessions: Table<TherapySession>,
    songs: Table<Song>,
    playlists: Table<Playlist>,
    playlist_songs: Table<PlaylistSong>,
}

impl Tables {
    fn insert_stress_record(&mut self, record: NewStressRecord) -> StressRecord {
        self.stress_records.insert_with(|id| StressRecord {
            id,
            user_id: record.user_id,
            stress_level: record.stress_level,
            mood: record.mood,
            timestamp: record.timestamp,
        })
    }
}

/// [`WellnessStore`] backed by process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo user, sample songs, a playlist and a
    /// week of stress history
    pub async fn with_demo_data() -> Result<Self> {
        let store = Self::new();
        store.seed_demo_data(&mut StdRng::from_entropy()).await?;
        Ok(store)
    }

    async fn seed_demo_data<R: Rng>(&self, rng: &mut R) -> Result<()> {
        let user = self
            .create_user(NewUser {
                username: "demo".to_string(),
                name: Some("Emily Chen".to_string()),
                email: Some("emily@example.com".to_string()),
            })
            .await?;
        if user.id != DEMO_USER_ID {
            return Err(Error::Internal(format!(
                "Demo user seeded with id {} instead of {}",
                user.id, DEMO_USER_ID
            )));
        }

        let songs = [
            ("Calm Waters", "Ambient Sounds", 240, "relaxed", "photo-1470225620780-dba8ba36b745"),
            ("Forest Dawn", "Nature Sounds", 320, "calm", "photo-1511379938547-c1f69419868d"),
            ("Meditation Journey", "Guided Meditation", 600, "relaxed", "photo-1507838153414-b4b713384a76"),
            ("Gentle Piano", "Classical Relaxation", 420, "calm", "photo-1459749411175-04bf5292ceea"),
        ];
        for (title, artist, duration, mood, photo) in songs {
            self.create_song(NewSong {
                title: title.to_string(),
                artist: artist.to_string(),
                cover_url: Some(format!(
                    "https://images.unsplash.com/{}?auto=format&fit=crop&w=120&h=120&q=80",
                    photo
                )),
                duration: Some(duration),
                mood: Some(mood.to_string()),
            })
            .await?;
        }

        let playlist = self
            .create_playlist(
                user.id,
                "Relaxation Mix",
                Some("Calming sounds for stress relief"),
            )
            .await?;
        self.add_song_to_playlist(playlist.id, 1).await?;
        self.add_song_to_playlist(playlist.id, 2).await?;

        // One record per day for the past week, oldest first
        let now = time::now();
        for days_ago in (0..7i64).rev() {
            self.create_stress_record(NewStressRecord {
                user_id: user.id,
                stress_level: rng.gen_range(10..90),
                mood: if days_ago % 2 == 0 { "Relaxed" } else { "Neutral" }.to_string(),
                timestamp: now - Duration::days(days_ago),
            })
            .await?;
        }

        info!("Seeded in-memory store with demo data");
        Ok(())
    }
}

#[async_trait]
impl WellnessStore for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.rows.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        if tables.users.rows.values().any(|u| u.username == user.username) {
            return Err(Error::InvalidInput(format!(
                "Username already taken: {}",
                user.username
            )));
        }
        Ok(tables.users.insert_with(|id| User {
            id,
            username: user.username,
            name: user.name,
            email: user.email,
            profile_image: Some(DEFAULT_PROFILE_IMAGE.to_string()),
            preferences: Preferences::default(),
        }))
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<Option<User>> {
        let mut tables = self.tables.write().await;
        Ok(tables.users.rows.get_mut(&id).map(|user| {
            user.apply(update);
            user.clone()
        }))
    }

    async fn stress_records(&self, user_id: i64) -> Result<Vec<StressRecord>> {
        let mut records = self
            .tables
            .read()
            .await
            .stress_records
            .filtered(|r| r.user_id == user_id);
        records.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
        Ok(records)
    }

    async fn stress_records_between(
        &self,
        user_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StressRecord>> {
        let mut records = self.tables.read().await.stress_records.filtered(|r| {
            r.user_id == user_id && r.timestamp >= start && r.timestamp <= end
        });
        records.sort_by(|a, b| (a.timestamp, a.id).cmp(&(b.timestamp, b.id)));
        Ok(records)
    }

    async fn create_stress_record(&self, record: NewStressRecord) -> Result<StressRecord> {
        Ok(self.tables.write().await.insert_stress_record(record))
    }

    async fn latest_stress_record(&self, user_id: i64) -> Result<Option<StressRecord>> {
        Ok(self.stress_records(user_id).await?.into_iter().next())
    }

    async fn emotion_analyses(&self, user_id: i64) -> Result<Vec<EmotionAnalysis>> {
        let mut analyses = self
            .tables
            .read()
            .await
            .emotion_analyses
            .filtered(|a| a.user_id == user_id);
        analyses.sort_by(|a, b| {
            (b.result.timestamp, b.id).cmp(&(a.result.timestamp, a.id))
        });
        Ok(analyses)
    }

    async fn record_analysis(
        &self,
        user_id: i64,
        result: EmotionAnalysisResult,
    ) -> Result<EmotionAnalysis> {
        let mut tables = self.tables.write().await;

        let projection = NewStressRecord::from_analysis(user_id, &result);
        let analysis = tables
            .emotion_analyses
            .insert_with(|id| EmotionAnalysis { id, user_id, result });
        let record = tables.insert_stress_record(projection);

        debug!(
            analysis_id = analysis.id,
            stress_record_id = record.id,
            stress_level = record.stress_level,
            "Recorded emotion analysis"
        );
        Ok(analysis)
    }

    async fn messages(&self, user_id: i64) -> Result<Vec<Message>> {
        let mut messages = self
            .tables
            .read()
            .await
            .messages
            .filtered(|m| m.user_id == user_id);
        messages.sort_by(|a, b| (a.timestamp, a.id).cmp(&(b.timestamp, b.id)));
        Ok(messages)
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        let mut tables = self.tables.write().await;
        Ok(tables.messages.insert_with(|id| Message {
            id,
            user_id: message.user_id,
            sender: message.sender,
            content: message.content,
            suggestions: message.suggestions,
            timestamp: time::now(),
        }))
    }

    async fn therapy_sessions(&self, user_id: i64) -> Result<Vec<TherapySession>> {
        let mut sessions = self
            .tables
            .read()
            .await
            .therapy_sessions
            .filtered(|s| s.user_id == user_id);
        sessions.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));
        Ok(sessions)
    }

    async fn create_therapy_session(&self, session: NewTherapySession) -> Result<TherapySession> {
        let mut tables = self.tables.write().await;
        Ok(tables.therapy_sessions.insert_with(|id| TherapySession {
            id,
            user_id: session.user_id,
            date: time::now(),
            duration: session.duration,
            summary: session.summary,
        }))
    }

    async fn songs(&self) -> Result<Vec<Song>> {
        Ok(self.tables.read().await.songs.filtered(|_| true))
    }

    async fn songs_by_mood(&self, mood: &str) -> Result<Vec<Song>> {
        let mood = mood.to_lowercase();
        Ok(self.tables.read().await.songs.filtered(|song| {
            song.mood
                .as_deref()
                .map(|m| m.to_lowercase() == mood)
                .unwrap_or(false)
        }))
    }

    async fn create_song(&self, song: NewSong) -> Result<Song> {
        let mut tables = self.tables.write().await;
        Ok(tables.songs.insert_with(|id| Song {
            id,
            title: song.title,
            artist: song.artist,
            cover_url: song.cover_url,
            duration: song.duration,
            mood: song.mood,
        }))
    }

    async fn playlists(&self, user_id: i64) -> Result<Vec<Playlist>> {
        Ok(self
            .tables
            .read()
            .await
            .playlists
            .filtered(|p| p.user_id == user_id))
    }

    async fn create_playlist(
        &self,
        user_id: i64,
        name: &str,
        description: Option<&str>,
    ) -> Result<Playlist> {
        let mut tables = self.tables.write().await;
        Ok(tables.playlists.insert_with(|id| Playlist {
            id,
            user_id,
            name: name.to_string(),
            description: description.map(str::to_string),
        }))
    }

    async fn playlist_songs(&self, playlist_id: i64) -> Result<Vec<PlaylistSong>> {
        Ok(self
            .tables
            .read()
            .await
            .playlist_songs
            .filtered(|ps| ps.playlist_id == playlist_id))
    }

    async fn songs_in_playlist(&self, playlist_id: i64) -> Result<Vec<Song>> {
        let tables = self.tables.read().await;
        let song_ids: Vec<i64> = tables
            .playlist_songs
            .rows
            .values()
            .filter(|ps| ps.playlist_id == playlist_id)
            .map(|ps| ps.song_id)
            .collect();
        Ok(tables.songs.filtered(|song| song_ids.contains(&song.id)))
    }

    async fn add_song_to_playlist(&self, playlist_id: i64, song_id: i64) -> Result<PlaylistSong> {
        let mut tables = self.tables.write().await;
        if !tables.playlists.rows.contains_key(&playlist_id) {
            return Err(Error::NotFound(format!("Playlist {}", playlist_id)));
        }
        if !tables.songs.rows.contains_key(&song_id) {
            return Err(Error::NotFound(format!("Song {}", song_id)));
        }
        Ok(tables.playlist_songs.insert_with(|id| PlaylistSong {
            id,
            playlist_id,
            song_id,
        }))
    }

    async fn remove_song_from_playlist(&self, playlist_id: i64, song_id: i64) -> Result<()> {
        let mut tables = self.tables.write().await;
        let found = tables
            .playlist_songs
            .rows
            .iter()
            .find(|(_, ps)| ps.playlist_id == playlist_id && ps.song_id == song_id)
            .map(|(id, _)| *id);
        if let Some(id) = found {
            tables.playlist_songs.rows.remove(&id);
        }
        Ok(())
    }
}
