//! Music recommendations and playlists

use axum::{
    extract::{Path, State},
    Json,
};
use neurasync_common::models::{PlaylistSummary, Song, DEMO_USER_ID};
use neurasync_common::music::recommended_mood;
use tracing::debug;

use crate::{ApiError, ApiResult, AppState};

/// GET /api/music/recommendations
///
/// Songs matching the mood implied by the latest stress level, or the whole
/// catalogue when nothing matches.
pub async fn recommendations(State(state): State<AppState>) -> ApiResult<Json<Vec<Song>>> {
    let latest = state.store.latest_stress_record(DEMO_USER_ID).await?;
    let mood = recommended_mood(latest.as_ref());

    let mut songs = state.store.songs_by_mood(mood).await?;
    if songs.is_empty() {
        songs = state.store.songs().await?;
    }

    debug!(mood, count = songs.len(), "Music recommendations");
    Ok(Json(songs))
}

/// GET /api/music/playlists
pub async fn playlists(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PlaylistSummary>>> {
    let playlists = state.store.playlists(DEMO_USER_ID).await?;

    let mut summaries = Vec::with_capacity(playlists.len());
    for playlist in playlists {
        let song_count = state.store.playlist_songs(playlist.id).await?.len();
        summaries.push(PlaylistSummary {
            playlist,
            song_count,
        });
    }

    Ok(Json(summaries))
}

/// GET /api/music/playlist/:id
pub async fn playlist_songs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Song>>> {
    let playlist_id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid playlist id: {}", id)))?;

    Ok(Json(state.store.songs_in_playlist(playlist_id).await?))
}
