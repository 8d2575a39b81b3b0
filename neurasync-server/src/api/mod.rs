//! HTTP API handlers for neurasync-server

pub mod analysis;
pub mod health;
pub mod music;
pub mod physiological;
pub mod stress;
pub mod therapy;
pub mod user;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::AppState;

pub use health::health_routes;

/// All routes mounted under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user/profile",
            get(user::get_profile).patch(user::update_profile),
        )
        .route("/user/preferences", patch(user::update_preferences))
        .route("/stress/weekly", get(stress::weekly))
        .route("/stress/monthly", get(stress::monthly))
        .route("/stress/current", get(stress::current))
        .route("/physiological/current", get(physiological::current))
        .route("/analysis/emotion", post(analysis::analyze_emotion))
        .route("/analysis/save", post(analysis::save_analysis))
        .route("/analysis/history", get(analysis::history))
        .route("/therapy/messages", get(therapy::messages))
        .route("/therapy/message", post(therapy::send_message))
        .route("/therapy/sessions", get(therapy::sessions))
        .route("/music/recommendations", get(music::recommendations))
        .route("/music/playlists", get(music::playlists))
        .route("/music/playlist/:id", get(music::playlist_songs))
}
