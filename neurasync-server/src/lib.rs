//! neurasync-server library - wellness dashboard backend
//!
//! Serves stress history, emotion analysis, the therapy assistant and music
//! recommendations for the demo user.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use neurasync_common::store::WellnessStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod chat;
pub mod detection;
pub mod error;

use chat::ChatResponder;
use detection::DetectionChain;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WellnessStore>,
    pub detection: Arc<DetectionChain>,
    pub chat: Arc<dyn ChatResponder>,
    /// Server start time, for uptime reporting
    pub startup_time: Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WellnessStore>,
        detection: DetectionChain,
        chat: Arc<dyn ChatResponder>,
    ) -> Self {
        Self {
            store,
            detection: Arc::new(detection),
            chat,
            startup_time: Instant::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api::api_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
