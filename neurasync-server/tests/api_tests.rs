//! HTTP API integration tests
//!
//! Drive the router with `oneshot` against a demo-seeded in-memory store,
//! stub detectors and the scripted chat responder.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use neurasync_common::models::EmotionObservation;
use neurasync_common::store::{MemoryStore, WellnessStore};
use neurasync_server::chat::{ChatError, ChatReply, ChatResponder, ChatTurn, ScriptedResponder};
use neurasync_server::detection::{DetectionChain, DetectionError, EmotionDetector, MockDetector};
use neurasync_server::{build_router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

struct FixedDetector;

#[async_trait]
impl EmotionDetector for FixedDetector {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn detect(&self, _: &str) -> Result<Vec<EmotionObservation>, DetectionError> {
        Ok(vec![
            EmotionObservation::new("Angry", 80),
            EmotionObservation::new("Sad", 60),
        ])
    }
}

struct DownDetector;

#[async_trait]
impl EmotionDetector for DownDetector {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn detect(&self, _: &str) -> Result<Vec<EmotionObservation>, DetectionError> {
        Err(DetectionError::Network("connection refused".to_string()))
    }
}

struct DownResponder;

#[async_trait]
impl ChatResponder for DownResponder {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn send(&self, _: &str, _: &[ChatTurn]) -> Result<ChatReply, ChatError> {
        Err(ChatError::Network("connection refused".to_string()))
    }
}

async fn demo_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_demo_data().await.unwrap())
}

fn app_with(
    store: Arc<MemoryStore>,
    detection: DetectionChain,
    chat: Arc<dyn ChatResponder>,
) -> Router {
    build_router(AppState::new(store, detection, chat))
}

async fn test_app() -> Router {
    let detection = DetectionChain::new(Duration::from_secs(1))
        .with_provider(Arc::new(FixedDetector));
    app_with(demo_store().await, detection, Arc::new(ScriptedResponder))
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(test_app().await, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "neurasync-server");
    assert!(body["uptimeSeconds"].is_u64());
}

#[tokio::test]
async fn test_profile_get_and_update() {
    let app = test_app().await;

    let (status, body) = send(app.clone(), "GET", "/api/user/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "demo");
    assert!(body.get("password").is_none());
    assert_eq!(body["preferences"]["therapyReminders"], false);

    let (status, body) = send(
        app.clone(),
        "PATCH",
        "/api/user/profile",
        Some(json!({ "name": "Emily C." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Emily C.");
    assert_eq!(body["email"], "emily@example.com");

    let prefs = json!({
        "preferences": {
            "emailNotifications": false,
            "stressAlerts": true,
            "weeklyReports": false,
            "therapyReminders": true
        }
    });
    let (status, body) = send(app, "PATCH", "/api/user/preferences", Some(prefs)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preferences"]["emailNotifications"], false);
    assert_eq!(body["preferences"]["therapyReminders"], true);
    assert_eq!(body["name"], "Emily C.");
}

#[tokio::test]
async fn test_profile_missing_user_is_404() {
    let detection = DetectionChain::new(Duration::from_secs(1));
    let app = app_with(Arc::new(MemoryStore::new()), detection, Arc::new(ScriptedResponder));

    let (status, body) = send(app, "GET", "/api/user/profile", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_weekly_stress_is_oldest_first() {
    let (status, body) = send(test_app().await, "GET", "/api/stress/weekly", None).await;
    assert_eq!(status, StatusCode::OK);

    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 7);

    let timestamps: Vec<&str> = records
        .iter()
        .map(|r| r["timestamp"].as_str().unwrap())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort();
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn test_current_stress_defaults_without_records() {
    let detection = DetectionChain::new(Duration::from_secs(1));
    let app = app_with(Arc::new(MemoryStore::new()), detection, Arc::new(ScriptedResponder));

    let (status, body) = send(app, "GET", "/api/stress/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], 0);
    assert_eq!(body["mood"], "Neutral");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_physiological_placeholder() {
    let (status, body) = send(test_app().await, "GET", "/api/physiological/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["heartRate"], 72);
    assert_eq!(body["breathingRate"], 16);
}

#[tokio::test]
async fn test_analyze_emotion_scores_detected_emotions() {
    let (status, body) = send(
        test_app().await,
        "POST",
        "/api/analysis/emotion",
        Some(json!({ "image": "data:image/jpeg;base64,aGVsbG8=" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fixed");
    assert_eq!(body["stressLevel"], 83);
    assert_eq!(body["primaryEmotion"]["name"], "Angry");
    assert_eq!(body["secondaryEmotion"]["confidence"], 60);
    assert!(body["insight"].as_str().unwrap().contains("high"));
}

#[tokio::test]
async fn test_analyze_emotion_bad_image_is_400() {
    let app = test_app().await;

    let (status, _) = send(app.clone(), "POST", "/api/analysis/emotion", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app,
        "POST",
        "/api/analysis/emotion",
        Some(json!({ "image": "%%% not base64 %%%" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_analyze_emotion_falls_back_to_mock() {
    let detection = DetectionChain::new(Duration::from_secs(1))
        .with_provider(Arc::new(DownDetector))
        .with_provider(Arc::new(MockDetector));
    let app = app_with(demo_store().await, detection, Arc::new(ScriptedResponder));

    let (status, body) = send(
        app,
        "POST",
        "/api/analysis/emotion",
        Some(json!({ "image": "aGVsbG8=" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock");
    assert!(body["stressLevel"].as_u64().unwrap() <= 100);
}

#[tokio::test]
async fn test_analyze_emotion_unavailable_is_503() {
    let detection = DetectionChain::new(Duration::from_secs(1)).with_provider(Arc::new(DownDetector));
    let app = app_with(demo_store().await, detection, Arc::new(ScriptedResponder));

    let (status, body) = send(
        app,
        "POST",
        "/api/analysis/emotion",
        Some(json!({ "image": "aGVsbG8=" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UNAVAILABLE");
}

#[tokio::test]
async fn test_save_analysis_records_stress() {
    let store = demo_store().await;
    let detection = DetectionChain::new(Duration::from_secs(1));
    let app = app_with(store.clone(), detection, Arc::new(ScriptedResponder));

    let analysis = json!({
        "stressLevel": 83,
        "primaryEmotion": { "name": "Angry", "confidence": 80 },
        "secondaryEmotion": { "name": "Sad", "confidence": 60 },
        "insight": "High stress"
    });
    let (status, body) = send(app.clone(), "POST", "/api/analysis/save", Some(analysis)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["userId"], 1);
    assert_eq!(body["stressLevel"], 83);

    let latest = store.latest_stress_record(1).await.unwrap().unwrap();
    assert_eq!(latest.stress_level, 83);
    assert_eq!(latest.mood, "Angry");

    let (status, body) = send(app.clone(), "GET", "/api/stress/current", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["level"], 83);
    assert_eq!(body["mood"], "Angry");

    let (_, history) = send(app, "GET", "/api/analysis/history", None).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["insight"], "High stress");
}

#[tokio::test]
async fn test_save_analysis_out_of_range_is_400() {
    let app = test_app().await;

    for level in [-1, 101] {
        let analysis = json!({
            "stressLevel": level,
            "primaryEmotion": { "name": "Angry", "confidence": 80 },
            "secondaryEmotion": { "name": "Sad", "confidence": 60 },
            "insight": ""
        });
        let (status, _) = send(app.clone(), "POST", "/api/analysis/save", Some(analysis)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "stressLevel {}", level);
    }
}

#[tokio::test]
async fn test_therapy_welcome_message_created_once() {
    let app = test_app().await;

    let (status, body) = send(app.clone(), "GET", "/api/therapy/messages", None).await;
    assert_eq!(status, StatusCode::OK);
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["sender"], "ai");

    let (_, body) = send(app, "GET", "/api/therapy/messages", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_therapy_message_round_trip() {
    let app = test_app().await;

    let (status, body) = send(
        app.clone(),
        "POST",
        "/api/therapy/message",
        Some(json!({ "content": "I'm really anxious about my exam" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sender"], "ai");
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 4);

    let (_, body) = send(app, "GET", "/api/therapy/messages", None).await;
    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["sender"], "user");
    assert_eq!(messages[0]["content"], "I'm really anxious about my exam");
    assert_eq!(messages[1]["sender"], "ai");
}

#[tokio::test]
async fn test_therapy_blank_message_is_400() {
    let (status, _) = send(
        test_app().await,
        "POST",
        "/api/therapy/message",
        Some(json!({ "content": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_therapy_responder_failure_uses_fallback() {
    let detection = DetectionChain::new(Duration::from_secs(1));
    let app = app_with(demo_store().await, detection, Arc::new(DownResponder));

    let (status, body) = send(
        app,
        "POST",
        "/api/therapy/message",
        Some(json!({ "content": "hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["content"].as_str().unwrap().starts_with("I'm sorry"));
    assert_eq!(body["suggestions"][0], "Try refreshing the page");
}

#[tokio::test]
async fn test_music_recommendations_follow_latest_stress() {
    let store = demo_store().await;
    let detection = DetectionChain::new(Duration::from_secs(1));
    let app = app_with(store.clone(), detection, Arc::new(ScriptedResponder));

    let analysis = json!({
        "stressLevel": 90,
        "primaryEmotion": { "name": "Angry", "confidence": 95 },
        "secondaryEmotion": { "name": "Fear", "confidence": 40 },
        "insight": ""
    });
    send(app.clone(), "POST", "/api/analysis/save", Some(analysis)).await;

    let (status, body) = send(app, "GET", "/api/music/recommendations", None).await;
    assert_eq!(status, StatusCode::OK);
    let songs = body.as_array().unwrap();
    assert_eq!(songs.len(), 2);
    assert!(songs.iter().all(|song| song["mood"] == "calm"));
}

#[tokio::test]
async fn test_music_recommendations_fall_back_to_all_songs() {
    let store = demo_store().await;
    let detection = DetectionChain::new(Duration::from_secs(1));
    let app = app_with(store.clone(), detection, Arc::new(ScriptedResponder));

    // Low stress asks for "energetic", which the demo catalogue lacks
    let analysis = json!({
        "stressLevel": 5,
        "primaryEmotion": { "name": "Happy", "confidence": 95 },
        "secondaryEmotion": { "name": "Neutral", "confidence": 40 },
        "insight": ""
    });
    send(app.clone(), "POST", "/api/analysis/save", Some(analysis)).await;

    let (_, body) = send(app, "GET", "/api/music/recommendations", None).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_playlists_and_songs() {
    let app = test_app().await;

    let (status, body) = send(app.clone(), "GET", "/api/music/playlists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Relaxation Mix");
    assert_eq!(body[0]["songCount"], 2);

    let (status, body) = send(app.clone(), "GET", "/api/music/playlist/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = send(app, "GET", "/api/music/playlist/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_sessions_empty_for_demo_user() {
    let (status, body) = send(test_app().await, "GET", "/api/therapy/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}
