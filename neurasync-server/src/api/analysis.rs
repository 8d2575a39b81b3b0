//! Emotion analysis endpoints

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use neurasync_common::models::{
    EmotionAnalysis, EmotionAnalysisResult, EmotionObservation, DEMO_USER_ID,
};
use neurasync_common::time;
use serde::Deserialize;
use tracing::info;

use crate::detection::{prepare_image, DetectionError, DetectionOutcome};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: String,
}

/// Analysis as submitted by the client for saving
///
/// The stress level is taken as a signed integer so out-of-range values can
/// be rejected with a clear message instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnalysisRequest {
    pub stress_level: i64,
    pub primary_emotion: EmotionObservation,
    pub secondary_emotion: EmotionObservation,
    #[serde(default)]
    pub insight: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SaveAnalysisRequest {
    fn into_result(self) -> ApiResult<EmotionAnalysisResult> {
        let stress_level = u32::try_from(self.stress_level)
            .ok()
            .filter(|level| *level <= 100)
            .ok_or_else(|| {
                ApiError::BadRequest(format!(
                    "stressLevel must be between 0 and 100, got {}",
                    self.stress_level
                ))
            })?;

        Ok(EmotionAnalysisResult {
            stress_level,
            primary_emotion: self.primary_emotion,
            secondary_emotion: self.secondary_emotion,
            insight: self.insight,
            timestamp: self.timestamp.unwrap_or_else(time::now),
        })
    }
}

/// POST /api/analysis/emotion
pub async fn analyze_emotion(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> ApiResult<Json<DetectionOutcome>> {
    let image = prepare_image(&body.image).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let outcome = state.detection.analyze(image).await.map_err(|e| match e {
        DetectionError::Unavailable => ApiError::Unavailable(
            "Emotion analysis is unavailable right now, please try again".to_string(),
        ),
        other => ApiError::Internal(other.to_string()),
    })?;

    Ok(Json(outcome))
}

/// POST /api/analysis/save
///
/// Stores the analysis and its stress record together.
pub async fn save_analysis(
    State(state): State<AppState>,
    Json(body): Json<SaveAnalysisRequest>,
) -> ApiResult<Json<EmotionAnalysis>> {
    let result = body.into_result()?;
    let analysis = state.store.record_analysis(DEMO_USER_ID, result).await?;

    info!(
        analysis_id = analysis.id,
        stress_level = analysis.result.stress_level,
        mood = %analysis.result.primary_emotion.name,
        "Emotion analysis saved"
    );
    Ok(Json(analysis))
}

/// GET /api/analysis/history
pub async fn history(State(state): State<AppState>) -> ApiResult<Json<Vec<EmotionAnalysis>>> {
    Ok(Json(state.store.emotion_analyses(DEMO_USER_ID).await?))
}
