//! Hosted vision model client
//!
//! Sends the image as a single prediction instance and reads back parallel
//! label/confidence arrays.

use std::time::Duration;

use async_trait::async_trait;
use neurasync_common::models::{clamp_percent, EmotionObservation};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{http_client, DetectionError, EmotionDetector};

/// Prediction response body
#[derive(Debug, Deserialize)]
pub struct PredictionResponse {
    pub predictions: Option<Vec<Prediction>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    #[serde(default)]
    pub display_names: Vec<String>,
    /// Kept as raw values so one bad entry doesn't sink the whole response
    #[serde(default)]
    pub confidences: Vec<Value>,
}

pub struct VisionApiDetector {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VisionApiDetector {
    pub fn new(endpoint: String, api_key: String, timeout: Duration) -> Result<Self, DetectionError> {
        Ok(Self {
            http_client: http_client(timeout)?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl EmotionDetector for VisionApiDetector {
    fn name(&self) -> &'static str {
        "vision-api"
    }

    async fn detect(&self, image_base64: &str) -> Result<Vec<EmotionObservation>, DetectionError> {
        let body = json!({
            "instances": [{ "content": image_base64, "mimeType": "image/jpeg" }]
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DetectionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DetectionError::Api(status.as_u16(), error_text));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DetectionError::Network(e.to_string()))?;

        let emotions = parse_predictions(&text)?;
        debug!(count = emotions.len(), "Vision API returned emotions");
        Ok(emotions)
    }
}

/// Parse a prediction response body into observations
pub fn parse_predictions(body: &str) -> Result<Vec<EmotionObservation>, DetectionError> {
    let response: PredictionResponse =
        serde_json::from_str(body).map_err(|e| DetectionError::Parse(e.to_string()))?;

    let predictions = response
        .predictions
        .ok_or_else(|| DetectionError::Parse("response has no predictions".to_string()))?;

    Ok(predictions
        .first()
        .map(observations_from_predictions)
        .unwrap_or_default())
}

/// Zip labels with 0..1 confidences, stopping at the shorter array
pub fn observations_from_predictions(prediction: &Prediction) -> Vec<EmotionObservation> {
    prediction
        .display_names
        .iter()
        .zip(&prediction.confidences)
        .map(|(name, confidence)| {
            let probability = match confidence {
                Value::Number(n) => n.as_f64().unwrap_or(0.0),
                Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
                _ => 0.0,
            };
            EmotionObservation::new(name.clone(), clamp_percent(probability * 100.0))
        })
        .collect()
}
