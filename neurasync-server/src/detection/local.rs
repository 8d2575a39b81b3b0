//! Local emotion detection service client

use std::time::Duration;

use async_trait::async_trait;
use neurasync_common::models::EmotionObservation;
use serde::Deserialize;
use serde_json::json;

use super::{http_client, DetectionError, EmotionDetector};

const DETECT_PATH: &str = "/api/detect_emotion";

/// Response body of the local service
///
/// Stress and insight fields the service may include are ignored; only the
/// emotions are used.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDetectionResponse {
    pub emotions: Option<Vec<EmotionObservation>>,
    pub primary_emotion: Option<EmotionObservation>,
    pub secondary_emotion: Option<EmotionObservation>,
}

impl LocalDetectionResponse {
    /// Prefer the full emotion list, else whichever of primary/secondary exist
    pub fn into_observations(self) -> Vec<EmotionObservation> {
        match self.emotions {
            Some(emotions) => emotions,
            None => self
                .primary_emotion
                .into_iter()
                .chain(self.secondary_emotion)
                .collect(),
        }
    }
}

pub struct LocalServiceDetector {
    http_client: reqwest::Client,
    url: String,
}

impl LocalServiceDetector {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DetectionError> {
        Ok(Self {
            http_client: http_client(timeout)?,
            url: format!("{}{}", base_url.trim_end_matches('/'), DETECT_PATH),
        })
    }
}

#[async_trait]
impl EmotionDetector for LocalServiceDetector {
    fn name(&self) -> &'static str {
        "local-service"
    }

    async fn detect(&self, image_base64: &str) -> Result<Vec<EmotionObservation>, DetectionError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&json!({ "image": image_base64 }))
            .send()
            .await
            .map_err(|e| DetectionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DetectionError::Api(status.as_u16(), error_text));
        }

        let body: LocalDetectionResponse = response
            .json()
            .await
            .map_err(|e| DetectionError::Parse(e.to_string()))?;

        Ok(body.into_observations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base() {
        let detector =
            LocalServiceDetector::new("http://localhost:8502/".to_string(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(detector.url, "http://localhost:8502/api/detect_emotion");
    }

    #[test]
    fn test_emotion_list_preferred() {
        let body: LocalDetectionResponse = serde_json::from_str(
            r#"{
                "emotions": [{"name":"Fear","confidence":70},{"name":"Sad","confidence":20}],
                "primaryEmotion": {"name":"Happy","confidence":99},
                "stressLevel": 12
            }"#,
        )
        .unwrap();

        let emotions = body.into_observations();
        assert_eq!(emotions.len(), 2);
        assert_eq!(emotions[0].name, "Fear");
    }

    #[test]
    fn test_primary_secondary_fallback() {
        let body: LocalDetectionResponse = serde_json::from_str(
            r#"{"primaryEmotion":{"name":"Angry","confidence":"80"},"insight":"ignored"}"#,
        )
        .unwrap();

        assert_eq!(body.into_observations(), vec![EmotionObservation::new("Angry", 80)]);
    }
}
