//! Emotion detection providers and the fallback chain
//!
//! Providers are tried in order: hosted vision model, local detection
//! service, then generated emotions. Each call is bounded by a timeout and
//! any failure moves on to the next provider. Whatever list wins goes
//! through the shared scorer, so every path yields the same analysis shape.

mod image;
mod local;
mod mock;
mod vision;

pub use image::{prepare_image, ImageError};
pub use local::{LocalDetectionResponse, LocalServiceDetector};
pub use mock::MockDetector;
pub use vision::{
    observations_from_predictions, parse_predictions, Prediction, VisionApiDetector,
};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use neurasync_common::config::DetectionConfig;
use neurasync_common::models::{EmotionAnalysisResult, EmotionObservation};
use neurasync_common::score_emotions;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

const USER_AGENT: &str = concat!("neurasync/", env!("CARGO_PKG_VERSION"));

/// Emotion detection errors
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Emotion analysis unavailable, please try again")]
    Unavailable,
}

/// A source of ranked emotion observations for an image
#[async_trait]
pub trait EmotionDetector: Send + Sync {
    /// Short identifier reported alongside results
    fn name(&self) -> &'static str;

    /// Detect emotions in a base64-encoded JPEG
    async fn detect(&self, image_base64: &str) -> Result<Vec<EmotionObservation>, DetectionError>;
}

/// Scored analysis plus the provider that produced the emotions
#[derive(Debug, Clone, Serialize)]
pub struct DetectionOutcome {
    #[serde(flatten)]
    pub result: EmotionAnalysisResult,
    pub source: &'static str,
}

/// Ordered list of detectors with a per-call timeout
pub struct DetectionChain {
    providers: Vec<Arc<dyn EmotionDetector>>,
    timeout: Duration,
}

impl DetectionChain {
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
        }
    }

    /// Append a provider; earlier providers are preferred
    pub fn with_provider(mut self, provider: Arc<dyn EmotionDetector>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Build the chain described by the detection config
    ///
    /// The vision provider needs both endpoint and key, the local service
    /// needs a base URL, and the mock is appended last when enabled.
    pub fn from_config(config: &DetectionConfig) -> Result<Self, DetectionError> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let mut chain = Self::new(timeout);

        match (&config.vision_endpoint, &config.vision_api_key) {
            (Some(endpoint), Some(key)) => {
                chain = chain.with_provider(Arc::new(VisionApiDetector::new(
                    endpoint.clone(),
                    key.clone(),
                    timeout,
                )?));
            }
            (Some(_), None) => warn!("Vision endpoint configured without an API key, skipping"),
            (None, Some(_)) => warn!("Vision API key configured without an endpoint, skipping"),
            (None, None) => {}
        }

        if let Some(url) = &config.local_service_url {
            chain = chain.with_provider(Arc::new(LocalServiceDetector::new(url.clone(), timeout)?));
        }

        if config.mock_fallback {
            chain = chain.with_provider(Arc::new(MockDetector));
        }

        info!(providers = ?chain.provider_names(), "Emotion detection chain ready");
        Ok(chain)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Detect emotions with the first provider that succeeds and score them
    pub async fn analyze(&self, image_base64: &str) -> Result<DetectionOutcome, DetectionError> {
        for provider in &self.providers {
            let attempt = tokio::time::timeout(self.timeout, provider.detect(image_base64)).await;

            let error = match attempt {
                Ok(Ok(emotions)) => {
                    let result = score_emotions(&emotions);
                    info!(
                        source = provider.name(),
                        stress_level = result.stress_level,
                        primary = %result.primary_emotion.name,
                        "Emotion analysis complete"
                    );
                    return Ok(DetectionOutcome {
                        result,
                        source: provider.name(),
                    });
                }
                Ok(Err(e)) => e,
                Err(_) => DetectionError::Timeout(self.timeout),
            };

            warn!(
                provider = provider.name(),
                error = %error,
                "Emotion detection failed, trying next provider"
            );
        }

        warn!("All emotion detection providers failed");
        Err(DetectionError::Unavailable)
    }
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, DetectionError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| DetectionError::Network(e.to_string()))
}
