//! Generated emotions, the provider of last resort

use async_trait::async_trait;
use neurasync_common::mock::generate_mock_emotions;
use neurasync_common::models::EmotionObservation;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::{DetectionError, EmotionDetector};

/// Always succeeds with a plausible random emotion pair
#[derive(Debug, Default, Clone, Copy)]
pub struct MockDetector;

#[async_trait]
impl EmotionDetector for MockDetector {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn detect(&self, _image_base64: &str) -> Result<Vec<EmotionObservation>, DetectionError> {
        tracing::warn!("Using generated emotions in place of a real detector");
        Ok(generate_mock_emotions(&mut StdRng::from_entropy()))
    }
}
