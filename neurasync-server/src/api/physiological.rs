//! Physiological readings
//!
//! No sensor integration exists yet, so fixed resting values are reported.

use axum::Json;
use chrono::{DateTime, Utc};
use neurasync_common::time::{self, iso8601};
use serde::Serialize;

pub const RESTING_HEART_RATE: u32 = 72;
pub const RESTING_BREATHING_RATE: u32 = 16;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysiologicalReading {
    pub heart_rate: u32,
    pub breathing_rate: u32,
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

/// GET /api/physiological/current
pub async fn current() -> Json<PhysiologicalReading> {
    Json(PhysiologicalReading {
        heart_rate: RESTING_HEART_RATE,
        breathing_rate: RESTING_BREATHING_RATE,
        timestamp: time::now(),
    })
}
