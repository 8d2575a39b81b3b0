//! Stress history and current level

use axum::{extract::State, Json};
use chrono::Duration;
use neurasync_common::models::{CurrentStress, StressRecord, DEMO_USER_ID};
use neurasync_common::time;

use crate::{ApiResult, AppState};

async fn records_for_last_days(state: &AppState, days: i64) -> ApiResult<Vec<StressRecord>> {
    let end = time::now();
    let start = end - Duration::days(days);
    Ok(state
        .store
        .stress_records_between(DEMO_USER_ID, start, end)
        .await?)
}

/// GET /api/stress/weekly
pub async fn weekly(State(state): State<AppState>) -> ApiResult<Json<Vec<StressRecord>>> {
    Ok(Json(records_for_last_days(&state, 7).await?))
}

/// GET /api/stress/monthly
pub async fn monthly(State(state): State<AppState>) -> ApiResult<Json<Vec<StressRecord>>> {
    Ok(Json(records_for_last_days(&state, 30).await?))
}

/// GET /api/stress/current
///
/// Latest record, or level 0 "Neutral" when nothing has been recorded yet.
pub async fn current(State(state): State<AppState>) -> ApiResult<Json<CurrentStress>> {
    let current = match state.store.latest_stress_record(DEMO_USER_ID).await? {
        Some(record) => CurrentStress::from(&record),
        None => CurrentStress::neutral(time::now()),
    };
    Ok(Json(current))
}
