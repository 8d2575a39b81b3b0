//! Demo user profile and preferences

use axum::{extract::State, Json};
use neurasync_common::models::{Preferences, User, UserUpdate, DEMO_USER_ID};
use serde::Deserialize;
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    pub preferences: Preferences,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// GET /api/user/profile
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Json<User>> {
    let user = state
        .store
        .get_user(DEMO_USER_ID)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(Json(user))
}

/// PATCH /api/user/profile
///
/// Only `name` and `email` are changed; absent fields keep their values.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(body): Json<ProfileUpdate>,
) -> ApiResult<Json<User>> {
    let update = UserUpdate {
        name: body.name,
        email: body.email,
        preferences: None,
    };
    let user = state
        .store
        .update_user(DEMO_USER_ID, update)
        .await?
        .ok_or_else(user_not_found)?;

    info!(user_id = user.id, "Profile updated");
    Ok(Json(user))
}

/// PATCH /api/user/preferences
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(body): Json<PreferencesUpdate>,
) -> ApiResult<Json<User>> {
    let update = UserUpdate {
        preferences: Some(body.preferences),
        ..Default::default()
    };
    let user = state
        .store
        .update_user(DEMO_USER_ID, update)
        .await?
        .ok_or_else(user_not_found)?;

    info!(user_id = user.id, "Preferences updated");
    Ok(Json(user))
}
