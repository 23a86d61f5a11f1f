//! Profile HTTP handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::ProfileService;
use crate::AppState;
use shared::Profile;

/// Body for profile updates
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
}

/// Get the current user's profile, creating it on first access
pub async fn get_my_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Profile>> {
    let service = ProfileService::new(state.db.clone());
    let profile = service.get_or_create(current_user.0.user_id).await?;
    Ok(Json(profile))
}

/// Update the current user's profile name
pub async fn update_my_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<Json<Profile>> {
    input
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = ProfileService::new(state.db.clone());
    let profile = service
        .update_name(current_user.0.user_id, &input.name)
        .await?;
    Ok(Json(profile))
}
