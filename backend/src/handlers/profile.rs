//! Profile handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::profile::{ProfileService, UpdateProfileInput};
use crate::AppState;
use shared::types::ApiResponse;

/// Get the caller's own profile
pub async fn get_my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let service = ProfileService::new(state.db.clone());

    match service.get_profile(user.user_id).await {
        Ok(profile) => (StatusCode::OK, Json(ApiResponse::ok(profile))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a profile by user ID (visible to any authenticated user)
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ProfileService::new(state.db.clone());

    match service.get_profile(user_id).await {
        Ok(profile) => (StatusCode::OK, Json(ApiResponse::ok(profile))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update the caller's own profile
pub async fn update_my_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<UpdateProfileInput>,
) -> impl IntoResponse {
    let service = ProfileService::new(state.db.clone());

    match service.update_profile(user.user_id, input).await {
        Ok(profile) => (
            StatusCode::OK,
            Json(ApiResponse::with_message("Profile updated", profile)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
