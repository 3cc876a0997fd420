//! Image metadata handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::image::{CreateImageInput, ImageService};
use crate::AppState;
use shared::types::ApiResponse;

/// Register image metadata for the calling user
pub async fn create_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateImageInput>,
) -> impl IntoResponse {
    let service = ImageService::new(state.db.clone());

    match service.create_image(user.user_id, input).await {
        Ok(image) => (
            StatusCode::CREATED,
            Json(ApiResponse::with_message("Image registered", image)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// List the caller's image records
pub async fn list_images(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let service = ImageService::new(state.db.clone());

    match service.list_images(user.user_id).await {
        Ok(images) => (StatusCode::OK, Json(ApiResponse::ok(images))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get an image record
pub async fn get_image(
    State(state): State<AppState>,
    Path(image_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ImageService::new(state.db.clone());

    match service.get_image(image_id).await {
        Ok(image) => (StatusCode::OK, Json(ApiResponse::ok(image))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an image record
pub async fn delete_image(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(image_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ImageService::new(state.db.clone());

    match service.delete_image(user.user_id, image_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
