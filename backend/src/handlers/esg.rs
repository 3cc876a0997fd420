//! ESG verification handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::esg::{EsgService, ReviewInput};
use crate::AppState;
use shared::models::UserRole;
use shared::types::ApiResponse;

/// Request an ESG verification for the calling farmer or business
pub async fn request_verification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = user.require_role(&[UserRole::Farmer, UserRole::Business]) {
        return e.into_response();
    }

    let service = EsgService::new(state.db.clone());

    match service.request_verification(user.user_id).await {
        Ok(verification) => (
            StatusCode::CREATED,
            Json(ApiResponse::with_message("Verification requested", verification)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// List the caller's own verification history
pub async fn list_my_verifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let service = EsgService::new(state.db.clone());

    match service.list_for_user(user.user_id).await {
        Ok(verifications) => {
            (StatusCode::OK, Json(ApiResponse::ok(verifications))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// List pending requests for expert review
pub async fn list_pending_verifications(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    if let Err(e) = user.require_role(&[UserRole::EsgExpert]) {
        return e.into_response();
    }

    let service = EsgService::new(state.db.clone());

    match service.list_pending().await {
        Ok(verifications) => {
            (StatusCode::OK, Json(ApiResponse::ok(verifications))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Get a verification record
pub async fn get_verification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(verification_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = EsgService::new(state.db.clone());

    match service.get_verification(verification_id).await {
        Ok(verification) => {
            // Only the subject and experts may read a record
            if verification.user_id != user.user_id && user.role != UserRole::EsgExpert {
                return crate::error::AppError::InsufficientPermissions.into_response();
            }
            (StatusCode::OK, Json(ApiResponse::ok(verification))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Latest approved verification for a user (public summary)
pub async fn latest_approved_esg(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = EsgService::new(state.db.clone());

    match service.latest_approved(user_id).await {
        Ok(verification) => (StatusCode::OK, Json(ApiResponse::ok(verification))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Review a pending verification as an expert
pub async fn review_verification(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(verification_id): Path<Uuid>,
    Json(input): Json<ReviewInput>,
) -> impl IntoResponse {
    if let Err(e) = user.require_role(&[UserRole::EsgExpert]) {
        return e.into_response();
    }

    let service = EsgService::new(state.db.clone());

    match service.review(user.user_id, verification_id, input).await {
        Ok(verification) => (
            StatusCode::OK,
            Json(ApiResponse::with_message("Verification reviewed", verification)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
