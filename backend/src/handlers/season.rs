//! Growing season handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::season::{CreateSeasonInput, SeasonService, UpdateSeasonInput};
use crate::AppState;
use shared::models::{SeasonStatus, UserRole};
use shared::types::ApiResponse;

#[derive(Deserialize)]
pub struct ChangeStatusRequest {
    pub status: SeasonStatus,
}

/// List seasons owned by the calling farmer
pub async fn list_seasons(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let service = SeasonService::new(state.db.clone());

    match service.list_seasons(user.user_id).await {
        Ok(seasons) => (StatusCode::OK, Json(ApiResponse::ok(seasons))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a season by ID
pub async fn get_season(
    State(state): State<AppState>,
    Path(season_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SeasonService::new(state.db.clone());

    match service.get_season(season_id).await {
        Ok(season) => (StatusCode::OK, Json(ApiResponse::ok(season))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a season
pub async fn create_season(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateSeasonInput>,
) -> impl IntoResponse {
    if let Err(e) = user.require_role(&[UserRole::Farmer]) {
        return e.into_response();
    }

    let service = SeasonService::new(state.db.clone());

    match service.create_season(user.user_id, input).await {
        Ok(season) => (
            StatusCode::CREATED,
            Json(ApiResponse::with_message("Season created", season)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a season's descriptive fields
pub async fn update_season(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(season_id): Path<Uuid>,
    Json(input): Json<UpdateSeasonInput>,
) -> impl IntoResponse {
    let service = SeasonService::new(state.db.clone());

    match service.update_season(user.user_id, season_id, input).await {
        Ok(season) => (StatusCode::OK, Json(ApiResponse::ok(season))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Apply a lifecycle transition to a season
pub async fn change_season_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(season_id): Path<Uuid>,
    Json(body): Json<ChangeStatusRequest>,
) -> impl IntoResponse {
    let service = SeasonService::new(state.db.clone());

    match service.change_status(user.user_id, season_id, body.status).await {
        Ok(season) => (
            StatusCode::OK,
            Json(ApiResponse::with_message("Season status updated", season)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a season
pub async fn delete_season(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(season_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = SeasonService::new(state.db.clone());

    match service.delete_season(user.user_id, season_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
