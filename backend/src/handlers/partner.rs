//! Partner suggestion handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::middleware::CurrentUser;
use crate::services::MatchingService;
use crate::AppState;
use shared::matching::MatchCriteria;
use shared::types::ApiResponse;

/// Suggest ranked partner candidates for the calling farmer or business
pub async fn suggest_partners(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(criteria): Json<MatchCriteria>,
) -> impl IntoResponse {
    let service = MatchingService::new(state.db.clone());

    match service.suggest_partners(user.user_id, criteria).await {
        Ok(matches) => (StatusCode::OK, Json(ApiResponse::ok(matches))).into_response(),
        Err(e) => e.into_response(),
    }
}
