//! Traceability and QR handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::external::BlockchainClient;
use crate::middleware::CurrentUser;
use crate::services::TraceabilityService;
use crate::AppState;
use shared::types::ApiResponse;

/// Public traceability view for a QR code scan (unauthenticated)
pub async fn get_traceability_view(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let blockchain = BlockchainClient::new(&state.config.blockchain);
    let service = TraceabilityService::new(state.db.clone(), blockchain);

    match service.get_trace_view(&code).await {
        Ok(view) => (StatusCode::OK, Json(ApiResponse::ok(view))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// QR payload for a product; owner only
pub async fn get_qr_payload(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let blockchain = BlockchainClient::new(&state.config.blockchain);
    let service = TraceabilityService::new(state.db.clone(), blockchain);

    match service
        .get_qr_payload(user.user_id, product_id, &state.config.trace_base_url)
        .await
    {
        Ok(payload) => (StatusCode::OK, Json(ApiResponse::ok(payload))).into_response(),
        Err(e) => e.into_response(),
    }
}
