//! Order handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::order::{CreateOrderInput, OrderService};
use crate::AppState;
use shared::models::{OrderStatus, UserRole};
use shared::types::ApiResponse;

#[derive(Deserialize)]
pub struct ChangeOrderStatusRequest {
    pub status: OrderStatus,
}

/// Place an order against a product listing
pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateOrderInput>,
) -> impl IntoResponse {
    if let Err(e) = user.require_role(&[UserRole::Business, UserRole::Consumer]) {
        return e.into_response();
    }

    let service = OrderService::new(state.db.clone());

    match service.create_order(user.user_id, input).await {
        Ok(order) => (
            StatusCode::CREATED,
            Json(ApiResponse::with_message("Order placed", order)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// List orders where the caller is buyer or farmer
pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.list_orders(user.user_id).await {
        Ok(orders) => (StatusCode::OK, Json(ApiResponse::ok(orders))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get an order; participants only
pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.get_order(user.user_id, order_id).await {
        Ok(order) => (StatusCode::OK, Json(ApiResponse::ok(order))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Apply a lifecycle transition to an order
pub async fn change_order_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(body): Json<ChangeOrderStatusRequest>,
) -> impl IntoResponse {
    let service = OrderService::new(state.db.clone());

    match service.change_status(user.user_id, order_id, body.status).await {
        Ok(order) => (
            StatusCode::OK,
            Json(ApiResponse::with_message("Order status updated", order)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
