//! Product listing handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::middleware::CurrentUser;
use crate::services::product::{
    CreateProductInput, ProductFilter, ProductService, UpdateProductInput,
};
use crate::AppState;
use shared::models::UserRole;
use shared::types::ApiResponse;

/// Public catalogue listing with optional category and farmer filters
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.list_products(filter).await {
        Ok(products) => (StatusCode::OK, Json(ApiResponse::ok(products))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a product by ID
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.get_product(product_id).await {
        Ok(product) => (StatusCode::OK, Json(ApiResponse::ok(product))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a product listing
pub async fn create_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> impl IntoResponse {
    if let Err(e) = user.require_role(&[UserRole::Farmer]) {
        return e.into_response();
    }

    let service = ProductService::new(state.db.clone());

    match service.create_product(user.user_id, input).await {
        Ok(product) => (
            StatusCode::CREATED,
            Json(ApiResponse::with_message("Product created", product)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update a product listing
pub async fn update_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.update_product(user.user_id, product_id, input).await {
        Ok(product) => (StatusCode::OK, Json(ApiResponse::ok(product))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a product listing
pub async fn delete_product(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(product_id): Path<Uuid>,
) -> impl IntoResponse {
    let service = ProductService::new(state.db.clone());

    match service.delete_product(user.user_id, product_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
