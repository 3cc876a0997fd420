//! Route definitions for the AgroConnect marketplace API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Public traceability view (unauthenticated - for QR code scanning)
        .route("/trace/:code", get(handlers::get_traceability_view))
        // Protected routes - profiles
        .nest("/profile", profile_routes())
        // Protected routes - ESG verification
        .nest("/esg", esg_routes())
        // Protected routes - seasons
        .nest("/seasons", season_routes())
        // Protected routes - images
        .nest("/images", image_routes())
        // Products - public catalogue reads, protected writes
        .nest("/products", product_routes())
        // Protected routes - orders
        .nest("/orders", order_routes())
        // Protected routes - partner matching
        .nest("/partners", partner_routes())
        // Protected routes - QR payload
        .nest("/qr", qr_routes())
}

/// Authentication routes (public except /me)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .merge(me_routes())
}

/// Current account route (protected)
fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Profile routes (protected)
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::get_my_profile).put(handlers::update_my_profile),
        )
        .route("/:user_id", get(handlers::get_profile))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// ESG verification routes (protected)
fn esg_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/verifications",
            get(handlers::list_my_verifications).post(handlers::request_verification),
        )
        .route("/verifications/pending", get(handlers::list_pending_verifications))
        .route("/verifications/:verification_id", get(handlers::get_verification))
        .route(
            "/verifications/:verification_id/review",
            post(handlers::review_verification),
        )
        .route_layer(middleware::from_fn(auth_middleware))
        // Public: latest approved verification summary for any user
        .route("/users/:user_id", get(handlers::latest_approved_esg))
}

/// Season routes (protected)
fn season_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_seasons).post(handlers::create_season))
        .route(
            "/:season_id",
            get(handlers::get_season)
                .put(handlers::update_season)
                .delete(handlers::delete_season),
        )
        .route("/:season_id/status", post(handlers::change_season_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Image routes (protected)
fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_images).post(handlers::create_image))
        .route(
            "/:image_id",
            get(handlers::get_image).delete(handlers::delete_image),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product routes; catalogue reads are public, writes require auth
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::create_product)
                .route_layer(middleware::from_fn(auth_middleware))
                .get(handlers::list_products),
        )
        .route(
            "/:product_id",
            put(handlers::update_product)
                .delete(handlers::delete_product)
                .route_layer(middleware::from_fn(auth_middleware))
                .get(handlers::get_product),
        )
}

/// Order routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/status", post(handlers::change_order_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Partner matching routes (protected)
fn partner_routes() -> Router<AppState> {
    Router::new()
        .route("/suggest", post(handlers::suggest_partners))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// QR payload routes (protected)
fn qr_routes() -> Router<AppState> {
    Router::new()
        .route("/:product_id", get(handlers::get_qr_payload))
        .route_layer(middleware::from_fn(auth_middleware))
}
