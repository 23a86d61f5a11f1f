//! Route definitions for the Éden API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Weather + recommendation (public)
        .route("/weather/current", get(handlers::get_current_weather))
        // AI chat proxy (public; guarded by the service itself)
        .nest("/gemini", gemini_routes())
        // Protected routes - profile
        .nest("/profiles", profile_routes())
        // Protected routes - sector lifecycle
        .nest("/sectors", sector_routes())
}

/// AI chat routes (public)
fn gemini_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/transcribe", post(handlers::transcribe))
}

/// Profile routes (protected)
fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(handlers::get_my_profile).patch(handlers::update_my_profile),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sector lifecycle routes (protected)
fn sector_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_sectors).post(handlers::create_sector),
        )
        .route(
            "/:sector_id",
            axum::routing::put(handlers::update_sector).delete(handlers::delete_sector),
        )
        .route(
            "/:sector_id/irrigations",
            post(handlers::record_irrigation),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
