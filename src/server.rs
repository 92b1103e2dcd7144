use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::infrastructure::AppState;

/// Find an available port starting from the preferred port
pub fn find_available_port(preferred_port: u16) -> Option<u16> {
    // Try preferred port first
    if TcpListener::bind(("0.0.0.0", preferred_port)).is_ok() {
        return Some(preferred_port);
    }

    // Scan next 100 ports
    ((preferred_port + 1)..(preferred_port + 100))
        .find(|&port| TcpListener::bind(("0.0.0.0", port)).is_ok())
}

/// Assembles the full application router: the JSON API under /api,
/// uploaded photos served statically, CORS and request tracing.
pub fn build_router(state: AppState, config: &Config) -> Router {
    let mut cors_allowed_origins = Vec::new();
    for origin in &config.cors_allowed_origins {
        match origin.parse::<axum::http::HeaderValue>() {
            Ok(v) => cors_allowed_origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    let cors = if cors_allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(cors_allowed_origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let upload_dir = state.upload_dir.clone();

    Router::new()
        .nest("/api", api::api_router(state))
        .nest_service("/uploads/photos", ServeDir::new(upload_dir))
        // Multipart photo uploads exceed the 2MB default
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
