pub mod auth;
pub mod catalog;
pub mod collections;
pub mod comments;
pub mod health;
pub mod photos;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::infrastructure::AppState;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        .route("/auth/profile", put(auth::update_profile))
        .route("/users/:id", get(auth::get_public_profile))
        // Master catalog
        .route("/miniatures", get(catalog::list_miniatures))
        .route("/miniatures/search", get(catalog::search_miniatures))
        .route("/miniatures/filters/options", get(catalog::filter_options))
        .route("/miniatures/:id", get(catalog::get_miniature))
        .route("/miniatures/:id/stats", get(catalog::get_statistics))
        // Collections
        .route("/collections", post(collections::add_entry))
        .route("/collections/my-collection", get(collections::my_collection))
        .route(
            "/collections/my-collection/stats",
            get(collections::my_stats),
        )
        .route("/collections/user/:id", get(collections::user_collection))
        .route(
            "/collections/:id",
            put(collections::update_entry).delete(collections::remove_entry),
        )
        // Photos
        .route("/photos", post(photos::upload_photo))
        .route("/photos/gallery", get(photos::gallery))
        .route("/photos/user/:id", get(photos::user_photos))
        .route(
            "/photos/:id",
            get(photos::get_photo).delete(photos::delete_photo),
        )
        .route("/photos/:id/like", post(photos::toggle_like))
        .route(
            "/photos/:id/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/comments/:id", delete(comments::delete_comment))
        .with_state(state)
}

/// Maps a domain failure to its HTTP shape. Persistence details never
/// leave the server; they are logged and replaced by a generic message.
pub(crate) fn domain_error_response(err: DomainError) -> Response {
    let (status, message) = match err {
        DomainError::NotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        DomainError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        DomainError::Forbidden => (StatusCode::FORBIDDEN, "Access denied".to_string()),
        DomainError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
        DomainError::Database(msg) => {
            tracing::error!("Database error: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };

    (status, Json(json!({ "error": message }))).into_response()
}
