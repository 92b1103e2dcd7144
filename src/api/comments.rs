use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::domain_error_response;
use crate::auth::Claims;
use crate::infrastructure::AppState;

#[derive(Deserialize)]
pub struct AddCommentRequest {
    content: String,
}

pub async fn add_comment(
    State(state): State<AppState>,
    claims: Claims,
    Path(photo_id): Path<i32>,
    Json(payload): Json<AddCommentRequest>,
) -> impl IntoResponse {
    let content = payload.content.trim().to_string();
    if content.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Comment cannot be empty" })),
        )
            .into_response();
    }
    if content.len() > 1000 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Comment must be at most 1000 characters" })),
        )
            .into_response();
    }

    match state.photo_repo.find_by_id(photo_id, None).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Photo not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    }

    match state
        .social_repo
        .add_comment(claims.uid, photo_id, content)
        .await
    {
        Ok(comment) => (StatusCode::CREATED, Json(json!({ "comment": comment }))).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(photo_id): Path<i32>,
) -> impl IntoResponse {
    match state.photo_repo.find_by_id(photo_id, None).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Photo not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    }

    match state.social_repo.find_by_photo(photo_id).await {
        Ok(comments) => {
            let total = comments.len();
            (
                StatusCode::OK,
                Json(json!({ "comments": comments, "total": total })),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_comment(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let comment = match state.social_repo.find_comment(id).await {
        Ok(Some(comment)) => comment,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Comment not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    };

    if comment.user_id != claims.uid {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Access denied" })),
        )
            .into_response();
    }

    match state.social_repo.delete_comment(id).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "Comment deleted" }))).into_response(),
        Err(e) => domain_error_response(e),
    }
}
