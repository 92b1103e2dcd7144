use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::domain_error_response;
use crate::auth::{Claims, OptionalClaims};
use crate::domain::{GalleryFilter, NewPhoto};
use crate::infrastructure::AppState;
use crate::models::photo::PAINTING_STATUSES;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Deserialize)]
pub struct GalleryQuery {
    page: Option<u64>,
    limit: Option<u64>,
    painting_status: Option<String>,
    is_crew_picture: Option<bool>,
    faction: Option<String>,
    miniature_id: Option<i32>,
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

fn parse_miniature_ids(raw: &str) -> Result<Vec<i32>, String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| format!("Invalid miniature id '{}'", s))
        })
        .collect()
}

pub async fn upload_photo(
    State(state): State<AppState>,
    claims: Claims,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut image: Option<(Vec<u8>, &'static str)> = None;
    let mut caption: Option<String> = None;
    let mut painting_status: Option<String> = None;
    let mut miniature_ids: Vec<i32> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": format!("Invalid multipart body: {}", e) })),
                )
                    .into_response()
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                let ext = match extension_for(&content_type) {
                    Some(ext) => ext,
                    None => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": "Image must be JPEG, PNG or WebP" })),
                        )
                            .into_response()
                    }
                };
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": format!("Failed to read image: {}", e) })),
                        )
                            .into_response()
                    }
                };
                if data.len() > MAX_IMAGE_BYTES {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": "Image must be at most 5MB" })),
                    )
                        .into_response();
                }
                image = Some((data.to_vec(), ext));
            }
            "caption" => match field.text().await {
                Ok(text) if !text.trim().is_empty() => caption = Some(text),
                Ok(_) => {}
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": format!("Invalid caption: {}", e) })),
                    )
                        .into_response()
                }
            },
            "painting_status" => match field.text().await {
                Ok(text) if !text.trim().is_empty() => painting_status = Some(text),
                Ok(_) => {}
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(json!({ "error": format!("Invalid painting status: {}", e) })),
                    )
                        .into_response()
                }
            },
            "miniature_ids" => {
                let raw = match field.text().await {
                    Ok(text) => text,
                    Err(e) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            Json(json!({ "error": format!("Invalid miniature ids: {}", e) })),
                        )
                            .into_response()
                    }
                };
                match parse_miniature_ids(&raw) {
                    Ok(ids) => miniature_ids = ids,
                    Err(msg) => {
                        return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
                            .into_response()
                    }
                }
            }
            _ => {}
        }
    }

    let (data, ext) = match image {
        Some(image) => image,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing image field" })),
            )
                .into_response()
        }
    };

    if miniature_ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "A photo must reference at least one miniature" })),
        )
            .into_response();
    }

    if let Some(caption) = &caption {
        if caption.len() > 500 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Caption must be at most 500 characters" })),
            )
                .into_response();
        }
    }

    if let Some(status) = &painting_status {
        if !PAINTING_STATUSES.contains(&status.as_str()) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid painting status '{}'", status) })),
            )
                .into_response();
        }
    }

    if let Err(e) = tokio::fs::create_dir_all(&state.upload_dir).await {
        tracing::error!("Failed to create upload directory: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response();
    }

    let filename = format!("{}.{}", Uuid::new_v4(), ext);
    let file_path = std::path::Path::new(&state.upload_dir).join(&filename);

    if let Err(e) = tokio::fs::write(&file_path, &data).await {
        tracing::error!("Failed to write photo file: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response();
    }

    let input = NewPhoto {
        miniature_ids,
        image_url: format!("/uploads/photos/{}", filename),
        caption,
        painting_status,
    };

    match state.photo_repo.create(claims.uid, input).await {
        Ok(photo) => (StatusCode::CREATED, Json(json!({ "photo": photo }))).into_response(),
        Err(e) => {
            // The photo row never landed; drop the orphaned file.
            let _ = tokio::fs::remove_file(&file_path).await;
            domain_error_response(e)
        }
    }
}

pub async fn gallery(
    State(state): State<AppState>,
    viewer: OptionalClaims,
    Query(query): Query<GalleryQuery>,
) -> impl IntoResponse {
    if let Some(status) = &query.painting_status {
        if !PAINTING_STATUSES.contains(&status.as_str()) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid painting status '{}'", status) })),
            )
                .into_response();
        }
    }

    let limit = query.limit.unwrap_or(20).clamp(1, 50);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * limit;

    let filter = GalleryFilter {
        painting_status: query.painting_status,
        is_crew_picture: query.is_crew_picture,
        faction: query.faction,
        miniature_id: query.miniature_id,
    };

    match state
        .photo_repo
        .gallery(limit, offset, viewer.user_id(), filter)
        .await
    {
        Ok(photos) => {
            let has_more = photos.len() as u64 == limit;
            (
                StatusCode::OK,
                Json(json!({
                    "photos": photos,
                    "page": page,
                    "limit": limit,
                    "has_more": has_more,
                })),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_photo(
    State(state): State<AppState>,
    viewer: OptionalClaims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let photo = match state.photo_repo.find_by_id(id, viewer.user_id()).await {
        Ok(Some(photo)) => photo,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Photo not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    };

    match state.social_repo.find_by_photo(id).await {
        Ok(comments) => (
            StatusCode::OK,
            Json(json!({ "photo": photo, "comments": comments })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn user_photos(
    State(state): State<AppState>,
    viewer: OptionalClaims,
    Path(user_id): Path<i32>,
) -> impl IntoResponse {
    match state
        .photo_repo
        .find_by_user(user_id, viewer.user_id())
        .await
    {
        Ok(photos) => {
            let total = photos.len();
            (
                StatusCode::OK,
                Json(json!({ "photos": photos, "total": total })),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

pub async fn toggle_like(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.photo_repo.find_by_id(id, None).await {
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

    let liked = match state.photo_repo.toggle_like(id, claims.uid).await {
        Ok(liked) => liked,
        Err(e) => return domain_error_response(e),
    };

    match state.photo_repo.find_by_id(id, Some(claims.uid)).await {
        Ok(Some(photo)) => (
            StatusCode::OK,
            Json(json!({ "liked": liked, "likes_count": photo.likes_count })),
        )
            .into_response(),
        Ok(None) => (StatusCode::OK, Json(json!({ "liked": liked }))).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn delete_photo(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let photo = match state.photo_repo.find_by_id(id, None).await {
        Ok(Some(photo)) => photo,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Photo not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    };

    if photo.user_id != claims.uid {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Access denied" })),
        )
            .into_response();
    }

    if let Err(e) = state.photo_repo.delete(id).await {
        return domain_error_response(e);
    }

    // Best-effort file cleanup; the row is already gone.
    if let Some(filename) = photo.image_url.rsplit('/').next() {
        let file_path = std::path::Path::new(&state.upload_dir).join(filename);
        if let Err(e) = tokio::fs::remove_file(&file_path).await {
            tracing::warn!("Failed to remove photo file {:?}: {}", file_path, e);
        }
    }

    (StatusCode::OK, Json(json!({ "message": "Photo deleted" }))).into_response()
}
