use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::EntityTrait;
use serde::Deserialize;
use serde_json::json;

use super::domain_error_response;
use crate::auth::Claims;
use crate::domain::{CollectionFilter, CollectionPatch, NewCollectionEntry};
use crate::infrastructure::AppState;
use crate::models::collection_entry::STATUSES;
use crate::models::user::Entity as User;

#[derive(Deserialize)]
pub struct CollectionQuery {
    status: Option<String>,
    faction: Option<String>,
    station: Option<String>,
}

fn validate_status(status: &str) -> bool {
    STATUSES.contains(&status)
}

fn validate_quantity(quantity: i32) -> bool {
    (1..=100).contains(&quantity)
}

pub async fn add_entry(
    State(state): State<AppState>,
    claims: Claims,
    Json(payload): Json<NewCollectionEntry>,
) -> impl IntoResponse {
    if let Some(status) = &payload.status {
        if !validate_status(status) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid status '{}'", status) })),
            )
                .into_response();
        }
    }
    if let Some(quantity) = payload.quantity {
        if !validate_quantity(quantity) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Quantity must be between 1 and 100" })),
            )
                .into_response();
        }
    }

    match state.catalog_repo.find_by_id(payload.miniature_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Miniature not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    }

    // Friendly probe; the UNIQUE(user_id, miniature_id) constraint still
    // catches a concurrent duplicate inside `add`.
    match state
        .collection_repo
        .user_owns(claims.uid, payload.miniature_id)
        .await
    {
        Ok(false) => {}
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "This miniature is already in your collection; update the existing entry instead"
                })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    }

    match state.collection_repo.add(claims.uid, payload).await {
        Ok(entry) => (StatusCode::CREATED, Json(json!({ "entry": entry }))).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn my_collection(
    State(state): State<AppState>,
    claims: Claims,
    Query(query): Query<CollectionQuery>,
) -> impl IntoResponse {
    if let Some(status) = &query.status {
        if !validate_status(status) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid status '{}'", status) })),
            )
                .into_response();
        }
    }

    let filter = CollectionFilter {
        status: query.status,
        faction: query.faction,
        station: query.station,
    };

    match state.collection_repo.find_by_user(claims.uid, filter).await {
        Ok(entries) => {
            let total = entries.len();
            (
                StatusCode::OK,
                Json(json!({ "entries": entries, "total": total })),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

pub async fn my_stats(State(state): State<AppState>, claims: Claims) -> impl IntoResponse {
    let stats = match state.collection_repo.stats(claims.uid).await {
        Ok(s) => s,
        Err(e) => return domain_error_response(e),
    };

    let factions = match state.collection_repo.faction_breakdown(claims.uid).await {
        Ok(f) => f,
        Err(e) => return domain_error_response(e),
    };

    (
        StatusCode::OK,
        Json(json!({ "stats": stats, "factions": factions })),
    )
        .into_response()
}

pub async fn user_collection(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> impl IntoResponse {
    match User::find_by_id(user_id).one(state.db()).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e.into()),
    }

    let entries = match state
        .collection_repo
        .find_by_user(user_id, CollectionFilter::default())
        .await
    {
        Ok(entries) => entries,
        Err(e) => return domain_error_response(e),
    };

    let stats = match state.collection_repo.stats(user_id).await {
        Ok(s) => s,
        Err(e) => return domain_error_response(e),
    };

    let factions = match state.collection_repo.faction_breakdown(user_id).await {
        Ok(f) => f,
        Err(e) => return domain_error_response(e),
    };

    let total = entries.len();
    (
        StatusCode::OK,
        Json(json!({
            "entries": entries,
            "total": total,
            "stats": stats,
            "factions": factions,
        })),
    )
        .into_response()
}

pub async fn update_entry(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(patch): Json<CollectionPatch>,
) -> impl IntoResponse {
    if let Some(status) = &patch.status {
        if !validate_status(status) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Invalid status '{}'", status) })),
            )
                .into_response();
        }
    }
    if let Some(quantity) = patch.quantity {
        if !validate_quantity(quantity) {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Quantity must be between 1 and 100" })),
            )
                .into_response();
        }
    }

    let existing = match state.collection_repo.find_by_id(id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Collection entry not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    };

    if existing.user_id != claims.uid {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Access denied" })),
        )
            .into_response();
    }

    match state.collection_repo.update(id, patch).await {
        Ok(entry) => (StatusCode::OK, Json(json!({ "entry": entry }))).into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn remove_entry(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let existing = match state.collection_repo.find_by_id(id).await {
        Ok(Some(entry)) => entry,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Collection entry not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    };

    if existing.user_id != claims.uid {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Access denied" })),
        )
            .into_response();
    }

    match state.collection_repo.remove(id).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({ "message": "Entry removed from collection" })),
        )
            .into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Collection entry not found" })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}
