use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::domain_error_response;
use crate::domain::CatalogFilter;
use crate::infrastructure::AppState;
use crate::models::miniature::BASE_SIZES;

#[derive(Deserialize)]
pub struct CatalogQuery {
    faction: Option<String>,
    station: Option<String>,
    base_size: Option<String>,
    keyword: Option<String>,
    box_name: Option<String>,
    search: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    limit: Option<u32>,
}

pub async fn list_miniatures(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> impl IntoResponse {
    let filter = CatalogFilter {
        faction: query.faction,
        station: query.station,
        base_size: query.base_size,
        keyword: query.keyword,
        box_name: query.box_name,
        search: query.search,
    };

    match state.catalog_repo.find_all(filter).await {
        Ok(miniatures) => {
            let total = miniatures.len();
            (
                StatusCode::OK,
                Json(json!({ "miniatures": miniatures, "total": total })),
            )
                .into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

pub async fn search_miniatures(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let q = query.q.unwrap_or_default();
    if q.trim().is_empty() {
        return (StatusCode::OK, Json(json!({ "suggestions": [] }))).into_response();
    }

    let limit = query.limit.unwrap_or(10).clamp(1, 50);

    match state.catalog_repo.search(q.trim(), limit).await {
        Ok(suggestions) => {
            (StatusCode::OK, Json(json!({ "suggestions": suggestions }))).into_response()
        }
        Err(e) => domain_error_response(e),
    }
}

pub async fn filter_options(State(state): State<AppState>) -> impl IntoResponse {
    let factions = match state.catalog_repo.list_factions().await {
        Ok(v) => v,
        Err(e) => return domain_error_response(e),
    };
    let stations = match state.catalog_repo.list_stations().await {
        Ok(v) => v,
        Err(e) => return domain_error_response(e),
    };
    let keywords = match state.catalog_repo.list_keywords().await {
        Ok(v) => v,
        Err(e) => return domain_error_response(e),
    };
    let box_names = match state.catalog_repo.list_box_names().await {
        Ok(v) => v,
        Err(e) => return domain_error_response(e),
    };

    (
        StatusCode::OK,
        Json(json!({
            "factions": factions,
            "stations": stations,
            "keywords": keywords,
            "box_names": box_names,
            "base_sizes": BASE_SIZES,
        })),
    )
        .into_response()
}

pub async fn get_miniature(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let miniature = match state.catalog_repo.find_by_id(id).await {
        Ok(Some(miniature)) => miniature,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Miniature not found" })),
            )
                .into_response()
        }
        Err(e) => return domain_error_response(e),
    };

    match state.catalog_repo.statistics(id).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(json!({ "miniature": miniature, "stats": stats })),
        )
            .into_response(),
        Err(e) => domain_error_response(e),
    }
}

pub async fn get_statistics(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.catalog_repo.find_by_id(id).await {
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

    match state.catalog_repo.statistics(id).await {
        Ok(stats) => (StatusCode::OK, Json(json!({ "stats": stats }))).into_response(),
        Err(e) => domain_error_response(e),
    }
}
