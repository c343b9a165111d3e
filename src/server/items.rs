//! Item, search, and category endpoints.

use std::sync::Arc;

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::search::{self, SearchParams};
use crate::server::error::ApiError;
use crate::server::ServerState;
use crate::types::{Item, NewItem};

/// Query parameters for GET /search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub q: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
}

/// Response body for GET /search.
///
/// `total_results` counts the returned (capped) results, not the matches
/// before truncation.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: Option<String>,
    pub category: Option<String>,
    pub total_results: usize,
    pub results: Vec<Item>,
}

/// GET / — service banner and endpoint map.
pub(crate) async fn root() -> Json<Value> {
    Json(json!({
        "message": "catalog server is running",
        "server": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "search": "/search",
            "items": "/items",
            "upload": "/upload",
            "uploads": "/uploads",
            "categories": "/categories"
        }
    }))
}

/// GET /health
pub(crate) async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now()
    }))
}

/// GET /search — filters a catalog snapshot by query and category.
pub(crate) async fn search(
    State(state): State<Arc<ServerState>>,
    Query(request): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let items = state.catalog.load().await?;
    let params = SearchParams {
        q: request.q.clone(),
        category: request.category.clone(),
        limit: request.limit,
    };
    let results = search::search(&items, &params);
    Ok(Json(SearchResponse {
        query: request.q,
        category: request.category,
        total_results: results.len(),
        results,
    }))
}

/// GET /items — full catalog snapshot in insertion order.
pub(crate) async fn list(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    Ok(Json(state.catalog.load().await?))
}

/// GET /items/{id}
pub(crate) async fn get_one(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<u64>,
) -> Result<Json<Item>, ApiError> {
    Ok(Json(state.catalog.get(id).await?))
}

/// GET /categories — sorted distinct non-empty categories.
pub(crate) async fn categories(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog.categories().await?))
}

/// POST /items — multipart form with `title`, `description`, `category`,
/// repeated `tags` fields and an optional `image` file part.
///
/// A supplied image is ingested first; only once its reference exists is
/// the item appended. An append failure can therefore orphan the asset,
/// which is accepted (no garbage collection).
pub(crate) async fn create(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> Result<Json<Item>, ApiError> {
    let mut title = None;
    let mut description = None;
    let mut category = None;
    let mut tags = Vec::new();
    let mut image: Option<(Vec<u8>, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::bad_request(format!("invalid multipart body: {error}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(text(field).await?),
            "description" => description = Some(text(field).await?),
            "category" => category = Some(text(field).await?),
            "tags" => tags.push(text(field).await?),
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|error| {
                    ApiError::bad_request(format!("invalid multipart body: {error}"))
                })?;
                // Browsers send an empty file part when no file was chosen.
                if !filename.is_empty() || !bytes.is_empty() {
                    image = Some((bytes.to_vec(), filename));
                }
            }
            _ => {}
        }
    }

    let title = title.ok_or_else(|| ApiError::bad_request("missing field: title"))?;
    let description =
        description.ok_or_else(|| ApiError::bad_request("missing field: description"))?;
    let category = category.ok_or_else(|| ApiError::bad_request("missing field: category"))?;

    let image_url = match image {
        Some((bytes, filename)) => Some(state.assets.store_image(&bytes, &filename).await?.url),
        None => None,
    };

    let item = state
        .catalog
        .append(NewItem {
            title,
            description,
            category,
            tags,
            image_url,
        })
        .await?;
    Ok(Json(item))
}

async fn text(field: Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|error| ApiError::bad_request(format!("invalid multipart field: {error}")))
}
