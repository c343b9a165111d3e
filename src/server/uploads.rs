//! Direct image upload and asset serving endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;

use crate::assets::StoredAsset;
use crate::server::error::ApiError;
use crate::server::ServerState;

/// POST /upload — ingests the `image` multipart part and returns the
/// stored asset reference.
pub(crate) async fn upload(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> Result<Json<StoredAsset>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::bad_request(format!("invalid multipart body: {error}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|error| ApiError::bad_request(format!("invalid multipart body: {error}")))?;
        let stored = state
            .assets
            .store_upload(&bytes, &content_type, &filename)
            .await?;
        return Ok(Json(stored));
    }
    Err(ApiError::bad_request("missing multipart field: image"))
}

/// GET /uploads/{filename} — serves a stored asset.
pub(crate) async fn serve(
    State(state): State<Arc<ServerState>>,
    Path(filename): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let base = state
        .assets
        .dir()
        .canonicalize()
        .map_err(|_| ApiError::not_found("asset not found"))?;
    let resolved = base
        .join(&filename)
        .canonicalize()
        .map_err(|_| ApiError::not_found("asset not found"))?;

    // Path traversal guard
    if !resolved.starts_with(&base) {
        return Err(ApiError::forbidden("path traversal denied"));
    }

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(|_| ApiError::not_found("asset not found"))?;

    // Stored names always carry a lower-cased allow-listed extension.
    let content_type = match resolved
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
    {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(bytes))
        .map_err(|error| ApiError::internal(error.to_string()))
}
