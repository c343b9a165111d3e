//! Validated storage for uploaded image assets.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};

/// Maximum accepted upload size, boundary inclusive.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Reference to a stored asset, returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct StoredAsset {
    pub filename: String,
    pub url: String,
    pub size: usize,
    pub uploaded_at: DateTime<Utc>,
}

/// Write-once storage for uploaded images.
///
/// Every stored file gets a fresh uuid-v4 name, so concurrent writes
/// never contend and need no locking. Files are immutable once written;
/// nothing garbage-collects assets whose item creation later failed.
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Direct upload path: checks the content-type family, then the size
    /// cap, then the extension allow-list, each a distinct rejection.
    pub async fn store_upload(
        &self,
        content: &[u8],
        content_type: &str,
        filename: &str,
    ) -> CatalogResult<StoredAsset> {
        if !content_type.starts_with("image/") {
            return Err(CatalogError::Validation(format!(
                "only image uploads are accepted, got content-type {content_type:?}"
            )));
        }
        self.store_image(content, filename).await
    }

    /// Item-creation path. Skips the content-type check (the extension
    /// gate is the only type filter here), matching the direct-upload
    /// path on size and extension.
    pub async fn store_image(&self, content: &[u8], filename: &str) -> CatalogResult<StoredAsset> {
        if content.len() > MAX_UPLOAD_BYTES {
            return Err(CatalogError::Validation(format!(
                "upload of {} bytes exceeds the {MAX_UPLOAD_BYTES} byte limit",
                content.len()
            )));
        }
        let extension = validate_extension(filename)?;
        let unique = format!("{}{extension}", Uuid::new_v4());
        let path = self.dir.join(&unique);

        tokio::fs::create_dir_all(&self.dir).await.map_err(|error| {
            CatalogError::Storage(format!(
                "failed to create upload directory {}: {error}",
                self.dir.display()
            ))
        })?;
        tokio::fs::write(&path, content).await.map_err(|error| {
            CatalogError::Storage(format!(
                "failed to write asset {}: {error}",
                path.display()
            ))
        })?;

        tracing::info!("stored asset {unique} ({} bytes)", content.len());
        Ok(StoredAsset {
            url: format!("/uploads/{unique}"),
            filename: unique,
            size: content.len(),
            uploaded_at: Utc::now(),
        })
    }
}

/// Extracts the lower-cased extension (dot included) and checks it
/// against the allow-list.
fn validate_extension(filename: &str) -> CatalogResult<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(CatalogError::Validation(format!(
            "unsupported image extension in {filename:?} (jpg, jpeg, png, gif, webp only)"
        )))
    }
}
