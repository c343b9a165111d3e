use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One searchable catalog entry.
///
/// Items are created only through [`crate::CatalogStore::append`] and are
/// never mutated or deleted afterwards; `id` and `created_at` are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
    /// Tag order is insignificant for matching but preserved for display.
    pub tags: Vec<String>,
    /// Reference produced by asset ingestion (`/uploads/<name>`), if an
    /// image was supplied.
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}
