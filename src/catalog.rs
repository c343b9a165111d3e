//! File-backed catalog store.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{CatalogError, CatalogResult};
use crate::ids::next_id;
use crate::types::{Item, NewItem};

/// On-disk shape of the catalog document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    items: Vec<Item>,
}

/// Durable, insertion-ordered item store backed by a single JSON document.
///
/// `append` is the only read-modify-write operation; it runs under an
/// async mutex spanning "load current catalog, compute next id, persist"
/// so concurrent creations never duplicate ids and never overwrite each
/// other. Reads go straight to the last atomically renamed document and
/// take no lock.
pub struct CatalogStore {
    path: PathBuf,
    append_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            append_lock: Mutex::new(()),
        }
    }

    /// Returns the current catalog in insertion order.
    ///
    /// A missing document is an empty catalog, not an error.
    pub async fn load(&self) -> CatalogResult<Vec<Item>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => {
                return Err(CatalogError::Storage(format!(
                    "failed to read catalog {}: {error}",
                    self.path.display()
                )))
            }
        };
        let document: CatalogDocument = serde_json::from_slice(&bytes)
            .map_err(|error| CatalogError::Storage(format!("catalog parse error: {error}")))?;
        Ok(document.items)
    }

    /// Creates and persists a new item, returning it with its assigned id
    /// and creation timestamp.
    pub async fn append(&self, fields: NewItem) -> CatalogResult<Item> {
        let _guard = self.append_lock.lock().await;
        let mut items = self.load().await?;
        let item = Item {
            id: next_id(&items),
            title: fields.title,
            description: fields.description,
            category: fields.category,
            tags: fields.tags,
            image_url: fields.image_url,
            created_at: chrono::Utc::now(),
        };
        items.push(item.clone());
        self.persist(items).await?;
        tracing::info!("catalog item {} created", item.id);
        Ok(item)
    }

    /// Looks up a single item by id.
    pub async fn get(&self, id: u64) -> CatalogResult<Item> {
        self.load()
            .await?
            .into_iter()
            .find(|item| item.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("item {id} not found")))
    }

    /// Sorted distinct non-empty categories across the catalog.
    pub async fn categories(&self) -> CatalogResult<Vec<String>> {
        let items = self.load().await?;
        let mut categories: Vec<String> = items
            .into_iter()
            .map(|item| item.category)
            .filter(|category| !category.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    // Serialize to a sibling temp file, then rename over the previous
    // document. Readers never observe a partial write; a failure leaves
    // the prior document untouched.
    async fn persist(&self, items: Vec<Item>) -> CatalogResult<()> {
        let document = CatalogDocument { items };
        let serialized = serde_json::to_vec_pretty(&document)
            .map_err(|error| CatalogError::Storage(format!("catalog serialize error: {error}")))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                CatalogError::Storage(format!(
                    "failed to create catalog directory {}: {error}",
                    parent.display()
                ))
            })?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serialized).await.map_err(|error| {
            CatalogError::Storage(format!(
                "failed to write catalog {}: {error}",
                tmp.display()
            ))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|error| {
            CatalogError::Storage(format!(
                "failed to replace catalog {}: {error}",
                self.path.display()
            ))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn fields(title: &str, category: &str) -> NewItem {
        NewItem {
            title: title.to_string(),
            description: format!("{title} description"),
            category: category.to_string(),
            tags: vec!["tag".to_string()],
            image_url: None,
        }
    }

    #[tokio::test]
    async fn fresh_store_loads_empty() {
        let dir = tempdir().expect("tempdir");
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        let items = store.load().await.expect("load");
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn append_assigns_sequential_ids() {
        let dir = tempdir().expect("tempdir");
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        let first = store.append(fields("first", "a")).await.expect("append");
        let second = store.append(fields("second", "b")).await.expect("append");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn items_round_trip_through_a_reload() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        let created = {
            let store = CatalogStore::new(path.clone());
            store
                .append(NewItem {
                    title: "Rust in Action".to_string(),
                    description: "systems programming".to_string(),
                    category: "books".to_string(),
                    tags: vec!["rust".to_string(), "systems".to_string()],
                    image_url: Some("/uploads/cover.png".to_string()),
                })
                .await
                .expect("append")
        };

        let reopened = CatalogStore::new(path);
        let loaded = reopened.get(created.id).await.expect("get");
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn get_unknown_id_is_not_found() {
        let dir = tempdir().expect("tempdir");
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        let err = store.get(42).await.expect_err("missing item");
        match err {
            CatalogError::NotFound(_) => {}
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn categories_are_sorted_and_distinct() {
        let dir = tempdir().expect("tempdir");
        let store = CatalogStore::new(dir.path().join("catalog.json"));
        store.append(fields("a", "web")).await.expect("append");
        store.append(fields("b", "books")).await.expect("append");
        store.append(fields("c", "web")).await.expect("append");
        store.append(fields("d", "")).await.expect("append");

        let categories = store.categories().await.expect("categories");
        assert_eq!(categories, vec!["books".to_string(), "web".to_string()]);
    }

    #[tokio::test]
    async fn no_temp_file_left_after_append() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("catalog.json");
        let store = CatalogStore::new(path.clone());
        store.append(fields("only", "a")).await.expect("append");
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_yield_unique_ids() {
        let dir = tempdir().expect("tempdir");
        let store = Arc::new(CatalogStore::new(dir.path().join("catalog.json")));

        let mut handles = Vec::new();
        for n in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(fields(&format!("item {n}"), "load")).await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            let item = handle.await.expect("join").expect("append");
            ids.push(item.id);
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<u64>>());

        let persisted = store.load().await.expect("load");
        assert_eq!(persisted.len(), 16);
    }
}
