//! Stateless search over a catalog snapshot.

use crate::types::Item;

/// Result cap applied when the caller does not supply one.
pub const DEFAULT_LIMIT: usize = 10;

/// Filter parameters for a catalog search.
#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    /// Free-text query matched as a case-insensitive substring of the
    /// title, description, or any tag.
    pub q: Option<String>,
    /// Case-insensitive exact category filter (no substring match).
    pub category: Option<String>,
    /// Result cap; defaults to [`DEFAULT_LIMIT`].
    pub limit: Option<usize>,
}

/// Applies both filters conjunctively and truncates to the first `limit`
/// items in insertion order. Empty strings count as absent filters; no
/// relevance ranking is performed.
pub fn search(items: &[Item], params: &SearchParams) -> Vec<Item> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let q = params
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);
    let category = params
        .category
        .as_deref()
        .filter(|category| !category.is_empty())
        .map(str::to_lowercase);

    items
        .iter()
        .filter(|item| q.as_deref().map_or(true, |q| matches_query(item, q)))
        .filter(|item| {
            category
                .as_deref()
                .map_or(true, |category| item.category.to_lowercase() == category)
        })
        .take(limit)
        .cloned()
        .collect()
}

fn matches_query(item: &Item, q: &str) -> bool {
    item.title.to_lowercase().contains(q)
        || item.description.to_lowercase().contains(q)
        || item.tags.iter().any(|tag| tag.to_lowercase().contains(q))
}
