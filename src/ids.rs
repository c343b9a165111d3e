//! Next-id computation for catalog items.

use crate::types::Item;

/// Returns the id the next item should receive: `max(existing ids) + 1`,
/// or 1 for an empty catalog.
///
/// Pure function; only correct when called inside the store's append
/// critical section. Two callers racing on the same snapshot would both
/// receive the same id.
pub fn next_id(items: &[Item]) -> u64 {
    items.iter().map(|item| item.id).max().unwrap_or(0) + 1
}
