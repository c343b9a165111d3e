use std::fmt;

/// Unified error type for the catalogd crate.
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// The requested item does not exist.
    NotFound(String),
    /// Rejected input, detected before any durable write.
    Validation(String),
    /// Read/write failure on the catalog document or an asset file.
    Storage(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(msg) => write!(f, "not found: {msg}"),
            CatalogError::Validation(msg) => write!(f, "validation failed: {msg}"),
            CatalogError::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Result type alias using [`CatalogError`].
pub type CatalogResult<T> = Result<T, CatalogError>;
