pub mod server;

pub mod error;
pub mod types;

pub mod assets;
pub mod catalog;
pub mod ids;
pub mod search;

pub use crate::assets::AssetStore;
pub use crate::catalog::CatalogStore;
pub use crate::error::{CatalogError, CatalogResult};
pub use crate::types::{Item, NewItem};
