//! Raga catalogue library
//!
//! Scale definitions keyed by raga name, loaded from a declarative JSON
//! source and served to matchers as immutable snapshots.

pub mod error;
pub mod format;
pub mod json_format;
pub mod store;

pub use error::CatalogueError;
pub use format::{Catalogue, RagaDefinition, SwaraIndex, SwaraSet, SWARA_COUNT};
pub use store::CatalogueStore;
