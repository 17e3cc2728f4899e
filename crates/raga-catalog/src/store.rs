//! Atomically swappable catalogue snapshots

use crate::error::CatalogueError;
use crate::format::Catalogue;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Shared handle to the current catalogue.
///
/// Readers take an `Arc` snapshot and never observe a half-applied reload:
/// a new catalogue is parsed completely before it replaces the old one.
#[derive(Debug, Default)]
pub struct CatalogueStore {
    current: RwLock<Arc<Catalogue>>,
}

impl CatalogueStore {
    pub fn new(catalogue: Catalogue) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalogue)),
        }
    }

    /// Initial load; a bad source yields an empty catalogue
    pub fn open(path: &Path) -> Self {
        Self::new(Catalogue::load_or_empty(path))
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Catalogue> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swap in a new catalogue
    pub fn replace(&self, catalogue: Catalogue) {
        let next = Arc::new(catalogue);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Re-read `path`. On failure the previous snapshot stays in place.
    pub fn reload(&self, path: &Path) -> Result<usize, CatalogueError> {
        let catalogue = Catalogue::load(path)?;
        let count = catalogue.len();
        self.replace(catalogue);
        Ok(count)
    }
}
