//! Catalogue loading errors

use thiserror::Error;

/// Reasons a catalogue source could not be turned into a [`crate::Catalogue`].
///
/// Every variant is a flavour of "catalogue unavailable": callers that must
/// keep serving degrade to an empty catalogue instead of failing.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalogue: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("raga '{raga}' lists swara index {index}, expected 0..=11")]
    IndexOutOfRange { raga: String, index: i64 },

    #[error("raga '{0}' is defined more than once")]
    DuplicateName(String),
}
