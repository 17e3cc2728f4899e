//! Error types for raga analysis

use raga_catalog::CatalogueError;
use thiserror::Error;

/// Errors surfaced by the analysis core and the layer right around it.
///
/// An empty pitch trajectory is deliberately absent: it produces a defined
/// empty report rather than an error.
#[derive(Debug, Error)]
pub enum RagaError {
    /// Caller-supplied tonic is not a positive finite number
    #[error("Invalid format for 'tonic_hz': '{0}'. Must be a positive number (float/int).")]
    InvalidTonicFormat(String),

    /// Scale definitions could not be loaded
    #[error("Catalogue unavailable: {0}")]
    CatalogueUnavailable(#[from] CatalogueError),

    /// Audio could not be read or decoded
    #[error("Audio decoding failed: {0}")]
    Decode(String),

    /// The pitch estimator could not run on the decoded audio
    #[error("Pitch estimation failed: {0}")]
    PitchEstimation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RagaError {
    /// True for errors caused by the request itself rather than by the
    /// analysis machinery
    pub fn is_client_error(&self) -> bool {
        matches!(self, RagaError::InvalidTonicFormat(_))
    }
}

pub type Result<T> = std::result::Result<T, RagaError>;
