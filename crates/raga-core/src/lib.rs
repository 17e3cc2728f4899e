//! Raga Core - swara quantification and raga matching
//!
//! A recorded melody is reduced to tonic-relative pitch classes (swaras)
//! and ranked against a catalogue of raga scale definitions:
//!
//! frequencies -> cents -> swara set -> ranked ragas
//!
//! Pitch tracking and audio decoding sit around that pipeline so whole
//! recordings can be analyzed.

pub mod analysis;
pub mod audio;
pub mod cents;
pub mod config;
pub mod error;
pub mod matching;
pub mod pitch;
pub mod swara;
pub mod tonic;

pub use analysis::{analyze_trajectory, Analysis, AnalysisReport, Analyzer};
pub use cents::{normalize, CentTrajectory};
pub use config::{AnalysisConfig, RagaConfig};
pub use error::{RagaError, Result};
pub use matching::{MatchResult, RagaMatcher};
pub use pitch::{FrequencyRange, PitchEstimator, YinEstimator};
pub use swara::{SwaraTable, CARNATIC_TABLE, SWARA_CENTS, SWARA_NAMES};
pub use tonic::Tonic;

pub use raga_catalog::{Catalogue, CatalogueStore, RagaDefinition, SwaraIndex, SwaraSet};

use std::path::Path;

/// Analyze an audio file with default settings
pub fn analyze_file(
    audio_path: &Path,
    tonic: Option<Tonic>,
    catalogue: &Catalogue,
) -> Result<AnalysisReport> {
    let analyzer = Analyzer::new(AnalysisConfig::default())?;
    let analysis = analyzer.analyze_file(audio_path, tonic, catalogue)?;
    Ok(analysis.into_report(false))
}
