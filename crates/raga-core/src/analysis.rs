//! End-to-end analysis: frequencies -> cents -> swara set -> ranked ragas

use crate::audio;
use crate::cents::{normalize, CentTrajectory};
use crate::config::AnalysisConfig;
use crate::error::{RagaError, Result};
use crate::matching::{MatchResult, RagaMatcher};
use crate::pitch::{voiced_frequencies, PitchEstimator, YinEstimator};
use crate::swara::{swara_name, Occupancy, SwaraTable, CARNATIC_TABLE};
use crate::tonic::Tonic;
use raga_catalog::{Catalogue, SwaraSet, SWARA_COUNT};
use serde::Serialize;
use std::path::Path;

/// Everything computed for one performance
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Tonic actually reported: the override when given, else the derived
    /// median (0 for an empty trajectory)
    pub tonic_hz: f64,
    pub trajectory: CentTrajectory,
    pub occupancy: Occupancy,
    pub present: SwaraSet,
    pub matches: Vec<MatchResult>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.trajectory.is_empty()
    }

    pub fn into_report(self, include_trajectory: bool) -> AnalysisReport {
        AnalysisReport {
            status: "success",
            tonic_hz_used: format!("{:.2}", self.tonic_hz),
            swara_indices_present: self.present.to_indices(),
            swara_names_present: self.present.iter().map(swara_name).collect(),
            matched_ragas: self.matches,
            empty_trajectory: self.trajectory.is_empty(),
            swara_histogram: *self.occupancy.counts(),
            cent_trajectory: include_trajectory.then_some(self.trajectory.cents),
        }
    }
}

/// Serializable analysis response
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub status: &'static str,
    /// Two-decimal tonic in Hz
    pub tonic_hz_used: String,
    pub swara_indices_present: Vec<usize>,
    pub swara_names_present: Vec<&'static str>,
    pub matched_ragas: Vec<MatchResult>,
    pub empty_trajectory: bool,
    pub swara_histogram: [usize; SWARA_COUNT],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cent_trajectory: Option<Vec<f64>>,
}

/// Run the swara pipeline on voiced frequencies (Hz, gaps already removed)
pub fn analyze_trajectory(
    frequencies: &[f64],
    tonic: Option<Tonic>,
    catalogue: &Catalogue,
    config: &AnalysisConfig,
) -> Analysis {
    analyze_with_table(frequencies, tonic, catalogue, config, CARNATIC_TABLE)
}

/// As [`analyze_trajectory`], against a custom swara table
pub fn analyze_with_table(
    frequencies: &[f64],
    tonic: Option<Tonic>,
    catalogue: &Catalogue,
    config: &AnalysisConfig,
    table: SwaraTable<'_>,
) -> Analysis {
    let trajectory = normalize(frequencies, tonic);
    if trajectory.is_empty() {
        log::debug!("No voiced pitch; ranking on missing swaras only");
    }

    let occupancy = table.occupancy(&trajectory.cents);
    let present = occupancy.present(config.occupancy_threshold);
    let matches = RagaMatcher::new(config.top_n).rank(&present, catalogue);

    log::debug!(
        "Tonic {:.2} Hz, {} samples, swaras {:?}",
        trajectory.tonic_hz,
        trajectory.len(),
        present
    );

    Analysis {
        tonic_hz: tonic.map_or(trajectory.tonic_hz, Tonic::hz),
        trajectory,
        occupancy,
        present,
        matches,
    }
}

/// Pitch tracking plus the swara pipeline
pub struct Analyzer<E: PitchEstimator = YinEstimator> {
    config: AnalysisConfig,
    estimator: E,
}

impl Analyzer<YinEstimator> {
    /// Analyzer using the YIN tracker configured from `config`
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let estimator = YinEstimator::from_config(&config);
        Self::with_estimator(config, estimator)
    }
}

impl<E: PitchEstimator> Analyzer<E> {
    pub fn with_estimator(config: AnalysisConfig, estimator: E) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze mono samples
    pub fn analyze_samples(
        &self,
        samples: &[f32],
        sample_rate: u32,
        tonic: Option<Tonic>,
        catalogue: &Catalogue,
    ) -> Result<Analysis> {
        let range = self.config.frequency_range()?;
        let track = self.estimator.estimate(samples, sample_rate, range)?;
        let frequencies = voiced_frequencies(&track);

        log::debug!("{} of {} frames voiced", frequencies.len(), track.len());

        Ok(analyze_trajectory(&frequencies, tonic, catalogue, &self.config))
    }

    /// Decode an audio file and analyze it
    pub fn analyze_file(
        &self,
        path: &Path,
        tonic: Option<Tonic>,
        catalogue: &Catalogue,
    ) -> Result<Analysis> {
        let audio = audio::decode_audio(path, self.config.sample_rate)
            .map_err(|e| RagaError::Decode(format!("{:#}", e)))?;

        log::info!(
            "Analyzing {}: {:.1}s @ {} Hz",
            path.display(),
            audio.duration_ms as f64 / 1000.0,
            audio.sample_rate
        );

        self.analyze_samples(&audio.samples, audio.sample_rate, tonic, catalogue)
    }
}
