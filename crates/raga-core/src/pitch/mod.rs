//! Fundamental frequency estimation
//!
//! The analysis core only needs a time-ordered list of voiced frequencies.
//! Estimators produce one optional frequency per frame; `None` marks frames
//! with no detectable pitch.

mod yin;

pub use yin::YinEstimator;

use crate::error::{RagaError, Result};

/// Lowest frequency searched by default (C2)
pub const DEFAULT_FMIN_HZ: f32 = 65.41;

/// Highest frequency searched by default (C6)
pub const DEFAULT_FMAX_HZ: f32 = 1046.50;

/// Search range for the fundamental
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRange {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl FrequencyRange {
    pub fn new(min_hz: f32, max_hz: f32) -> Result<Self> {
        if !(min_hz.is_finite() && max_hz.is_finite()) || min_hz <= 0.0 || min_hz >= max_hz {
            return Err(RagaError::InvalidConfig(format!(
                "frequency range must satisfy 0 < min < max, got {}..{}",
                min_hz, max_hz
            )));
        }
        Ok(Self { min_hz, max_hz })
    }

    pub fn contains(&self, hz: f32) -> bool {
        hz >= self.min_hz && hz <= self.max_hz
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self {
            min_hz: DEFAULT_FMIN_HZ,
            max_hz: DEFAULT_FMAX_HZ,
        }
    }
}

/// A monophonic pitch tracker
pub trait PitchEstimator: Send + Sync {
    /// Estimate one frequency per analysis frame
    fn estimate(
        &self,
        samples: &[f32],
        sample_rate: u32,
        range: FrequencyRange,
    ) -> Result<Vec<Option<f32>>>;
}

/// Drop unvoiced frames and anything that is not a positive finite frequency
pub fn voiced_frequencies(track: &[Option<f32>]) -> Vec<f64> {
    track
        .iter()
        .flatten()
        .filter(|f| f.is_finite() && **f > 0.0)
        .map(|&f| f as f64)
        .collect()
}
