//! Tonic (Sa) frequency

use crate::error::{RagaError, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Reference pitch in Hz; always finite and > 0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Tonic(f64);

impl Tonic {
    pub fn new(hz: f64) -> Result<Self> {
        if hz.is_finite() && hz > 0.0 {
            Ok(Self(hz))
        } else {
            Err(RagaError::InvalidTonicFormat(hz.to_string()))
        }
    }

    /// Parse a user-supplied override such as `"146.83"` or `" 220 "`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let hz: f64 = trimmed
            .parse()
            .map_err(|_| RagaError::InvalidTonicFormat(input.to_string()))?;
        Self::new(hz).map_err(|_| RagaError::InvalidTonicFormat(input.to_string()))
    }

    /// Median of a non-empty frequency sequence; `None` when there is nothing
    /// to take the median of.
    pub fn median_of(frequencies: &[f64]) -> Option<Self> {
        if frequencies.is_empty() {
            return None;
        }
        let mut sorted = frequencies.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };
        Self::new(median).ok()
    }

    pub fn hz(self) -> f64 {
        self.0
    }
}

impl FromStr for Tonic {
    type Err = RagaError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Tonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} Hz", self.0)
    }
}
