//! Pitch-to-cents normalization
//!
//! Converts absolute frequencies into tonic-relative cents folded into a
//! single octave, `[0, 1200)`.

use crate::tonic::Tonic;

/// Cents per octave
pub const OCTAVE_CENTS: f64 = 1200.0;

/// Tonic and folded cents for one frequency trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct CentTrajectory {
    /// Tonic in Hz; 0.0 when the input trajectory was empty
    pub tonic_hz: f64,
    pub cents: Vec<f64>,
}

impl CentTrajectory {
    /// Result for a performance with no usable pitch
    pub fn empty() -> Self {
        Self {
            tonic_hz: 0.0,
            cents: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cents.len()
    }
}

/// Distance of `frequency` above `tonic` in cents, folded to one octave
pub fn fold_cents(frequency: f64, tonic: Tonic) -> f64 {
    let cents = (OCTAVE_CENTS * (frequency / tonic.hz()).log2()).rem_euclid(OCTAVE_CENTS);
    // rem_euclid can round a tiny negative up to exactly 1200
    if cents >= OCTAVE_CENTS {
        0.0
    } else {
        cents
    }
}

/// Normalize a voiced frequency trajectory against `tonic`, or against its
/// own median when no tonic is given.
pub fn normalize(frequencies: &[f64], tonic: Option<Tonic>) -> CentTrajectory {
    if frequencies.is_empty() {
        return CentTrajectory::empty();
    }

    let tonic = match tonic.or_else(|| Tonic::median_of(frequencies)) {
        Some(tonic) => tonic,
        None => return CentTrajectory::empty(),
    };

    let cents = frequencies.iter().map(|&f| fold_cents(f, tonic)).collect();

    CentTrajectory {
        tonic_hz: tonic.hz(),
        cents,
    }
}
