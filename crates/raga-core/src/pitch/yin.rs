//! YIN pitch tracking
//!
//! de Cheveigné & Kawahara (2002). The difference function is computed from
//! an FFT cross-correlation instead of the quadratic direct sum.

use super::{FrequencyRange, PitchEstimator};
use crate::error::{RagaError, Result};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Frame-based YIN estimator
#[derive(Debug, Clone)]
pub struct YinEstimator {
    frame_length: usize,
    hop_length: usize,
    threshold: f32,
    silence_rms: f32,
}

impl YinEstimator {
    pub fn new(frame_length: usize, hop_length: usize, threshold: f32, silence_rms: f32) -> Self {
        Self {
            frame_length,
            hop_length,
            threshold,
            silence_rms,
        }
    }

    /// Estimator parameters from an analysis configuration
    pub fn from_config(config: &crate::config::AnalysisConfig) -> Self {
        Self::new(
            config.frame_length,
            config.hop_length,
            config.yin_threshold,
            config.silence_rms,
        )
    }

    /// Integration window: half a frame, leaving the other half for lags
    fn window(&self) -> usize {
        self.frame_length / 2
    }
}

impl Default for YinEstimator {
    fn default() -> Self {
        Self::new(2048, 512, 0.1, 0.01)
    }
}

impl PitchEstimator for YinEstimator {
    fn estimate(
        &self,
        samples: &[f32],
        sample_rate: u32,
        range: FrequencyRange,
    ) -> Result<Vec<Option<f32>>> {
        if self.frame_length < 4 || self.hop_length == 0 {
            return Err(RagaError::PitchEstimation(format!(
                "frame length {} / hop length {} unusable",
                self.frame_length, self.hop_length
            )));
        }
        if sample_rate == 0 {
            return Err(RagaError::PitchEstimation("sample rate is zero".to_string()));
        }

        let sr = sample_rate as f32;
        let max_lag = self.frame_length - self.window();
        let min_tau = ((sr / range.max_hz).floor() as usize).max(2);
        let max_tau = ((sr / range.min_hz).ceil() as usize).min(max_lag - 1);
        if min_tau + 1 >= max_tau {
            return Err(RagaError::PitchEstimation(format!(
                "frame length {} too short for {:.1}-{:.1} Hz at {} Hz",
                self.frame_length, range.min_hz, range.max_hz, sample_rate
            )));
        }

        if samples.len() < self.frame_length {
            return Ok(Vec::new());
        }

        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(self.frame_length);
        let inverse = planner.plan_fft_inverse(self.frame_length);

        let num_frames = (samples.len() - self.frame_length) / self.hop_length + 1;
        let mut track = Vec::with_capacity(num_frames);
        let mut cmnd = vec![0.0f32; max_tau + 2];

        for frame_idx in 0..num_frames {
            let start = frame_idx * self.hop_length;
            let frame = &samples[start..start + self.frame_length];

            let rms = (frame.iter().map(|s| s * s).sum::<f32>() / frame.len() as f32).sqrt();
            if rms < self.silence_rms {
                track.push(None);
                continue;
            }

            let diff = self.difference(frame, max_tau + 2, forward.as_ref(), inverse.as_ref());
            cumulative_mean_normalize(&diff, &mut cmnd);

            let pitch = pick_period(&cmnd, min_tau, max_tau, self.threshold)
                .map(|tau| sr / tau)
                .filter(|&hz| hz.is_finite() && range.contains(hz));
            track.push(pitch);
        }

        log::debug!(
            "YIN: {} frames, {} voiced",
            track.len(),
            track.iter().filter(|p| p.is_some()).count()
        );

        Ok(track)
    }
}

impl YinEstimator {
    /// d(tau) for tau in 0..lags, via
    /// d(tau) = E(0) + E(tau) - 2 r(tau)
    fn difference(
        &self,
        frame: &[f32],
        lags: usize,
        forward: &dyn Fft<f32>,
        inverse: &dyn Fft<f32>,
    ) -> Vec<f32> {
        let n = frame.len();
        let w = self.window();

        let mut full: Vec<Complex<f32>> = frame.iter().map(|&s| Complex::new(s, 0.0)).collect();
        let mut head: Vec<Complex<f32>> = frame[..w]
            .iter()
            .map(|&s| Complex::new(s, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)).take(n - w))
            .collect();

        forward.process(&mut full);
        forward.process(&mut head);

        let mut corr: Vec<Complex<f32>> = full
            .iter()
            .zip(head.iter())
            .map(|(a, b)| *a * b.conj())
            .collect();
        inverse.process(&mut corr);
        let scale = 1.0 / n as f32;

        // prefix sums of squares for sliding window energy
        let mut energy = Vec::with_capacity(n + 1);
        energy.push(0.0f32);
        for &s in frame {
            let last = energy[energy.len() - 1];
            energy.push(last + s * s);
        }
        let window_energy = |tau: usize| energy[tau + w] - energy[tau];

        let e0 = window_energy(0);
        (0..lags)
            .map(|tau| (e0 + window_energy(tau) - 2.0 * corr[tau].re * scale).max(0.0))
            .collect()
    }
}

/// d'(0) = 1, d'(tau) = d(tau) * tau / sum_{j=1..tau} d(j)
fn cumulative_mean_normalize(diff: &[f32], out: &mut [f32]) {
    out[0] = 1.0;
    let mut running = 0.0f32;
    for tau in 1..diff.len() {
        running += diff[tau];
        out[tau] = if running > 1e-12 {
            diff[tau] * tau as f32 / running
        } else {
            1.0
        };
    }
}

/// First dip under `threshold`, followed down to its local minimum and
/// refined with parabolic interpolation
fn pick_period(cmnd: &[f32], min_tau: usize, max_tau: usize, threshold: f32) -> Option<f32> {
    let mut tau = (min_tau..=max_tau).find(|&t| cmnd[t] < threshold)?;
    while tau < max_tau && cmnd[tau + 1] < cmnd[tau] {
        tau += 1;
    }

    let (a, b, c) = (cmnd[tau - 1], cmnd[tau], cmnd[tau + 1]);
    let denom = a - 2.0 * b + c;
    let offset = if denom.abs() > 1e-12 {
        ((a - c) / (2.0 * denom)).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    Some(tau as f32 + offset)
}
