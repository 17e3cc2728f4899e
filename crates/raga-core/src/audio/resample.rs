//! Band-limited resampling to the analysis rate
//!
//! A windowed-sinc resampler low-passes before decimating, so energy above
//! the target Nyquist frequency cannot fold back into the pitch range.

use anyhow::Result;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const SINC_LEN: usize = 256;

fn sinc_parameters() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    }
}

/// Resample mono audio from `from_rate` to `to_rate`
///
/// The whole signal is processed as one chunk. It is padded with `SINC_LEN`
/// zeros so the filter delay can be trimmed off the front while still
/// producing `ceil(len * to_rate / from_rate)` samples.
pub fn resample_to_target(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        anyhow::bail!("Cannot resample {} Hz -> {} Hz", from_rate, to_rate);
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;

    let mut padded = Vec::with_capacity(samples.len() + SINC_LEN);
    padded.extend_from_slice(samples);
    padded.resize(samples.len() + SINC_LEN, 0.0);

    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, sinc_parameters(), padded.len(), 1)
        .map_err(|e| {
            anyhow::anyhow!("Resampler error ({} Hz -> {} Hz): {}", from_rate, to_rate, e)
        })?;
    let delay = resampler.output_delay();

    let input = vec![padded];
    let output = resampler
        .process(&input, None)
        .map_err(|e| anyhow::anyhow!("Resampling failed: {}", e))?;

    log::trace!(
        "Resampled {} -> {} samples ({} Hz -> {} Hz, delay {})",
        samples.len(),
        output_len,
        from_rate,
        to_rate,
        delay
    );

    Ok(output
        .into_iter()
        .next()
        .unwrap_or_default()
        .into_iter()
        .skip(delay)
        .take(output_len)
        .collect())
}
