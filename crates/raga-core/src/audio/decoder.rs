//! Audio decoding for multiple formats

use super::{decode_container, resample_to_target, AudioFormat};
use anyhow::{Context, Result};
use std::path::Path;

/// Decoded audio data
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved samples in `[-1, 1]`
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_ms: u32,
}

impl AudioData {
    /// Convert to mono by averaging channels
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }

        self.samples
            .chunks(self.channels as usize)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    }

    /// Downmix to mono and resample to `target_sample_rate`
    pub fn into_mono_at(mut self, target_sample_rate: u32) -> Result<Self> {
        let mono = self.to_mono();
        self.samples = resample_to_target(&mono, self.sample_rate, target_sample_rate)?;
        self.sample_rate = target_sample_rate;
        self.channels = 1;
        Ok(self)
    }
}

/// Decode an audio file to mono at `target_sample_rate`
pub fn decode_audio(path: &Path, target_sample_rate: u32) -> Result<AudioData> {
    if !path.exists() {
        anyhow::bail!("Audio file not found: {}", path.display());
    }

    let format = AudioFormat::from_path(path);

    let audio_data = match format {
        AudioFormat::Wav => decode_wav(path)?,
        AudioFormat::Mp3 => decode_mp3(path)?,
        AudioFormat::Flac => decode_flac(path)?,
        AudioFormat::Ogg => decode_ogg(path)?,
        f if f.is_container() => decode_container(path)?,
        _ => anyhow::bail!("Unsupported audio format: {}", path.display()),
    };

    log::debug!(
        "Decoded {}: {} Hz, {} channel(s), {:.1}s",
        path.display(),
        audio_data.sample_rate,
        audio_data.channels,
        audio_data.duration_ms as f64 / 1000.0
    );

    audio_data.into_mono_at(target_sample_rate)
}

fn duration_ms(num_samples: usize, sample_rate: u32, channels: u16) -> u32 {
    if sample_rate == 0 || channels == 0 {
        return 0;
    }
    (num_samples as f64 / (sample_rate as f64 * channels as f64) * 1000.0) as u32
}

/// Decode WAV file
fn decode_wav(path: &Path) -> Result<AudioData> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(AudioData {
        duration_ms: duration_ms(samples.len(), spec.sample_rate, spec.channels),
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

/// Decode MP3 file
fn decode_mp3(path: &Path) -> Result<AudioData> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read MP3 file: {}", path.display()))?;

    let mut decoder = minimp3::Decoder::new(&data[..]);
    let mut samples = Vec::new();
    let mut sample_rate = 0;
    let mut channels = 0;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if sample_rate == 0 {
                    sample_rate = frame.sample_rate as u32;
                    channels = frame.channels as u16;
                }
                samples.extend(frame.data.iter().map(|&s| s as f32 / 32768.0));
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => anyhow::bail!("MP3 decode error in {}: {}", path.display(), e),
        }
    }

    if sample_rate == 0 {
        anyhow::bail!("No MP3 frames in {}", path.display());
    }

    Ok(AudioData {
        duration_ms: duration_ms(samples.len(), sample_rate, channels),
        samples,
        sample_rate,
        channels,
    })
}

/// Decode FLAC file
fn decode_flac(path: &Path) -> Result<AudioData> {
    let mut reader = claxon::FlacReader::open(path)
        .with_context(|| format!("Failed to open FLAC file: {}", path.display()))?;

    let info = reader.streaminfo();
    let sample_rate = info.sample_rate;
    let channels = info.channels as u16;
    let max_val = (1i64 << (info.bits_per_sample - 1)) as f32;

    let samples: Vec<f32> = reader
        .samples()
        .map(|s| s.map(|v| v as f32 / max_val))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AudioData {
        duration_ms: duration_ms(samples.len(), sample_rate, channels),
        samples,
        sample_rate,
        channels,
    })
}

/// Decode OGG Vorbis file
fn decode_ogg(path: &Path) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open OGG file: {}", path.display()))?;

    let mut reader = lewton::inside_ogg::OggStreamReader::new(file)?;

    let sample_rate = reader.ident_hdr.audio_sample_rate;
    let channels = reader.ident_hdr.audio_channels as u16;

    let mut samples = Vec::new();
    while let Some(packet) = reader.read_dec_packet_itl()? {
        samples.extend(packet.iter().map(|&s| s as f32 / 32768.0));
    }

    Ok(AudioData {
        duration_ms: duration_ms(samples.len(), sample_rate, channels),
        samples,
        sample_rate,
        channels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, channels: u16, sample_rate: u32, frames: &[Vec<i16>]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for frame in frames {
            for &s in frame {
                writer.write_sample(s).unwrap();
            }
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_to_mono_averages_channels() {
        let audio = AudioData {
            samples: vec![0.2, 0.4, -1.0, 1.0],
            sample_rate: 8000,
            channels: 2,
            duration_ms: 0,
        };
        let mono = audio.to_mono();
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert_eq!(mono[1], 0.0);
    }

    #[test]
    fn test_decode_stereo_wav_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let frames: Vec<Vec<i16>> = (0..22050).map(|_| vec![16384, -16384]).collect();
        write_wav(&path, 2, 22050, &frames);

        let audio = decode_audio(&path, 22050).unwrap();
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.samples.len(), 22050);
        assert_eq!(audio.duration_ms, 1000);
        assert!(audio.samples.iter().all(|s| s.abs() < 1e-6));
    }

    #[test]
    fn test_decode_resamples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fast.wav");
        let frames: Vec<Vec<i16>> = (0..44100).map(|_| vec![8192]).collect();
        write_wav(&path, 1, 44100, &frames);

        let audio = decode_audio(&path, 22050).unwrap();
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.samples.len(), 22050);
        assert!((audio.samples[1000] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_missing_and_unknown_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(decode_audio(&dir.path().join("nope.wav"), 22050).is_err());

        let odd = dir.path().join("notes.txt");
        std::fs::write(&odd, "sa re ga").unwrap();
        assert!(decode_audio(&odd, 22050).is_err());
    }
}
