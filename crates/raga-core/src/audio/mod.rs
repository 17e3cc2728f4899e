//! Audio loading
//!
//! Decodes recordings to mono `f32` at the analysis sample rate. WAV, MP3,
//! FLAC and OGG use dedicated decoders; phone-style containers (M4A/MP4,
//! MKV/WebM, raw AAC) go through Symphonia.

mod container;
mod decoder;
mod resample;

pub use container::decode_container;
pub use decoder::{decode_audio, AudioData};
pub use resample::resample_to_target;

use std::path::Path;

/// Recognised input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Wav,
    Mp3,
    Flac,
    Ogg,

    // Decoded through Symphonia
    Mp4,
    Aac,
    Mkv,
    Webm,

    Unknown,
}

impl AudioFormat {
    /// Detect format from file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("wav") | Some("wave") => AudioFormat::Wav,
            Some("mp3") => AudioFormat::Mp3,
            Some("flac") => AudioFormat::Flac,
            Some("ogg") | Some("oga") => AudioFormat::Ogg,
            Some("mp4") | Some("m4a") => AudioFormat::Mp4,
            Some("aac") => AudioFormat::Aac,
            Some("mkv") | Some("mka") => AudioFormat::Mkv,
            Some("webm") => AudioFormat::Webm,
            _ => AudioFormat::Unknown,
        }
    }

    /// Formats handled by Symphonia rather than a dedicated decoder
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            AudioFormat::Mp4 | AudioFormat::Aac | AudioFormat::Mkv | AudioFormat::Webm
        )
    }
}
