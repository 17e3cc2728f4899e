//! Analysis and service configuration
//!
//! `AnalysisConfig` holds the algorithm parameters; `RagaConfig` is the TOML
//! file layout shared by the binaries.

use crate::error::{RagaError, Result};
use crate::matching::DEFAULT_TOP_N;
use crate::pitch::{FrequencyRange, DEFAULT_FMAX_HZ, DEFAULT_FMIN_HZ};
use crate::swara::DEFAULT_OCCUPANCY_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Algorithm parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Audio loading
    pub sample_rate: u32,

    // Pitch tracking
    pub frame_length: usize,
    pub hop_length: usize,
    pub fmin_hz: f32,
    pub fmax_hz: f32,
    pub yin_threshold: f32,
    pub silence_rms: f32,

    // Quantization and ranking
    pub occupancy_threshold: f64,
    pub top_n: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: 22050,

            frame_length: 2048,
            hop_length: 512,
            fmin_hz: DEFAULT_FMIN_HZ,
            fmax_hz: DEFAULT_FMAX_HZ,
            yin_threshold: 0.1,
            silence_rms: 0.01,

            occupancy_threshold: DEFAULT_OCCUPANCY_THRESHOLD,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(invalid("sample_rate must be > 0"));
        }
        if self.frame_length < 4 || self.hop_length == 0 {
            return Err(invalid("frame_length must be >= 4 and hop_length > 0"));
        }
        if self.fmin_hz <= 0.0 || self.fmin_hz >= self.fmax_hz {
            return Err(invalid("fmin_hz must be > 0 and < fmax_hz"));
        }
        if self.fmax_hz > self.sample_rate as f32 / 2.0 {
            return Err(invalid("fmax_hz must not exceed the Nyquist frequency"));
        }
        if !(self.yin_threshold > 0.0 && self.yin_threshold < 1.0) {
            return Err(invalid("yin_threshold must be in (0, 1)"));
        }
        if !(self.occupancy_threshold >= 0.0 && self.occupancy_threshold < 1.0) {
            return Err(invalid("occupancy_threshold must be in [0, 1)"));
        }
        if self.silence_rms < 0.0 {
            return Err(invalid("silence_rms must be >= 0"));
        }
        if self.top_n == 0 {
            return Err(invalid("top_n must be > 0"));
        }
        Ok(())
    }

    pub fn frequency_range(&self) -> Result<FrequencyRange> {
        FrequencyRange::new(self.fmin_hz, self.fmax_hz)
    }
}

fn invalid(msg: &str) -> RagaError {
    RagaError::InvalidConfig(msg.to_string())
}

/// Catalogue location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueConfig {
    #[serde(default = "default_catalogue_path")]
    pub path: PathBuf,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            path: default_catalogue_path(),
        }
    }
}

fn default_catalogue_path() -> PathBuf {
    PathBuf::from("data/raga_data.json")
}

/// HTTP service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_upload_mb() -> usize {
    64
}

/// Top-level `config.toml` layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagaConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub catalogue: CatalogueConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl RagaConfig {
    /// Load configuration from TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: RagaConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML config: {}", e))?;
        config.analysis.validate()?;
        Ok(config)
    }

    /// Load `path` if given, otherwise `config.toml` when present, otherwise
    /// defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new("config.toml");
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
