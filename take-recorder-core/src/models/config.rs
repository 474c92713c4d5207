use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::error::TakeError;
use crate::processing::wav_format;

/// Highest capture sample rate accepted, in Hz.
pub const MAX_SAMPLE_RATE: u32 = 384_000;

/// Longest capture clip accepted, in seconds.
pub const MAX_DURATION_SECS: u32 = 3600;

/// Sample encoding used when a take is written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleEncoding {
    /// 16-bit signed integer PCM (WAV format code 1).
    #[default]
    Pcm16,
    /// 32-bit IEEE float (WAV format code 3).
    Float32,
}

impl SampleEncoding {
    pub fn bits_per_sample(self) -> u16 {
        match self {
            Self::Pcm16 => 16,
            Self::Float32 => 32,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        self.bits_per_sample() as usize / 8
    }

    /// WAVE `fmt ` chunk format tag.
    pub fn format_code(self) -> u16 {
        match self {
            Self::Pcm16 => 1,
            Self::Float32 => 3,
        }
    }
}

/// Configuration for a recorder session.
///
/// Serializable so a host can persist it next to its own editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfiguration {
    /// Capture sample rate in Hz (default: 44100).
    pub sample_rate: u32,

    /// Number of interleaved channels requested from the device (default: 1).
    pub channels: u16,

    /// Length of the pre-allocated capture clip in seconds (default: 60).
    pub max_duration_secs: u32,

    /// Encoding of written WAV files (default: 16-bit PCM).
    pub encoding: SampleEncoding,

    /// Amplitude at or below which a frame counts as silence (default: 0.01).
    pub trim_threshold: f32,

    /// Specific capture device ID, or None for the device's default.
    pub device_id: Option<String>,

    /// Directory where `save_all` writes takes.
    pub output_directory: PathBuf,

    /// File stem for `save_all`: files are named `{base_name}_{n}.wav`.
    pub base_name: String,

    /// Write a `.metadata.json` sidecar next to each saved take.
    pub write_metadata_sidecar: bool,
}

impl RecorderConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_SAMPLE_RATE).contains(&self.sample_rate) {
            return Err(format!("unsupported sample rate: {}", self.sample_rate));
        }
        if !(1..=8).contains(&self.channels) {
            return Err(format!("unsupported channel count: {}", self.channels));
        }
        if !(1..=MAX_DURATION_SECS).contains(&self.max_duration_secs) {
            return Err(format!("unsupported max duration: {} s", self.max_duration_secs));
        }
        // A full-length clip must still fit the 32-bit WAV size fields.
        let fits = self
            .max_samples()
            .and_then(|n| wav_format::data_size(n, self.encoding))
            .is_some();
        if !fits {
            return Err(format!(
                "a {} s clip at {} Hz x {} channels exceeds the WAV size limit",
                self.max_duration_secs, self.sample_rate, self.channels
            ));
        }
        if !(0.0..1.0).contains(&self.trim_threshold) {
            return Err(format!("trim threshold out of range: {}", self.trim_threshold));
        }
        if self.base_name.trim().is_empty() {
            return Err("base name must not be empty".into());
        }
        if self.base_name.contains(['/', '\\']) {
            return Err(format!("base name must not contain path separators: {}", self.base_name));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, TakeError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TakeError::Configuration(format!("failed to parse configuration: {}", e)))?;
        config.validate().map_err(TakeError::Configuration)?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, TakeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TakeError::Configuration(format!("failed to serialize configuration: {}", e)))
    }

    /// Maximum number of interleaved samples a single capture may hold.
    ///
    /// `None` if the product overflows `usize`.
    pub fn max_samples(&self) -> Option<usize> {
        (self.max_duration_secs as usize)
            .checked_mul(self.sample_rate as usize)?
            .checked_mul(self.channels as usize)
    }
}

impl Default for RecorderConfiguration {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
            max_duration_secs: 60,
            encoding: SampleEncoding::Pcm16,
            trim_threshold: 0.01,
            device_id: None,
            output_directory: PathBuf::from("."),
            base_name: "take".into(),
            write_metadata_sidecar: false,
        }
    }
}
