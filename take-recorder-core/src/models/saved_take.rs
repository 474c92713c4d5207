use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::audio_models::AudioLevels;
use super::config::SampleEncoding;

/// Result returned when a take has been written and registered.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedTake {
    pub path: PathBuf,
    /// Identifier the asset registrar returned for `path`.
    pub identifier: String,
    pub metadata: TakeMetadata,
}

/// Description of a saved take.
///
/// Serializable for the optional JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeMetadata {
    pub id: String,
    /// 1-based position in the take store, if saved through it.
    pub take_index: Option<usize>,
    pub file_name: String,
    pub duration_secs: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub sample_count: usize,
    pub encoding: SampleEncoding,
    pub levels: AudioLevels,
    pub trimmed: bool,
    pub checksum: String,
    pub created_at: String,
}
