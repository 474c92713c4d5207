use std::fs;
use std::path::{Path, PathBuf};

use crate::models::error::TakeError;
use crate::models::saved_take::TakeMetadata;

/// Path of the JSON sidecar for a take file: `take_1.wav` → `take_1.metadata.json`.
pub fn metadata_path(take_path: &Path) -> PathBuf {
    take_path.with_extension("metadata.json")
}

/// Write take metadata as a JSON sidecar file next to the take.
pub fn write_metadata(metadata: &TakeMetadata, take_path: &Path) -> Result<PathBuf, TakeError> {
    let path = metadata_path(take_path);
    let json = serde_json::to_string_pretty(metadata)
        .map_err(|e| TakeError::Write(format!("failed to serialize metadata: {}", e)))?;
    fs::write(&path, json).map_err(|e| TakeError::Write(format!("failed to write metadata: {}", e)))?;
    Ok(path)
}

/// Read take metadata from a JSON sidecar file.
pub fn read_metadata(take_path: &Path) -> Result<TakeMetadata, TakeError> {
    let json = fs::read_to_string(metadata_path(take_path))
        .map_err(|e| TakeError::Write(format!("failed to read metadata: {}", e)))?;
    serde_json::from_str(&json).map_err(|e| TakeError::Write(format!("failed to parse metadata: {}", e)))
}
