use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::models::config::SampleEncoding;
use crate::models::error::TakeError;
use crate::processing::wav_format;

/// Samples encoded per write call.
const ENCODE_CHUNK_SAMPLES: usize = 8192;

/// Summary of a finished waveform file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavSummary {
    pub path: PathBuf,
    /// Total file size including the header.
    pub bytes_written: u64,
    /// SHA-256 hex digest of the complete file.
    pub checksum: String,
}

/// Write interleaved `f32` samples as a RIFF/WAVE file.
///
/// ## File Format
///
/// ```text
/// [44-byte WAV header]
/// [PCM16 or float32 little-endian samples...]
/// ```
///
/// The file is assembled under a temporary sibling name and renamed over
/// `path` only once it is complete and synced, so a failed write never leaves
/// a truncated file at `path`. An empty buffer yields a valid file with an
/// empty data chunk.
pub fn write_wav(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
    encoding: SampleEncoding,
) -> Result<WavSummary, TakeError> {
    if sample_rate == 0 || channels == 0 {
        return Err(TakeError::InvalidBuffer(format!(
            "cannot write {} Hz / {} channel audio",
            sample_rate, channels
        )));
    }
    if samples.len() % channels as usize != 0 {
        return Err(TakeError::InvalidBuffer(format!(
            "{} samples is not a whole number of {}-channel frames",
            samples.len(),
            channels
        )));
    }
    let data_size = wav_format::data_size(samples.len(), encoding)
        .ok_or_else(|| TakeError::Write(format!("{} samples exceed the WAV size limit", samples.len())))?;
    let header = wav_format::generate_wav_header(sample_rate, encoding, channels, data_size).ok_or_else(|| {
        TakeError::InvalidBuffer(format!(
            "{} Hz / {} channel {:?} audio does not fit a WAV header",
            sample_rate, channels, encoding
        ))
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| TakeError::Write(format!("failed to create directory: {}", e)))?;
    }

    let temp_path = temp_path_for(path)?;
    let result = write_to(&temp_path, &header, samples, encoding)
        .and_then(|checksum| {
            fs::rename(&temp_path, path)
                .map_err(|e| TakeError::Write(format!("failed to move file into place: {}", e)))?;
            Ok(checksum)
        });

    match result {
        Ok(checksum) => {
            let bytes_written = wav_format::WAV_HEADER_SIZE as u64 + data_size as u64;
            log::debug!(
                "wrote {} ({} samples, {} bytes, {:?})",
                path.display(),
                samples.len(),
                bytes_written,
                encoding
            );
            Ok(WavSummary {
                path: path.to_path_buf(),
                bytes_written,
                checksum,
            })
        }
        Err(e) => {
            let _ = fs::remove_file(&temp_path);
            Err(e)
        }
    }
}

/// Compute SHA-256 hex digest of a file.
pub fn sha256_file(path: &Path) -> Result<String, TakeError> {
    let data = fs::read(path)
        .map_err(|e| TakeError::Write(format!("failed to read file for checksum: {}", e)))?;
    Ok(hex_encode(&Sha256::digest(&data)))
}

fn write_to(
    temp_path: &Path,
    header: &[u8],
    samples: &[f32],
    encoding: SampleEncoding,
) -> Result<String, TakeError> {
    let file = File::create(temp_path)
        .map_err(|e| TakeError::Write(format!("failed to create file: {}", e)))?;
    let mut out = BufWriter::new(file);
    let mut hasher = Sha256::new();

    write_hashed(&mut out, &mut hasher, header)?;

    for chunk in samples.chunks(ENCODE_CHUNK_SAMPLES) {
        let data = wav_format::encode_samples(chunk, encoding);
        write_hashed(&mut out, &mut hasher, &data)?;
    }

    let file = out
        .into_inner()
        .map_err(|e| TakeError::Write(format!("flush failed: {}", e.error())))?;
    file.sync_all()
        .map_err(|e| TakeError::Write(format!("sync failed: {}", e)))?;

    Ok(hex_encode(&hasher.finalize()))
}

fn write_hashed(out: &mut impl Write, hasher: &mut Sha256, data: &[u8]) -> Result<(), TakeError> {
    out.write_all(data)
        .map_err(|e| TakeError::Write(format!("write failed: {}", e)))?;
    hasher.update(data);
    Ok(())
}

fn temp_path_for(path: &Path) -> Result<PathBuf, TakeError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TakeError::Write(format!("not a file path: {}", path.display())))?;
    let temp_name = format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        uuid::Uuid::new_v4().simple()
    );
    Ok(path.with_file_name(temp_name))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
