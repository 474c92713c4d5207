//! WAV file format utilities.
//!
//! Generates the canonical 44-byte RIFF WAV header and encodes `f32`
//! samples into the little-endian data chunk payload.

use crate::models::config::SampleEncoding;

/// Size of the standard WAV RIFF header in bytes.
pub const WAV_HEADER_SIZE: usize = 44;

/// Generate a 44-byte WAV RIFF header.
///
/// Layout:
/// ```text
/// [0-3]    "RIFF"
/// [4-7]    36 + data_size
/// [8-11]   "WAVE"
/// [12-15]  "fmt "
/// [16-19]  16 (fmt chunk size)
/// [20-21]  format code (1 = PCM, 3 = IEEE float)
/// [22-23]  channels
/// [24-27]  sample_rate
/// [28-31]  byte_rate = sample_rate * channels * bit_depth / 8
/// [32-33]  block_align = channels * bit_depth / 8
/// [34-35]  bit_depth
/// [36-39]  "data"
/// [40-43]  data_size
/// ```
///
/// Returns `None` when `byte_rate`, `block_align` or the RIFF chunk size
/// does not fit its header field.
pub fn generate_wav_header(
    sample_rate: u32,
    encoding: SampleEncoding,
    channels: u16,
    data_size: u32,
) -> Option<[u8; WAV_HEADER_SIZE]> {
    let bit_depth = encoding.bits_per_sample();
    let block_align = channels.checked_mul(bit_depth / 8)?;
    let byte_rate = sample_rate.checked_mul(block_align as u32)?;
    let chunk_size = data_size.checked_add(36)?;

    let mut header = [0u8; WAV_HEADER_SIZE];

    // RIFF chunk descriptor
    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&chunk_size.to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    // fmt sub-chunk
    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&encoding.format_code().to_le_bytes());
    header[22..24].copy_from_slice(&channels.to_le_bytes());
    header[24..28].copy_from_slice(&sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&byte_rate.to_le_bytes());
    header[32..34].copy_from_slice(&block_align.to_le_bytes());
    header[34..36].copy_from_slice(&bit_depth.to_le_bytes());

    // data sub-chunk
    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_size.to_le_bytes());

    Some(header)
}

/// Size in bytes of the data chunk for `sample_count` samples.
///
/// Returns `None` when the payload would not fit the 32-bit RIFF size fields.
pub fn data_size(sample_count: usize, encoding: SampleEncoding) -> Option<u32> {
    let bytes = sample_count.checked_mul(encoding.bytes_per_sample())?;
    let bytes = u32::try_from(bytes).ok()?;
    // The RIFF chunk size (36 + data) must fit as well.
    bytes.checked_add(36).map(|_| bytes)
}

/// Encode samples into the data chunk payload for `encoding`.
pub fn encode_samples(samples: &[f32], encoding: SampleEncoding) -> Vec<u8> {
    match encoding {
        SampleEncoding::Pcm16 => convert_to_int16_pcm(samples),
        SampleEncoding::Float32 => {
            let mut data = Vec::with_capacity(samples.len() * 4);
            for &sample in samples {
                data.extend_from_slice(&sample.to_le_bytes());
            }
            data
        }
    }
}

/// Convert f32 samples `[-1.0, 1.0]` to 16-bit PCM (little-endian bytes).
///
/// Clamps out-of-range values. Output length = `samples.len() * 2` bytes.
pub fn convert_to_int16_pcm(samples: &[f32]) -> Vec<u8> {
    let mut data = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let int16_value = (clamped * i16::MAX as f32).round() as i16;
        data.extend_from_slice(&int16_value.to_le_bytes());
    }
    data
}
