//! Capture device for hosts whose audio API pushes buffers through a callback.
//!
//! The host wires `feeder()` into its audio thread; the recorder session then
//! drives the device through the pull-style `CaptureDevice` interface.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::{AudioSource, CapturedAudio};
use crate::models::error::TakeError;
use crate::traits::capture_device::{AudioBufferCallback, CaptureDevice};

/// Upper bound on the samples reserved up front; longer clips grow on demand.
const PREALLOCATE_SAMPLES: usize = 1 << 20;

/// Capture state shared between the audio callback and the control thread.
#[derive(Debug, Default)]
struct CaptureBuffer {
    capturing: bool,
    samples: Vec<f32>,
    /// Maximum number of interleaved samples for the current capture.
    capacity: usize,
    requested_rate: u32,
    delivered_rate: Option<f64>,
    dropped_samples: u64,
}

/// A single-input `CaptureDevice` fed by the host's audio callback.
///
/// Each capture is a fixed-length clip: once `duration_secs` worth of
/// samples has arrived, further samples are dropped. Stopping early hands
/// back whatever arrived so far.
pub struct StreamingCaptureDevice {
    source: AudioSource,
    channels: u16,
    available: bool,
    shared: Arc<Mutex<CaptureBuffer>>,
}

impl StreamingCaptureDevice {
    /// Create a device whose stream delivers `channels` interleaved channels.
    pub fn new(id: impl Into<String>, name: impl Into<String>, channels: u16) -> Self {
        Self {
            source: AudioSource {
                id: id.into(),
                name: name.into(),
                is_default: true,
            },
            channels: channels.max(1),
            available: true,
            shared: Arc::new(Mutex::new(CaptureBuffer::default())),
        }
    }

    /// Callback to register with the host audio API.
    ///
    /// Buffers arriving while no capture is running are ignored, as are
    /// buffers whose channel count differs from the device's.
    pub fn feeder(&self) -> AudioBufferCallback {
        let shared = Arc::clone(&self.shared);
        let expected_channels = self.channels;

        Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
            let mut buffer = shared.lock();
            if !buffer.capturing {
                return;
            }
            if channels != expected_channels {
                log::warn!(
                    "dropping {}-channel buffer on a {}-channel capture",
                    channels,
                    expected_channels
                );
                buffer.dropped_samples += samples.len() as u64;
                return;
            }
            if sample_rate.is_finite() && sample_rate >= 1.0 {
                buffer.delivered_rate = Some(sample_rate);
            }

            let remaining = buffer.capacity - buffer.samples.len();
            // Keep whole frames only.
            let accepted = (samples.len().min(remaining) / channels as usize) * channels as usize;
            buffer.samples.extend_from_slice(&samples[..accepted]);

            let dropped = samples.len() - accepted;
            if dropped > 0 {
                buffer.dropped_samples += dropped as u64;
            }
        })
    }

    /// Mark the input as plugged in or removed.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Samples captured so far in the running capture.
    pub fn captured_len(&self) -> usize {
        self.shared.lock().samples.len()
    }

    /// Samples discarded because the clip was full or malformed.
    pub fn dropped_samples(&self) -> u64 {
        self.shared.lock().dropped_samples
    }

    fn check_device(&self, device_id: &str) -> Result<(), TakeError> {
        if !self.available || device_id != self.source.id {
            return Err(TakeError::DeviceUnavailable);
        }
        Ok(())
    }
}

impl CaptureDevice for StreamingCaptureDevice {
    fn list_devices(&self) -> Vec<AudioSource> {
        if self.available {
            vec![self.source.clone()]
        } else {
            Vec::new()
        }
    }

    fn start_capture(
        &mut self,
        device_id: &str,
        duration_secs: u32,
        sample_rate: u32,
        channels: u16,
    ) -> Result<(), TakeError> {
        self.check_device(device_id)?;
        if channels != self.channels {
            return Err(TakeError::Capture(format!(
                "{} delivers {} channel(s), {} requested",
                device_id, self.channels, channels
            )));
        }
        let capacity = (duration_secs as usize)
            .checked_mul(sample_rate as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                TakeError::InvalidBuffer(format!(
                    "cannot capture {} s at {} Hz",
                    duration_secs, sample_rate
                ))
            })?;

        let mut buffer = self.shared.lock();
        if buffer.capturing {
            return Err(TakeError::Capture(format!("{} is already capturing", device_id)));
        }
        *buffer = CaptureBuffer {
            capturing: true,
            samples: Vec::with_capacity(capacity.min(PREALLOCATE_SAMPLES)),
            capacity,
            requested_rate: sample_rate,
            delivered_rate: None,
            dropped_samples: 0,
        };
        log::debug!("capture started on {} ({} samples max)", device_id, capacity);
        Ok(())
    }

    fn stop_capture(&mut self, device_id: &str) -> Result<CapturedAudio, TakeError> {
        if device_id != self.source.id {
            return Err(TakeError::DeviceUnavailable);
        }
        let mut buffer = self.shared.lock();
        if !buffer.capturing {
            return Err(TakeError::Capture(format!("{} is not capturing", device_id)));
        }
        buffer.capturing = false;

        let sample_rate = buffer
            .delivered_rate
            .map(|r| r.round() as u32)
            .unwrap_or(buffer.requested_rate);
        let samples = std::mem::take(&mut buffer.samples);
        if buffer.dropped_samples > 0 {
            log::warn!("capture on {} dropped {} samples", device_id, buffer.dropped_samples);
        }
        log::debug!("capture stopped on {} with {} samples", device_id, samples.len());

        Ok(CapturedAudio {
            samples,
            sample_rate,
            channels: self.channels,
        })
    }

    fn is_capturing(&self, device_id: &str) -> bool {
        device_id == self.source.id && self.shared.lock().capturing
    }
}
