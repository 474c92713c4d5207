use std::sync::Arc;

use crate::models::audio_models::{AudioSource, CapturedAudio};
use crate::models::error::TakeError;

/// Callback invoked when an audio buffer is available.
///
/// Parameters:
/// - `samples`: Interleaved f32 samples.
/// - `sample_rate`: The actual sample rate of the delivered audio.
/// - `channels`: Number of channels (1 = mono, 2 = stereo interleaved).
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Host microphone API.
///
/// Implemented by the embedding editor, or by `StreamingCaptureDevice` for
/// hosts whose audio API pushes buffers through a callback.
pub trait CaptureDevice: Send {
    /// Capture devices currently present. An empty list means recording is unavailable.
    fn list_devices(&self) -> Vec<AudioSource>;

    /// Begin capturing `channels` interleaved channels into a clip of at
    /// most `duration_secs` seconds.
    fn start_capture(
        &mut self,
        device_id: &str,
        duration_secs: u32,
        sample_rate: u32,
        channels: u16,
    ) -> Result<(), TakeError>;

    /// Stop capturing and hand back whatever was captured so far.
    fn stop_capture(&mut self, device_id: &str) -> Result<CapturedAudio, TakeError>;

    fn is_capturing(&self, device_id: &str) -> bool;
}
