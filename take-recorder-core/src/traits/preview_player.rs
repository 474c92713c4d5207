use crate::models::audio_models::PreviewDirection;
use crate::models::error::TakeError;

/// A request to audition one of a take's buffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewRequest<'a> {
    /// Forward or reversed buffer, already selected according to `direction`.
    pub samples: &'a [f32],
    pub sample_rate: u32,
    pub channels: u16,
    pub direction: PreviewDirection,
    /// Index into `samples` where playback begins.
    ///
    /// May equal `samples.len()`: a reversed preview started at the head of
    /// the take has nothing left to play.
    pub start_sample: usize,
}

/// Host audio preview API.
pub trait PreviewPlayer: Send {
    fn play(&mut self, request: &PreviewRequest<'_>) -> Result<(), TakeError>;

    fn stop(&mut self);

    /// False once playback has been stopped or reached the end of the buffer.
    fn is_playing(&self) -> bool;
}
