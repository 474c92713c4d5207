use crate::models::error::TakeError;
use crate::models::saved_take::SavedTake;
use crate::models::state::{PreviewState, RecorderState};
use crate::models::take::Take;

/// Event delegate for recorder session notifications.
///
/// All methods are called synchronously from the thread driving the session.
pub trait RecorderDelegate: Send + Sync {
    /// Called when the recording state changes.
    fn on_state_changed(&self, state: &RecorderState);

    /// Called when the preview state changes.
    fn on_preview_changed(&self, state: &PreviewState);

    /// Called when a capture pass has filled the take at `index`.
    fn on_take_recorded(&self, index: usize, take: &Take);

    /// Called after a take has been written and registered.
    fn on_take_saved(&self, index: usize, saved: &SavedTake);

    /// Called when a session operation fails.
    fn on_error(&self, error: &TakeError);
}
