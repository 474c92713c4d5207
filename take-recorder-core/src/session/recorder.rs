use std::path::Path;
use std::sync::Arc;

use crate::models::audio_models::{AudioSource, PreviewDirection};
use crate::models::config::RecorderConfiguration;
use crate::models::error::TakeError;
use crate::models::saved_take::SavedTake;
use crate::models::state::{PreviewState, RecorderState};
use crate::models::store::TakeStore;
use crate::models::take::Take;
use crate::traits::asset_registrar::AssetRegistrar;
use crate::traits::capture_device::CaptureDevice;
use crate::traits::preview_player::PreviewPlayer;
use crate::traits::recorder_delegate::RecorderDelegate;

/// Recording session: the take store plus the host collaborators it drives.
///
/// Generic over the host's microphone, preview and asset APIs. Every call
/// runs synchronously on the caller's thread.
///
/// ```text
/// [CaptureDevice] → stop_recording → [Take] ─┬→ [PreviewPlayer]   (forward / reversed)
///                                            └→ trim → [WAV writer] → [AssetRegistrar]
/// ```
///
/// Unmet preconditions (no device, nothing recorded, wrong state) are
/// returned as errors and leave the session unchanged.
pub struct RecorderSession<D: CaptureDevice, P: PreviewPlayer, R: AssetRegistrar> {
    device: D,
    player: P,
    registrar: R,
    config: RecorderConfiguration,
    store: TakeStore,
    state: RecorderState,
    preview: PreviewState,
    delegate: Option<Arc<dyn RecorderDelegate>>,
}

impl<D: CaptureDevice, P: PreviewPlayer, R: AssetRegistrar> RecorderSession<D, P, R> {
    /// Validate `config` and start a session with one empty take.
    pub fn new(device: D, player: P, registrar: R, config: RecorderConfiguration) -> Result<Self, TakeError> {
        config.validate().map_err(TakeError::Configuration)?;

        let mut store = TakeStore::new();
        store.reset();

        Ok(Self {
            device,
            player,
            registrar,
            config,
            store,
            state: RecorderState::Idle,
            preview: PreviewState::Idle,
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn RecorderDelegate>) {
        self.delegate = Some(delegate);
    }

    /// Stop any capture or preview and start over with one empty take.
    pub fn reset(&mut self) {
        self.halt();
        self.store.reset();
        log::info!("recorder session reset");
    }

    /// Stop any capture or preview and hand back the takes.
    pub fn dispose(mut self) -> TakeStore {
        self.halt();
        log::info!("recorder session disposed with {} take(s)", self.store.len());
        self.store
    }

    pub fn available_devices(&self) -> Vec<AudioSource> {
        self.device.list_devices()
    }

    /// Start capturing into a fresh take.
    ///
    /// The current take is reused if it is still empty; otherwise a new take
    /// is appended. A running preview is stopped first.
    /// Transitions: idle → recording.
    pub fn start_recording(&mut self) -> Result<usize, TakeError> {
        let result = self.check_can_record().and_then(|device_id| {
            self.stop_preview();
            let index = self.store.ensure_take_for_new_recording();
            self.begin_capture(device_id, index)
        });
        self.report(result)
    }

    /// Start capturing over the existing take at `index`.
    ///
    /// The take keeps its previous buffer until the new capture succeeds.
    pub fn record_over(&mut self, index: usize) -> Result<usize, TakeError> {
        let result = self.check_can_record().and_then(|device_id| {
            self.store.retarget(index)?;
            self.stop_preview();
            self.begin_capture(device_id, index)
        });
        self.report(result)
    }

    /// Stop capturing and store the captured buffer in the recording take.
    ///
    /// Transitions: recording → idle, also when the capture turns out unusable.
    pub fn stop_recording(&mut self) -> Result<usize, TakeError> {
        let result = self.finish_capture();
        self.report(result)
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    /// Play the current take from `start_fraction` of its length.
    ///
    /// A preview already playing is stopped first.
    /// Transitions: idle → playing.
    pub fn play_preview(&mut self, direction: PreviewDirection, start_fraction: f64) -> Result<(), TakeError> {
        let result = self.begin_preview(direction, start_fraction);
        self.report(result)
    }

    /// Stop the running preview, if any.
    pub fn stop_preview(&mut self) {
        if self.preview.is_playing() {
            self.player.stop();
            self.set_preview(PreviewState::Idle);
        }
    }

    /// Pick up a preview that reached the end of its buffer on its own.
    pub fn poll_preview(&mut self) -> PreviewState {
        if self.preview.is_playing() && !self.player.is_playing() {
            log::debug!("preview finished");
            self.set_preview(PreviewState::Idle);
        }
        self.preview
    }

    /// Trim silence from the current take. Returns the number of samples removed.
    pub fn trim_current(&mut self, threshold: f32) -> Result<usize, TakeError> {
        let result = self.current_recorded_index().map(|index| {
            self.stop_preview();
            self.store.get_mut(index).map(|t| t.trim(threshold)).unwrap_or(0)
        });
        self.report(result)
    }

    /// Save the current take to `path`.
    pub fn save_current(&mut self, path: &Path, trim: bool) -> Result<SavedTake, TakeError> {
        let result = self.current_recorded_index().and_then(|index| {
            if trim {
                self.stop_preview();
            }
            let take = self
                .store
                .get_mut(index)
                .ok_or_else(|| TakeError::InvalidState(format!("take {} vanished", index)))?;
            let saved = take.save_indexed(path, trim, &self.config, &mut self.registrar, Some(index + 1))?;
            self.registrar.refresh();
            if let Some(ref delegate) = self.delegate {
                delegate.on_take_saved(index, &saved);
            }
            Ok(saved)
        });
        self.report(result)
    }

    /// Save every recorded take under the configured output directory.
    pub fn save_all(&mut self, trim: bool) -> Result<Vec<SavedTake>, TakeError> {
        let result = self.save_all_inner(trim);
        self.report(result)
    }

    pub fn store(&self) -> &TakeStore {
        &self.store
    }

    pub fn current_take(&self) -> Option<&Take> {
        self.store.current()
    }

    pub fn state(&self) -> &RecorderState {
        &self.state
    }

    pub fn preview_state(&self) -> PreviewState {
        self.preview
    }

    pub fn config(&self) -> &RecorderConfiguration {
        &self.config
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn registrar(&self) -> &R {
        &self.registrar
    }

    // --- Internal helpers ---

    /// Resolve the device to record from, or explain why recording can't start.
    fn check_can_record(&self) -> Result<String, TakeError> {
        if self.state.is_recording() {
            return Err(TakeError::InvalidState("already recording".into()));
        }

        let devices = self.device.list_devices();
        let chosen = match &self.config.device_id {
            Some(id) => devices.iter().find(|d| &d.id == id),
            None => devices.iter().find(|d| d.is_default).or_else(|| devices.first()),
        };
        chosen.map(|d| d.id.clone()).ok_or(TakeError::DeviceUnavailable)
    }

    fn begin_capture(&mut self, device_id: String, take_index: usize) -> Result<usize, TakeError> {
        self.device.start_capture(
            &device_id,
            self.config.max_duration_secs,
            self.config.sample_rate,
            self.config.channels,
        )?;
        log::info!("recording take {} from {}", take_index + 1, device_id);
        self.set_state(RecorderState::Recording { device_id, take_index });
        Ok(take_index)
    }

    fn finish_capture(&mut self) -> Result<usize, TakeError> {
        let (device_id, take_index) = match &self.state {
            RecorderState::Recording { device_id, take_index } => (device_id.clone(), *take_index),
            RecorderState::Idle => return Err(TakeError::InvalidState("not recording".into())),
        };

        let captured = self.device.stop_capture(&device_id);
        self.set_state(RecorderState::Idle);
        let captured = captured?;
        if captured.channels != self.config.channels {
            return Err(TakeError::InvalidBuffer(format!(
                "{} delivered {} channel(s), {} configured",
                device_id, captured.channels, self.config.channels
            )));
        }

        let take = self
            .store
            .get_mut(take_index)
            .ok_or_else(|| TakeError::InvalidState(format!("take {} vanished", take_index)))?;
        take.set_buffer(captured.samples, captured.sample_rate, captured.channels)?;
        log::info!(
            "take {} recorded: {:.2} s, {} samples",
            take_index + 1,
            take.duration_secs(),
            take.samples().len()
        );

        if let Some(ref delegate) = self.delegate {
            delegate.on_take_recorded(take_index, take);
        }
        Ok(take_index)
    }

    fn begin_preview(&mut self, direction: PreviewDirection, start_fraction: f64) -> Result<(), TakeError> {
        if self.state.is_recording() {
            return Err(TakeError::InvalidState("cannot preview while recording".into()));
        }
        let take_index = self.current_recorded_index()?;
        self.stop_preview();

        let take = self.store.get(take_index).ok_or(TakeError::NoRecording)?;
        let request = take.preview_request(direction, start_fraction)?;
        self.player.play(&request)?;
        log::debug!(
            "previewing take {} {:?} from sample {}",
            take_index + 1,
            direction,
            request.start_sample
        );

        self.set_preview(PreviewState::Playing { take_index, direction });
        Ok(())
    }

    fn save_all_inner(&mut self, trim: bool) -> Result<Vec<SavedTake>, TakeError> {
        if self.state.is_recording() {
            return Err(TakeError::InvalidState("cannot save while recording".into()));
        }
        if trim {
            self.stop_preview();
        }

        let saved = self.store.save_all(
            &self.config.output_directory,
            &self.config.base_name,
            trim,
            &self.config,
            &mut self.registrar,
        )?;

        if let Some(ref delegate) = self.delegate {
            for result in &saved {
                if let Some(n) = result.metadata.take_index {
                    delegate.on_take_saved(n - 1, result);
                }
            }
        }
        Ok(saved)
    }

    /// Index of the current take if it holds a recording and isn't being recorded.
    fn current_recorded_index(&self) -> Result<usize, TakeError> {
        let index = self.store.current_index().ok_or(TakeError::NoRecording)?;
        if self.state.take_index() == Some(index) {
            return Err(TakeError::InvalidState("take is being recorded".into()));
        }
        match self.store.get(index) {
            Some(take) if take.has_recording() => Ok(index),
            _ => Err(TakeError::NoRecording),
        }
    }

    /// Stop preview and capture without keeping anything captured.
    fn halt(&mut self) {
        self.stop_preview();
        if let RecorderState::Recording { device_id, .. } = self.state.clone() {
            if let Err(e) = self.device.stop_capture(&device_id) {
                log::warn!("failed to stop capture on {}: {}", device_id, e);
            }
            self.set_state(RecorderState::Idle);
        }
    }

    fn set_state(&mut self, new_state: RecorderState) {
        self.state = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(&self.state);
        }
    }

    fn set_preview(&mut self, new_state: PreviewState) {
        self.preview = new_state;
        if let Some(ref delegate) = self.delegate {
            delegate.on_preview_changed(&self.preview);
        }
    }

    fn report<T>(&self, result: Result<T, TakeError>) -> Result<T, TakeError> {
        if let Err(ref e) = result {
            log::debug!("recorder operation failed: {}", e);
            if let Some(ref delegate) = self.delegate {
                delegate.on_error(e);
            }
        }
        result
    }
}
