use std::path::Path;

use super::config::RecorderConfiguration;
use super::error::TakeError;
use super::saved_take::SavedTake;
use super::take::Take;
use crate::traits::asset_registrar::AssetRegistrar;

/// File name of the take at 0-based `index`: `{base_name}_{index + 1}.wav`.
pub fn take_file_name(base_name: &str, index: usize) -> String {
    format!("{}_{}.wav", base_name, index + 1)
}

/// Ordered takes of a session plus the one currently targeted for recording.
///
/// After `reset` the store always holds at least one take, and
/// `current_index` is always in range.
#[derive(Debug, Clone, Default)]
pub struct TakeStore {
    takes: Vec<Take>,
    current_index: usize,
}

impl TakeStore {
    /// A store that has never been reset: it holds no takes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every take and start over with one empty take at index 0.
    pub fn reset(&mut self) {
        self.takes.clear();
        self.takes.push(Take::new());
        self.current_index = 0;
    }

    /// Make sure the current take can receive a new recording.
    ///
    /// A current take that already holds samples is kept and a fresh take is
    /// appended and selected. An unrecorded current take is reused.
    /// Returns the index to record into.
    pub fn ensure_take_for_new_recording(&mut self) -> usize {
        if self.takes.is_empty() {
            self.reset();
        }
        if self.takes[self.current_index].has_recording() {
            self.takes.push(Take::new());
            self.current_index = self.takes.len() - 1;
        }
        self.current_index
    }

    /// Select an existing take so the next recording overwrites it.
    pub fn retarget(&mut self, index: usize) -> Result<(), TakeError> {
        if index >= self.takes.len() {
            return Err(TakeError::InvalidState(format!(
                "take {} does not exist ({} takes)",
                index,
                self.takes.len()
            )));
        }
        self.current_index = index;
        Ok(())
    }

    pub fn current(&self) -> Option<&Take> {
        self.takes.get(self.current_index)
    }

    pub fn current_mut(&mut self) -> Option<&mut Take> {
        self.takes.get_mut(self.current_index)
    }

    /// Index of the current take, or `None` before the first reset.
    pub fn current_index(&self) -> Option<usize> {
        (!self.takes.is_empty()).then_some(self.current_index)
    }

    pub fn get(&self, index: usize) -> Option<&Take> {
        self.takes.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Take> {
        self.takes.get_mut(index)
    }

    pub fn takes(&self) -> &[Take] {
        &self.takes
    }

    pub fn len(&self) -> usize {
        self.takes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.takes.is_empty()
    }

    /// Number of takes holding a recording.
    pub fn recorded_count(&self) -> usize {
        self.takes.iter().filter(|t| t.has_recording()).count()
    }

    /// Save every recorded take, in order, as `{base_name}_{n}.wav` under
    /// `destination`.
    ///
    /// Unrecorded takes are skipped, as are takes that trimming leaves empty.
    /// The first write or registration failure is returned immediately.
    /// `registrar.refresh()` runs once after the batch if anything was saved.
    pub fn save_all(
        &mut self,
        destination: &Path,
        base_name: &str,
        trim: bool,
        config: &RecorderConfiguration,
        registrar: &mut dyn AssetRegistrar,
    ) -> Result<Vec<SavedTake>, TakeError> {
        let mut saved = Vec::new();

        for (index, take) in self.takes.iter_mut().enumerate() {
            if !take.has_recording() {
                log::debug!("skipping unrecorded take {}", index + 1);
                continue;
            }
            let path = destination.join(take_file_name(base_name, index));
            match take.save_indexed(&path, trim, config, registrar, Some(index + 1)) {
                Ok(result) => saved.push(result),
                Err(TakeError::NoRecording) => {
                    log::warn!("take {} was silent after trimming, skipped", index + 1);
                }
                Err(e) => {
                    log::error!("failed to save take {}: {}", index + 1, e);
                    return Err(e);
                }
            }
        }

        if !saved.is_empty() {
            registrar.refresh();
        }
        log::info!("saved {} take(s) to {}", saved.len(), destination.display());
        Ok(saved)
    }
}
