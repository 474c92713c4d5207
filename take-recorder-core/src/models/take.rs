use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::audio_models::{AudioLevels, PreviewDirection};
use super::config::RecorderConfiguration;
use super::error::TakeError;
use super::saved_take::{SavedTake, TakeMetadata};
use crate::processing::silence;
use crate::storage::{metadata, wav_writer};
use crate::traits::asset_registrar::AssetRegistrar;
use crate::traits::preview_player::PreviewRequest;

/// One recorded clip: the captured samples, their reversed copy, and where
/// the clip was last saved.
///
/// `reversed_samples` is always the exact reverse of `samples` over the flat
/// interleaved sequence and is rebuilt whenever `samples` changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Take {
    id: Uuid,
    samples: Vec<f32>,
    reversed: Vec<f32>,
    sample_rate: u32,
    channels: u16,
    saved_identifier: Option<String>,
    saved_path: Option<PathBuf>,
}

impl Take {
    /// An unrecorded take.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            samples: Vec::new(),
            reversed: Vec::new(),
            sample_rate: 0,
            channels: 0,
            saved_identifier: None,
            saved_path: None,
        }
    }

    /// Replace the captured buffer.
    ///
    /// On error the take is left untouched.
    pub fn set_buffer(&mut self, samples: Vec<f32>, sample_rate: u32, channels: u16) -> Result<(), TakeError> {
        if sample_rate == 0 {
            return Err(TakeError::InvalidBuffer("sample rate must be positive".into()));
        }
        if channels == 0 {
            return Err(TakeError::InvalidBuffer("channel count must be positive".into()));
        }
        if samples.is_empty() {
            return Err(TakeError::InvalidBuffer("captured buffer is empty".into()));
        }
        if samples.len() % channels as usize != 0 {
            return Err(TakeError::InvalidBuffer(format!(
                "{} samples is not a whole number of {}-channel frames",
                samples.len(),
                channels
            )));
        }

        self.sample_rate = sample_rate;
        self.channels = channels;
        self.replace_samples(samples);
        Ok(())
    }

    pub fn has_recording(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Cut leading and trailing silence at `threshold`.
    ///
    /// Returns the number of samples removed. Trimming a fully silent take
    /// leaves it unrecorded.
    pub fn trim(&mut self, threshold: f32) -> usize {
        if !self.has_recording() {
            return 0;
        }
        let before = self.samples.len();
        let trimmed = silence::trim_silence(&self.samples, self.channels as usize, threshold);
        self.replace_samples(trimmed);
        let removed = before - self.samples.len();
        log::debug!(
            "trimmed take {} at {}: {} -> {} samples",
            self.id,
            threshold,
            before,
            self.samples.len()
        );
        removed
    }

    /// Write the take to `path` and register it with the host.
    ///
    /// With `trim`, silence is cut at `config.trim_threshold` first; if
    /// nothing audible remains the take is left empty, no file is written and
    /// `NoRecording` is returned.
    pub fn save(
        &mut self,
        path: &Path,
        trim: bool,
        config: &RecorderConfiguration,
        registrar: &mut dyn AssetRegistrar,
    ) -> Result<SavedTake, TakeError> {
        self.save_indexed(path, trim, config, registrar, None)
    }

    pub(crate) fn save_indexed(
        &mut self,
        path: &Path,
        trim: bool,
        config: &RecorderConfiguration,
        registrar: &mut dyn AssetRegistrar,
        take_index: Option<usize>,
    ) -> Result<SavedTake, TakeError> {
        if !self.has_recording() {
            return Err(TakeError::NoRecording);
        }
        if trim {
            self.trim(config.trim_threshold);
            if !self.has_recording() {
                log::warn!("take {} is silent after trimming, not saving {}", self.id, path.display());
                return Err(TakeError::NoRecording);
            }
        }

        let summary = wav_writer::write_wav(path, &self.samples, self.sample_rate, self.channels, config.encoding)?;

        let metadata = TakeMetadata {
            id: self.id.to_string(),
            take_index,
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            duration_secs: self.duration_secs(),
            sample_rate: self.sample_rate,
            channels: self.channels,
            sample_count: self.samples.len(),
            encoding: config.encoding,
            levels: self.levels(),
            trimmed: trim,
            checksum: summary.checksum,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        if config.write_metadata_sidecar {
            metadata::write_metadata(&metadata, path)?;
        }

        let identifier = registrar.import_and_register(path)?;
        self.saved_identifier = Some(identifier.clone());
        self.saved_path = Some(path.to_path_buf());
        log::info!("saved take {} to {} as {}", self.id, path.display(), identifier);

        Ok(SavedTake {
            path: path.to_path_buf(),
            identifier,
            metadata,
        })
    }

    /// Build a preview request for the forward or reversed buffer.
    ///
    /// `start_fraction` is a position in the forward timeline, clamped into
    /// `[0, 1)` and rounded down to a frame. The reversed buffer starts at
    /// `sample_count - forward_start`, which is `sample_count` itself for a
    /// fraction of 0.
    pub fn preview_request(
        &self,
        direction: PreviewDirection,
        start_fraction: f64,
    ) -> Result<PreviewRequest<'_>, TakeError> {
        if !self.has_recording() {
            return Err(TakeError::NoRecording);
        }
        let frames = self.frame_count();
        let fraction = if start_fraction.is_finite() {
            start_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let start_frame = ((fraction * frames as f64) as usize).min(frames - 1);
        let forward_start = start_frame * self.channels as usize;

        let (samples, start_sample) = match direction {
            PreviewDirection::Forward => (self.samples.as_slice(), forward_start),
            PreviewDirection::Reversed => (self.reversed.as_slice(), self.samples.len() - forward_start),
        };

        Ok(PreviewRequest {
            samples,
            sample_rate: self.sample_rate,
            channels: self.channels,
            direction,
            start_sample,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn reversed_samples(&self) -> &[f32] {
        &self.reversed
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frame_count(&self) -> usize {
        match self.channels {
            0 => 0,
            c => self.samples.len() / c as usize,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    pub fn levels(&self) -> AudioLevels {
        silence::levels(&self.samples)
    }

    pub fn saved_identifier(&self) -> Option<&str> {
        self.saved_identifier.as_deref()
    }

    pub fn saved_path(&self) -> Option<&Path> {
        self.saved_path.as_deref()
    }

    fn replace_samples(&mut self, samples: Vec<f32>) {
        self.reversed = samples.iter().rev().copied().collect();
        self.samples = samples;
    }
}

impl Default for Take {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;

    /// Hands out sequential identifiers and remembers every path it saw.
    #[derive(Default)]
    struct CountingRegistrar {
        next: u32,
        imported: HashMap<PathBuf, String>,
    }

    impl AssetRegistrar for CountingRegistrar {
        fn import_and_register(&mut self, path: &Path) -> Result<String, TakeError> {
            self.next += 1;
            let id = format!("asset-{}", self.next);
            self.imported.insert(path.to_path_buf(), id.clone());
            Ok(id)
        }

        fn refresh(&mut self) {}
    }

    struct FailingRegistrar;

    impl AssetRegistrar for FailingRegistrar {
        fn import_and_register(&mut self, _path: &Path) -> Result<String, TakeError> {
            Err(TakeError::Registration("importer offline".into()))
        }

        fn refresh(&mut self) {}
    }

    fn recorded(samples: Vec<f32>, channels: u16) -> Take {
        let mut take = Take::new();
        take.set_buffer(samples, 44100, channels).unwrap();
        take
    }

    #[test]
    fn new_take_is_unrecorded() {
        let take = Take::new();
        assert!(!take.has_recording());
        assert_eq!(take.frame_count(), 0);
        assert_eq!(take.duration_secs(), 0.0);
        assert!(take.saved_identifier().is_none());
    }

    #[test]
    fn set_buffer_builds_reversed_copy() {
        let take = recorded(vec![1.0, 2.0, 3.0, 4.0], 2);
        assert!(take.has_recording());
        assert_eq!(take.reversed_samples(), &[4.0, 3.0, 2.0, 1.0]);
        assert_eq!(take.frame_count(), 2);
    }

    #[test]
    fn reversing_twice_restores_samples() {
        let samples: Vec<f32> = (0..101).map(|i| (i as f32 * 0.3).cos()).collect();
        let take = recorded(samples.clone(), 1);
        let back: Vec<f32> = take.reversed_samples().iter().rev().copied().collect();
        assert_eq!(back, samples);
        assert_eq!(take.reversed_samples().len(), take.samples().len());
    }

    #[test]
    fn set_buffer_rejects_malformed_input() {
        let mut take = recorded(vec![0.5, 0.5], 1);

        assert!(matches!(take.set_buffer(vec![0.1], 0, 1), Err(TakeError::InvalidBuffer(_))));
        assert!(matches!(take.set_buffer(vec![0.1], 44100, 0), Err(TakeError::InvalidBuffer(_))));
        assert!(matches!(take.set_buffer(Vec::new(), 44100, 1), Err(TakeError::InvalidBuffer(_))));
        assert!(matches!(
            take.set_buffer(vec![0.1, 0.2, 0.3], 44100, 2),
            Err(TakeError::InvalidBuffer(_))
        ));

        // Unchanged after every failure.
        assert_eq!(take.samples(), &[0.5, 0.5]);
        assert_eq!(take.channels(), 1);
    }

    #[test]
    fn two_seconds_of_zeros() {
        let mut take = Take::new();
        take.set_buffer(vec![0.0; 88200], 44100, 1).unwrap();
        assert!(take.has_recording());
        assert_eq!(take.samples().len(), 88200);
        assert!((take.duration_secs() - 2.0).abs() < 1e-9);

        assert_eq!(take.trim(0.01), 88200);
        assert!(take.samples().is_empty());
        assert!(take.reversed_samples().is_empty());
        assert!(!take.has_recording());
    }

    #[test]
    fn trim_keeps_reversed_in_sync() {
        let mut take = recorded(vec![0.0, 0.2, 0.0, 0.4, 0.0], 1);
        assert_eq!(take.trim(0.1), 2);
        assert_eq!(take.samples(), &[0.2, 0.0, 0.4]);
        assert_eq!(take.reversed_samples(), &[0.4, 0.0, 0.2]);
    }

    #[test]
    fn trim_on_unrecorded_take_is_noop() {
        let mut take = Take::new();
        assert_eq!(take.trim(0.01), 0);
        assert!(!take.has_recording());
    }

    #[test]
    fn save_unrecorded_take_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let mut registrar = CountingRegistrar::default();

        let err = Take::new()
            .save(&path, false, &RecorderConfiguration::default(), &mut registrar)
            .unwrap_err();
        assert_eq!(err, TakeError::NoRecording);
        assert!(!path.exists());
        assert!(registrar.imported.is_empty());
    }

    #[test]
    fn save_silent_take_with_trim_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let mut registrar = CountingRegistrar::default();
        let mut take = recorded(vec![0.0; 88200], 1);

        let err = take
            .save(&path, true, &RecorderConfiguration::default(), &mut registrar)
            .unwrap_err();
        assert_eq!(err, TakeError::NoRecording);
        assert!(!path.exists());
        assert!(!take.has_recording());
    }

    #[test]
    fn save_writes_registers_and_records_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let mut registrar = CountingRegistrar::default();
        let mut take = recorded(vec![0.0, 0.0, 0.5, -0.5, 0.0], 1);

        let saved = take
            .save(&path, true, &RecorderConfiguration::default(), &mut registrar)
            .unwrap();

        assert_eq!(saved.identifier, "asset-1");
        assert_eq!(take.saved_identifier(), Some("asset-1"));
        assert_eq!(take.saved_path(), Some(path.as_path()));
        assert_eq!(saved.metadata.sample_count, 2);
        assert!(saved.metadata.trimmed);
        assert_eq!(saved.metadata.file_name, "take_1.wav");
        assert_eq!(registrar.imported.get(&path).map(String::as_str), Some("asset-1"));

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.len(), 2);
    }

    #[test]
    fn save_with_unrepresentable_layout_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let mut registrar = CountingRegistrar::default();
        let mut take = recorded(vec![0.1; 4096], 4096);

        let err = take
            .save(&path, false, &RecorderConfiguration::default(), &mut registrar)
            .unwrap_err();
        assert!(matches!(err, TakeError::InvalidBuffer(_)));
        assert!(!path.exists());
        assert!(registrar.imported.is_empty());
        assert!(take.saved_identifier().is_none());
    }

    #[test]
    fn resave_overwrites_file_and_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let mut registrar = CountingRegistrar::default();
        let config = RecorderConfiguration::default();
        let mut take = recorded(vec![0.3; 10], 1);

        take.save(&path, false, &config, &mut registrar).unwrap();
        take.set_buffer(vec![0.3; 4], 44100, 1).unwrap();
        take.save(&path, false, &config, &mut registrar).unwrap();

        assert_eq!(take.saved_identifier(), Some("asset-2"));
        assert_eq!(hound::WavReader::open(&path).unwrap().len(), 4);
    }

    #[test]
    fn registration_failure_keeps_previous_identifier() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let config = RecorderConfiguration::default();
        let mut take = recorded(vec![0.3; 10], 1);

        take.save(&path, false, &config, &mut CountingRegistrar::default()).unwrap();
        let err = take.save(&path, false, &config, &mut FailingRegistrar).unwrap_err();

        assert!(matches!(err, TakeError::Registration(_)));
        assert_eq!(take.saved_identifier(), Some("asset-1"));
    }

    #[test]
    fn save_writes_sidecar_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let config = RecorderConfiguration {
            write_metadata_sidecar: true,
            ..Default::default()
        };
        let mut take = recorded(vec![0.3; 10], 1);

        let saved = take.save(&path, false, &config, &mut CountingRegistrar::default()).unwrap();

        let sidecar = metadata::read_metadata(&path).unwrap();
        assert_eq!(sidecar, saved.metadata);
        assert_eq!(sidecar.id, take.id().to_string());
        assert!(fs::metadata(metadata::metadata_path(&path)).is_ok());
    }

    #[test]
    fn forward_preview_maps_fraction_to_frame() {
        let take = recorded((0..8).map(|i| i as f32).collect(), 2);

        let request = take.preview_request(PreviewDirection::Forward, 0.5).unwrap();
        assert_eq!(request.start_sample, 4);
        assert_eq!(request.samples, take.samples());
        assert_eq!(request.channels, 2);

        let start = take.preview_request(PreviewDirection::Forward, 0.0).unwrap();
        assert_eq!(start.start_sample, 0);
    }

    #[test]
    fn reversed_preview_mirrors_start_index() {
        let take = recorded((0..8).map(|i| i as f32).collect(), 2);

        let request = take.preview_request(PreviewDirection::Reversed, 0.5).unwrap();
        assert_eq!(request.samples, take.reversed_samples());
        assert_eq!(request.start_sample, 8 - 4);

        let from_end = take.preview_request(PreviewDirection::Reversed, 0.75).unwrap();
        assert_eq!(from_end.start_sample, 8 - 6);
    }

    #[test]
    fn reversed_preview_from_start_points_past_last_sample() {
        let take = recorded((0..8).map(|i| i as f32).collect(), 2);

        let request = take.preview_request(PreviewDirection::Reversed, 0.0).unwrap();
        assert_eq!(request.start_sample, request.samples.len());
        assert!(request.samples[request.start_sample..].is_empty());
    }

    #[test]
    fn preview_fraction_is_clamped() {
        let take = recorded(vec![0.1; 10], 1);

        assert_eq!(take.preview_request(PreviewDirection::Forward, 1.0).unwrap().start_sample, 9);
        assert_eq!(take.preview_request(PreviewDirection::Forward, 7.0).unwrap().start_sample, 9);
        assert_eq!(take.preview_request(PreviewDirection::Forward, -1.0).unwrap().start_sample, 0);
        assert_eq!(take.preview_request(PreviewDirection::Forward, f64::NAN).unwrap().start_sample, 0);
    }

    #[test]
    fn preview_of_unrecorded_take_fails() {
        assert_eq!(
            Take::new().preview_request(PreviewDirection::Forward, 0.0).unwrap_err(),
            TakeError::NoRecording
        );
    }
}
