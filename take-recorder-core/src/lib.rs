//! # take-recorder-core
//!
//! Host-agnostic take recorder.
//!
//! Records microphone clips ("takes") into an ordered store, previews them
//! forward or reversed, trims leading and trailing silence, and writes them
//! as RIFF/WAVE files that are handed to the host's asset pipeline.
//! The host plugs its microphone, preview and asset APIs in through the
//! `CaptureDevice`, `PreviewPlayer` and `AssetRegistrar` traits.
//!
//! ## Architecture
//!
//! ```text
//! take-recorder-core (this crate)
//! ├── traits/       ← CaptureDevice, PreviewPlayer, AssetRegistrar, RecorderDelegate
//! ├── models/       ← TakeError, RecorderConfiguration, Take, TakeStore, states
//! ├── processing/   ← silence trimming, WAV header generation
//! ├── storage/      ← WAV writer, metadata sidecar, ChecksumRegistrar
//! ├── capture/      ← StreamingCaptureDevice (callback-fed capture)
//! └── session/      ← RecorderSession (recording + preview workflow)
//! ```

pub mod capture;
pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use capture::streaming::StreamingCaptureDevice;
pub use models::audio_models::{AudioLevels, AudioSource, CapturedAudio, PreviewDirection};
pub use models::config::{RecorderConfiguration, SampleEncoding};
pub use models::error::TakeError;
pub use models::saved_take::{SavedTake, TakeMetadata};
pub use models::state::{PreviewState, RecorderState};
pub use models::store::{take_file_name, TakeStore};
pub use models::take::Take;
pub use processing::silence::trim_silence;
pub use session::recorder::RecorderSession;
pub use storage::checksum_registrar::ChecksumRegistrar;
pub use storage::wav_writer::{write_wav, WavSummary};
pub use traits::asset_registrar::AssetRegistrar;
pub use traits::capture_device::{AudioBufferCallback, CaptureDevice};
pub use traits::preview_player::{PreviewPlayer, PreviewRequest};
pub use traits::recorder_delegate::RecorderDelegate;
