use thiserror::Error;

/// Errors that can occur while recording, trimming, previewing or saving takes.
///
/// No variant is fatal: the take store stays usable after any failed call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TakeError {
    /// Capture parameters or the captured buffer are malformed.
    #[error("invalid buffer: {0}")]
    InvalidBuffer(String),

    /// The operation needs a take with a non-empty buffer.
    #[error("no recording")]
    NoRecording,

    /// I/O failure while serializing a waveform file.
    #[error("write failed: {0}")]
    Write(String),

    /// No capture device is present (or the configured one is gone).
    #[error("capture device not available")]
    DeviceUnavailable,

    /// The recorder is not in a state that allows the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("configuration failed: {0}")]
    Configuration(String),

    /// The asset registrar refused or failed to import a written file.
    #[error("registration failed: {0}")]
    Registration(String),

    #[error("preview failed: {0}")]
    Preview(String),

    #[error("capture failed: {0}")]
    Capture(String),
}
