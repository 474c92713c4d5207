use serde::{Deserialize, Serialize};

/// A capture device reported by a `CaptureDevice` collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSource {
    pub id: String,
    pub name: String,
    pub is_default: bool,
}

/// Raw interleaved audio handed back when a capture stops.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapturedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Level metering for a buffer (RMS and peak, 0.0–1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioLevels {
    pub rms: f32,
    pub peak: f32,
}

/// Which of a take's two buffers a preview plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewDirection {
    #[default]
    Forward,
    Reversed,
}
