use super::audio_models::PreviewDirection;

/// Recording state machine.
///
/// State transitions:
/// ```text
/// idle → recording → idle
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording { device_id: String, take_index: usize },
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Index of the take being captured, if any.
    pub fn take_index(&self) -> Option<usize> {
        match self {
            Self::Recording { take_index, .. } => Some(*take_index),
            Self::Idle => None,
        }
    }
}

/// Preview state machine.
///
/// ```text
/// idle → playing → idle   (stop, or the player reports natural end)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewState {
    #[default]
    Idle,
    Playing { take_index: usize, direction: PreviewDirection },
}

impl PreviewState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing { .. })
    }
}
