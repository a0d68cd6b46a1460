use serde::{Deserialize, Serialize};

/// Identifies the playable instrument created by the audio backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct InstrumentHandle(u32);

impl InstrumentHandle {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstrumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of the audio engine within one piano lesson mount.
///
/// Transitions only move forward: Uninitialized -> Starting -> Ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioEngineState {
    #[default]
    Uninitialized,
    Starting,
    Ready(InstrumentHandle),
}

impl AudioEngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, AudioEngineState::Ready(_))
    }

    pub fn instrument(&self) -> Option<InstrumentHandle> {
        match self {
            AudioEngineState::Ready(handle) => Some(*handle),
            _ => None,
        }
    }
}

/// Feedback sent from the audio thread back to the UI thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AudioFeedback {
    /// Backend initialized and an instrument is playable.
    Ready(InstrumentHandle),
    /// Backend initialization failed; the engine stays in Starting.
    InitFailed(String),
}
