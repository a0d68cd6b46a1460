//! Audio command types for the audio thread abstraction.
//!
//! AudioHandle serializes commands through one channel to the audio thread,
//! so triggers are processed in the order they were sent.

use etude_types::{InstrumentHandle, NoteDuration, Pitch};

/// Commands sent from the main thread to the audio thread.
#[derive(Debug)]
pub(crate) enum AudioCmd {
    /// Build the backend, initialize it and create the instrument.
    Initialize,
    Trigger {
        instrument: InstrumentHandle,
        pitch: Pitch,
        duration: NoteDuration,
    },
    Shutdown,
}
