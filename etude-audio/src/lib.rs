//! # etude-audio
//!
//! Audio engine adapter for the piano lesson.
//!
//! - [`backend`] — `AudioBackend` / `Instrument` traits plus the recording
//!   `TestBackend` and silent `NullBackend`
//! - [`synth`] — `SynthBackend`, a small cpal-driven polyphonic synth
//! - [`handle`] — `AudioHandle`, the UI-thread side: owns the engine state
//!   machine and talks to the audio thread over channels
//!
//! The backend is built on the audio thread from a [`BackendFactory`], so
//! device streams that are not `Send` never leave that thread.

pub mod backend;
mod audio_thread;
mod commands;
pub mod handle;
pub mod synth;
mod voice;

use std::sync::Arc;

pub use backend::{AudioBackend, BackendError, BackendResult, Instrument};
pub use handle::AudioHandle;
pub use synth::{SynthBackend, SynthSettings};

/// Builds a fresh backend. Invoked once per engine start, on the audio thread.
pub type BackendFactory = Arc<dyn Fn() -> Box<dyn AudioBackend> + Send + Sync>;

/// Factory for the default cpal synth.
pub fn synth_factory(settings: SynthSettings) -> BackendFactory {
    Arc::new(move || Box::new(SynthBackend::new(settings)) as Box<dyn AudioBackend>)
}
