#![allow(dead_code)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use etude_audio::backend::{SharedTestBackend, TestBackend, TestOp};
use etude_audio::{AudioBackend, BackendFactory};
use etude_core::config::Config;
use etude_core::dispatch::{dispatch_action, poll};
use etude_core::notation::RecordingBackend;
use etude_core::state::AppState;
use etude_types::{Action, AudioEngineState, DispatchResult};

pub const WAIT: Duration = Duration::from_secs(2);

/// Session wired to recording backends.
pub struct Harness {
    pub state: AppState,
    pub audio: Arc<TestBackend>,
    pub notation: RecordingBackend,
}

impl Harness {
    pub fn new() -> Self {
        let audio = Arc::new(TestBackend::new());
        let shared = Arc::clone(&audio);
        let factory: BackendFactory = Arc::new(move || {
            Box::new(SharedTestBackend(Arc::clone(&shared))) as Box<dyn AudioBackend>
        });
        let notation = RecordingBackend::new();
        let state = AppState::new(&Config::embedded(), factory, Box::new(notation.clone()));
        Self {
            state,
            audio,
            notation,
        }
    }

    pub fn dispatch(&mut self, action: impl Into<Action>) -> DispatchResult {
        dispatch_action(&action.into(), &mut self.state, Instant::now())
    }

    pub fn audio_state(&self) -> Option<AudioEngineState> {
        self.state
            .navigator
            .piano()
            .map(|piano| piano.keyboard().audio_state())
    }

    /// Poll until the piano's engine is Ready or the timeout passes.
    pub fn drive_until_ready(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            poll(&mut self.state, Instant::now());
            if self.audio_state().is_some_and(|s| s.is_ready()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    pub fn initialize_calls(&self) -> usize {
        self.audio.count(|op| *op == TestOp::Initialize)
    }

    pub fn wait_for_triggers(&self, n: usize) -> bool {
        self.audio
            .wait_for_count(n, WAIT, |op| matches!(op, TestOp::TriggerAttackRelease { .. }))
    }
}
