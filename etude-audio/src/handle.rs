//! AudioHandle: main-thread interface to the audio engine.
//!
//! Owns the engine state machine and the command/feedback channels. The
//! backend and its instrument live on the audio thread, which is spawned the
//! first time `start` is called.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender as CrossbeamSender;
use etude_types::{AudioEngineState, AudioFeedback, NoteDuration, Pitch};

use crate::audio_thread::AudioThread;
use crate::commands::AudioCmd;
use crate::BackendFactory;

/// Main-thread handle to the audio subsystem.
///
/// State only moves forward: Uninitialized -> Starting -> Ready. The state
/// check in `start` is the re-entrancy guard; all calls come from the single
/// UI thread, and the audio thread never touches this state directly.
pub struct AudioHandle {
    factory: BackendFactory,
    state: AudioEngineState,
    cmd_tx: Option<CrossbeamSender<AudioCmd>>,
    feedback_rx: Option<Receiver<AudioFeedback>>,
}

impl AudioHandle {
    pub fn new(factory: BackendFactory) -> Self {
        Self {
            factory,
            state: AudioEngineState::Uninitialized,
            cmd_tx: None,
            feedback_rx: None,
        }
    }

    pub fn state(&self) -> AudioEngineState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Begin bringing the engine up. No-op unless Uninitialized.
    ///
    /// Returns immediately in Starting; the transition to Ready happens when
    /// the audio thread's feedback is drained.
    pub fn start(&mut self) {
        if self.state != AudioEngineState::Uninitialized {
            log::debug!(target: "audio", "start ignored in state {:?}", self.state);
            return;
        }
        self.state = AudioEngineState::Starting;

        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (feedback_tx, feedback_rx) = mpsc::channel();
        let factory = self.factory.clone();

        let spawned = thread::Builder::new()
            .name("etude-audio".to_string())
            .spawn(move || {
                AudioThread::new(factory, cmd_rx, feedback_tx).run();
            });
        if let Err(e) = spawned {
            log::error!(target: "audio", "could not spawn audio thread: {}", e);
            return;
        }

        self.cmd_tx = Some(cmd_tx);
        self.feedback_rx = Some(feedback_rx);
        self.send(AudioCmd::Initialize);
        log::info!(target: "audio", "audio engine starting");
    }

    /// Sound `pitch` for `duration`. Dropped silently unless Ready.
    /// Returns whether the note was sent to the audio thread.
    pub fn trigger(&mut self, pitch: Pitch, duration: NoteDuration) -> bool {
        let Some(instrument) = self.state.instrument() else {
            log::debug!(target: "audio", "trigger {} dropped: engine {:?}", pitch, self.state);
            return false;
        };
        self.send(AudioCmd::Trigger {
            instrument,
            pitch,
            duration,
        })
    }

    /// Apply every pending feedback message without blocking.
    pub fn drain_feedback(&mut self) -> Vec<AudioFeedback> {
        let mut out = Vec::new();
        while let Some(msg) = self.feedback_rx.as_ref().and_then(|rx| rx.try_recv().ok()) {
            self.apply_feedback(&msg);
            out.push(msg);
        }
        out
    }

    /// Block for up to `timeout` waiting for the next feedback message.
    pub fn wait_for_feedback(&mut self, timeout: Duration) -> Option<AudioFeedback> {
        let rx = self.feedback_rx.as_ref()?;
        match rx.recv_timeout(timeout) {
            Ok(msg) => {
                self.apply_feedback(&msg);
                Some(msg)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn apply_feedback(&mut self, feedback: &AudioFeedback) {
        match feedback {
            AudioFeedback::Ready(handle) => {
                if self.state == AudioEngineState::Starting {
                    self.state = AudioEngineState::Ready(*handle);
                    log::info!(target: "audio", "audio engine ready");
                }
            }
            AudioFeedback::InitFailed(message) => {
                // No retry: the engine stays in Starting.
                log::error!(target: "audio", "audio engine failed to start: {}", message);
            }
        }
    }

    /// Fire-and-forget: send a command and log if the audio thread is disconnected.
    fn send(&self, cmd: AudioCmd) -> bool {
        let Some(tx) = &self.cmd_tx else {
            return false;
        };
        match tx.send(cmd) {
            Ok(()) => true,
            Err(e) => {
                log::warn!(target: "audio", "command dropped: {:?}", e.0);
                false
            }
        }
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        // The thread may be blocked inside backend initialization, so it is
        // told to stop but not joined.
        self.send(AudioCmd::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backend::{AudioBackend, SharedTestBackend, TestBackend, TestOp};
    use etude_types::PitchClass;

    const WAIT: Duration = Duration::from_secs(2);

    fn handle_with_test_backend() -> (AudioHandle, Arc<TestBackend>) {
        let backend = Arc::new(TestBackend::new());
        let shared = Arc::clone(&backend);
        let factory: BackendFactory = Arc::new(move || {
            Box::new(SharedTestBackend(Arc::clone(&shared))) as Box<dyn AudioBackend>
        });
        (AudioHandle::new(factory), backend)
    }

    fn c4() -> Pitch {
        Pitch::new(PitchClass::C, 4)
    }

    #[test]
    fn starts_uninitialized_without_a_thread() {
        let (mut audio, backend) = handle_with_test_backend();
        assert_eq!(audio.state(), AudioEngineState::Uninitialized);
        assert!(!audio.trigger(c4(), NoteDuration::Eighth));
        assert!(audio.drain_feedback().is_empty());
        assert!(backend.operations().is_empty());
    }

    #[test]
    fn trigger_while_starting_is_dropped() {
        let (mut audio, backend) = handle_with_test_backend();
        backend.hold_initialization();
        audio.start();
        assert_eq!(audio.state(), AudioEngineState::Starting);
        assert!(backend.wait_for_count(1, WAIT, |op| *op == TestOp::Initialize));

        assert!(!audio.trigger(c4(), NoteDuration::Eighth));
        assert!(audio.drain_feedback().is_empty());
        assert_eq!(audio.state(), AudioEngineState::Starting);

        backend.release_initialization();
        assert!(matches!(audio.wait_for_feedback(WAIT), Some(AudioFeedback::Ready(_))));
        assert!(audio.is_ready());

        assert!(audio.trigger(c4(), NoteDuration::Eighth));
        assert!(backend.wait_for_count(1, WAIT, |op| matches!(op, TestOp::TriggerAttackRelease { .. })));
        // The dropped trigger never reached the backend.
        assert_eq!(backend.triggers(), vec![("C4".to_string(), NoteDuration::Eighth)]);
    }

    #[test]
    fn second_start_does_not_reinitialize() {
        let (mut audio, backend) = handle_with_test_backend();
        audio.start();
        audio.start();
        assert!(audio.wait_for_feedback(WAIT).is_some());
        assert!(audio.is_ready());
        audio.start();
        assert!(audio.wait_for_feedback(Duration::from_millis(50)).is_none());
        assert_eq!(backend.count(|op| *op == TestOp::Initialize), 1);
        assert_eq!(backend.count(|op| *op == TestOp::CreateInstrument), 1);
    }

    #[test]
    fn stays_ready_across_triggers() {
        let (mut audio, backend) = handle_with_test_backend();
        audio.start();
        audio.wait_for_feedback(WAIT);
        let ready = audio.state();
        for class in [PitchClass::C, PitchClass::E, PitchClass::G] {
            assert!(audio.trigger(Pitch::new(class, 4), NoteDuration::Eighth));
            assert_eq!(audio.state(), ready);
        }
        assert!(backend.wait_for_count(3, WAIT, |op| matches!(op, TestOp::TriggerAttackRelease { .. })));
        let pitches: Vec<String> = backend.triggers().into_iter().map(|(p, _)| p).collect();
        assert_eq!(pitches, vec!["C4", "E4", "G4"]);
    }

    #[test]
    fn failed_initialization_stays_starting() {
        let (mut audio, backend) = handle_with_test_backend();
        backend.fail_initialization("no output device");
        audio.start();
        assert_eq!(
            audio.wait_for_feedback(WAIT),
            Some(AudioFeedback::InitFailed("no output device".to_string()))
        );
        assert_eq!(audio.state(), AudioEngineState::Starting);
        assert!(!audio.trigger(c4(), NoteDuration::Eighth));
        audio.start();
        assert_eq!(backend.count(|op| *op == TestOp::Initialize), 1);
        assert_eq!(backend.count(|op| *op == TestOp::CreateInstrument), 0);
    }

    #[test]
    fn drop_while_starting_does_not_block() {
        let (mut audio, backend) = handle_with_test_backend();
        backend.hold_initialization();
        audio.start();
        assert!(backend.wait_for_count(1, WAIT, |op| *op == TestOp::Initialize));
        drop(audio);
        backend.release_initialization();
    }
}
