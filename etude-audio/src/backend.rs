//! Audio backend trait: the narrow contract the engine needs from a sound source.
//!
//! `AudioBackend` captures what the engine *means* to do (bring the device up,
//! build an instrument, sound a note) independently of how it's done (a cpal
//! output stream driving a synth). This enables unit testing of the engine
//! lifecycle without an audio device.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use etude_types::{NoteDuration, Pitch};

/// Result type for backend operations.
pub type BackendResult<T = ()> = Result<T, BackendError>;

/// Error from a backend operation.
#[derive(Debug, Clone)]
pub struct BackendError(pub String);

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BackendError {}

impl From<String> for BackendError {
    fn from(s: String) -> Self {
        BackendError(s)
    }
}

impl From<&str> for BackendError {
    fn from(s: &str) -> Self {
        BackendError(s.to_string())
    }
}

/// Something that can sound a note.
pub trait Instrument {
    /// Start `pitch` now and release it after `duration`.
    fn trigger_attack_release(&mut self, pitch: Pitch, duration: NoteDuration) -> BackendResult;
}

/// Semantic-level audio backend trait.
///
/// Both methods run on the audio thread. `initialize` may block until the
/// device is up; the UI thread only learns about it through feedback.
pub trait AudioBackend {
    /// Bring the sound device up.
    fn initialize(&mut self) -> BackendResult;

    /// Build a playable instrument. Only valid after `initialize` succeeded.
    fn create_instrument(&mut self) -> BackendResult<Box<dyn Instrument>>;
}

// ─── Test Backend ───────────────────────────────────────────────────

/// An operation recorded by `TestBackend` for assertion in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOp {
    Initialize,
    CreateInstrument,
    TriggerAttackRelease { pitch: String, duration: NoteDuration },
}

#[derive(Default)]
struct TestBackendInner {
    ops: Vec<TestOp>,
    held: bool,
    failure: Option<String>,
}

/// A test backend that records all operations into a vector for assertions.
///
/// All operations succeed by default. `hold_initialization` makes
/// `initialize` block until `release_initialization`, which lets tests observe
/// the engine while it is still starting. Uses `Mutex` + `Condvar` so the
/// backend is `Send + Sync` (needed for `Arc<TestBackend>` sharing).
pub struct TestBackend {
    inner: Mutex<TestBackendInner>,
    changed: Condvar,
}

impl TestBackend {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TestBackendInner::default()),
            changed: Condvar::new(),
        }
    }

    /// Make the next `initialize` calls block until released.
    pub fn hold_initialization(&self) {
        self.inner.lock().unwrap().held = true;
    }

    pub fn release_initialization(&self) {
        self.inner.lock().unwrap().held = false;
        self.changed.notify_all();
    }

    /// Make `initialize` fail with this message.
    pub fn fail_initialization(&self, message: &str) {
        self.inner.lock().unwrap().failure = Some(message.to_string());
    }

    /// Return all recorded operations.
    pub fn operations(&self) -> Vec<TestOp> {
        self.inner.lock().unwrap().ops.clone()
    }

    /// Count operations matching a predicate.
    pub fn count<F: Fn(&TestOp) -> bool>(&self, f: F) -> usize {
        self.inner.lock().unwrap().ops.iter().filter(|op| f(op)).count()
    }

    /// Return all TriggerAttackRelease operations as (pitch, duration) pairs.
    pub fn triggers(&self) -> Vec<(String, NoteDuration)> {
        self.inner
            .lock()
            .unwrap()
            .ops
            .iter()
            .filter_map(|op| match op {
                TestOp::TriggerAttackRelease { pitch, duration } => Some((pitch.clone(), *duration)),
                _ => None,
            })
            .collect()
    }

    /// Block until at least `n` operations match `f`, or the timeout passes.
    /// Returns whether the count was reached.
    pub fn wait_for_count<F: Fn(&TestOp) -> bool>(&self, n: usize, timeout: Duration, f: F) -> bool {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock().unwrap();
        loop {
            if inner.ops.iter().filter(|op| f(op)).count() >= n {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            inner = self.changed.wait_timeout(inner, deadline - now).unwrap().0;
        }
    }

    fn record(&self, op: TestOp) {
        self.inner.lock().unwrap().ops.push(op);
        self.changed.notify_all();
    }
}

impl Default for TestBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps `Arc<TestBackend>` to implement `AudioBackend` so the engine can
/// own a `Box<dyn AudioBackend>` while tests retain an `Arc` for assertions.
pub struct SharedTestBackend(pub Arc<TestBackend>);

impl AudioBackend for SharedTestBackend {
    fn initialize(&mut self) -> BackendResult {
        self.0.record(TestOp::Initialize);
        let mut inner = self.0.inner.lock().unwrap();
        while inner.held {
            inner = self.0.changed.wait(inner).unwrap();
        }
        match &inner.failure {
            Some(message) => Err(BackendError(message.clone())),
            None => Ok(()),
        }
    }

    fn create_instrument(&mut self) -> BackendResult<Box<dyn Instrument>> {
        self.0.record(TestOp::CreateInstrument);
        Ok(Box::new(TestInstrument(Arc::clone(&self.0))))
    }
}

struct TestInstrument(Arc<TestBackend>);

impl Instrument for TestInstrument {
    fn trigger_attack_release(&mut self, pitch: Pitch, duration: NoteDuration) -> BackendResult {
        self.0.record(TestOp::TriggerAttackRelease {
            pitch: pitch.to_string(),
            duration,
        });
        Ok(())
    }
}

// ─── NullBackend ────────────────────────────────────────────────────

/// A no-op backend that silently succeeds. Useful when no audio device
/// should be opened.
pub struct NullBackend;

struct NullInstrument;

impl Instrument for NullInstrument {
    fn trigger_attack_release(&mut self, _: Pitch, _: NoteDuration) -> BackendResult { Ok(()) }
}

impl AudioBackend for NullBackend {
    fn initialize(&mut self) -> BackendResult { Ok(()) }
    fn create_instrument(&mut self) -> BackendResult<Box<dyn Instrument>> { Ok(Box::new(NullInstrument)) }
}
