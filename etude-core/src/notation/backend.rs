//! NotationBackend trait and the recording backend used by tests.

use std::sync::{Arc, Mutex};

use super::layout::{NotationError, Stave, Voice};
use super::target::{Drawing, RenderTarget};

/// Engraving backend. Each call appends to the target's display list.
pub trait NotationBackend {
    /// Size the target and make it drawable.
    fn open_context(
        &mut self,
        target: &mut RenderTarget,
        width: u32,
        height: u32,
    ) -> Result<(), NotationError>;

    fn draw_stave(&mut self, target: &mut RenderTarget, stave: &Stave) -> Result<(), NotationError>;

    /// Draw a formatted voice against its stave.
    fn draw_voice(
        &mut self,
        target: &mut RenderTarget,
        stave: &Stave,
        voice: &Voice,
    ) -> Result<(), NotationError>;
}

/// Recorded notation operation.
#[derive(Debug, Clone, PartialEq)]
pub enum NotationOp {
    OpenContext { width: u32, height: u32 },
    DrawStave { x: f32, y: f32, width: f32 },
    /// Notation keys of each note, e.g. `c/4`.
    DrawVoice { keys: Vec<String> },
}

/// Records every call and pushes markup-free drawings so the target's
/// display list can be inspected. Clones share one operation log.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    ops: Arc<Mutex<Vec<NotationOp>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operations(&self) -> Vec<NotationOp> {
        self.ops.lock().map(|ops| ops.clone()).unwrap_or_default()
    }

    pub fn count(&self, pred: impl Fn(&NotationOp) -> bool) -> usize {
        self.operations().iter().filter(|op| pred(op)).count()
    }

    fn record(&self, op: NotationOp) {
        if let Ok(mut ops) = self.ops.lock() {
            ops.push(op);
        }
    }
}

impl NotationBackend for RecordingBackend {
    fn open_context(
        &mut self,
        target: &mut RenderTarget,
        width: u32,
        height: u32,
    ) -> Result<(), NotationError> {
        self.record(NotationOp::OpenContext { width, height });
        target.resize(width, height);
        Ok(())
    }

    fn draw_stave(&mut self, target: &mut RenderTarget, stave: &Stave) -> Result<(), NotationError> {
        self.record(NotationOp::DrawStave {
            x: stave.x,
            y: stave.y,
            width: stave.width,
        });
        target.push(Drawing::Stave {
            markup: String::new(),
        })
    }

    fn draw_voice(
        &mut self,
        target: &mut RenderTarget,
        _stave: &Stave,
        voice: &Voice,
    ) -> Result<(), NotationError> {
        let keys = voice
            .notes()
            .iter()
            .flat_map(|n| n.keys.iter().map(|p| p.notation_key()))
            .collect();
        self.record(NotationOp::DrawVoice { keys });
        target.push(Drawing::Voice {
            notes: voice.notes().len(),
            markup: String::new(),
        })
    }
}
