//! Staff notation for the piano lesson.
//!
//! `NotationRenderer` owns a [`RenderTarget`] and a [`NotationBackend`].
//! Rendering a phrase clears the target, opens a context, lays out one
//! treble stave and one justified voice, then draws stave before voice.

mod backend;
mod layout;
mod svg;
mod target;

pub use backend::{NotationBackend, NotationOp, RecordingBackend};
pub use layout::{Clef, Formatter, NotationError, Stave, StaveNote, Voice, LINE_SPACING};
pub use svg::SvgBackend;
pub use target::{Drawing, RenderTarget, NOTATION_TARGET_ID};

use etude_types::PhraseSpec;

use crate::lesson::MountId;

/// Pixel geometry of the notation region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotationLayout {
    pub width: u32,
    pub height: u32,
    pub stave_x: f32,
    pub stave_y: f32,
    pub stave_width: f32,
    pub justify_width: f32,
}

impl Default for NotationLayout {
    fn default() -> Self {
        Self {
            width: 500,
            height: 200,
            stave_x: 10.0,
            stave_y: 40.0,
            stave_width: 480.0,
            justify_width: 450.0,
        }
    }
}

pub struct NotationRenderer {
    backend: Box<dyn NotationBackend>,
    target: RenderTarget,
    layout: NotationLayout,
    rendered_for: Option<MountId>,
}

impl NotationRenderer {
    pub fn new(backend: Box<dyn NotationBackend>, layout: NotationLayout) -> Self {
        Self {
            backend,
            target: RenderTarget::default(),
            layout,
            rendered_for: None,
        }
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn layout(&self) -> NotationLayout {
        self.layout
    }

    /// Mount the phrase was last rendered for.
    pub fn rendered_for(&self) -> Option<MountId> {
        self.rendered_for
    }

    /// Empty the target and forget the last mount, for when the notation
    /// region leaves the tree.
    pub fn clear_target(&mut self) {
        self.target.clear();
        self.rendered_for = None;
    }

    /// Draw `phrase` onto the target, replacing whatever was there.
    /// On error the target is left cleared.
    pub fn render(&mut self, phrase: &PhraseSpec) -> Result<(), NotationError> {
        let result = self.draw(phrase);
        if result.is_err() {
            self.target.clear();
        }
        result
    }

    fn draw(&mut self, phrase: &PhraseSpec) -> Result<(), NotationError> {
        let layout = self.layout;
        self.target.clear();
        self.backend
            .open_context(&mut self.target, layout.width, layout.height)?;

        let stave =
            Stave::new(layout.stave_x, layout.stave_y, layout.stave_width).with_clef(Clef::Treble);

        let mut voice = Voice::new(phrase.total_beats(), phrase.beat_value())?;
        voice.add_tickables(phrase.notes.iter().map(StaveNote::from))?;
        let mut voices = [voice];
        Formatter::format(&mut voices, &stave, layout.justify_width)?;

        self.backend.draw_stave(&mut self.target, &stave)?;
        for voice in &voices {
            self.backend.draw_voice(&mut self.target, &stave, voice)?;
        }
        Ok(())
    }

    /// Render once per mount. Returns whether a render was attempted.
    pub fn ensure_rendered(&mut self, mount: MountId, phrase: &PhraseSpec) -> bool {
        if self.rendered_for == Some(mount) {
            return false;
        }
        self.rendered_for = Some(mount);
        match self.render(phrase) {
            Ok(()) => {
                log::debug!(target: "notation", "rendered {} notes for mount {}", phrase.len(), mount)
            }
            Err(e) => log::error!(target: "notation", "render failed: {}", e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etude_types::{PhraseNote, PitchClass, C_MAJOR_PHRASE};

    fn recording_renderer() -> (NotationRenderer, RecordingBackend) {
        let backend = RecordingBackend::new();
        let renderer = NotationRenderer::new(Box::new(backend.clone()), NotationLayout::default());
        (renderer, backend)
    }

    #[test]
    fn render_draws_stave_then_voice() {
        let (mut renderer, backend) = recording_renderer();
        renderer.render(&C_MAJOR_PHRASE).unwrap();

        let ops = backend.operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0], NotationOp::OpenContext { width: 500, height: 200 });
        assert_eq!(ops[1], NotationOp::DrawStave { x: 10.0, y: 40.0, width: 480.0 });
        let NotationOp::DrawVoice { keys } = &ops[2] else {
            panic!("expected voice, got {:?}", ops[2]);
        };
        assert_eq!(keys, &["c/4", "d/4", "e/4", "f/4", "g/4", "a/4", "b/4", "c/5"]);
    }

    #[test]
    fn render_twice_does_not_stack() {
        let mut renderer = NotationRenderer::new(Box::new(SvgBackend::new()), NotationLayout::default());
        renderer.render(&C_MAJOR_PHRASE).unwrap();
        let first = renderer.target().to_svg();
        renderer.render(&C_MAJOR_PHRASE).unwrap();

        assert_eq!(renderer.target().stave_count(), 1);
        assert_eq!(renderer.target().voice_note_counts(), vec![8]);
        assert_eq!(renderer.target().to_svg(), first);
    }

    #[test]
    fn ensure_rendered_is_one_shot_per_mount() {
        let (mut renderer, backend) = recording_renderer();
        assert!(renderer.ensure_rendered(MountId(1), &C_MAJOR_PHRASE));
        assert!(!renderer.ensure_rendered(MountId(1), &C_MAJOR_PHRASE));
        assert_eq!(backend.count(|op| matches!(op, NotationOp::DrawStave { .. })), 1);

        assert!(renderer.ensure_rendered(MountId(2), &C_MAJOR_PHRASE));
        assert_eq!(backend.count(|op| matches!(op, NotationOp::DrawStave { .. })), 2);
        assert_eq!(renderer.target().stave_count(), 1);
        assert_eq!(renderer.rendered_for(), Some(MountId(2)));
    }

    #[test]
    fn clear_target_allows_the_same_mount_again() {
        let (mut renderer, backend) = recording_renderer();
        renderer.ensure_rendered(MountId(1), &C_MAJOR_PHRASE);
        renderer.clear_target();
        assert!(renderer.target().is_empty());
        assert_eq!(renderer.rendered_for(), None);

        assert!(renderer.ensure_rendered(MountId(1), &C_MAJOR_PHRASE));
        assert_eq!(renderer.target().stave_count(), 1);
        assert_eq!(backend.count(|op| matches!(op, NotationOp::DrawStave { .. })), 2);
    }

    #[test]
    fn layout_error_leaves_target_cleared() {
        const BAD_PHRASE: PhraseSpec = PhraseSpec {
            notes: &[PhraseNote::quarter(PitchClass::C, 4)],
            time_signature: (4, 3),
        };
        let (mut renderer, backend) = recording_renderer();
        renderer.render(&C_MAJOR_PHRASE).unwrap();
        assert!(renderer.render(&BAD_PHRASE).is_err());
        assert!(renderer.target().is_empty());
        assert_eq!(renderer.target().size(), None);
        assert_eq!(backend.count(|op| matches!(op, NotationOp::DrawStave { .. })), 1);
    }
}
