//! Lesson navigator: which tab is selected and the one panel mounted for it.
//!
//! Every selection of a different lesson mounts a fresh panel under a new
//! `MountId`. The piano panel owns the keyboard and with it the audio
//! engine, so leaving the piano lesson drops the engine and coming back
//! starts from Uninitialized. The notation renderer outlives panels and is
//! keyed by mount id; its target is emptied whenever the piano panel goes.

use std::fmt;
use std::time::Instant;

use etude_audio::BackendFactory;
use etude_types::{LessonId, PhraseSpec, C_MAJOR_PHRASE};

use crate::keyboard::{InstrumentKeyboard, KeyboardLayout};
use crate::notation::NotationRenderer;

/// Identifies one mounting of a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountId(pub u64);

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub const PIANO_HEADING: &str = "Piano Basics";
pub const NOTATION_HEADING: &str = "Notation Example";

pub const SCALES_TEXT: &str = "This lesson will cover major and minor scales, modes, and other \
scale types. Interactive exercises will be added here in the future.";

pub const CHORDS_TEXT: &str = "This lesson will explore triads, seventh chords, and extended \
harmonies. Interactive chord builders will be added here in the future.";

pub struct PianoPanel {
    keyboard: InstrumentKeyboard,
    notation_attached: bool,
}

impl PianoPanel {
    fn new(audio: BackendFactory, layout: KeyboardLayout) -> Self {
        Self {
            keyboard: InstrumentKeyboard::new(audio, layout),
            notation_attached: false,
        }
    }

    pub fn heading(&self) -> &'static str {
        PIANO_HEADING
    }

    pub fn keyboard(&self) -> &InstrumentKeyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut InstrumentKeyboard {
        &mut self.keyboard
    }

    pub fn notation_attached(&self) -> bool {
        self.notation_attached
    }
}

/// Heading plus fixed body text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPanel {
    pub heading: &'static str,
    pub body: &'static str,
}

pub enum Panel {
    Piano(PianoPanel),
    Text(TextPanel),
}

impl Panel {
    fn mount(lesson: LessonId, audio: &BackendFactory, layout: KeyboardLayout) -> Self {
        match lesson {
            LessonId::Piano => Panel::Piano(PianoPanel::new(audio.clone(), layout)),
            LessonId::Scales => Panel::Text(TextPanel {
                heading: lesson.label(),
                body: SCALES_TEXT,
            }),
            LessonId::Chords => Panel::Text(TextPanel {
                heading: lesson.label(),
                body: CHORDS_TEXT,
            }),
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Panel::Piano(piano) => piano.heading(),
            Panel::Text(text) => text.heading,
        }
    }
}

pub struct LessonNavigator {
    selected: LessonId,
    mount: MountId,
    panel: Panel,
    next_mount: u64,
    audio: BackendFactory,
    keyboard_layout: KeyboardLayout,
    notation: NotationRenderer,
    phrase: &'static PhraseSpec,
}

impl LessonNavigator {
    /// Starts on the default lesson with its panel mounted.
    pub fn new(
        audio: BackendFactory,
        keyboard_layout: KeyboardLayout,
        notation: NotationRenderer,
    ) -> Self {
        let selected = LessonId::default();
        let panel = Panel::mount(selected, &audio, keyboard_layout);
        Self {
            selected,
            mount: MountId(1),
            panel,
            next_mount: 2,
            audio,
            keyboard_layout,
            notation,
            phrase: &C_MAJOR_PHRASE,
        }
    }

    pub fn selected(&self) -> LessonId {
        self.selected
    }

    pub fn mount_id(&self) -> MountId {
        self.mount
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn piano(&self) -> Option<&PianoPanel> {
        match &self.panel {
            Panel::Piano(piano) => Some(piano),
            Panel::Text(_) => None,
        }
    }

    pub fn piano_mut(&mut self) -> Option<&mut PianoPanel> {
        match &mut self.panel {
            Panel::Piano(piano) => Some(piano),
            Panel::Text(_) => None,
        }
    }

    pub fn notation(&self) -> &NotationRenderer {
        &self.notation
    }

    pub fn phrase(&self) -> &'static PhraseSpec {
        self.phrase
    }

    /// Switch lessons. Re-selecting the current lesson keeps its panel.
    /// Returns whether a new panel was mounted.
    pub fn select(&mut self, lesson: LessonId) -> bool {
        if lesson == self.selected {
            return false;
        }
        self.selected = lesson;
        self.mount = MountId(self.next_mount);
        self.next_mount += 1;
        // Dropping the old panel shuts down any audio engine it owned.
        let old = std::mem::replace(
            &mut self.panel,
            Panel::mount(lesson, &self.audio, self.keyboard_layout),
        );
        if matches!(old, Panel::Piano(_)) {
            self.notation.clear_target();
        }
        log::info!(target: "lesson", "mounted {} panel {}", lesson, self.mount);
        true
    }

    /// The piano panel's notation region is now in the visual tree: draw
    /// the phrase into it once for this mount. No-op for other panels.
    pub fn attach_notation(&mut self) -> bool {
        let Panel::Piano(piano) = &mut self.panel else {
            log::debug!(target: "lesson", "notation attach ignored on {}", self.selected);
            return false;
        };
        piano.notation_attached = true;
        self.notation.ensure_rendered(self.mount, self.phrase)
    }

    /// Advance time-driven panel state. Returns true if anything changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &mut self.panel {
            Panel::Piano(piano) => piano.keyboard.poll(now),
            Panel::Text(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use etude_audio::backend::NullBackend;
    use etude_audio::AudioBackend;

    use crate::notation::{NotationLayout, RecordingBackend};

    fn navigator() -> (LessonNavigator, RecordingBackend) {
        let factory: BackendFactory = Arc::new(|| Box::new(NullBackend) as Box<dyn AudioBackend>);
        let notation = RecordingBackend::new();
        let renderer = NotationRenderer::new(Box::new(notation.clone()), NotationLayout::default());
        (
            LessonNavigator::new(factory, KeyboardLayout::Qwerty, renderer),
            notation,
        )
    }

    #[test]
    fn starts_on_piano() {
        let (nav, _) = navigator();
        assert_eq!(nav.selected(), LessonId::Piano);
        assert_eq!(nav.panel().heading(), "Piano Basics");
        assert!(nav.piano().is_some());
    }

    #[test]
    fn reselecting_keeps_the_mount() {
        let (mut nav, _) = navigator();
        let mount = nav.mount_id();
        assert!(!nav.select(LessonId::Piano));
        assert_eq!(nav.mount_id(), mount);
    }

    #[test]
    fn text_panels_carry_fixed_copy() {
        let (mut nav, _) = navigator();
        assert!(nav.select(LessonId::Scales));
        let Panel::Text(text) = nav.panel() else {
            panic!("scales should mount a text panel");
        };
        assert_eq!(text.heading, "Scales");
        assert_eq!(text.body, SCALES_TEXT);

        assert!(nav.select(LessonId::Chords));
        assert_eq!(nav.panel().heading(), "Chords");
        assert!(nav.piano().is_none());
    }

    #[test]
    fn attach_only_renders_on_piano() {
        let (mut nav, notation) = navigator();
        nav.select(LessonId::Chords);
        assert!(!nav.attach_notation());
        assert!(notation.operations().is_empty());

        nav.select(LessonId::Piano);
        assert!(nav.attach_notation());
        assert!(nav.piano().map(PianoPanel::notation_attached).unwrap_or(false));
        assert!(!nav.attach_notation());
        assert_eq!(nav.notation().rendered_for(), Some(nav.mount_id()));
    }

    #[test]
    fn mount_ids_increase() {
        let (mut nav, _) = navigator();
        let first = nav.mount_id();
        nav.select(LessonId::Scales);
        let second = nav.mount_id();
        nav.select(LessonId::Piano);
        assert!(first < second && second < nav.mount_id());
    }
}
