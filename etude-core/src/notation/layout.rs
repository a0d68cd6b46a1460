//! Engraving layout: staves, notes, voices and horizontal formatting.
//!
//! Coordinates are pixels in the render target, y growing downwards.

use std::fmt;

use etude_types::{NoteDuration, PhraseNote, Pitch, TICKS_PER_WHOLE};

/// Distance between two staff lines.
pub const LINE_SPACING: f32 = 10.0;
/// Staff lines left empty above the top line.
const SPACE_ABOVE_LINES: f32 = 4.0;
const START_PADDING: f32 = 10.0;
const END_PADDING: f32 = 10.0;
const CLEF_WIDTH: f32 = 35.0;

/// Staff step of the bottom line of a treble staff (E4).
pub const TREBLE_BOTTOM_STEP: i32 = 4 * 7 + 2;
/// Staff step of the middle line of a treble staff (B4).
pub const TREBLE_MIDDLE_STEP: i32 = TREBLE_BOTTOM_STEP + 4;
/// Staff step of the top line of a treble staff (F5).
pub const TREBLE_TOP_STEP: i32 = TREBLE_BOTTOM_STEP + 8;

#[derive(Debug, Clone)]
pub enum NotationError {
    /// A voice was formatted with no notes.
    EmptyVoice,
    /// Adding notes would exceed the voice's declared beats.
    VoiceOverflow { capacity: u32, attempted: u32 },
    /// The notes do not fill the voice's declared beats.
    IncompleteVoice { expected: u32, actual: u32 },
    /// Voices joined for formatting have different lengths.
    MismatchedVoices,
    /// A beat value that does not divide a whole note.
    InvalidBeatValue(u8),
    /// Drawing was attempted before a context was opened on the target.
    NoContext,
}

impl fmt::Display for NotationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotationError::EmptyVoice => write!(f, "voice has no notes"),
            NotationError::VoiceOverflow { capacity, attempted } => write!(
                f,
                "voice overflow: {} ticks do not fit in {}",
                attempted, capacity
            ),
            NotationError::IncompleteVoice { expected, actual } => write!(
                f,
                "incomplete voice: {} of {} ticks filled",
                actual, expected
            ),
            NotationError::MismatchedVoices => write!(f, "joined voices differ in length"),
            NotationError::InvalidBeatValue(v) => write!(f, "invalid beat value {}", v),
            NotationError::NoContext => write!(f, "no drawing context open on target"),
        }
    }
}

impl std::error::Error for NotationError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clef {
    Treble,
}

/// A five-line staff at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct Stave {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub clef: Option<Clef>,
}

impl Stave {
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self {
            x,
            y,
            width,
            clef: None,
        }
    }

    pub fn with_clef(mut self, clef: Clef) -> Self {
        self.clef = Some(clef);
        self
    }

    /// y of staff line `line`, 0 being the top line.
    pub fn line_y(&self, line: u8) -> f32 {
        self.y + (SPACE_ABOVE_LINES + line as f32) * LINE_SPACING
    }

    pub fn top_line_y(&self) -> f32 {
        self.line_y(0)
    }

    pub fn bottom_line_y(&self) -> f32 {
        self.line_y(4)
    }

    /// y of a notehead centre for the given staff step.
    pub fn y_for_step(&self, step: i32) -> f32 {
        self.bottom_line_y() - (step - TREBLE_BOTTOM_STEP) as f32 * LINE_SPACING / 2.0
    }

    pub fn y_for_pitch(&self, pitch: &Pitch) -> f32 {
        self.y_for_step(pitch.staff_step())
    }

    /// First x available to notes, after the clef.
    pub fn note_start_x(&self) -> f32 {
        let clef = if self.clef.is_some() { CLEF_WIDTH } else { 0.0 };
        self.x + START_PADDING + clef
    }

    /// Last x available to notes.
    pub fn note_end_x(&self) -> f32 {
        self.x + self.width - END_PADDING
    }
}

/// A chord of one or more pitches sharing a duration.
#[derive(Debug, Clone, PartialEq)]
pub struct StaveNote {
    pub keys: Vec<Pitch>,
    pub duration: NoteDuration,
    /// Assigned by the formatter.
    pub x: Option<f32>,
}

impl StaveNote {
    pub fn new(keys: Vec<Pitch>, duration: NoteDuration) -> Self {
        Self {
            keys,
            duration,
            x: None,
        }
    }

    pub fn ticks(&self) -> u32 {
        self.duration.ticks()
    }
}

impl From<&PhraseNote> for StaveNote {
    fn from(note: &PhraseNote) -> Self {
        StaveNote::new(vec![note.pitch], note.duration)
    }
}

/// Notes grouped under a declared number of beats.
#[derive(Debug, Clone, PartialEq)]
pub struct Voice {
    num_beats: u32,
    beat_value: u8,
    notes: Vec<StaveNote>,
}

impl Voice {
    pub fn new(num_beats: u32, beat_value: u8) -> Result<Self, NotationError> {
        if beat_value == 0 || TICKS_PER_WHOLE % beat_value as u32 != 0 {
            return Err(NotationError::InvalidBeatValue(beat_value));
        }
        Ok(Self {
            num_beats,
            beat_value,
            notes: Vec::new(),
        })
    }

    pub fn num_beats(&self) -> u32 {
        self.num_beats
    }

    pub fn beat_value(&self) -> u8 {
        self.beat_value
    }

    pub fn notes(&self) -> &[StaveNote] {
        &self.notes
    }

    /// Ticks the voice declares.
    pub fn total_ticks(&self) -> u32 {
        self.num_beats * (TICKS_PER_WHOLE / self.beat_value as u32)
    }

    /// Ticks taken by the notes added so far.
    pub fn ticks_used(&self) -> u32 {
        self.notes.iter().map(StaveNote::ticks).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.ticks_used() == self.total_ticks()
    }

    /// Append notes. Fails without changing the voice if they would overflow.
    pub fn add_tickables(
        &mut self,
        notes: impl IntoIterator<Item = StaveNote>,
    ) -> Result<(), NotationError> {
        let notes: Vec<StaveNote> = notes.into_iter().collect();
        let attempted = self.ticks_used() + notes.iter().map(StaveNote::ticks).sum::<u32>();
        if attempted > self.total_ticks() {
            return Err(NotationError::VoiceOverflow {
                capacity: self.total_ticks(),
                attempted,
            });
        }
        self.notes.extend(notes);
        Ok(())
    }

    fn check_complete(&self) -> Result<(), NotationError> {
        if self.notes.is_empty() {
            return Err(NotationError::EmptyVoice);
        }
        if !self.is_complete() {
            return Err(NotationError::IncompleteVoice {
                expected: self.total_ticks(),
                actual: self.ticks_used(),
            });
        }
        Ok(())
    }
}

/// Places notes horizontally. Notes starting at the same tick share an x
/// across voices; spacing is proportional to elapsed ticks.
pub struct Formatter;

impl Formatter {
    /// Check that the voices are complete and the same length.
    pub fn join_voices(voices: &[Voice]) -> Result<(), NotationError> {
        let mut length = None;
        for voice in voices {
            voice.check_complete()?;
            match length {
                None => length = Some(voice.total_ticks()),
                Some(l) if l != voice.total_ticks() => return Err(NotationError::MismatchedVoices),
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Justify the voices across `justify_width` pixels starting after the
    /// stave's clef, never running past the stave's end.
    pub fn format(
        voices: &mut [Voice],
        stave: &Stave,
        justify_width: f32,
    ) -> Result<(), NotationError> {
        Self::join_voices(voices)?;
        let start = stave.note_start_x();
        let width = justify_width
            .min(stave.note_end_x() - start)
            .max(0.0);
        for voice in voices.iter_mut() {
            let total = voice.total_ticks() as f32;
            let mut elapsed = 0u32;
            for note in &mut voice.notes {
                note.x = Some(start + width * elapsed as f32 / total);
                elapsed += note.ticks();
            }
        }
        Ok(())
    }
}
