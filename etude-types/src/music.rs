use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Pitch class, spelled with sharps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Semitones above C.
    pub fn semitone(&self) -> i32 {
        match self {
            PitchClass::C => 0,
            PitchClass::Cs => 1,
            PitchClass::D => 2,
            PitchClass::Ds => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::Fs => 6,
            PitchClass::G => 7,
            PitchClass::Gs => 8,
            PitchClass::A => 9,
            PitchClass::As => 10,
            PitchClass::B => 11,
        }
    }

    pub fn from_semitone(semitone: i32) -> Self {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    /// Sharps and flats; the black keys of a piano.
    pub fn is_accidental(&self) -> bool {
        matches!(
            self,
            PitchClass::Cs | PitchClass::Ds | PitchClass::Fs | PitchClass::Gs | PitchClass::As
        )
    }

    /// Index of the natural letter this class is written on (C = 0 .. B = 6).
    pub fn letter_index(&self) -> i32 {
        match self {
            PitchClass::C | PitchClass::Cs => 0,
            PitchClass::D | PitchClass::Ds => 1,
            PitchClass::E => 2,
            PitchClass::F | PitchClass::Fs => 3,
            PitchClass::G | PitchClass::Gs => 4,
            PitchClass::A | PitchClass::As => 5,
            PitchClass::B => 6,
        }
    }
}

/// A pitch in scientific pitch notation (middle C is C4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub class: PitchClass,
    pub octave: i8,
}

impl Pitch {
    pub const fn new(class: PitchClass, octave: i8) -> Self {
        Self { class, octave }
    }

    /// MIDI note number (C4 = 60).
    pub fn midi(&self) -> i32 {
        (self.octave as i32 + 1) * 12 + self.class.semitone()
    }

    pub fn from_midi(midi: i32) -> Self {
        Self {
            class: PitchClass::from_semitone(midi),
            octave: (midi.div_euclid(12) - 1) as i8,
        }
    }

    /// Equal-tempered frequency in Hz relative to the given A4 tuning.
    pub fn frequency(&self, tuning_a4: f32) -> f32 {
        tuning_a4 * 2f32.powf((self.midi() - 69) as f32 / 12.0)
    }

    /// Diatonic position counted in staff steps from C0.
    pub fn staff_step(&self) -> i32 {
        self.octave as i32 * 7 + self.class.letter_index()
    }

    /// Engraver key form, e.g. `c#/4`.
    pub fn notation_key(&self) -> String {
        format!("{}/{}", self.class.name().to_lowercase(), self.octave)
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class.name(), self.octave)
    }
}

/// Error returned when a pitch name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PitchParseError(pub String);

impl fmt::Display for PitchParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pitch name '{}'", self.0)
    }
}

impl std::error::Error for PitchParseError {}

impl FromStr for Pitch {
    type Err = PitchParseError;

    /// Parses names like `C4`, `c#4`, `Db4`, `A-1`. Flats are respelled as sharps.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PitchParseError(s.to_string());
        let mut chars = s.trim().chars().peekable();

        let natural = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(err()),
        };

        let alter = match chars.peek() {
            Some('#') => {
                chars.next();
                1
            }
            Some('b') => {
                chars.next();
                -1
            }
            _ => 0,
        };

        let octave_str: String = chars.collect();
        let digits = octave_str.strip_prefix('-').unwrap_or(&octave_str);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let octave: i32 = octave_str.parse().map_err(|_| err())?;
        if !(-1..=9).contains(&octave) {
            return Err(err());
        }

        // An accidental can carry the pitch across an octave boundary.
        let pitch = Pitch::from_midi((octave + 1) * 12 + natural + alter);
        if !(-1..=9).contains(&pitch.octave) {
            return Err(err());
        }
        Ok(pitch)
    }
}

/// Ticks in a whole note; durations are expressed in these.
pub const TICKS_PER_WHOLE: u32 = 16384;

/// Note length, shared by the audio trigger and the engraver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteDuration {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl NoteDuration {
    pub fn ticks(&self) -> u32 {
        match self {
            NoteDuration::Whole => TICKS_PER_WHOLE,
            NoteDuration::Half => TICKS_PER_WHOLE / 2,
            NoteDuration::Quarter => TICKS_PER_WHOLE / 4,
            NoteDuration::Eighth => TICKS_PER_WHOLE / 8,
            NoteDuration::Sixteenth => TICKS_PER_WHOLE / 16,
        }
    }

    /// Length in beats when the beat is `1 / beat_value` of a whole note.
    pub fn beats(&self, beat_value: u8) -> f32 {
        self.ticks() as f32 * beat_value as f32 / TICKS_PER_WHOLE as f32
    }

    /// Length in seconds at `bpm` quarter notes per minute.
    pub fn seconds(&self, bpm: f32) -> f32 {
        self.beats(4) * 60.0 / bpm
    }

    /// Engraver duration code.
    pub fn notation_code(&self) -> &'static str {
        match self {
            NoteDuration::Whole => "w",
            NoteDuration::Half => "h",
            NoteDuration::Quarter => "q",
            NoteDuration::Eighth => "8",
            NoteDuration::Sixteenth => "16",
        }
    }

    /// Transport-style token (`8n` is an eighth note).
    pub fn audio_token(&self) -> &'static str {
        match self {
            NoteDuration::Whole => "1n",
            NoteDuration::Half => "2n",
            NoteDuration::Quarter => "4n",
            NoteDuration::Eighth => "8n",
            NoteDuration::Sixteenth => "16n",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NoteDuration::Whole => "whole-note",
            NoteDuration::Half => "half-note",
            NoteDuration::Quarter => "quarter-note",
            NoteDuration::Eighth => "eighth-note",
            NoteDuration::Sixteenth => "sixteenth-note",
        }
    }

    /// Whether the engraver draws an open notehead.
    pub fn is_hollow(&self) -> bool {
        matches!(self, NoteDuration::Whole | NoteDuration::Half)
    }

    /// Whether the engraver draws a stem.
    pub fn has_stem(&self) -> bool {
        !matches!(self, NoteDuration::Whole)
    }

    /// Number of flags on the stem.
    pub fn flags(&self) -> u8 {
        match self {
            NoteDuration::Eighth => 1,
            NoteDuration::Sixteenth => 2,
            _ => 0,
        }
    }
}

impl fmt::Display for NoteDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sharps_and_flats() {
        assert_eq!("C4".parse::<Pitch>().unwrap(), Pitch::new(PitchClass::C, 4));
        assert_eq!("C#4".parse::<Pitch>().unwrap(), Pitch::new(PitchClass::Cs, 4));
        assert_eq!("db4".parse::<Pitch>().unwrap(), Pitch::new(PitchClass::Cs, 4));
        assert_eq!("Cb4".parse::<Pitch>().unwrap(), Pitch::new(PitchClass::B, 3));
        assert_eq!("B#3".parse::<Pitch>().unwrap(), Pitch::new(PitchClass::C, 4));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("H4".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("C#x".parse::<Pitch>().is_err());
        assert!("C12".parse::<Pitch>().is_err());
        assert!("".parse::<Pitch>().is_err());
    }

    #[test]
    fn parse_checks_octave_after_accidental() {
        assert!("C+4".parse::<Pitch>().is_err());
        assert!("C-4".parse::<Pitch>().is_err());
        assert!("B#9".parse::<Pitch>().is_err());
        assert!("Cb-1".parse::<Pitch>().is_err());
        assert!("C265".parse::<Pitch>().is_err());
        assert_eq!("C-1".parse::<Pitch>().unwrap(), Pitch::new(PitchClass::C, -1));
        assert_eq!("B9".parse::<Pitch>().unwrap(), Pitch::new(PitchClass::B, 9));
    }

    #[test]
    fn display_uses_scientific_names() {
        assert_eq!(Pitch::new(PitchClass::Fs, 4).to_string(), "F#4");
        assert_eq!(Pitch::new(PitchClass::C, 5).notation_key(), "c/5");
        assert_eq!(Pitch::new(PitchClass::As, 4).notation_key(), "a#/4");
    }

    #[test]
    fn midi_and_frequency() {
        let a4 = Pitch::new(PitchClass::A, 4);
        assert_eq!(a4.midi(), 69);
        assert!((a4.frequency(440.0) - 440.0).abs() < 0.001);
        let c4 = Pitch::new(PitchClass::C, 4);
        assert_eq!(c4.midi(), 60);
        assert!((c4.frequency(440.0) - 261.63).abs() < 0.01);
        assert_eq!(Pitch::from_midi(61), Pitch::new(PitchClass::Cs, 4));
    }

    #[test]
    fn staff_steps_ignore_accidentals() {
        let c4 = Pitch::new(PitchClass::C, 4);
        let cs4 = Pitch::new(PitchClass::Cs, 4);
        let c5 = Pitch::new(PitchClass::C, 5);
        assert_eq!(c4.staff_step(), cs4.staff_step());
        assert_eq!(c5.staff_step() - c4.staff_step(), 7);
    }

    #[test]
    fn durations() {
        assert_eq!(NoteDuration::Quarter.beats(4), 1.0);
        assert_eq!(NoteDuration::Eighth.beats(4), 0.5);
        assert_eq!(NoteDuration::Quarter.beats(8), 2.0);
        assert!((NoteDuration::Eighth.seconds(120.0) - 0.25).abs() < 1e-6);
        assert_eq!(NoteDuration::Eighth.name(), "eighth-note");
        assert_eq!(NoteDuration::Eighth.audio_token(), "8n");
        assert_eq!(NoteDuration::Quarter.notation_code(), "q");
    }
}
