use serde::{Deserialize, Serialize};

use crate::music::{NoteDuration, Pitch, PitchClass, TICKS_PER_WHOLE};

/// One note of a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseNote {
    pub pitch: Pitch,
    pub duration: NoteDuration,
}

impl PhraseNote {
    pub const fn quarter(class: PitchClass, octave: i8) -> Self {
        Self {
            pitch: Pitch::new(class, octave),
            duration: NoteDuration::Quarter,
        }
    }
}

/// A fixed sequence of notes drawn on the notation staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhraseSpec {
    pub notes: &'static [PhraseNote],
    /// (beats per measure, beat value)
    pub time_signature: (u8, u8),
}

impl PhraseSpec {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn total_ticks(&self) -> u32 {
        self.notes.iter().map(|n| n.duration.ticks()).sum()
    }

    /// Total length counted in the time signature's beat value.
    pub fn total_beats(&self) -> u32 {
        let ticks_per_beat = TICKS_PER_WHOLE / self.time_signature.1 as u32;
        self.total_ticks() / ticks_per_beat
    }

    pub fn beat_value(&self) -> u8 {
        self.time_signature.1
    }
}

/// C major, C4 up to C5, in quarter notes.
pub const C_MAJOR_PHRASE: PhraseSpec = PhraseSpec {
    notes: &[
        PhraseNote::quarter(PitchClass::C, 4),
        PhraseNote::quarter(PitchClass::D, 4),
        PhraseNote::quarter(PitchClass::E, 4),
        PhraseNote::quarter(PitchClass::F, 4),
        PhraseNote::quarter(PitchClass::G, 4),
        PhraseNote::quarter(PitchClass::A, 4),
        PhraseNote::quarter(PitchClass::B, 4),
        PhraseNote::quarter(PitchClass::C, 5),
    ],
    time_signature: (4, 4),
};
