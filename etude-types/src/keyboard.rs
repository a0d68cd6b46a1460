use serde::{Deserialize, Serialize};

use crate::music::{Pitch, PitchClass};

/// One key of the on-screen keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    pub pitch: Pitch,
    pub is_accidental: bool,
}

impl KeyDescriptor {
    const fn new(class: PitchClass, is_accidental: bool) -> Self {
        Self {
            pitch: Pitch::new(class, 4),
            is_accidental,
        }
    }

    /// Name sent to the instrument and printed on the key, e.g. `C#4`.
    pub fn pitch_name(&self) -> String {
        self.pitch.to_string()
    }
}

/// One chromatic octave, C4 to B4.
pub const OCTAVE_KEYS: [KeyDescriptor; 12] = [
    KeyDescriptor::new(PitchClass::C, false),
    KeyDescriptor::new(PitchClass::Cs, true),
    KeyDescriptor::new(PitchClass::D, false),
    KeyDescriptor::new(PitchClass::Ds, true),
    KeyDescriptor::new(PitchClass::E, false),
    KeyDescriptor::new(PitchClass::F, false),
    KeyDescriptor::new(PitchClass::Fs, true),
    KeyDescriptor::new(PitchClass::G, false),
    KeyDescriptor::new(PitchClass::Gs, true),
    KeyDescriptor::new(PitchClass::A, false),
    KeyDescriptor::new(PitchClass::As, true),
    KeyDescriptor::new(PitchClass::B, false),
];
