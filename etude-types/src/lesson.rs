use serde::{Deserialize, Serialize};

/// A lesson tab. Exactly one is selected at any time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonId {
    #[default]
    Piano,
    Scales,
    Chords,
}

impl LessonId {
    /// Tab order.
    pub const ALL: [LessonId; 3] = [LessonId::Piano, LessonId::Scales, LessonId::Chords];

    /// Label shown on the tab.
    pub fn label(&self) -> &'static str {
        match self {
            LessonId::Piano => "Piano",
            LessonId::Scales => "Scales",
            LessonId::Chords => "Chords",
        }
    }

    /// Position of the tab in the tab bar.
    pub fn index(&self) -> usize {
        match self {
            LessonId::Piano => 0,
            LessonId::Scales => 1,
            LessonId::Chords => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
