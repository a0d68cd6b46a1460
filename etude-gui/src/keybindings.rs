//! Keyboard shortcut handling for the GUI.

use std::collections::HashMap;

use dioxus::events::ModifiersInteraction;
use etude_types::LessonId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn from_keyboard_data(data: &dioxus::events::KeyboardData) -> Self {
        Self {
            ctrl: data.modifiers().ctrl(),
            alt: data.modifiers().alt(),
            meta: data.modifiers().meta(),
        }
    }

    pub fn any(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyPattern {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_lowercase(),
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}

/// What a key event means to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiAction {
    SelectLesson(LessonId),
    /// A plain character, played on the piano when its keyboard has focus.
    PlayChar(char),
}

pub struct Keybindings {
    bindings: HashMap<KeyPattern, GuiAction>,
}

impl Default for Keybindings {
    fn default() -> Self {
        Self::new()
    }
}

impl Keybindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        for lesson in LessonId::ALL {
            let digit = (lesson.index() + 1).to_string();
            bindings.insert(KeyPattern::new(&digit).ctrl(), GuiAction::SelectLesson(lesson));
        }
        Self { bindings }
    }

    /// Look up a shortcut, falling back to a single unmodified character.
    pub fn lookup(&self, data: &dioxus::events::KeyboardData) -> Option<GuiAction> {
        let key = data.key().to_string();
        let pattern = KeyPattern {
            key: key.to_lowercase(),
            modifiers: Modifiers::from_keyboard_data(data),
        };
        if let Some(action) = self.bindings.get(&pattern) {
            return Some(*action);
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !pattern.modifiers.any() => Some(GuiAction::PlayChar(c)),
            _ => None,
        }
    }
}
