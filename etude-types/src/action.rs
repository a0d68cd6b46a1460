//! Action types for the dispatch system.
//!
//! Actions represent user intents coming from the GUI. They are plain data;
//! etude-core's `dispatch_action` applies them to the session state.

use serde::{Deserialize, Serialize};

use crate::LessonId;

/// Tab bar actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonAction {
    Select(LessonId),
}

/// Piano lesson actions. Ignored when another lesson is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PianoAction {
    /// The "Start Audio" button.
    StartAudio,
    /// Click on the key at this index of the octave.
    PressKey(usize),
    /// A character typed while the keyboard has focus.
    PlayChar(char),
    /// The notation region has been attached to the visual tree.
    NotationAttached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatAction {
    Send(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Lesson(LessonAction),
    Piano(PianoAction),
    Chat(ChatAction),
}

impl From<LessonAction> for Action {
    fn from(action: LessonAction) -> Self {
        Action::Lesson(action)
    }
}

impl From<PianoAction> for Action {
    fn from(action: PianoAction) -> Self {
        Action::Piano(action)
    }
}

impl From<ChatAction> for Action {
    fn from(action: ChatAction) -> Self {
        Action::Chat(action)
    }
}

/// What a dispatched action did, for the UI layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchResult {
    /// Visible state changed and the view should refresh.
    pub changed: bool,
}

impl DispatchResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn changed() -> Self {
        Self { changed: true }
    }
}
