//! UI components for the Etude GUI.

mod chat_panel;
mod notation_view;
mod piano_keys;
mod piano_lesson;
mod tab_bar;
mod text_lesson;

pub mod common;

pub use chat_panel::ChatPanel;
pub use notation_view::NotationView;
pub use piano_keys::PianoKeys;
pub use piano_lesson::PianoLesson;
pub use tab_bar::TabBar;
pub use text_lesson::TextLesson;
