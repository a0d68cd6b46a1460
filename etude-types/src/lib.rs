//! # etude-types
//!
//! Shared type definitions for the Etude lesson shell.
//! This crate contains the value types passed between etude-audio, etude-core
//! and etude-gui: lesson ids, pitches and durations, the keyboard octave, the
//! fixed notation phrase, audio engine state and the action enums.

pub mod action;
mod audio;
mod chat;
mod keyboard;
mod lesson;
mod music;
mod phrase;

pub use action::*;
pub use audio::{AudioEngineState, AudioFeedback, InstrumentHandle};
pub use chat::{ChatMessage, ChatRole};
pub use keyboard::{KeyDescriptor, OCTAVE_KEYS};
pub use lesson::LessonId;
pub use music::{NoteDuration, Pitch, PitchClass, PitchParseError, TICKS_PER_WHOLE};
pub use phrase::{PhraseNote, PhraseSpec, C_MAJOR_PHRASE};
