//! # etude-core
//!
//! Session logic for the Etude lesson shell, independent of any UI framework.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use etude_core::config::Config;
//! use etude_core::dispatch::{dispatch_action, poll};
//! use etude_core::state::AppState;
//! use etude_types::{LessonAction, LessonId, PianoAction};
//!
//! let config = Config::load();
//! let mut state = AppState::with_defaults(&config);
//!
//! dispatch_action(&PianoAction::StartAudio.into(), &mut state, Instant::now());
//! // call poll() on a ~33ms tick to pick up engine readiness and chat replies
//! poll(&mut state, Instant::now());
//! dispatch_action(&LessonAction::Select(LessonId::Scales).into(), &mut state, Instant::now());
//! ```
//!
//! ## Module Overview
//!
//! - [`lesson`] — `LessonNavigator`: tab selection and the mounted panel
//! - [`keyboard`] — `InstrumentKeyboard`: key geometry, presses, start control
//! - [`notation`] — `NotationRenderer` with SVG and recording backends
//! - [`chat`] — `ChatLog`: the placeholder assistant
//! - [`state`] — `AppState`
//! - [`dispatch`] — `dispatch_action()` and the periodic `poll()`
//! - [`config`] — TOML configuration (embedded defaults + user override)

pub mod chat;
pub mod config;
pub mod dispatch;
pub mod keyboard;
pub mod lesson;
pub mod notation;
pub mod state;
