//! State management for the GUI.
//!
//! Wraps the core AppState for use with Dioxus signals.

use std::time::Instant;

use etude_core::config::Config;
use etude_core::dispatch::{dispatch_action, poll};
use etude_core::state::AppState;
use etude_types::{Action, DispatchResult};

/// Shared state wrapper for the GUI. Wrapped in a Dioxus Signal for reactivity.
pub struct SharedState {
    pub app: AppState,
}

impl SharedState {
    pub fn new() -> Self {
        let config = Config::load();
        Self {
            app: AppState::with_defaults(&config),
        }
    }

    /// Dispatch an action to the core.
    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        dispatch_action(&action, &mut self.app, Instant::now())
    }

    /// Audio feedback, key release and chat replies.
    pub fn poll(&mut self) -> bool {
        poll(&mut self.app, Instant::now())
    }
}
