//! Dispatch helpers for components.

use dioxus::prelude::*;
use etude_types::Action;

use crate::state::SharedState;

/// Shared state signal provided by the root component.
pub fn use_dispatch() -> Signal<SharedState> {
    use_context::<Signal<SharedState>>()
}

pub trait DispatchExt {
    fn dispatch_action(&mut self, action: impl Into<Action>);
}

impl DispatchExt for Signal<SharedState> {
    fn dispatch_action(&mut self, action: impl Into<Action>) {
        self.write().dispatch(action.into());
    }
}
