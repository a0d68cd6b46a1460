use dioxus::prelude::*;

use crate::state::SharedState;
use etude_core::lesson::Panel;

/// Heading and description for the lessons without exercises yet.
#[component]
pub fn TextLesson() -> Element {
    let state = use_context::<Signal<SharedState>>();

    let panel = match state.read().app.navigator.panel() {
        Panel::Text(text) => Some(*text),
        Panel::Piano(_) => None,
    };
    let Some(panel) = panel else {
        return rsx! {};
    };

    rsx! {
        div { class: "text-lesson",
            h2 { "{panel.heading}" }
            p { "{panel.body}" }
        }
    }
}
