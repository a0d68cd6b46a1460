//! Piano lesson: start button, the octave keyboard and the notation example.

use dioxus::prelude::*;

use super::common::Button;
use super::{NotationView, PianoKeys};
use crate::dispatch::{use_dispatch, DispatchExt};
use crate::state::SharedState;
use etude_core::lesson::{NOTATION_HEADING, PIANO_HEADING};
use etude_types::PianoAction;

#[component]
pub fn PianoLesson() -> Element {
    let state = use_context::<Signal<SharedState>>();
    let mut dispatch = use_dispatch();

    let control = state
        .read()
        .app
        .navigator
        .piano()
        .map(|piano| piano.keyboard().start_control());
    let Some(control) = control else {
        return rsx! {};
    };

    rsx! {
        div { class: "piano-lesson",
            h2 { "{PIANO_HEADING}" }
            Button {
                label: control.label.to_string(),
                disabled: !control.enabled,
                primary: true,
                onclick: move |_| {
                    dispatch.dispatch_action(PianoAction::StartAudio);
                },
            }
            PianoKeys {}
            div { class: "notation-section",
                h3 { "{NOTATION_HEADING}" }
                NotationView {}
            }
        }
    }
}
