use dioxus::prelude::*;

use crate::dispatch::{use_dispatch, DispatchExt};
use crate::state::SharedState;
use etude_core::notation::NOTATION_TARGET_ID;
use etude_types::PianoAction;

/// Container for the engraved phrase. The phrase is drawn once the
/// container is in the tree.
#[component]
pub fn NotationView() -> Element {
    let state = use_context::<Signal<SharedState>>();
    let mut dispatch = use_dispatch();

    let (svg, width, height) = {
        let s = state.read();
        let notation = s.app.navigator.notation();
        let layout = notation.layout();
        (notation.target().to_svg(), layout.width, layout.height)
    };

    rsx! {
        div {
            id: NOTATION_TARGET_ID,
            class: "notation",
            style: "width: {width}px; min-height: {height}px;",
            onmounted: move |_| {
                dispatch.dispatch_action(PianoAction::NotationAttached);
            },
            dangerous_inner_html: "{svg}",
        }
    }
}
