//! The twelve clickable keys. Typing home-row letters while the keys have
//! focus plays them too.

use dioxus::prelude::*;

use crate::dispatch::{use_dispatch, DispatchExt};
use crate::keybindings::{GuiAction, Keybindings};
use crate::state::SharedState;
use etude_types::PianoAction;

#[derive(Clone, PartialEq)]
struct KeyView {
    index: usize,
    name: String,
    accidental: bool,
    pressed: bool,
    width: u32,
    height: u32,
    margin: i32,
    z_index: u8,
}

#[component]
pub fn PianoKeys() -> Element {
    let state = use_context::<Signal<SharedState>>();
    let mut dispatch = use_dispatch();
    let keybindings = use_signal(Keybindings::new);

    let keys: Vec<KeyView> = {
        let s = state.read();
        match s.app.navigator.piano() {
            Some(piano) => {
                let keyboard = piano.keyboard();
                keyboard
                    .keys()
                    .iter()
                    .zip(keyboard.geometry())
                    .enumerate()
                    .map(|(index, (key, geometry))| KeyView {
                        index,
                        name: key.pitch_name(),
                        accidental: key.is_accidental,
                        pressed: keyboard.is_pressed(index),
                        width: geometry.width,
                        height: geometry.height,
                        margin: geometry.margin,
                        z_index: geometry.z_index,
                    })
                    .collect()
            }
            None => Vec::new(),
        }
    };

    let handle_keydown = move |evt: KeyboardEvent| {
        if evt.is_auto_repeating() {
            return;
        }
        if let Some(GuiAction::PlayChar(c)) = keybindings.read().lookup(&evt.data()) {
            dispatch.dispatch_action(PianoAction::PlayChar(c));
        }
    };

    rsx! {
        div {
            class: "piano-keys",
            tabindex: "0",
            onkeydown: handle_keydown,
            for key in keys {
                div {
                    key: "{key.name}",
                    class: match (key.accidental, key.pressed) {
                        (true, true) => "piano-key black pressed",
                        (true, false) => "piano-key black",
                        (false, true) => "piano-key white pressed",
                        (false, false) => "piano-key white",
                    },
                    style: "width: {key.width}px; height: {key.height}px; margin: 1px {key.margin}px; z-index: {key.z_index};",
                    onclick: move |_| {
                        dispatch.dispatch_action(PianoAction::PressKey(key.index));
                    },
                    "{key.name}"
                }
            }
        }
    }
}
