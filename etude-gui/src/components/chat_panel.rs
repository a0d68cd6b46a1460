//! Chat side panel with the placeholder assistant.

use dioxus::prelude::*;

use super::common::Button;
use crate::dispatch::{use_dispatch, DispatchExt};
use crate::state::SharedState;
use etude_types::ChatAction;

#[component]
pub fn ChatPanel() -> Element {
    let state = use_context::<Signal<SharedState>>();
    let mut dispatch = use_dispatch();
    let mut draft = use_signal(String::new);

    let lines = state.read().app.chat.lines();

    let mut send = move || {
        let text = draft.read().clone();
        dispatch.dispatch_action(ChatAction::Send(text));
        draft.set(String::new());
    };

    rsx! {
        div { class: "chat-panel",
            h3 { "Chat" }
            div { class: "chat-log",
                for (i, line) in lines.iter().enumerate() {
                    div { key: "{i}", class: "chat-line", "{line}" }
                }
            }
            div { class: "chat-input",
                input {
                    r#type: "text",
                    placeholder: "Ask a question...",
                    value: "{draft}",
                    oninput: move |evt| draft.set(evt.value()),
                    onkeydown: move |evt: KeyboardEvent| {
                        if evt.key() == Key::Enter {
                            send();
                        }
                    },
                }
                Button {
                    label: "Send".to_string(),
                    onclick: move |_| send(),
                }
            }
        }
    }
}
