//! Root application component and state initialization.

use dioxus::prelude::*;

use crate::components::{ChatPanel, PianoLesson, TabBar, TextLesson};
use crate::dispatch::DispatchExt;
use crate::keybindings::{GuiAction, Keybindings};
use crate::state::SharedState;
use etude_types::{LessonAction, LessonId};

const MAIN_CSS: &str = include_str!("styles/main.css");

/// Root application component.
#[component]
pub fn App() -> Element {
    let mut shared_state = use_context_provider(|| Signal::new(SharedState::new()));
    let keybindings = use_signal(Keybindings::new);

    // Poll audio feedback, key release and chat replies at ~30fps
    use_future(move || async move {
        loop {
            shared_state.write().poll();
            async_std::task::sleep(std::time::Duration::from_millis(33)).await;
        }
    });

    // Lesson shortcuts; plain characters are left to the piano keys
    let handle_keydown = move |evt: KeyboardEvent| {
        let kb = keybindings.read();
        if let Some(GuiAction::SelectLesson(lesson)) = kb.lookup(&evt.data()) {
            shared_state.dispatch_action(LessonAction::Select(lesson));
        }
    };

    let selected = shared_state.read().app.navigator.selected();

    rsx! {
        style { {MAIN_CSS} }
        div {
            class: "app",
            tabindex: "0",
            onkeydown: handle_keydown,

            TabBar { selected }
            div { class: "main-content",
                div { class: "lesson-panel",
                    {match selected {
                        LessonId::Piano => rsx! { PianoLesson {} },
                        LessonId::Scales | LessonId::Chords => rsx! { TextLesson {} },
                    }}
                }
                ChatPanel {}
            }
        }
    }
}
