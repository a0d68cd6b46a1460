//! Lesson tabs.

use dioxus::prelude::*;

use crate::dispatch::{use_dispatch, DispatchExt};
use etude_types::{LessonAction, LessonId};

#[component]
pub fn TabBar(selected: LessonId) -> Element {
    let mut dispatch = use_dispatch();

    rsx! {
        div { class: "tab-bar", role: "tablist",
            for lesson in LessonId::ALL {
                button {
                    key: "{lesson.index()}",
                    role: "tab",
                    class: if lesson == selected { "tab active" } else { "tab" },
                    onclick: move |_| {
                        dispatch.dispatch_action(LessonAction::Select(lesson));
                    },
                    "{lesson.label()}"
                }
            }
        }
    }
}
