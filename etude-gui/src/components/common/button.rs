use dioxus::prelude::*;

/// A standard button.
#[component]
pub fn Button(
    label: String,
    #[props(default = false)] disabled: bool,
    #[props(default = false)] primary: bool,
    onclick: EventHandler<()>,
) -> Element {
    rsx! {
        button {
            class: if primary { "btn btn-primary" } else { "btn" },
            disabled: disabled,
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
