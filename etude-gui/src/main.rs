//! Etude GUI - desktop shell for the music theory lessons.

mod app;
mod components;
mod dispatch;
mod keybindings;
mod state;

fn main() {
    env_logger::init();
    log::info!("Starting Etude GUI");
    dioxus::launch(app::App);
}
