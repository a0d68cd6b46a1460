use std::time::Instant;

use etude_types::{Action, ChatAction, DispatchResult, LessonAction, PianoAction};

use crate::state::AppState;

/// Apply one action to the session. `now` timestamps key presses and chat
/// messages.
pub fn dispatch_action(action: &Action, state: &mut AppState, now: Instant) -> DispatchResult {
    let changed = match action {
        Action::Lesson(LessonAction::Select(lesson)) => state.navigator.select(*lesson),
        Action::Piano(piano) => dispatch_piano(piano, state, now),
        Action::Chat(ChatAction::Send(text)) => state.chat.send(text, now),
    };
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::none()
    }
}

fn dispatch_piano(action: &PianoAction, state: &mut AppState, now: Instant) -> bool {
    if let PianoAction::NotationAttached = action {
        return state.navigator.attach_notation();
    }
    let Some(piano) = state.navigator.piano_mut() else {
        log::debug!(target: "lesson", "{:?} ignored outside the piano lesson", action);
        return false;
    };
    let keyboard = piano.keyboard_mut();
    match action {
        PianoAction::StartAudio => {
            let before = keyboard.audio_state();
            keyboard.start_audio();
            before != keyboard.audio_state()
        }
        PianoAction::PressKey(index) => keyboard.press(*index, now).is_some(),
        PianoAction::PlayChar(c) => keyboard.press_char(*c, now).is_some(),
        PianoAction::NotationAttached => false,
    }
}

/// Periodic tick: audio feedback, key release and chat replies.
/// Returns true if anything visible changed.
pub fn poll(state: &mut AppState, now: Instant) -> bool {
    let lesson = state.navigator.poll(now);
    let chat = state.chat.poll(now) > 0;
    lesson || chat
}
