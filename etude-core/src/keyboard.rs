//! Instrument keyboard: the twelve on-screen keys of the piano lesson.
//!
//! Owns the lesson's `AudioHandle`, so dropping the keyboard (unmounting the
//! piano panel) tears the engine down with it.
//!
//! - `start_audio()` — the "Start Audio" button
//! - `press(index, now)` / `press_char(c, now)` — sound a key and mark it pressed
//! - `poll(now)` — drain engine feedback and release the pressed key after the timeout
//! - `start_control()` — label and enabled state for the start button
//! - `geometry()` — pixel layout with accidental keys overlapping their neighbours

use std::time::{Duration, Instant};

use etude_audio::{AudioHandle, BackendFactory};
use etude_types::{AudioEngineState, KeyDescriptor, NoteDuration, OCTAVE_KEYS};

/// Every key press sounds this long.
pub const KEY_DURATION: NoteDuration = NoteDuration::Eighth;

pub const WHITE_KEY_WIDTH: u32 = 40;
pub const WHITE_KEY_HEIGHT: u32 = 150;
pub const BLACK_KEY_WIDTH: u32 = 30;
pub const BLACK_KEY_HEIGHT: u32 = 100;
const KEY_MARGIN: i32 = 1;
const KEY_BORDER: i32 = 1;
/// Negative margin applied on both sides of an accidental key.
pub const BLACK_KEY_OFFSET: i32 = -15;

/// Physical keyboard layout used for typing notes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    Colemak,
}

/// Translate a key character from the configured layout to QWERTY physical position.
pub fn translate_key(c: char, layout: KeyboardLayout) -> char {
    match layout {
        KeyboardLayout::Qwerty => c,
        KeyboardLayout::Colemak => colemak_to_qwerty(c),
    }
}

fn colemak_to_qwerty(c: char) -> char {
    match c {
        // top row
        'f' => 'e', 'p' => 'r', 'g' => 't', 'j' => 'y',
        'l' => 'u', 'u' => 'i', 'y' => 'o', ';' => 'p',
        // home row
        'r' => 's', 's' => 'd', 't' => 'f', 'd' => 'g',
        'n' => 'j', 'e' => 'k', 'i' => 'l', 'o' => ';',
        // bottom row
        'k' => 'n',
        // unchanged keys pass through
        other => other,
    }
}

/// Map a QWERTY character to a key index: the home row holds the white
/// keys and the row above holds the accidentals.
fn qwerty_key_index(c: char) -> Option<usize> {
    match c {
        'a' => Some(0),
        'w' => Some(1),
        's' => Some(2),
        'e' => Some(3),
        'd' => Some(4),
        'f' => Some(5),
        't' => Some(6),
        'g' => Some(7),
        'y' => Some(8),
        'h' => Some(9),
        'u' => Some(10),
        'j' => Some(11),
        _ => None,
    }
}

/// Pixel placement of one key, outer box including its border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyGeometry {
    /// Left edge relative to the keyboard's left edge.
    pub x: i32,
    pub width: u32,
    pub height: u32,
    /// Accidentals sit above the white keys they overlap.
    pub z_index: u8,
    /// Horizontal margin applied on each side.
    pub margin: i32,
}

/// Lay keys out left to right the way a wrapping flex row would, with
/// accidental keys pulled over their neighbours by negative margins.
pub fn layout_keys(keys: &[KeyDescriptor]) -> (Vec<KeyGeometry>, i32) {
    let mut cursor = 0;
    let mut out = Vec::with_capacity(keys.len());
    for key in keys {
        let (width, height, margin, z_index) = if key.is_accidental {
            (BLACK_KEY_WIDTH, BLACK_KEY_HEIGHT, BLACK_KEY_OFFSET, 1)
        } else {
            (WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT, KEY_MARGIN, 0)
        };
        let outer_width = width as i32 + 2 * KEY_BORDER;
        cursor += margin;
        out.push(KeyGeometry {
            x: cursor,
            width: outer_width as u32,
            height: height + 2 * KEY_BORDER as u32,
            z_index,
            margin,
        });
        cursor += outer_width + margin;
    }
    (out, cursor)
}

/// Label and enabled state of the "Start Audio" button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartControl {
    pub label: &'static str,
    pub enabled: bool,
}

impl StartControl {
    pub fn for_state(state: AudioEngineState) -> Self {
        match state {
            AudioEngineState::Uninitialized | AudioEngineState::Starting => StartControl {
                label: "Start Audio",
                enabled: true,
            },
            AudioEngineState::Ready(_) => StartControl {
                label: "Audio Started",
                enabled: false,
            },
        }
    }
}

pub struct InstrumentKeyboard {
    keys: &'static [KeyDescriptor],
    geometry: Vec<KeyGeometry>,
    total_width: i32,
    layout: KeyboardLayout,
    audio: AudioHandle,
    // Presses are momentary: at most one key shows as pressed.
    pressed: Option<(usize, Instant)>,
    release_timeout: Duration,
}

impl InstrumentKeyboard {
    pub fn new(audio: BackendFactory, layout: KeyboardLayout) -> Self {
        let (geometry, total_width) = layout_keys(&OCTAVE_KEYS);
        Self {
            keys: &OCTAVE_KEYS,
            geometry,
            total_width,
            layout,
            audio: AudioHandle::new(audio),
            pressed: None,
            release_timeout: Duration::from_millis(150),
        }
    }

    pub fn keys(&self) -> &[KeyDescriptor] {
        self.keys
    }

    pub fn geometry(&self) -> &[KeyGeometry] {
        &self.geometry
    }

    pub fn total_width(&self) -> i32 {
        self.total_width
    }

    pub fn audio_state(&self) -> AudioEngineState {
        self.audio.state()
    }

    pub fn start_control(&self) -> StartControl {
        StartControl::for_state(self.audio.state())
    }

    pub fn start_audio(&mut self) {
        self.audio.start();
    }

    /// Sound the key at `index` and show it pressed. Returns the key, or
    /// None for an index outside the octave. Sound is skipped silently until
    /// the engine is ready.
    pub fn press(&mut self, index: usize, now: Instant) -> Option<KeyDescriptor> {
        let key = *self.keys.get(index)?;
        self.pressed = Some((index, now));
        self.audio.trigger(key.pitch, KEY_DURATION);
        Some(key)
    }

    /// Press the key mapped to a typed character, if any.
    pub fn press_char(&mut self, c: char, now: Instant) -> Option<KeyDescriptor> {
        let index = qwerty_key_index(translate_key(c.to_ascii_lowercase(), self.layout))?;
        self.press(index, now)
    }

    pub fn pressed(&self) -> Option<usize> {
        self.pressed.map(|(index, _)| index)
    }

    pub fn is_pressed(&self, index: usize) -> bool {
        self.pressed() == Some(index)
    }

    /// Drain engine feedback and clear an expired press.
    /// Returns true if anything visible changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let before = self.audio.state();
        self.audio.drain_feedback();
        let mut changed = before != self.audio.state();
        if let Some((_, at)) = self.pressed {
            if now.duration_since(at) >= self.release_timeout {
                self.pressed = None;
                changed = true;
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use etude_audio::backend::NullBackend;
    use etude_audio::AudioBackend;
    use etude_types::InstrumentHandle;

    fn null_factory() -> BackendFactory {
        Arc::new(|| Box::new(NullBackend) as Box<dyn AudioBackend>)
    }

    #[test]
    fn start_control_tracks_engine_state() {
        assert_eq!(
            StartControl::for_state(AudioEngineState::Uninitialized),
            StartControl { label: "Start Audio", enabled: true }
        );
        assert_eq!(
            StartControl::for_state(AudioEngineState::Starting),
            StartControl { label: "Start Audio", enabled: true }
        );
        assert_eq!(
            StartControl::for_state(AudioEngineState::Ready(InstrumentHandle::new(1))),
            StartControl { label: "Audio Started", enabled: false }
        );
    }

    #[test]
    fn accidentals_overlap_neighbours() {
        let (geometry, total) = layout_keys(&OCTAVE_KEYS);
        assert_eq!(geometry.len(), 12);
        for (i, key) in OCTAVE_KEYS.iter().enumerate() {
            let g = geometry[i];
            if key.is_accidental {
                assert_eq!(g.margin, BLACK_KEY_OFFSET);
                assert_eq!(g.z_index, 1);
                assert!(g.height < geometry[i - 1].height);
                let prev = geometry[i - 1];
                let next = geometry[i + 1];
                assert!(g.x < prev.x + prev.width as i32, "overlaps the white key before");
                assert!(g.x + g.width as i32 > next.x, "overlaps the white key after");
            } else {
                assert_eq!(g.width, WHITE_KEY_WIDTH + 2);
                assert_eq!(g.z_index, 0);
            }
        }
        // seven white keys at 44px each plus five accidentals at 2px net
        assert_eq!(total, 7 * 44 + 5 * 2);
    }

    #[test]
    fn white_keys_do_not_overlap_each_other() {
        let (geometry, _) = layout_keys(&OCTAVE_KEYS);
        let whites: Vec<_> = OCTAVE_KEYS
            .iter()
            .zip(&geometry)
            .filter(|(k, _)| !k.is_accidental)
            .map(|(_, g)| *g)
            .collect();
        for pair in whites.windows(2) {
            assert!(pair[0].x + pair[0].width as i32 <= pair[1].x);
        }
    }

    #[test]
    fn only_one_key_pressed_at_a_time() {
        let mut kb = InstrumentKeyboard::new(null_factory(), KeyboardLayout::Qwerty);
        let now = Instant::now();
        kb.press(0, now);
        kb.press(4, now);
        assert_eq!(kb.pressed(), Some(4));
        assert!(!kb.is_pressed(0));
    }

    #[test]
    fn press_releases_after_timeout() {
        let mut kb = InstrumentKeyboard::new(null_factory(), KeyboardLayout::Qwerty);
        let now = Instant::now();
        kb.press(2, now);
        assert!(!kb.poll(now + Duration::from_millis(50)));
        assert!(kb.is_pressed(2));
        assert!(kb.poll(now + Duration::from_millis(200)));
        assert_eq!(kb.pressed(), None);
    }

    #[test]
    fn out_of_range_press_is_ignored() {
        let mut kb = InstrumentKeyboard::new(null_factory(), KeyboardLayout::Qwerty);
        assert!(kb.press(12, Instant::now()).is_none());
        assert_eq!(kb.pressed(), None);
    }

    #[test]
    fn typed_characters_map_to_keys() {
        let mut kb = InstrumentKeyboard::new(null_factory(), KeyboardLayout::Qwerty);
        let now = Instant::now();
        assert_eq!(kb.press_char('a', now).map(|k| k.pitch_name()), Some("C4".into()));
        assert_eq!(kb.press_char('W', now).map(|k| k.pitch_name()), Some("C#4".into()));
        assert_eq!(kb.press_char('j', now).map(|k| k.pitch_name()), Some("B4".into()));
        assert!(kb.press_char('z', now).is_none());
    }

    #[test]
    fn colemak_characters_are_translated() {
        let mut kb = InstrumentKeyboard::new(null_factory(), KeyboardLayout::Colemak);
        let now = Instant::now();
        // Colemak 'r' sits where QWERTY 's' is.
        assert_eq!(kb.press_char('r', now).map(|k| k.pitch_name()), Some("D4".into()));
        assert_eq!(kb.press_char('n', now).map(|k| k.pitch_name()), Some("B4".into()));
        assert_eq!(translate_key('a', KeyboardLayout::Colemak), 'a');
    }
}
