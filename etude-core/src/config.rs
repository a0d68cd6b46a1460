use std::path::{Path, PathBuf};
use std::time::Duration;

use etude_audio::SynthSettings;
use serde::Deserialize;

use crate::chat::ChatSettings;
use crate::keyboard::KeyboardLayout;
use crate::notation::NotationLayout;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    audio: AudioConfig,
    #[serde(default)]
    keyboard: KeyboardConfig,
    #[serde(default)]
    notation: NotationConfig,
    #[serde(default)]
    chat: ChatConfig,
}

#[derive(Deserialize, Default)]
struct AudioConfig {
    bpm: Option<f32>,
    tuning_a4: Option<f32>,
    volume: Option<f32>,
}

#[derive(Deserialize, Default)]
struct KeyboardConfig {
    layout: Option<String>,
}

#[derive(Deserialize, Default)]
struct NotationConfig {
    width: Option<u32>,
    height: Option<u32>,
    stave_x: Option<f32>,
    stave_y: Option<f32>,
    stave_width: Option<f32>,
    justify_width: Option<f32>,
}

#[derive(Deserialize, Default)]
struct ChatConfig {
    reply_delay_ms: Option<u64>,
    reply_text: Option<String>,
}

pub struct Config {
    file: ConfigFile,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        Self::load_with_user(user_config_path().as_deref())
    }

    /// Embedded defaults merged with the file at `path`. A missing,
    /// unreadable or malformed file is logged and ignored.
    pub fn load_with_user(path: Option<&Path>) -> Self {
        let mut base = Self::embedded_file();

        if let Some(path) = path {
            if path.exists() {
                match std::fs::read_to_string(path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => merge(&mut base, user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Config { file: base }
    }

    /// Embedded defaults only.
    pub fn embedded() -> Self {
        Config {
            file: Self::embedded_file(),
        }
    }

    fn embedded_file() -> ConfigFile {
        toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml")
    }

    pub fn synth_settings(&self) -> SynthSettings {
        let fallback = SynthSettings::default();
        let audio = &self.file.audio;
        SynthSettings {
            bpm: audio.bpm.unwrap_or(fallback.bpm).clamp(20.0, 400.0),
            tuning_a4: audio
                .tuning_a4
                .unwrap_or(fallback.tuning_a4)
                .clamp(400.0, 480.0),
            volume: audio.volume.unwrap_or(fallback.volume).clamp(0.0, 1.0),
        }
    }

    pub fn keyboard_layout(&self) -> KeyboardLayout {
        self.file
            .keyboard
            .layout
            .as_deref()
            .and_then(parse_keyboard_layout)
            .unwrap_or_default()
    }

    pub fn notation_layout(&self) -> NotationLayout {
        let fallback = NotationLayout::default();
        let n = &self.file.notation;
        let width = n.width.unwrap_or(fallback.width).clamp(100, 4000);
        let stave_width = n
            .stave_width
            .unwrap_or(fallback.stave_width)
            .clamp(50.0, width as f32);
        NotationLayout {
            width,
            height: n.height.unwrap_or(fallback.height).clamp(100, 2000),
            stave_x: n.stave_x.unwrap_or(fallback.stave_x).max(0.0),
            stave_y: n.stave_y.unwrap_or(fallback.stave_y).max(0.0),
            stave_width,
            justify_width: n
                .justify_width
                .unwrap_or(fallback.justify_width)
                .clamp(10.0, width as f32),
        }
    }

    pub fn chat_settings(&self) -> ChatSettings {
        let fallback = ChatSettings::default();
        let chat = &self.file.chat;
        ChatSettings {
            reply_delay: chat
                .reply_delay_ms
                .map(|ms| Duration::from_millis(ms.min(60_000)))
                .unwrap_or(fallback.reply_delay),
            reply_text: chat.reply_text.clone().unwrap_or(fallback.reply_text),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("etude").join("config.toml"))
}

fn merge(base: &mut ConfigFile, user: ConfigFile) {
    if user.audio.bpm.is_some() {
        base.audio.bpm = user.audio.bpm;
    }
    if user.audio.tuning_a4.is_some() {
        base.audio.tuning_a4 = user.audio.tuning_a4;
    }
    if user.audio.volume.is_some() {
        base.audio.volume = user.audio.volume;
    }
    if user.keyboard.layout.is_some() {
        base.keyboard.layout = user.keyboard.layout;
    }
    let (b, u) = (&mut base.notation, user.notation);
    if u.width.is_some() {
        b.width = u.width;
    }
    if u.height.is_some() {
        b.height = u.height;
    }
    if u.stave_x.is_some() {
        b.stave_x = u.stave_x;
    }
    if u.stave_y.is_some() {
        b.stave_y = u.stave_y;
    }
    if u.stave_width.is_some() {
        b.stave_width = u.stave_width;
    }
    if u.justify_width.is_some() {
        b.justify_width = u.justify_width;
    }
    if user.chat.reply_delay_ms.is_some() {
        base.chat.reply_delay_ms = user.chat.reply_delay_ms;
    }
    if user.chat.reply_text.is_some() {
        base.chat.reply_text = user.chat.reply_text;
    }
}

fn parse_keyboard_layout(s: &str) -> Option<KeyboardLayout> {
    match s.to_lowercase().as_str() {
        "qwerty" => Some(KeyboardLayout::Qwerty),
        "colemak" => Some(KeyboardLayout::Colemak),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_embedded_config() {
        let config = Config::embedded();
        let synth = config.synth_settings();
        assert_eq!(synth.bpm, 120.0);
        assert!((synth.tuning_a4 - 440.0).abs() < f32::EPSILON);
        assert!((synth.volume - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.keyboard_layout(), KeyboardLayout::Qwerty);
        assert_eq!(config.notation_layout(), NotationLayout::default());
        let chat = config.chat_settings();
        assert_eq!(chat.reply_delay, Duration::from_millis(1000));
        assert_eq!(chat.reply_text, "This is a placeholder response.");
    }

    #[test]
    fn test_user_file_overrides_some_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\nbpm = 90\n\n[keyboard]\nlayout = \"Colemak\"\n\n[chat]\nreply_delay_ms = 250").unwrap();
        let config = Config::load_with_user(Some(file.path()));
        assert_eq!(config.synth_settings().bpm, 90.0);
        assert!((config.synth_settings().tuning_a4 - 440.0).abs() < f32::EPSILON);
        assert_eq!(config.keyboard_layout(), KeyboardLayout::Colemak);
        assert_eq!(config.chat_settings().reply_delay, Duration::from_millis(250));
        assert_eq!(config.chat_settings().reply_text, "This is a placeholder response.");
    }

    #[test]
    fn test_malformed_user_file_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audio\nbpm = ").unwrap();
        let config = Config::load_with_user(Some(file.path()));
        assert_eq!(config.synth_settings().bpm, 120.0);
    }

    #[test]
    fn test_missing_user_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_with_user(Some(&dir.path().join("nope.toml")));
        assert_eq!(config.keyboard_layout(), KeyboardLayout::Qwerty);
    }

    #[test]
    fn test_values_are_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[audio]\nvolume = 4.0\nbpm = 1\n\n[notation]\njustify_width = 9000.0").unwrap();
        let config = Config::load_with_user(Some(file.path()));
        assert_eq!(config.synth_settings().volume, 1.0);
        assert_eq!(config.synth_settings().bpm, 20.0);
        assert_eq!(config.notation_layout().justify_width, 500.0);
    }

    #[test]
    fn test_parse_keyboard_layout() {
        assert_eq!(parse_keyboard_layout("qwerty"), Some(KeyboardLayout::Qwerty));
        assert_eq!(parse_keyboard_layout("COLEMAK"), Some(KeyboardLayout::Colemak));
        assert_eq!(parse_keyboard_layout("dvorak"), None);
    }
}
