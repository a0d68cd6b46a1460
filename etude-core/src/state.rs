use etude_audio::{synth_factory, BackendFactory};

use crate::chat::ChatLog;
use crate::config::Config;
use crate::lesson::LessonNavigator;
use crate::notation::{NotationBackend, NotationRenderer, SvgBackend};

/// All session state. Lives on the UI thread; nothing here is persisted.
pub struct AppState {
    pub navigator: LessonNavigator,
    pub chat: ChatLog,
}

impl AppState {
    /// Build with explicit backends.
    pub fn new(
        config: &Config,
        audio: BackendFactory,
        notation: Box<dyn NotationBackend>,
    ) -> Self {
        let renderer = NotationRenderer::new(notation, config.notation_layout());
        Self {
            navigator: LessonNavigator::new(audio, config.keyboard_layout(), renderer),
            chat: ChatLog::new(config.chat_settings()),
        }
    }

    /// The cpal synth and SVG engraving, configured from `config`.
    pub fn with_defaults(config: &Config) -> Self {
        Self::new(
            config,
            synth_factory(config.synth_settings()),
            Box::new(SvgBackend::new()),
        )
    }
}
