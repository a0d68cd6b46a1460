use std::collections::HashMap;
use std::sync::mpsc::Sender;

use crossbeam_channel::Receiver;
use etude_types::{AudioFeedback, InstrumentHandle, NoteDuration, Pitch};

use crate::backend::{AudioBackend, Instrument};
use crate::commands::AudioCmd;
use crate::BackendFactory;

/// Runs on the dedicated audio thread. Owns the backend and every
/// instrument it creates; the UI thread only sees handles.
pub(crate) struct AudioThread {
    factory: BackendFactory,
    backend: Option<Box<dyn AudioBackend>>,
    instruments: HashMap<InstrumentHandle, Box<dyn Instrument>>,
    next_instrument: u32,
    cmd_rx: Receiver<AudioCmd>,
    feedback_tx: Sender<AudioFeedback>,
}

impl AudioThread {
    pub(crate) fn new(
        factory: BackendFactory,
        cmd_rx: Receiver<AudioCmd>,
        feedback_tx: Sender<AudioFeedback>,
    ) -> Self {
        Self {
            factory,
            backend: None,
            instruments: HashMap::new(),
            next_instrument: 1,
            cmd_rx,
            feedback_tx,
        }
    }

    pub(crate) fn run(mut self) {
        loop {
            match self.cmd_rx.recv() {
                Ok(cmd) => {
                    if self.handle_cmd(cmd) {
                        break;
                    }
                }
                Err(_) => break, // Disconnected
            }
        }
        log::debug!(target: "audio", "audio thread exiting");
    }

    /// Returns true when the thread should stop.
    fn handle_cmd(&mut self, cmd: AudioCmd) -> bool {
        match cmd {
            AudioCmd::Initialize => {
                let feedback = self.initialize();
                if self.feedback_tx.send(feedback).is_err() {
                    // UI side dropped the handle while we were starting.
                    return true;
                }
            }
            AudioCmd::Trigger { instrument, pitch, duration } => {
                self.trigger(instrument, pitch, duration);
            }
            AudioCmd::Shutdown => return true,
        }
        false
    }

    fn initialize(&mut self) -> AudioFeedback {
        let backend = self.backend.get_or_insert_with(|| (self.factory)());
        if let Err(e) = backend.initialize() {
            log::error!(target: "audio", "backend initialization failed: {}", e);
            return AudioFeedback::InitFailed(e.to_string());
        }
        match backend.create_instrument() {
            Ok(instrument) => {
                let handle = InstrumentHandle::new(self.next_instrument);
                self.next_instrument += 1;
                self.instruments.insert(handle, instrument);
                log::info!(target: "audio", "instrument {} ready", handle);
                AudioFeedback::Ready(handle)
            }
            Err(e) => {
                log::error!(target: "audio", "instrument creation failed: {}", e);
                AudioFeedback::InitFailed(e.to_string())
            }
        }
    }

    fn trigger(&mut self, handle: InstrumentHandle, pitch: Pitch, duration: NoteDuration) {
        let Some(instrument) = self.instruments.get_mut(&handle) else {
            log::warn!(target: "audio", "trigger for unknown instrument {}", handle);
            return;
        };
        if let Err(e) = instrument.trigger_attack_release(pitch, duration) {
            log::warn!(target: "audio", "trigger {} failed: {}", pitch, e);
        }
    }
}
