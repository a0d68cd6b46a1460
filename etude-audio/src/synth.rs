//! Built-in synth backend: a cpal output stream mixing a shared voice pool.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use etude_types::{NoteDuration, Pitch};

use crate::backend::{AudioBackend, BackendError, BackendResult, Instrument};
use crate::voice::{Envelope, VoicePool};

const MAX_VOICES: usize = 16;

/// Synth parameters taken from the `[audio]` config section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSettings {
    /// Tempo used to turn note durations into seconds.
    pub bpm: f32,
    pub tuning_a4: f32,
    /// Master gain, 0.0..=1.0.
    pub volume: f32,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            tuning_a4: 440.0,
            volume: 0.3,
        }
    }
}

/// Backend that plays through the default output device.
pub struct SynthBackend {
    settings: SynthSettings,
    stream: Option<Stream>,
    voices: Option<Arc<Mutex<VoicePool>>>,
}

impl SynthBackend {
    pub fn new(settings: SynthSettings) -> Self {
        Self {
            settings,
            stream: None,
            voices: None,
        }
    }
}

impl AudioBackend for SynthBackend {
    fn initialize(&mut self) -> BackendResult {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| BackendError::from("No output device available"))?;
        let config = device
            .default_output_config()
            .map_err(|e| BackendError(format!("Failed to get output config: {}", e)))?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let voices = Arc::new(Mutex::new(VoicePool::new(
            sample_rate,
            Envelope::default(),
            MAX_VOICES,
        )));
        let volume = self.settings.volume.clamp(0.0, 1.0);

        let stream = match sample_format {
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, channels, Arc::clone(&voices), volume)
            }
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, channels, Arc::clone(&voices), volume)
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, channels, Arc::clone(&voices), volume)
            }
            other => Err(BackendError(format!("Unsupported sample format: {:?}", other))),
        }?;

        stream
            .play()
            .map_err(|e| BackendError(format!("Failed to start output stream: {}", e)))?;

        log::info!(
            target: "audio",
            "output stream running: {} Hz, {} channel(s), {:?}",
            sample_rate,
            channels,
            sample_format
        );

        self.stream = Some(stream);
        self.voices = Some(voices);
        Ok(())
    }

    fn create_instrument(&mut self) -> BackendResult<Box<dyn Instrument>> {
        let voices = self
            .voices
            .as_ref()
            .ok_or_else(|| BackendError::from("Synth not initialized"))?;
        Ok(Box::new(SynthInstrument {
            voices: Arc::clone(voices),
            settings: self.settings,
        }))
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    channels: usize,
    voices: Arc<Mutex<VoicePool>>,
    volume: f32,
) -> BackendResult<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = channels.max(1);
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let mut pool = match voices.lock() {
                    Ok(pool) => pool,
                    Err(_) => {
                        data.fill(T::EQUILIBRIUM);
                        return;
                    }
                };
                for frame in data.chunks_mut(channels) {
                    let value = (pool.next_sample() * volume).clamp(-1.0, 1.0);
                    frame.fill(T::from_sample(value));
                }
            },
            |err| {
                log::error!(target: "audio", "output stream error: {}", err);
            },
            None,
        )
        .map_err(|e| BackendError(format!("Failed to build output stream: {}", e)))
}

/// Each trigger adds one voice to the shared pool.
struct SynthInstrument {
    voices: Arc<Mutex<VoicePool>>,
    settings: SynthSettings,
}

impl Instrument for SynthInstrument {
    fn trigger_attack_release(&mut self, pitch: Pitch, duration: NoteDuration) -> BackendResult {
        let frequency = pitch.frequency(self.settings.tuning_a4);
        let hold = duration.seconds(self.settings.bpm);
        let mut pool = self
            .voices
            .lock()
            .map_err(|_| BackendError::from("Voice pool poisoned"))?;
        pool.note_on(frequency, hold);
        log::debug!(target: "audio", "note {} ({:.2} Hz) for {:.3}s", pitch, frequency, hold);
        Ok(())
    }
}
