//! Voice pool for the built-in synth: triangle oscillators with an
//! attack/decay/sustain/release envelope. Pure sample math, no device access.

/// Envelope times in seconds, sustain as a level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.1,
            sustain: 0.3,
            release: 1.0,
        }
    }
}

impl Envelope {
    /// Gain at `t` seconds after note-on, for a note held `hold` seconds.
    pub fn gain(&self, t: f32, hold: f32) -> f32 {
        if t < hold {
            self.held_gain(t)
        } else {
            let level = self.held_gain(hold);
            let since = t - hold;
            if since >= self.release {
                0.0
            } else {
                level * (1.0 - since / self.release)
            }
        }
    }

    fn held_gain(&self, t: f32) -> f32 {
        if t < self.attack {
            t / self.attack
        } else if t < self.attack + self.decay {
            let k = (t - self.attack) / self.decay;
            1.0 + (self.sustain - 1.0) * k
        } else {
            self.sustain
        }
    }

    /// Total audible length of a note held `hold` seconds.
    pub fn length(&self, hold: f32) -> f32 {
        hold + self.release
    }
}

struct Voice {
    phase: f32,
    phase_inc: f32,
    elapsed: u64,
    hold: f32,
}

/// Polyphonic voice pool. Oldest voices are stolen past `max_voices`.
pub(crate) struct VoicePool {
    voices: Vec<Voice>,
    sample_rate: f32,
    envelope: Envelope,
    max_voices: usize,
}

impl VoicePool {
    pub(crate) fn new(sample_rate: u32, envelope: Envelope, max_voices: usize) -> Self {
        Self {
            voices: Vec::new(),
            sample_rate: sample_rate.max(1) as f32,
            envelope,
            max_voices: max_voices.max(1),
        }
    }

    pub(crate) fn note_on(&mut self, frequency: f32, hold_secs: f32) {
        if self.voices.len() >= self.max_voices {
            self.voices.remove(0);
        }
        self.voices.push(Voice {
            phase: 0.0,
            phase_inc: frequency / self.sample_rate,
            elapsed: 0,
            hold: hold_secs.max(0.0),
        });
    }

    pub(crate) fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Mix one mono sample and advance every voice. Finished voices are dropped.
    pub(crate) fn next_sample(&mut self) -> f32 {
        let sample_rate = self.sample_rate;
        let envelope = self.envelope;
        let mut mix = 0.0;
        for voice in &mut self.voices {
            let t = voice.elapsed as f32 / sample_rate;
            mix += triangle(voice.phase) * envelope.gain(t, voice.hold);
            voice.phase = (voice.phase + voice.phase_inc).fract();
            voice.elapsed += 1;
        }
        self.voices
            .retain(|v| (v.elapsed as f32 / sample_rate) < envelope.length(v.hold));
        mix
    }
}

/// Triangle wave in [-1, 1] for a phase in [0, 1).
fn triangle(phase: f32) -> f32 {
    if phase < 0.5 {
        4.0 * phase - 1.0
    } else {
        3.0 - 4.0 * phase
    }
}
