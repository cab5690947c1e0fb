//! A [`SynthSink`] that renders active notes as square waves, the way a
//! chip emulator turns a tone period into a toggling square wave per
//! channel — except here the oscillator free-runs off a MIDI key instead
//! of being driven by hardware period registers.

use orca_core::SynthSink;

const SAMPLE_RATE_HZ: f32 = 44_100.0;
const AMPLITUDE: f32 = i16::MAX as f32 * 0.2;
const CHANNEL_COUNT: usize = 16;

/// One currently-sounding square-wave oscillator.
#[derive(Debug, Clone, Copy)]
struct Voice {
    channel: u8,
    key: i32,
    velocity: f32,
    /// Phase in `[0, 1)`; the generator toggles sign crossing `0.5`, mirroring
    /// a hardware tone generator's period-counter edge toggle.
    phase: f32,
}

impl Voice {
    fn frequency_hz(&self) -> f32 {
        440.0 * 2f32.powf((self.key - 69) as f32 / 12.0)
    }

    fn advance(&mut self) -> f32 {
        let step = self.frequency_hz() / SAMPLE_RATE_HZ;
        self.phase = (self.phase + step).fract();
        if self.phase < 0.5 {
            self.velocity
        } else {
            -self.velocity
        }
    }
}

/// Renders the note book as audible square waves via [`rodio`].
#[derive(Debug, Default)]
pub struct ToneSink {
    voices: Vec<Voice>,
    /// `true` once a channel has been panned right; alternates per `%` firing.
    pan_right: [bool; CHANNEL_COUNT],
}

impl ToneSink {
    /// A tone sink with no active voices.
    pub fn new() -> ToneSink {
        ToneSink::default()
    }
}

impl SynthSink for ToneSink {
    fn note_on(&mut self, channel: u8, key: i32, velocity: f32) {
        self.voices.push(Voice { channel, key, velocity, phase: 0.0 });
    }

    fn note_off(&mut self, channel: u8, key: i32) {
        if let Some(pos) = self.voices.iter().position(|v| v.channel == channel && v.key == key) {
            self.voices.remove(pos);
        }
    }

    fn set_pan(&mut self, channel: u8, pan: bool) {
        if let Some(slot) = self.pan_right.get_mut(channel as usize) {
            *slot = pan;
        }
    }

    fn render(&mut self, out: &mut [i16], num_frames: usize) {
        assert!(out.len() >= num_frames * 2);
        for frame in out.chunks_mut(2).take(num_frames) {
            let mut left = 0.0f32;
            let mut right = 0.0f32;
            for voice in &mut self.voices {
                let sample = voice.advance() * AMPLITUDE;
                let right_biased = self.pan_right.get(voice.channel as usize).copied().unwrap_or(false);
                let (l_gain, r_gain) = if right_biased { (0.15, 0.85) } else { (0.85, 0.15) };
                left += sample * l_gain;
                right += sample * r_gain;
            }
            frame[0] = left.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
            frame[1] = right.clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        }
    }
}
