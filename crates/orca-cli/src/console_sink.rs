//! A [`SynthSink`] that reports note activity to stderr instead of driving
//! real audio, for headless runs and for hosts without an output device.

use orca_core::SynthSink;

/// Prints every note event as it happens; produces silence on `render`.
///
/// Mirrors the diagnostic style the reference player falls back to when no
/// audio backend is available: plain `eprintln!`, no logging framework.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    quiet: bool,
}

impl ConsoleSink {
    /// A console sink that prints every note event.
    pub fn new() -> ConsoleSink {
        ConsoleSink::default()
    }

    /// A console sink that renders silence without printing anything.
    pub fn quiet() -> ConsoleSink {
        ConsoleSink { quiet: true }
    }
}

impl SynthSink for ConsoleSink {
    fn note_on(&mut self, channel: u8, key: i32, velocity: f32) {
        if !self.quiet {
            eprintln!("note on  ch={channel:<2} key={key:<3} vel={velocity:.2}");
        }
    }

    fn note_off(&mut self, channel: u8, key: i32) {
        if !self.quiet {
            eprintln!("note off ch={channel:<2} key={key:<3}");
        }
    }

    fn set_pan(&mut self, channel: u8, pan: bool) {
        if !self.quiet {
            eprintln!("pan      ch={channel:<2} -> {}", if pan { "right" } else { "left" });
        }
    }

    fn render(&mut self, out: &mut [i16], _num_frames: usize) {
        out.fill(0);
    }
}
