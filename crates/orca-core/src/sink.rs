//! The synthesiser capability boundary the evaluator drives note events
//! through, and a recording mock for tests.

/// External polyphonic synthesiser interface consumed by the evaluator.
///
/// Kept narrow and `Send` so a concrete implementation can be driven from a
/// real-time audio callback on its own thread while the evaluator runs on
/// the tick thread, guarded by the same mutex as the note book (see the
/// crate's concurrency notes).
pub trait SynthSink: Send {
    /// Start sounding `key` on `channel` at `velocity` (0.0–1.0).
    fn note_on(&mut self, channel: u8, key: i32, velocity: f32);

    /// Stop sounding `key` on `channel`.
    fn note_off(&mut self, channel: u8, key: i32);

    /// Set the stereo pan for `channel`; used by `%` to alternate pan on
    /// every firing. `pan` is `true`/`false` rather than a continuous value,
    /// matching the two-sided alternation the operator performs.
    fn set_pan(&mut self, channel: u8, pan: bool);

    /// Render `num_frames` stereo frames (interleaved L, R) into `out`,
    /// which must be at least `num_frames * 2` samples long.
    fn render(&mut self, out: &mut [i16], num_frames: usize);
}

/// One observed call against a [`SynthSink`], in the order it occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    /// A [`SynthSink::note_on`] call.
    NoteOn { channel: u8, key: i32 },
    /// A [`SynthSink::note_off`] call.
    NoteOff { channel: u8, key: i32 },
    /// A [`SynthSink::set_pan`] call.
    SetPan { channel: u8, pan: bool },
}

/// A [`SynthSink`] that records every call instead of producing audio, for
/// asserting `note_on`/`note_off` ordering in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Every call observed so far, oldest first.
    pub events: Vec<SinkEvent>,
}

impl SynthSink for RecordingSink {
    fn note_on(&mut self, channel: u8, key: i32, _velocity: f32) {
        self.events.push(SinkEvent::NoteOn { channel, key });
    }

    fn note_off(&mut self, channel: u8, key: i32) {
        self.events.push(SinkEvent::NoteOff { channel, key });
    }

    fn set_pan(&mut self, channel: u8, pan: bool) {
        self.events.push(SinkEvent::SetPan { channel, pan });
    }

    fn render(&mut self, out: &mut [i16], _num_frames: usize) {
        out.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let mut sink = RecordingSink::default();
        sink.note_on(0, 60, 0.8);
        sink.set_pan(0, true);
        sink.note_off(0, 60);
        assert_eq!(
            sink.events,
            vec![
                SinkEvent::NoteOn { channel: 0, key: 60 },
                SinkEvent::SetPan { channel: 0, pan: true },
                SinkEvent::NoteOff { channel: 0, key: 60 },
            ]
        );
    }
}
