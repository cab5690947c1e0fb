//! Note lifetime bookkeeping and the note-letter → MIDI key mapping.

use crate::glyph::Glyph;
use crate::sink::SynthSink;

/// Semitone offsets from C for the seven natural note letters A–G.
const SEMITONES: [i32; 7] = [9, 11, 0, 2, 4, 5, 7];

/// Map a note letter (`A`-`Z`, case selecting natural/sharp) and a caller-
/// supplied octave to a MIDI key number.
///
/// Lowercase denotes a sharp (+1 semitone). Letters past `G` are treated as
/// transpositions: every full span of nine letters (`A` through `I`) wraps
/// back to `A` and bumps the octave, and the remaining `H`/`I` alias to
/// `A`/`B` (`3H` is equivalent to `4A`). Returns `None` for a non-alphabetic
/// glyph.
pub fn midi_key_for_letter(letter: Glyph, octave0: i32) -> Option<i32> {
    let byte = letter.byte();
    if !byte.is_ascii_alphabetic() {
        return None;
    }
    let sharp = i32::from(byte.is_ascii_lowercase());

    let mut idx = (letter.as_upper().byte() - b'A') as i32;
    let mut octave0 = octave0;
    while idx > 8 {
        idx -= 9;
        octave0 += 1;
    }
    if idx > 6 {
        idx -= 7;
    }

    let octave = octave0 + 2;
    Some(SEMITONES[idx as usize] + octave * 12 + sharp)
}

/// A currently-sounding note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    /// MIDI channel, 0–15.
    pub channel: u8,
    /// MIDI key number.
    pub key: i32,
    /// Normalised velocity.
    pub velocity: f32,
    /// Ticks remaining before this note is silenced.
    pub remaining_length: u32,
}

/// The set of currently-sounding notes, queried and mutated once per tick.
#[derive(Debug, Clone, Default)]
pub struct NoteBook {
    notes: Vec<Note>,
}

impl NoteBook {
    /// Currently active notes, in emission order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Decrement every note's remaining length by one; any note that reaches
    /// zero is silenced at `sink` and removed. Called once at the start of
    /// every tick, before any operator runs.
    pub fn age(&mut self, sink: &mut dyn SynthSink) {
        let mut i = 0;
        while i < self.notes.len() {
            self.notes[i].remaining_length = self.notes[i].remaining_length.saturating_sub(1);
            if self.notes[i].remaining_length == 0 {
                let note = self.notes.remove(i);
                sink.note_off(note.channel, note.key);
            } else {
                i += 1;
            }
        }
    }

    /// Silence and remove every note on `channel`, used by `%` before it
    /// enqueues its own note.
    pub fn silence_channel(&mut self, channel: u8, sink: &mut dyn SynthSink) {
        let mut i = 0;
        while i < self.notes.len() {
            if self.notes[i].channel == channel {
                let note = self.notes.remove(i);
                sink.note_off(note.channel, note.key);
            } else {
                i += 1;
            }
        }
    }

    /// Enqueue `note` and ask `sink` to start it.
    pub fn push(&mut self, note: Note, sink: &mut dyn SynthSink) {
        sink.note_on(note.channel, note.key, note.velocity);
        self.notes.push(note);
    }

    /// Drop every note without notifying the sink — used by `Machine::reset`.
    pub fn clear(&mut self) {
        self.notes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;

    fn glyph(b: u8) -> Glyph {
        Glyph::new(b).unwrap()
    }

    #[test]
    fn natural_notes_at_octave_zero() {
        assert_eq!(midi_key_for_letter(glyph(b'C'), 0), Some(24));
        assert_eq!(midi_key_for_letter(glyph(b'A'), 0), Some(33));
    }

    #[test]
    fn lowercase_adds_a_sharp() {
        let natural = midi_key_for_letter(glyph(b'C'), 0).unwrap();
        let sharp = midi_key_for_letter(glyph(b'c'), 0).unwrap();
        assert_eq!(sharp, natural + 1);
    }

    #[test]
    fn h_aliases_to_a_same_octave() {
        // H is past G but not past I, so only the second reduction fires:
        // no octave change, H lands on A.
        assert_eq!(
            midi_key_for_letter(glyph(b'H'), 3),
            midi_key_for_letter(glyph(b'A'), 3)
        );
    }

    #[test]
    fn i_aliases_to_b_same_octave() {
        assert_eq!(
            midi_key_for_letter(glyph(b'I'), 3),
            midi_key_for_letter(glyph(b'B'), 3)
        );
    }

    #[test]
    fn letter_past_i_transposes_one_octave_up() {
        // J is past I, so the first reduction fires once and bumps the
        // octave before landing on A.
        assert_eq!(
            midi_key_for_letter(glyph(b'J'), 0),
            midi_key_for_letter(glyph(b'A'), 1)
        );
    }

    #[test]
    fn non_alphabetic_is_invalid() {
        assert_eq!(midi_key_for_letter(glyph(b'5'), 0), None);
        assert_eq!(midi_key_for_letter(glyph(b'.'), 0), None);
    }

    #[test]
    fn aging_silences_and_removes_expired_notes() {
        let mut book = NoteBook::default();
        let mut sink = RecordingSink::default();
        book.push(
            Note {
                channel: 1,
                key: 60,
                velocity: 0.5,
                remaining_length: 1,
            },
            &mut sink,
        );
        book.age(&mut sink);
        assert!(book.notes().is_empty());
        assert_eq!(sink.events.last().unwrap(), &crate::sink::SinkEvent::NoteOff { channel: 1, key: 60 });
    }

    #[test]
    fn silence_channel_only_affects_matching_channel() {
        let mut book = NoteBook::default();
        let mut sink = RecordingSink::default();
        book.push(
            Note { channel: 1, key: 60, velocity: 0.5, remaining_length: 5 },
            &mut sink,
        );
        book.push(
            Note { channel: 2, key: 61, velocity: 0.5, remaining_length: 5 },
            &mut sink,
        );
        book.silence_channel(1, &mut sink);
        assert_eq!(book.notes().len(), 1);
        assert_eq!(book.notes()[0].channel, 2);
    }
}
