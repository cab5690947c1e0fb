//! Thread-safe boundary around the note book for a real-time audio callback.
//!
//! Mirrors the producer/consumer split a streaming chip emulator uses for
//! its audio ring buffer: the evaluator thread is the producer — it mutates
//! the note book and calls sink methods — while an audio callback thread is
//! the consumer that renders samples. A single `parking_lot::Mutex` guards
//! the note book; a `Condvar` wakes the consumer when the note population
//! changes so it can choose to render or block on silence. No lock is held
//! across a grid traversal, only during note bookkeeping.
//!
//! This is an opt-in boundary, not something [`crate::Machine`] forces on
//! every caller: a host that polls "render N samples per frame" inline (the
//! plugin-style integration) needs no locking at all and should keep using
//! [`crate::notes::NoteBook`] directly through `Machine`. `SharedNoteBook`
//! is for the other configuration, where a separate real-time audio thread
//! pulls samples independently of the tick thread.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::notes::{Note, NoteBook};
use crate::sink::SynthSink;

/// A [`NoteBook`] behind a mutex and a change-notification condvar, safe to
/// share between the tick thread and a real-time audio callback thread.
#[derive(Clone)]
pub struct SharedNoteBook {
    inner: Arc<Mutex<NoteBook>>,
    changed: Arc<Condvar>,
}

impl SharedNoteBook {
    /// An empty, shared note book.
    pub fn new() -> SharedNoteBook {
        SharedNoteBook {
            inner: Arc::new(Mutex::new(NoteBook::default())),
            changed: Arc::new(Condvar::new()),
        }
    }

    /// Age every note by one tick, silencing and removing any that expire.
    /// Call once at the start of every tick, before evaluation.
    pub fn age(&self, sink: &mut dyn SynthSink) {
        let mut book = self.inner.lock();
        let before = book.notes().len();
        book.age(sink);
        if book.notes().len() != before {
            self.changed.notify_all();
        }
    }

    /// Enqueue `note` and wake any thread blocked in [`Self::wait_for_change`].
    pub fn push(&self, note: Note, sink: &mut dyn SynthSink) {
        let mut book = self.inner.lock();
        book.push(note, sink);
        self.changed.notify_all();
    }

    /// Silence and remove every note on `channel`.
    pub fn silence_channel(&self, channel: u8, sink: &mut dyn SynthSink) {
        let mut book = self.inner.lock();
        book.silence_channel(channel, sink);
        self.changed.notify_all();
    }

    /// A snapshot of the currently active notes.
    pub fn snapshot(&self) -> Vec<Note> {
        self.inner.lock().notes().to_vec()
    }

    /// Block the calling thread until the note population changes or
    /// `timeout` elapses. Returns `true` if woken by a change, `false` on
    /// timeout — a renderer can use this to sleep while the book is empty
    /// instead of spinning.
    pub fn wait_for_change(&self, timeout: Duration) -> bool {
        let mut book = self.inner.lock();
        let result = self.changed.wait_for(&mut book, timeout);
        !result.timed_out()
    }
}

impl Default for SharedNoteBook {
    fn default() -> Self {
        SharedNoteBook::new()
    }
}
