//! The owner of grid, variables, notes and sink: the host-facing surface of
//! the interpreter. The actual per-tick dispatch lives in [`crate::evaluator`].

use rand::RngCore;

use crate::config::Config;
use crate::error::Result;
use crate::glyph::Glyph;
use crate::grid::Grid;
use crate::notes::NoteBook;
use crate::sink::SynthSink;
use crate::variables::VariableStore;

/// Owns the grid, variable store, note book, tick/frame counters and BPM,
/// and holds the synth sink every note event is forwarded to.
#[derive(Debug, Clone)]
pub struct Machine<S: SynthSink> {
    pub(crate) grid: Grid,
    pub(crate) variables: VariableStore,
    pub(crate) notes: NoteBook,
    pub(crate) sink: S,
    config: Config,
    ticks: u64,
    frames: u64,
}

impl<S: SynthSink> Machine<S> {
    /// A machine over an empty `width × height` grid.
    pub fn new(width: usize, height: usize, sink: S) -> Machine<S> {
        Machine {
            grid: Grid::new(width, height),
            variables: VariableStore::default(),
            notes: NoteBook::default(),
            sink,
            config: Config::default(),
            ticks: 0,
            frames: 0,
        }
    }

    /// Load a machine's grid from text (see [`Grid::load_from_text`]); all
    /// other state starts fresh.
    pub fn load_from_text(text: &str, sink: S) -> Result<Machine<S>> {
        let grid = Grid::load_from_text(text)?;
        Ok(Machine {
            grid,
            variables: VariableStore::default(),
            notes: NoteBook::default(),
            sink,
            config: Config::default(),
            ticks: 0,
            frames: 0,
        })
    }

    /// Serialise the current grid back to text.
    pub fn to_text(&self) -> String {
        self.grid.to_text()
    }

    /// Reinitialise the grid at the given dimensions; does not reset notes,
    /// variables, or counters (mirrors [`crate::Grid::resize`]'s contract).
    pub fn resize(&mut self, width: usize, height: usize) {
        self.grid.resize(width, height);
    }

    /// Clear the grid, notes, variables, and both counters. The grid keeps
    /// its current dimensions.
    pub fn reset(&mut self) {
        self.grid.resize(self.grid.width(), self.grid.height());
        self.variables.clear();
        self.notes.clear();
        self.ticks = 0;
        self.frames = 0;
    }

    /// Current BPM.
    pub fn bpm(&self) -> u32 {
        self.config.bpm()
    }

    /// Set the BPM (clamped to at least 1).
    pub fn set_bpm(&mut self, bpm: u32) {
        self.config.set_bpm(bpm);
    }

    /// Ticks elapsed so far, incremented before the grid is scanned, so the
    /// first tick reads as `1`. Consulted by the `C` and `D` operators.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames elapsed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub(crate) fn bump_ticks(&mut self) {
        self.ticks += 1;
    }

    /// Advance one evaluator tick: clear flags, age the note book, then
    /// scan and dispatch the grid once in row-major order. See
    /// [`crate::evaluator`] for the algorithm.
    pub fn tick(&mut self, rng: &mut dyn RngCore) {
        crate::evaluator::run_tick(self, rng);
    }

    /// Advance one frame: call [`Machine::tick`] once every
    /// `frames_per_tick` frames, then ask the sink to render one frame's
    /// worth of samples.
    pub fn run_frame(&mut self, rng: &mut dyn RngCore, out: &mut [i16]) {
        if self.frames % u64::from(self.config.frames_per_tick()) == 0 {
            self.tick(rng);
        }
        let samples_per_frame = (crate::config::SAMPLE_RATE_HZ / crate::config::FRAMES_PER_SECOND) as usize;
        self.sink.render(out, samples_per_frame);
        self.frames += 1;
    }

    /// User edit: place `glyph` at `(x, y)`. A no-op if the coordinates are
    /// out of bounds.
    pub fn place(&mut self, x: i64, y: i64, glyph: Glyph) {
        self.grid.set_glyph(x, y, glyph);
    }

    /// The glyph at `(x, y)`, or `.` if out of bounds. Does not set any
    /// flags (host UI peek, not an operator read).
    pub fn peek_cell(&self, x: i64, y: i64) -> Glyph {
        self.grid.peek(x, y)
    }

    /// `true` if `(x, y)` has been claimed as an operand or output this
    /// tick and will not be independently dispatched.
    pub fn is_locked(&self, x: i64, y: i64) -> bool {
        self.grid
            .cell(x, y)
            .map(|c| c.flags().contains(crate::cell::CellFlags::LOCKED))
            .unwrap_or(false)
    }

    /// Short description of the last operator activity at `(x, y)` this
    /// tick (`"empty"` if untouched), for host UIs.
    pub fn cell_description(&self, x: i64, y: i64) -> &'static str {
        self.grid
            .cell(x, y)
            .map(|c| c.description())
            .unwrap_or(crate::cell::EMPTY_DESC)
    }

    /// Grid width in columns.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Grid height in rows.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Currently active notes.
    pub fn notes(&self) -> &[crate::notes::Note] {
        self.notes.notes()
    }

    /// Borrow the synth sink (e.g. to inspect a recording mock in tests).
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the synth sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::RecordingSink;

    #[test]
    fn new_machine_is_all_dots() {
        let machine = Machine::new(3, 2, RecordingSink::default());
        assert_eq!(machine.to_text(), "...\n...\n");
    }

    #[test]
    fn reset_clears_counters_and_notes() {
        let mut rng = rand::thread_rng();
        let mut machine = Machine::load_from_text("*%12C45\n%12C45.\n", RecordingSink::default()).unwrap();
        machine.tick(&mut rng);
        assert!(machine.ticks() > 0);
        machine.reset();
        assert_eq!(machine.ticks(), 0);
        assert_eq!(machine.frames(), 0);
        assert!(machine.notes().is_empty());
    }

    #[test]
    fn place_edits_a_cell() {
        let mut machine = Machine::new(2, 2, RecordingSink::default());
        machine.place(0, 0, Glyph::new(b'A').unwrap());
        assert_eq!(machine.peek_cell(0, 0).byte(), b'A');
    }
}
