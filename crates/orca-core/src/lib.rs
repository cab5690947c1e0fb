//! Grid evaluator and note scheduler for a glyph-based, two-dimensional
//! concurrent programming language (commonly known as Orca).
//!
//! A [`Machine`] owns a fixed-size [`Grid`] of printable-byte [`Glyph`]s. A
//! subset of glyphs are *operators*: on each [`Machine::tick`], the
//! evaluator scans the grid once in row-major order, reads and writes
//! neighbouring cells through the primitives in [`grid`], and forwards any
//! `:`/`%` firings as note events through the [`SynthSink`] trait boundary.
//!
//! # Quick start
//! ```
//! use orca_core::{Machine, RecordingSink};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut machine = Machine::load_from_text("...\n1AC\n...\n...\n", RecordingSink::default())
//!     .expect("valid grid text");
//! let mut rng = SmallRng::seed_from_u64(0);
//! machine.tick(&mut rng);
//! assert_eq!(machine.to_text(), "...\n1AC\n.D.\n...\n");
//! ```
//!
//! This crate covers only the hard core described by the design: scheduling,
//! the cell state machine, the operator catalogue, and note bookkeeping.
//! Rendering, input handling, and real audio synthesis are external
//! collaborators consumed only through [`SynthSink`] — see `orca-cli` for a
//! thin driver that exercises this crate end to end.

#![warn(missing_docs)]

pub mod cell;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod glyph;
pub mod grid;
pub mod machine;
pub mod notes;
pub mod sink;
pub mod sync;
pub mod variables;

pub use cell::{Cell, CellFlags};
pub use config::Config;
pub use error::{OrcaError, Result};
pub use evaluator::operator_name;
pub use glyph::Glyph;
pub use grid::Grid;
pub use machine::Machine;
pub use notes::{midi_key_for_letter, Note, NoteBook};
pub use sink::{RecordingSink, SinkEvent, SynthSink};
pub use sync::SharedNoteBook;
pub use variables::VariableStore;
