//! Cell state: a stored glyph plus the per-tick flag bitset.

use bitflags::bitflags;

use crate::glyph::Glyph;

bitflags! {
    /// Per-tick cell flags, all cleared at the start of every tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        /// This cell has been visited by the evaluator this tick.
        const TICKED = 0x01;
        /// A neighbour's bang marked this cell; lowercase operators fire as
        /// if uppercase.
        const BANGED = 0x02;
        /// Some operator has read this cell this tick.
        const READ = 0x04;
        /// Some operator has written this cell this tick.
        const WRITTEN = 0x08;
        /// This cell is claimed as an operand or output; the evaluator must
        /// skip it entirely this tick.
        const LOCKED = 0x10;
    }
}

/// The glyph reported for an unused cell slot's description before any
/// operator has touched it this tick.
pub const EMPTY_DESC: &str = "empty";

/// A single grid cell: a glyph, its per-tick flags, and a short description
/// tag for host UIs (e.g. `"A-output"`, reset to [`EMPTY_DESC`] each tick).
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub(crate) glyph: Glyph,
    pub(crate) flags: CellFlags,
    pub(crate) desc: &'static str,
}

impl Cell {
    pub(crate) fn new(glyph: Glyph) -> Cell {
        Cell {
            glyph,
            flags: CellFlags::empty(),
            desc: EMPTY_DESC,
        }
    }

    /// The glyph currently stored in this cell.
    pub fn glyph(&self) -> Glyph {
        self.glyph
    }

    /// The flags set on this cell so far this tick.
    pub fn flags(&self) -> CellFlags {
        self.flags
    }

    /// The short description tag last assigned to this cell this tick.
    pub fn description(&self) -> &'static str {
        self.desc
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new(Glyph::EMPTY)
    }
}
