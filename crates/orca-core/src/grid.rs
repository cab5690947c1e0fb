//! The rectangular cell array and the five coordinate-addressed primitives
//! operators use to read and write it.

use crate::cell::{Cell, CellFlags, EMPTY_DESC};
use crate::error::{OrcaError, Result};
use crate::glyph::Glyph;

/// A `width × height` array of [`Cell`]s, row-major, with fixed dimensions
/// between calls to [`Grid::resize`].
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid of the given dimensions, every cell initialised to `.`.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Load a grid from text: lines separated by `\n` (trailing newline
    /// optional). Width is the longest line's length; shorter lines are
    /// right-padded with `.`. Every non-padding byte must be a valid glyph.
    pub fn load_from_text(text: &str) -> Result<Grid> {
        if text.is_empty() {
            return Err(OrcaError::EmptyInput);
        }

        let lines: Vec<&str> = text.split('\n').collect();
        // A single trailing '\n' produces one empty trailing element; drop
        // it so `"a\n"` is one row, matching the canonical serialiser.
        let lines: &[&str] = match lines.as_slice() {
            [rest @ .., last] if last.is_empty() && lines.len() > 1 => rest,
            _ => &lines,
        };

        let width = lines.iter().map(|l| l.len()).max().unwrap_or(0);
        let height = lines.len();
        let mut grid = Grid::new(width, height);

        for (y, line) in lines.iter().enumerate() {
            for (x, byte) in line.bytes().enumerate() {
                let glyph = Glyph::new(byte).ok_or(OrcaError::InvalidGlyph {
                    byte,
                    line: y + 1,
                    column: x + 1,
                })?;
                grid.cells[y * width + x] = Cell::new(glyph);
            }
        }

        Ok(grid)
    }

    /// Serialise back to text: one line per row, each terminated by `\n`,
    /// padding cells rendered as their stored glyph (always `.` for cells
    /// never written).
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.cells[y * self.width + x].glyph.byte() as char);
            }
            out.push('\n');
        }
        out
    }

    /// Grid width in columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Reinitialise the grid at the given dimensions, every cell zero-filled
    /// with `.`.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Grid::new(width, height);
    }

    /// Clear every cell's flags, ready for the next tick.
    pub(crate) fn clear_flags(&mut self) {
        for cell in &mut self.cells {
            cell.flags = CellFlags::empty();
            cell.desc = EMPTY_DESC;
        }
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: i64, y: i64) -> usize {
        y as usize * self.width + x as usize
    }

    /// No flag effects, no mutation; used to preserve prior state across
    /// two-phase updates (e.g. `C`, `I`, `Z` reading their own output cell
    /// before overwriting it).
    pub fn peek(&self, x: i64, y: i64) -> Glyph {
        if self.in_bounds(x, y) {
            self.cells[self.index(x, y)].glyph
        } else {
            Glyph::EMPTY
        }
    }

    /// Returns the glyph at `(x, y)`, or `.` if out of bounds. Sets `READ`
    /// even when the cell holds `.`; a no-op for out-of-bounds coordinates.
    pub fn read(&mut self, x: i64, y: i64) -> Glyph {
        if !self.in_bounds(x, y) {
            return Glyph::EMPTY;
        }
        let idx = self.index(x, y);
        self.cells[idx].flags |= CellFlags::READ;
        self.cells[idx].glyph
    }

    /// Like [`Grid::read`] but also claims the cell: sets `READ` and
    /// `LOCKED`. Out-of-bounds reads return `.` without side effects.
    pub fn read_locked(&mut self, x: i64, y: i64) -> Glyph {
        if !self.in_bounds(x, y) {
            return Glyph::EMPTY;
        }
        let idx = self.index(x, y);
        self.cells[idx].flags |= CellFlags::READ | CellFlags::LOCKED;
        self.cells[idx].glyph
    }

    /// Writes `glyph` to `(x, y)` and sets `WRITTEN` and `LOCKED`.
    /// Out-of-bounds writes are silently dropped.
    pub fn write_locked(&mut self, x: i64, y: i64, glyph: Glyph, desc: &'static str) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        self.cells[idx].glyph = glyph;
        self.cells[idx].flags |= CellFlags::WRITTEN | CellFlags::LOCKED;
        self.cells[idx].desc = desc;
    }

    /// Sets `LOCKED` on `(x, y)` without reading or writing its glyph.
    /// Out-of-bounds coordinates are a no-op.
    pub fn lock(&mut self, x: i64, y: i64) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        self.cells[idx].flags |= CellFlags::LOCKED;
    }

    /// Sets `TICKED` on `(x, y)`. Out-of-bounds coordinates are a no-op.
    pub(crate) fn mark_ticked(&mut self, x: i64, y: i64) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        self.cells[idx].flags |= CellFlags::TICKED;
    }

    /// Sets `BANGED` on `(x, y)`. Out-of-bounds coordinates are a no-op.
    pub(crate) fn mark_banged(&mut self, x: i64, y: i64) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        self.cells[idx].flags |= CellFlags::BANGED;
    }

    /// Directly overwrite the glyph at `(x, y)` without touching flags, used
    /// by movement and by the user-facing `place` edit. Out-of-bounds
    /// coordinates are a no-op.
    pub(crate) fn set_glyph(&mut self, x: i64, y: i64, glyph: Glyph) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index(x, y);
        self.cells[idx].glyph = glyph;
    }

    /// Read-only view of a cell, or `None` if out of bounds.
    pub fn cell(&self, x: i64, y: i64) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    pub(crate) fn cell_mut(&mut self, x: i64, y: i64) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub(crate) fn in_bounds_pub(&self, x: i64, y: i64) -> bool {
        self.in_bounds(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_rectangular_input() {
        let text = "...\n1AC\n...\n";
        let grid = Grid::load_from_text(text).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.to_text(), text);
    }

    #[test]
    fn ragged_lines_pad_with_dots() {
        let grid = Grid::load_from_text("a\nbcd\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.to_text(), "a..\nbcd\n");
    }

    #[test]
    fn rejects_invalid_glyph_byte() {
        let err = Grid::load_from_text("a b\n").unwrap_err();
        matches!(err, OrcaError::InvalidGlyph { byte: b' ', .. });
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(Grid::load_from_text(""), Err(OrcaError::EmptyInput)));
    }

    #[test]
    fn out_of_bounds_read_returns_dot_without_effects() {
        let mut grid = Grid::new(2, 2);
        assert_eq!(grid.read(-1, 0).byte(), b'.');
        assert_eq!(grid.read_locked(5, 5).byte(), b'.');
    }

    #[test]
    fn out_of_bounds_write_is_dropped() {
        let mut grid = Grid::new(2, 2);
        grid.write_locked(10, 10, Glyph::new(b'A').unwrap(), "x");
        // nothing panics, nothing observable in bounds
        assert_eq!(grid.peek(0, 0).byte(), b'.');
    }

    #[test]
    fn read_sets_flag_even_for_empty_glyph() {
        let mut grid = Grid::new(1, 1);
        grid.read(0, 0);
        assert!(grid.cell(0, 0).unwrap().flags().contains(CellFlags::READ));
    }

    #[test]
    fn write_locked_sets_both_flags() {
        let mut grid = Grid::new(1, 1);
        grid.write_locked(0, 0, Glyph::new(b'5').unwrap(), "test");
        let cell = grid.cell(0, 0).unwrap();
        assert!(cell.flags().contains(CellFlags::WRITTEN));
        assert!(cell.flags().contains(CellFlags::LOCKED));
        assert_eq!(cell.glyph().byte(), b'5');
    }

    #[test]
    fn clear_flags_resets_everything() {
        let mut grid = Grid::new(1, 1);
        grid.read_locked(0, 0);
        grid.clear_flags();
        assert!(grid.cell(0, 0).unwrap().flags().is_empty());
        assert_eq!(grid.cell(0, 0).unwrap().description(), EMPTY_DESC);
    }
}
