//! Glyph-to-glyph variable storage shared by the `K` and `V` operators.

use crate::glyph::Glyph;

/// Mapping from glyph to glyph, indexed by `glyph.to_int(0)` rather than
/// hashed — a 36-entry array is sufficient for the 36 possible variable
/// names and avoids pulling in a map type for something this small.
///
/// Lifetime spans the `Machine`'s lifetime; cleared only by
/// [`crate::Machine::reset`].
#[derive(Debug, Clone)]
pub struct VariableStore {
    slots: [Glyph; 36],
}

impl VariableStore {
    fn slot(name: Glyph) -> usize {
        name.to_int(0) as usize
    }

    /// `variables[name] = value`.
    pub fn set(&mut self, name: Glyph, value: Glyph) {
        self.slots[Self::slot(name)] = value;
    }

    /// `variables[name]`, or `.` if never set.
    pub fn get(&self, name: Glyph) -> Glyph {
        self.slots[Self::slot(name)]
    }

    /// Clear every variable back to `.`.
    pub fn clear(&mut self) {
        *self = VariableStore::default();
    }
}

impl Default for VariableStore {
    fn default() -> Self {
        VariableStore {
            slots: [Glyph::EMPTY; 36],
        }
    }
}
