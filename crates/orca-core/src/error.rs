//! Error taxonomy for host-facing operations.
//!
//! Only the operations that can actually fail — loading a grid from text and
//! synth-sink initialisation — return `Result`. Evaluation itself never
//! fails: out-of-bounds access and unmapped note letters are absorbed
//! locally per the operator catalogue (see [`crate::Machine::tick`]).

use thiserror::Error;

/// Errors surfaced by `orca-core`'s host-facing operations.
#[derive(Debug, Error)]
pub enum OrcaError {
    /// A byte outside the glyph alphabet was encountered while loading a
    /// grid from text.
    #[error("invalid glyph byte {byte:#04x} ({byte}) at line {line}, column {column}")]
    InvalidGlyph {
        /// The offending byte.
        byte: u8,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        column: usize,
    },

    /// `load_from_text` was given an empty string.
    #[error("cannot load a grid from empty input")]
    EmptyInput,

    /// A synth sink failed during construction (e.g. no audio device, a
    /// soundfont failed to load).
    #[error("synth sink initialization failed: {0}")]
    SinkInit(String),
}

impl From<String> for OrcaError {
    fn from(message: String) -> Self {
        OrcaError::SinkInit(message)
    }
}

impl From<&str> for OrcaError {
    fn from(message: &str) -> Self {
        OrcaError::SinkInit(message.to_string())
    }
}

/// Convenience alias used throughout `orca-core`.
pub type Result<T> = std::result::Result<T, OrcaError>;
