//! Error types for building scales.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScaleError {
    /// The tonic is not a note name, or is spelled in a way the chromatic
    /// sequence chosen for it does not contain (e.g. "Db" with sharps).
    #[error("Invalid tonic {tonic:?}: not in chromatic sequence {sequence:?}")]
    InvalidTonic { tonic: String, sequence: Vec<String> },

    /// A mode contains a step other than `m`, `M` or `A`.
    #[error("Unknown interval symbol {0:?} (expected 'm', 'M' or 'A')")]
    UnknownIntervalSymbol(char),

    /// Neither a mode name nor an interval string.
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    /// The steps of a mode add up to something other than an octave.
    #[error("Mode {mode:?} spans {semitones} semitones instead of 12")]
    OpenMode { mode: String, semitones: u32 },

    /// Only heptatonic and pentatonic modes have a row layout.
    #[error("Mode {mode:?} has {steps} steps (expected 7 or 5)")]
    UnsupportedLength { mode: String, steps: usize },
}
