//! Per-view pad layouts and their state.

pub mod note;
pub mod scale_select;
pub mod segments;
pub mod session;

pub use note::NoteMode;
pub use scale_select::ScaleSelect;
pub use segments::SegmentsMode;
pub use session::{InputMode, MomentaryMode, SessionMode};
