use thiserror::Error;

/// An index or range that falls outside a sequence's slots.
///
/// The panicking accessors format this same value into their panic message,
/// so `at(i)` and `try_at(i)` describe a bad index identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("index {index} out of bounds for weak sequence of length {len}")]
    OutOfBounds { index: usize, len: usize },
    #[error("range {start}..{end} out of bounds for weak sequence of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },
}
