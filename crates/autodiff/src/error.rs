use thiserror::Error;

/// Errors raised by tape operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TapeError {
    #[error("tape has already been differentiated")]
    AlreadyDifferentiated,

    #[error("output variable belongs to a different tape")]
    ForeignVariable,

    #[error("vector lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}
