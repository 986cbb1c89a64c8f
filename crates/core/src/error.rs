use thiserror::Error;

use crate::ParameterKind;

/// Errors raised when fitter arrays disagree with their name lists.
///
/// These are caller contract violations: a correct fitter never produces
/// them, so they are reported once at construction and a built
/// [`FitterState`](crate::FitterState) is always consistent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("{kind}: {names} names but {columns} columns")]
    ColumnCount {
        kind: ParameterKind,
        names: usize,
        columns: usize,
    },

    #[error("{kind}: expected {expected} rows, found {found}")]
    RowCount {
        kind: ParameterKind,
        expected: usize,
        found: usize,
    },

    #[error("{kind}: duplicate name `{name}`")]
    DuplicateName { kind: ParameterKind, name: String },

    #[error("marker visibility must be {expected:?} (timesteps x markers), found {found:?}")]
    VisibilityShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{kind} gradient must be {expected:?}, found {found:?}")]
    GradientShape {
        kind: ParameterKind,
        expected: (usize, usize),
        found: (usize, usize),
    },
}
