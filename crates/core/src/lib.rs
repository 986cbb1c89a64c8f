//! Core types shared by the markerfit crates.
//!
//! This crate defines the boundary between an external marker fitter and the
//! code that evaluates custom losses on its behalf:
//!
//! - [`FitterState`]: one iteration's positional arrays plus the gradient
//!   side channel the fitter reads back
//! - [`StateGradients`]: gradient arrays shaped like the state's value arrays
//! - [`ParameterKind`]: the five parameter categories a state exposes
//! - [`MarkerFitter`]: the callback registration interface of a fitter
//! - [`Observer`]: receives solver events and optionally returns control actions

mod error;
mod fitter;
mod gradients;
mod kind;
mod observer;
mod state;

pub use error::StateError;
pub use fitter::{MarkerFitter, StateCallback};
pub use gradients::StateGradients;
pub use kind::ParameterKind;
pub use observer::Observer;
pub use state::{FitterState, POINT_DIM, StateArrays};
