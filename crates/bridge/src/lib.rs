//! Bridges an external marker fitter to user-supplied differentiable losses.
//!
//! On every fitter callback the bridge:
//!
//! 1. binds the fitter's positional arrays to named variables on a fresh
//!    [`Tape`](markerfit_autodiff::Tape) ([`OptimizationSnapshot::bind`]),
//! 2. runs the user loss on the [`OptimizationSnapshot`],
//! 3. differentiates the loss once and scatters each variable's gradient
//!    back into its column ([`OptimizationSnapshot::scatter_gradients`]),
//! 4. hands the gradients to the fitter through
//!    [`FitterState::set_gradients`](markerfit_core::FitterState::set_gradients)
//!    and returns the loss value.
//!
//! [`LossAdapter`] packages those steps behind the fitter's callback
//! signature and contains user failures: an error or panic in the loss is
//! logged and the fitter sees [`NEUTRAL_LOSS`] with zero gradients.
//! [`MarkerMocap`] owns a fitter together with its custom loss and named
//! [`ZeroConstraints`].

mod adapter;
mod bind;
mod constraints;
mod failure;
mod mocap;
mod scatter;
mod snapshot;

#[cfg(test)]
mod test_utils;

pub use adapter::{LossAdapter, LossError, LossResult, NEUTRAL_LOSS};
pub use constraints::ZeroConstraints;
pub use failure::LossFailure;
pub use mocap::MarkerMocap;
pub use snapshot::{NamedVectors, OptimizationSnapshot};
