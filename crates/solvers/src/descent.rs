//! Fixed-step gradient descent driven by registered callbacks.
//!
//! # Algorithm
//!
//! [`DescentFitter`] minimizes
//!
//! ```text
//! loss + weight * sum(c_i^2)
//! ```
//!
//! where `loss` is the custom loss and `c_i` are the zero constraints. Each
//! callback writes its gradient into the state's side channel, and the fitter
//! combines them as `grad(loss) + weight * sum(2 * c_i * grad(c_i))`. Every
//! array the state exposes (body scales, marker offsets, both residual
//! arrays, and poses) moves against that gradient by `step_size`.
//!
//! # When to Use
//!
//! The descent fitter stands in for a full marker fitter in tests and demos.
//! It has no kinematic model: residuals are free variables, not functions of
//! pose and scale.
//!
//! # Stopping
//!
//! - Converged when the gradient norm is at most `gradient_tol`, or when the
//!   objective changes by at most `objective_tol` in one step
//! - Stopped when an observer returns [`Action::StopEarly`]
//! - Otherwise stopped after `max_iters` steps
//!
//! # Observer Events
//!
//! The fitter emits one [`Event`] after every step.

mod action;
mod config;
mod error;
mod event;
mod fitter;
mod objective;
mod search;
mod solution;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use fitter::DescentFitter;
pub use solution::{Solution, Status};
