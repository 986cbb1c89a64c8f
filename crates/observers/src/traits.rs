//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasObjective`]: events that carry an objective value
//! - [`HasGradientNorm`]: events that carry the norm of the objective gradient
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use markerfit_core::Observer;
//! use markerfit_observers::traits::{CanStopEarly, HasGradientNorm};
//!
//! struct Flat {
//!     tolerance: f64,
//! }
//!
//! impl<E: HasGradientNorm, A: CanStopEarly> Observer<E, A> for Flat {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.gradient_norm() < self.tolerance).then(A::stop_early)
//!     }
//! }
//! ```

use markerfit_solvers::descent;

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    fn objective(&self) -> f64;
}

/// An event that carries the norm of the objective gradient.
pub trait HasGradientNorm {
    /// Returns the Euclidean gradient norm for this event.
    fn gradient_norm(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl HasObjective for descent::Event<'_> {
    fn objective(&self) -> f64 {
        self.objective
    }
}

impl HasGradientNorm for descent::Event<'_> {
    fn gradient_norm(&self) -> f64 {
        self.gradient_norm
    }
}

impl CanStopEarly for descent::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
