//! Reusable observers for markerfit solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across solvers.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for cross-solver observers
//!   ([`HasObjective`], [`HasGradientNorm`], [`CanStopEarly`])
//! - [`History`]: records the objective trace of a fit
//! - [`ObjectiveBelow`]: stops a fit once the objective is small enough
//!
//! [`Observer`]: markerfit_core::Observer
//! [`HasObjective`]: traits::HasObjective
//! [`HasGradientNorm`]: traits::HasGradientNorm
//! [`CanStopEarly`]: traits::CanStopEarly

mod history;
mod stop;
pub mod traits;

pub use history::{History, Record};
pub use stop::ObjectiveBelow;
