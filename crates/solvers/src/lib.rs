//! Marker fitters that host markerfit callbacks.
//!
//! # Solvers
//!
//! - [`descent`]: fixed-step gradient descent over every array a
//!   [`FitterState`](markerfit_core::FitterState) exposes, driven by a custom
//!   loss and named zero constraints

pub mod descent;
