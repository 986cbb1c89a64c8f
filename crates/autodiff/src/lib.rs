//! Reverse-mode automatic differentiation on a Wengert tape.
//!
//! A [`Tape`] records every arithmetic operation performed on its [`Var`]s.
//! Calling [`Tape::gradients`] replays the record backward once and returns
//! the derivative of one output with respect to every variable on the tape.
//!
//! ```
//! use markerfit_autodiff::Tape;
//!
//! let tape = Tape::new();
//! let x = tape.var(3.0);
//! let y = tape.var(2.0);
//! let f = x * y + x.square();
//!
//! let grads = tape.gradients(f)?;
//! assert_eq!(grads.wrt(x), 8.0);
//! assert_eq!(grads.wrt(y), 3.0);
//! # Ok::<(), markerfit_autodiff::TapeError>(())
//! ```
//!
//! A tape can be differentiated only once. Variables that the output does not
//! depend on get a gradient of exactly zero.

mod error;
mod gradients;
mod tape;
mod var;
mod vector;

pub use error::TapeError;
pub use gradients::Gradients;
pub use tape::Tape;
pub use var::Var;
pub use vector::VarVec;
