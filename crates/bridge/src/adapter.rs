use std::{
    any::Any,
    error::Error as StdError,
    fmt,
    iter,
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use markerfit_autodiff::{Tape, Var};
use markerfit_core::{FitterState, StateCallback};
use tracing::{error, trace};

use crate::{LossFailure, OptimizationSnapshot};

/// Loss value reported to the fitter when a loss evaluation fails.
pub const NEUTRAL_LOSS: f64 = 0.0;

/// Error type a loss function may return.
pub type LossError = Box<dyn StdError + Send + Sync>;

/// What a loss function returns: a scalar on the snapshot's tape.
pub type LossResult<'t> = Result<Var<'t>, LossError>;

type LossFn = dyn for<'t> Fn(&OptimizationSnapshot<'t>) -> LossResult<'t>;

/// Adapts a differentiable loss to the fitter's callback signature.
///
/// Each evaluation binds the fitter state to a fresh tape, runs the loss,
/// and writes the resulting gradients into the state. Nothing carries over
/// between evaluations.
pub struct LossAdapter {
    label: String,
    loss: Box<LossFn>,
}

impl LossAdapter {
    /// Wraps a loss function.
    ///
    /// The label identifies the loss in log output.
    pub fn new<F>(label: impl Into<String>, loss: F) -> Self
    where
        F: for<'t> Fn(&OptimizationSnapshot<'t>) -> LossResult<'t> + 'static,
    {
        Self {
            label: label.into(),
            loss: Box::new(loss),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluates the loss and stores its gradients in `state`.
    ///
    /// Returns the loss value. On failure the state's gradients are left as
    /// they were.
    ///
    /// # Errors
    ///
    /// Returns a [`LossFailure`] if the loss function errors or panics, if the
    /// loss or any gradient is not finite, or if the loss cannot be
    /// differentiated (for example because the loss function already
    /// differentiated the tape itself).
    pub fn try_evaluate(&self, state: &mut FitterState) -> Result<f64, LossFailure> {
        let tape = Tape::new();

        let (value, gradients) = {
            let snapshot = OptimizationSnapshot::bind(&tape, state);

            let loss = panic::catch_unwind(AssertUnwindSafe(|| (self.loss)(&snapshot)))
                .map_err(|payload| LossFailure::Panicked {
                    message: panic_message(&*payload),
                })?
                .map_err(LossFailure::Loss)?;

            let value = loss.value();
            if !value.is_finite() {
                return Err(LossFailure::NonFiniteLoss { value });
            }

            let gradients = snapshot.scatter_gradients(loss)?;
            if let Some(kind) = gradients.first_non_finite() {
                return Err(LossFailure::NonFiniteGradient { kind });
            }
            (value, gradients)
        };

        state.set_gradients(gradients)?;
        Ok(value)
    }

    /// Evaluates the loss, containing any failure.
    ///
    /// A failure is logged with its cause chain, the state's gradients are
    /// reset to zero, and [`NEUTRAL_LOSS`] is returned so the fitter can keep
    /// iterating.
    pub fn evaluate(&self, state: &mut FitterState) -> f64 {
        match self.try_evaluate(state) {
            Ok(value) => {
                trace!(label = %self.label, value, "evaluated loss");
                value
            }
            Err(failure) => {
                error!(
                    label = %self.label,
                    error = %error_chain(&failure),
                    "loss evaluation failed; reporting neutral loss"
                );
                state.clear_gradients();
                NEUTRAL_LOSS
            }
        }
    }

    /// Returns a fitter callback that calls [`LossAdapter::evaluate`].
    #[must_use]
    pub fn into_callback(self: Rc<Self>) -> StateCallback {
        Box::new(move |state: &mut FitterState| self.evaluate(state))
    }
}

impl fmt::Debug for LossAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LossAdapter")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}

fn error_chain(error: &(dyn StdError + 'static)) -> String {
    iter::successors(Some(error), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}
