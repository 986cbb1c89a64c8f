use markerfit_autodiff::TapeError;
use markerfit_core::{ParameterKind, StateError};
use thiserror::Error;

use crate::LossError;

/// Why a loss evaluation produced no usable value.
///
/// [`LossAdapter::evaluate`](crate::LossAdapter::evaluate) logs these and
/// falls back to [`NEUTRAL_LOSS`](crate::NEUTRAL_LOSS);
/// [`LossAdapter::try_evaluate`](crate::LossAdapter::try_evaluate) returns
/// them to the caller.
#[derive(Debug, Error)]
pub enum LossFailure {
    #[error("loss function returned an error")]
    Loss(#[source] LossError),

    #[error("loss function panicked: {message}")]
    Panicked { message: String },

    #[error("loss value is not finite: {value}")]
    NonFiniteLoss { value: f64 },

    #[error("{kind} gradient is not finite")]
    NonFiniteGradient { kind: ParameterKind },

    #[error("could not differentiate the loss")]
    Differentiate(#[from] TapeError),

    #[error("gradients do not fit the fitter state")]
    State(#[from] StateError),
}
