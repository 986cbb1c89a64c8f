use markerfit_core::{FitterState, StateCallback, StateGradients};

use super::DescentFitter;

/// The combined objective at one state, with its gradient.
pub(super) struct Evaluation {
    pub(super) objective: f64,
    pub(super) gradients: StateGradients,
    pub(super) gradient_norm: f64,
}

/// Calls every registered callback once and combines the results.
///
/// The objective is `loss + weight * sum(c^2)`, so each constraint adds
/// `2 * weight * c` times its own gradient.
pub(super) fn evaluate(fitter: &DescentFitter, state: &mut FitterState) -> Evaluation {
    let weight = fitter.config().constraint_weight();
    let mut objective = 0.0;
    let mut gradients = StateGradients::zeros_like(state);

    if let Some(loss) = &fitter.custom_loss {
        objective += call(loss, state);
        gradients.add_scaled(state.gradients(), 1.0);
    }

    for constraint in fitter.zero_constraints.values() {
        let value = call(constraint, state);
        objective += weight * value * value;
        gradients.add_scaled(state.gradients(), 2.0 * weight * value);
    }

    let gradient_norm = gradients.norm_squared().sqrt();
    Evaluation {
        objective,
        gradients,
        gradient_norm,
    }
}

/// Calls a callback with cleared gradients, so one that writes none reads as zero.
fn call(callback: &StateCallback, state: &mut FitterState) -> f64 {
    state.clear_gradients();
    callback(state)
}
