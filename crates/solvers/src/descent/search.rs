use markerfit_core::{FitterState, Observer, ParameterKind, StateGradients};
use tracing::{debug, info};

use super::{
    Action, DescentFitter, Error, Event, Solution, Status,
    objective::{Evaluation, evaluate},
};

/// Core descent loop.
///
/// Each iteration steps against the combined gradient, re-evaluates, emits an
/// event, and then checks the objective change. The gradient norm is checked
/// before stepping, so a state that is already stationary is left untouched.
pub(super) fn search<Obs>(
    fitter: &DescentFitter,
    state: &mut FitterState,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    Obs: for<'a> Observer<Event<'a>, Action>,
{
    if !fitter.has_custom_loss() && fitter.zero_constraints.is_empty() {
        return Err(Error::NoObjective);
    }

    let config = fitter.config();
    let mut current = evaluate(fitter, state);
    if !current.objective.is_finite() {
        return Err(Error::Diverged { iter: 0 });
    }

    for iter in 1..=config.max_iters() {
        if current.gradient_norm <= config.gradient_tol() {
            return Ok(finish(&current, Status::Converged, iter - 1));
        }

        step(state, &current.gradients, config.step_size());
        let next = evaluate(fitter, state);
        if !next.objective.is_finite() {
            return Err(Error::Diverged { iter });
        }

        let delta = (next.objective - current.objective).abs();
        current = next;
        debug!(
            iter,
            objective = current.objective,
            gradient_norm = current.gradient_norm,
            "descent step"
        );

        let event = Event {
            iter,
            objective: current.objective,
            gradient_norm: current.gradient_norm,
            state: &*state,
        };
        if let Some(Action::StopEarly) = observer.observe(&event) {
            return Ok(finish(&current, Status::StoppedByObserver, iter));
        }

        if delta <= config.objective_tol() {
            return Ok(finish(&current, Status::Converged, iter));
        }
    }

    Ok(finish(&current, Status::MaxIters, config.max_iters()))
}

/// Moves every value against its gradient.
fn step(state: &mut FitterState, gradients: &StateGradients, step_size: f64) {
    for kind in ParameterKind::ALL {
        let grads = gradients.get(kind).as_slice();
        for (value, g) in state.values_mut(kind).iter_mut().zip(grads) {
            *value -= step_size * g;
        }
    }
}

fn finish(current: &Evaluation, status: Status, iters: usize) -> Solution {
    info!(?status, objective = current.objective, iters, "descent finished");
    Solution {
        status,
        objective: current.objective,
        iters,
    }
}
