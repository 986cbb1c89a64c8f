use approx::assert_relative_eq;
use markerfit_core::{FitterState, MarkerFitter, StateArrays, StateCallback, StateGradients};
use nalgebra::DMatrix;

use super::{Action, Config, ConfigError, DescentFitter, Error, Event, Status};

/// One body, two markers, one joint, two timesteps, three dofs.
fn state() -> FitterState {
    FitterState::new(StateArrays {
        body_names: vec!["pelvis".into()],
        body_scales: DMatrix::from_element(3, 1, 1.0),
        marker_order: vec!["ASIS".into(), "PSIS".into()],
        marker_offsets: DMatrix::zeros(3, 2),
        marker_residuals: DMatrix::from_fn(6, 2, |r, c| 0.1 * (r + 1) as f64 - 0.3 * c as f64),
        joint_order: vec!["hip".into()],
        joint_residuals: DMatrix::zeros(6, 1),
        poses: DMatrix::from_element(3, 2, 0.5),
    })
    .expect("arrays are consistent")
}

/// Sum of squared marker residuals, with gradient `2 * r`.
fn squared_residuals() -> StateCallback {
    Box::new(|state: &mut FitterState| {
        let mut gradients = StateGradients::zeros_like(state);
        gradients.marker_residuals = state.marker_residuals() * 2.0;
        state.set_gradients(gradients).expect("shapes match");
        state.marker_residuals().norm_squared()
    })
}

/// `pose[0] at timestep 0 - target`, with unit gradient on that entry.
fn pose_offset(target: f64) -> StateCallback {
    Box::new(move |state: &mut FitterState| {
        let mut gradients = StateGradients::zeros_like(state);
        gradients.poses[(0, 0)] = 1.0;
        state.set_gradients(gradients).expect("shapes match");
        state.poses()[(0, 0)] - target
    })
}

fn constant(value: f64) -> StateCallback {
    Box::new(move |_: &mut FitterState| value)
}

#[test]
fn drives_residuals_to_zero() {
    let mut fitter = DescentFitter::default();
    fitter.set_custom_loss_and_grad(squared_residuals());

    let mut state = state();
    let solution = fitter.fit_unobserved(&mut state).expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert!(solution.objective < 1e-10);
    for &r in state.marker_residuals().iter() {
        assert_relative_eq!(r, 0.0, epsilon = 1e-5);
    }
    // Arrays the loss ignores do not move.
    assert_eq!(state.poses(), &DMatrix::from_element(3, 2, 0.5));
}

#[test]
fn zero_constraint_pulls_value_to_target() {
    let mut fitter = DescentFitter::default();
    fitter.add_zero_constraint("pose", pose_offset(1.25));

    let mut state = state();
    let solution = fitter.fit_unobserved(&mut state).expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(state.poses()[(0, 0)], 1.25, epsilon = 1e-5);
    assert_relative_eq!(state.poses()[(0, 1)], 0.5);
}

#[test]
fn loss_and_constraint_combine() {
    // Quadratic loss on the residuals, constraint on one pose entry.
    let mut fitter = DescentFitter::default();
    fitter.set_custom_loss_and_grad(squared_residuals());
    fitter.add_zero_constraint("pose", pose_offset(-0.5));

    let mut state = state();
    let solution = fitter.fit_unobserved(&mut state).expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_relative_eq!(state.poses()[(0, 0)], -0.5, epsilon = 1e-5);
    assert_relative_eq!(state.marker_residuals()[(5, 1)], 0.0, epsilon = 1e-5);
}

#[test]
fn nothing_registered_is_an_error() {
    let fitter = DescentFitter::default();
    let mut state = state();

    assert_eq!(fitter.fit_unobserved(&mut state), Err(Error::NoObjective));
}

#[test]
fn non_finite_objective_is_divergence() {
    let mut fitter = DescentFitter::default();
    fitter.set_custom_loss_and_grad(constant(f64::NAN));

    let mut state = state();
    assert_eq!(
        fitter.fit_unobserved(&mut state),
        Err(Error::Diverged { iter: 0 })
    );
}

#[test]
fn stationary_start_converges_without_stepping() {
    let mut fitter = DescentFitter::default();
    fitter.set_custom_loss_and_grad(constant(2.0));

    let mut state = state();
    let before = state.clone();
    let solution = fitter.fit_unobserved(&mut state).expect("should converge");

    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.iters, 0);
    assert_relative_eq!(solution.objective, 2.0);
    assert_eq!(state, before);
}

#[test]
fn observer_can_stop_early() {
    let mut fitter = DescentFitter::default();
    fitter.set_custom_loss_and_grad(squared_residuals());

    let mut seen = Vec::new();
    let observer = |event: &Event<'_>| {
        seen.push(event.objective);
        (event.iter == 3).then_some(Action::StopEarly)
    };

    let mut state = state();
    let solution = fitter.fit(&mut state, observer).expect("should stop");

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iters, 3);
    assert_eq!(seen.len(), 3);
    assert!(seen.windows(2).all(|pair| pair[1] < pair[0]));
    assert_relative_eq!(solution.objective, seen[2]);
}

#[test]
fn events_describe_the_stepped_state() {
    let mut fitter = DescentFitter::default();
    fitter.set_custom_loss_and_grad(squared_residuals());

    let observer = |event: &Event<'_>| {
        assert_relative_eq!(
            event.objective,
            event.state.marker_residuals().norm_squared()
        );
        assert_relative_eq!(
            event.gradient_norm,
            2.0 * event.state.marker_residuals().norm()
        );
        None
    };

    let mut state = state();
    fitter.fit(&mut state, observer).expect("should converge");
}

#[test]
fn stops_at_iteration_limit() {
    let config = Config::new(5, 0.1, 1e-12, 1e-10, 1.0).unwrap();
    let mut fitter = DescentFitter::new(config);
    fitter.set_custom_loss_and_grad(squared_residuals());

    let mut state = state();
    let solution = fitter.fit_unobserved(&mut state).expect("should run");

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.iters, 5);
    // Each step scales residuals by 1 - 2 * 0.1.
    assert_relative_eq!(
        state.marker_residuals()[(2, 0)],
        0.3 * 0.8_f64.powi(5),
        epsilon = 1e-12
    );
}

#[test]
fn unregistered_constraint_evaluates_to_none() {
    let mut fitter = DescentFitter::default();
    fitter.add_zero_constraint("floor", pose_offset(0.0));
    fitter.remove_zero_constraint("floor");
    fitter.remove_zero_constraint("floor");

    let mut state = state();
    assert_eq!(fitter.evaluate_zero_constraint("floor", &mut state), None);
    assert_eq!(fitter.evaluate_custom_loss(&mut state), None);
    assert!(state.gradients().is_zero());
}

#[test]
fn constraints_keep_registration_order() {
    let mut fitter = DescentFitter::default();
    fitter.add_zero_constraint("b", constant(1.0));
    fitter.add_zero_constraint("a", constant(2.0));
    fitter.add_zero_constraint("b", constant(3.0));

    let mut state = state();
    assert_eq!(fitter.constraint_names().collect::<Vec<_>>(), ["b", "a"]);
    assert_eq!(fitter.evaluate_zero_constraint("b", &mut state), Some(3.0));
}

#[test]
fn config_rejects_invalid_values() {
    assert_eq!(
        Config::new(10, 0.0, 1e-12, 1e-10, 1.0),
        Err(ConfigError::StepSize)
    );
    assert_eq!(
        Config::new(10, 0.1, -1.0, 1e-10, 1.0),
        Err(ConfigError::ObjectiveTol)
    );
    assert_eq!(
        Config::new(10, 0.1, 1e-12, f64::NAN, 1.0),
        Err(ConfigError::GradientTol)
    );
    assert_eq!(
        Config::new(10, 0.1, 1e-12, 1e-10, f64::INFINITY),
        Err(ConfigError::ConstraintWeight)
    );
    assert_eq!(Config::default().max_iters(), 100);
}
