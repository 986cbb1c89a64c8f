//! Fits a short two-body trial with a custom loss and a zero constraint.
//!
//! Run with `RUST_LOG=debug` to see every descent step, or `RUST_LOG=trace`
//! to also see each loss evaluation.

use markerfit_bridge::MarkerMocap;
use markerfit_core::{FitterState, StateArrays};
use markerfit_observers::History;
use markerfit_solvers::descent::{Config, DescentFitter};
use nalgebra::DMatrix;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Marker offsets are expected to sit this far from their body, in meters.
const NOMINAL_OFFSET: f64 = 0.02;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let mut state = trial()?;

    let mut mocap = MarkerMocap::new(DescentFitter::new(Config::new(
        200, 0.05, 1e-14, 1e-10, 10.0,
    )?));

    // Observed markers should explain the data; offsets should stay near nominal.
    mocap.set_custom_loss(|snapshot| {
        let tape = snapshot.tape();
        let mut loss = tape.constant(0.0);
        for t in 0..snapshot.timesteps() {
            let residuals = snapshot.marker_residuals(t).ok_or("timestep out of range")?;
            for (_, residual) in residuals.iter() {
                loss += residual.norm_squared();
            }
        }
        for (_, offset) in snapshot.marker_offsets().iter() {
            loss += (offset.norm() - NOMINAL_OFFSET).square() * 0.1;
        }
        Ok(loss)
    });

    // The two pelvis scale factors along x and y should match.
    mocap.add_zero_constraint("pelvis_symmetry", |snapshot| {
        let pelvis = snapshot.body_scale("pelvis").ok_or("no pelvis body")?;
        Ok(pelvis[0] - pelvis[1])
    });

    let mut history = History::new();
    let solution = mocap.fitter().fit(&mut state, &mut history)?;

    info!(
        status = ?solution.status,
        objective = solution.objective,
        iters = solution.iters,
        "fit complete"
    );
    for record in history.records().iter().step_by(20) {
        info!(
            iter = record.iter,
            objective = record.objective,
            gradient_norm = record.gradient_norm,
            "progress"
        );
    }
    info!(pelvis = ?state.body_scales().column(0).as_slice(), "fitted pelvis scales");

    Ok(())
}

/// Two bodies, three markers (KNEE drops out at the last timestep), one joint.
fn trial() -> Result<FitterState, markerfit_core::StateError> {
    let timesteps = 3;
    let mut visibility = DMatrix::from_element(timesteps, 3, true);
    visibility[(2, 2)] = false;

    FitterState::new(StateArrays {
        body_names: vec!["pelvis".into(), "femur".into()],
        body_scales: DMatrix::from_row_slice(3, 2, &[1.05, 1.0, 0.95, 1.0, 1.0, 1.0]),
        marker_order: vec!["ASIS".into(), "PSIS".into(), "KNEE".into()],
        marker_offsets: DMatrix::from_fn(3, 3, |r, c| 0.01 * (1 + r + c) as f64),
        marker_residuals: DMatrix::from_fn(3 * timesteps, 3, |r, c| {
            0.004 * ((r + 2 * c) as f64).sin()
        }),
        joint_order: vec!["hip".into()],
        joint_residuals: DMatrix::zeros(3 * timesteps, 1),
        poses: DMatrix::from_fn(6, timesteps, |r, t| 0.05 * (r * t) as f64),
    })?
    .with_marker_visibility(visibility)
}
