use markerfit_core::{FitterState, StateArrays};
use nalgebra::DMatrix;

/// Pelvis and femur, three markers, one joint, two timesteps, four dofs.
pub(crate) fn scenario_arrays() -> StateArrays {
    StateArrays {
        body_names: vec!["pelvis".into(), "femur".into()],
        body_scales: DMatrix::from_row_slice(3, 2, &[1.0, 1.1, 1.0, 1.1, 1.0, 1.1]),
        marker_order: vec!["ASIS".into(), "PSIS".into(), "KNEE".into()],
        marker_offsets: DMatrix::from_fn(3, 3, |r, c| 0.01 * (1 + r + 3 * c) as f64),
        marker_residuals: DMatrix::from_fn(6, 3, |r, c| 0.1 * (r + 1) as f64 - 0.05 * c as f64),
        joint_order: vec!["hip".into()],
        joint_residuals: DMatrix::from_element(6, 1, 0.5),
        poses: DMatrix::from_fn(4, 2, |r, c| 0.2 * r as f64 - 0.1 * c as f64),
    }
}

pub(crate) fn scenario_state() -> FitterState {
    FitterState::new(scenario_arrays()).expect("scenario arrays are consistent")
}

/// The scenario state with KNEE missing at timestep 1.
pub(crate) fn masked_state() -> FitterState {
    let mask = DMatrix::from_row_slice(2, 3, &[true, true, true, true, true, false]);
    scenario_state()
        .with_marker_visibility(mask)
        .expect("mask is timesteps x markers")
}
