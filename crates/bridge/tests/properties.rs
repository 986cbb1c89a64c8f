//! Shape, zero-fill, and ordering properties of bind and scatter.

use markerfit_autodiff::Tape;
use markerfit_bridge::OptimizationSnapshot;
use markerfit_core::{FitterState, ParameterKind, POINT_DIM, StateArrays};
use nalgebra::DMatrix;
use proptest::{collection::vec, prelude::*};

fn shuffled_names(prefix: &'static str, count: usize) -> impl Strategy<Value = Vec<String>> {
    Just((0..count).map(|i| format!("{prefix}{i}")).collect::<Vec<_>>()).prop_shuffle()
}

/// Trailing number of a generated name.
fn ordinal(name: &str) -> f64 {
    let digits = name.trim_start_matches(|c: char| c.is_alphabetic());
    digits.parse::<u32>().map(f64::from).unwrap_or(f64::NAN)
}

/// Consistent states of random size, with shuffled names and a random visibility mask.
fn states() -> impl Strategy<Value = FitterState> {
    (0..4usize, 0..4usize, 0..3usize, 0..4usize, 1..5usize, 1..4usize).prop_flat_map(
        |(bodies, markers, joints, timesteps, dofs, scale_rows)| {
            (
                shuffled_names("body", bodies),
                shuffled_names("marker", markers),
                shuffled_names("joint", joints),
                vec(0.5..2.0f64, scale_rows * bodies),
                vec(-1.0..1.0f64, POINT_DIM * markers),
                vec(-1.0..1.0f64, POINT_DIM * timesteps * markers),
                vec(-1.0..1.0f64, POINT_DIM * timesteps * joints),
                vec(-3.0..3.0f64, dofs * timesteps),
                vec(any::<bool>(), timesteps * markers),
            )
                .prop_map(
                    move |(
                        body_names,
                        marker_order,
                        joint_order,
                        scales,
                        offsets,
                        marker_residuals,
                        joint_residuals,
                        poses,
                        mask,
                    )| {
                        let arrays = StateArrays {
                            body_scales: DMatrix::from_vec(scale_rows, bodies, scales),
                            marker_offsets: DMatrix::from_vec(POINT_DIM, markers, offsets),
                            marker_residuals: DMatrix::from_vec(
                                POINT_DIM * timesteps,
                                markers,
                                marker_residuals,
                            ),
                            joint_residuals: DMatrix::from_vec(
                                POINT_DIM * timesteps,
                                joints,
                                joint_residuals,
                            ),
                            poses: DMatrix::from_vec(dofs, timesteps, poses),
                            body_names,
                            marker_order,
                            joint_order,
                        };
                        FitterState::new(arrays)
                            .and_then(|state| {
                                state.with_marker_visibility(DMatrix::from_vec(
                                    timesteps, markers, mask,
                                ))
                            })
                            .expect("generated arrays are consistent")
                    },
                )
        },
    )
}

proptest! {
    #[test]
    fn squared_loss_gradient_is_twice_each_bound_value(state in states()) {
        let tape = Tape::new();
        let snapshot = OptimizationSnapshot::bind(&tape, &state);

        let mut loss = tape.constant(0.0);
        for (_, v) in snapshot.body_scales().iter().chain(snapshot.marker_offsets().iter()) {
            loss += v.norm_squared();
        }
        for t in 0..snapshot.timesteps() {
            for (_, v) in snapshot.marker_residuals(t).unwrap().iter() {
                loss += v.norm_squared();
            }
            for (_, v) in snapshot.joint_residuals(t).unwrap().iter() {
                loss += v.norm_squared();
            }
        }
        for pose in snapshot.poses() {
            loss += pose.norm_squared();
        }

        let grads = snapshot.scatter_gradients(loss).unwrap();

        for kind in ParameterKind::ALL {
            prop_assert_eq!(grads.get(kind).shape(), state.values(kind).shape());
        }
        for kind in [
            ParameterKind::BodyScales,
            ParameterKind::MarkerOffsets,
            ParameterKind::JointResiduals,
            ParameterKind::Poses,
        ] {
            prop_assert_eq!(grads.get(kind), &(state.values(kind) * 2.0));
        }
        for t in 0..state.timesteps() {
            for marker in 0..state.marker_order().len() {
                let expected_scale = if state.is_marker_observed(t, marker) { 2.0 } else { 0.0 };
                for row in t * POINT_DIM..(t + 1) * POINT_DIM {
                    prop_assert_eq!(
                        grads.marker_residuals[(row, marker)],
                        expected_scale * state.marker_residuals()[(row, marker)]
                    );
                }
            }
        }
    }

    #[test]
    fn gradients_follow_fitter_column_order(state in states()) {
        // Weight each body and marker by the number in its name, whatever its column.
        let tape = Tape::new();
        let snapshot = OptimizationSnapshot::bind(&tape, &state);

        let mut loss = tape.constant(0.0);
        for (name, v) in snapshot.body_scales().iter().chain(snapshot.marker_offsets().iter()) {
            loss += v.sum() * ordinal(name);
        }

        let grads = snapshot.scatter_gradients(loss).unwrap();

        for (col, name) in state.body_names().iter().enumerate() {
            prop_assert!(grads.body_scales.column(col).iter().all(|&g| g == ordinal(name)));
        }
        for (col, name) in state.marker_order().iter().enumerate() {
            prop_assert!(grads.marker_offsets.column(col).iter().all(|&g| g == ordinal(name)));
        }
    }

    #[test]
    fn untouched_parameters_are_zero_filled(state in states(), timestep in 0..3usize) {
        // Only poses at one timestep enter the loss.
        let tape = Tape::new();
        let snapshot = OptimizationSnapshot::bind(&tape, &state);
        let t = (snapshot.timesteps() > 0).then(|| timestep % snapshot.timesteps());

        let loss = match t {
            Some(t) => snapshot.pose(t).unwrap().sum(),
            None => tape.constant(1.0),
        };
        let grads = snapshot.scatter_gradients(loss).unwrap();

        for kind in [
            ParameterKind::BodyScales,
            ParameterKind::MarkerOffsets,
            ParameterKind::MarkerResiduals,
            ParameterKind::JointResiduals,
        ] {
            prop_assert!(grads.get(kind).iter().all(|&g| g == 0.0));
        }
        for (col, column) in grads.poses.column_iter().enumerate() {
            let expected = if Some(col) == t { 1.0 } else { 0.0 };
            prop_assert!(column.iter().all(|&g| g == expected));
        }
    }
}
