use std::ops::Range;

use markerfit_autodiff::Tape;
use markerfit_core::{FitterState, POINT_DIM};
use nalgebra::DMatrix;

use crate::{NamedVectors, OptimizationSnapshot};

impl<'t> OptimizationSnapshot<'t> {
    /// Records every parameter of `state` on `tape` and keys it by name.
    ///
    /// Values are copied onto the tape, so the snapshot never sees later
    /// edits to `state`. Marker residuals for markers not observed at a
    /// timestep are left out of that timestep's map.
    #[must_use]
    pub fn bind(tape: &'t Tape, state: &'t FitterState) -> Self {
        let timesteps = state.timesteps();
        let scale_rows = 0..state.body_scales().nrows();
        let offset_rows = 0..POINT_DIM;

        let body_scales = bind_columns(
            tape,
            state.body_names(),
            state.body_scales(),
            scale_rows,
            |_| true,
        );
        let marker_offsets = bind_columns(
            tape,
            state.marker_order(),
            state.marker_offsets(),
            offset_rows,
            |_| true,
        );

        let marker_residuals = (0..timesteps)
            .map(|t| {
                bind_columns(
                    tape,
                    state.marker_order(),
                    state.marker_residuals(),
                    timestep_rows(t),
                    |marker| state.is_marker_observed(t, marker),
                )
            })
            .collect();

        let joint_residuals = (0..timesteps)
            .map(|t| {
                bind_columns(
                    tape,
                    state.joint_order(),
                    state.joint_residuals(),
                    timestep_rows(t),
                    |_| true,
                )
            })
            .collect();

        let poses = state
            .poses()
            .column_iter()
            .map(|column| tape.vector(column.iter().copied()))
            .collect();

        Self {
            tape,
            state,
            body_scales,
            marker_offsets,
            marker_residuals,
            joint_residuals,
            poses,
        }
    }
}

/// Rows of a per-timestep residual array that belong to `timestep`.
pub(crate) fn timestep_rows(timestep: usize) -> Range<usize> {
    let start = timestep * POINT_DIM;
    start..start + POINT_DIM
}

fn bind_columns<'t>(
    tape: &'t Tape,
    names: &'t [String],
    matrix: &DMatrix<f64>,
    rows: Range<usize>,
    mut include: impl FnMut(usize) -> bool,
) -> NamedVectors<'t> {
    let mut bound = NamedVectors::with_capacity(names.len());
    for (col, name) in names.iter().enumerate() {
        if !include(col) {
            continue;
        }
        let column = matrix.column(col);
        let values = column.rows(rows.start, rows.len());
        bound.insert(name, tape.vector(values.iter().copied()));
    }
    bound
}
