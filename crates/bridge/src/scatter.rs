use std::ops::Range;

use markerfit_autodiff::{Gradients, TapeError, Var};
use markerfit_core::{POINT_DIM, StateGradients};
use nalgebra::DMatrix;

use crate::{NamedVectors, OptimizationSnapshot, bind::timestep_rows};

impl<'t> OptimizationSnapshot<'t> {
    /// Differentiates `loss` and writes each parameter's gradient into its column.
    ///
    /// The result is shaped like the bound state. Entries for parameters the
    /// loss does not touch, and for markers left unbound because they were not
    /// observed, are zero.
    ///
    /// # Errors
    ///
    /// Returns a [`TapeError`] if `loss` was not recorded on this snapshot's
    /// tape or if the tape was already differentiated.
    pub fn scatter_gradients(&self, loss: Var<'t>) -> Result<StateGradients, TapeError> {
        let grads = self.tape.gradients(loss)?;
        let state = self.state;
        let mut out = StateGradients::zeros_like(state);

        let scale_rows = 0..state.body_scales().nrows();
        scatter_columns(
            &grads,
            &self.body_scales,
            state.body_names(),
            &mut out.body_scales,
            &scale_rows,
        );
        scatter_columns(
            &grads,
            &self.marker_offsets,
            state.marker_order(),
            &mut out.marker_offsets,
            &(0..POINT_DIM),
        );

        for t in 0..self.timesteps() {
            let rows = timestep_rows(t);
            scatter_columns(
                &grads,
                &self.marker_residuals[t],
                state.marker_order(),
                &mut out.marker_residuals,
                &rows,
            );
            scatter_columns(
                &grads,
                &self.joint_residuals[t],
                state.joint_order(),
                &mut out.joint_residuals,
                &rows,
            );
        }

        for (t, pose) in self.poses.iter().enumerate() {
            out.poses
                .column_mut(t)
                .iter_mut()
                .zip(grads.wrt_vec(pose))
                .for_each(|(slot, g)| *slot = g);
        }

        Ok(out)
    }
}

fn scatter_columns(
    grads: &Gradients,
    bound: &NamedVectors<'_>,
    names: &[String],
    target: &mut DMatrix<f64>,
    rows: &Range<usize>,
) {
    for (col, name) in names.iter().enumerate() {
        let Some(vector) = bound.get(name) else {
            continue;
        };
        let mut column = target.column_mut(col);
        for (row, g) in rows.clone().zip(grads.wrt_vec(vector)) {
            column[row] = g;
        }
    }
}
