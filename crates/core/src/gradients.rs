use nalgebra::DMatrix;

use crate::{FitterState, ParameterKind, StateArrays};

/// Gradient arrays, each shaped like the matching [`FitterState`] value array.
#[derive(Debug, Clone, PartialEq)]
pub struct StateGradients {
    pub body_scales: DMatrix<f64>,
    pub marker_offsets: DMatrix<f64>,
    pub marker_residuals: DMatrix<f64>,
    pub joint_residuals: DMatrix<f64>,
    pub poses: DMatrix<f64>,
}

impl StateGradients {
    /// Returns freshly allocated all-zero gradients shaped like `state`.
    #[must_use]
    pub fn zeros_like(state: &FitterState) -> Self {
        let zeros = |kind| {
            let (rows, cols) = state.values(kind).shape();
            DMatrix::zeros(rows, cols)
        };
        Self {
            body_scales: zeros(ParameterKind::BodyScales),
            marker_offsets: zeros(ParameterKind::MarkerOffsets),
            marker_residuals: zeros(ParameterKind::MarkerResiduals),
            joint_residuals: zeros(ParameterKind::JointResiduals),
            poses: zeros(ParameterKind::Poses),
        }
    }

    pub(crate) fn zeros_for(arrays: &StateArrays) -> Self {
        let zeros = |m: &DMatrix<f64>| DMatrix::zeros(m.nrows(), m.ncols());
        Self {
            body_scales: zeros(&arrays.body_scales),
            marker_offsets: zeros(&arrays.marker_offsets),
            marker_residuals: zeros(&arrays.marker_residuals),
            joint_residuals: zeros(&arrays.joint_residuals),
            poses: zeros(&arrays.poses),
        }
    }

    /// Returns the gradient array for a parameter kind.
    #[must_use]
    pub fn get(&self, kind: ParameterKind) -> &DMatrix<f64> {
        match kind {
            ParameterKind::BodyScales => &self.body_scales,
            ParameterKind::MarkerOffsets => &self.marker_offsets,
            ParameterKind::MarkerResiduals => &self.marker_residuals,
            ParameterKind::JointResiduals => &self.joint_residuals,
            ParameterKind::Poses => &self.poses,
        }
    }

    /// Returns the gradient array for a parameter kind, mutably.
    pub fn get_mut(&mut self, kind: ParameterKind) -> &mut DMatrix<f64> {
        match kind {
            ParameterKind::BodyScales => &mut self.body_scales,
            ParameterKind::MarkerOffsets => &mut self.marker_offsets,
            ParameterKind::MarkerResiduals => &mut self.marker_residuals,
            ParameterKind::JointResiduals => &mut self.joint_residuals,
            ParameterKind::Poses => &mut self.poses,
        }
    }

    /// Returns `true` if every entry of every array is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        ParameterKind::ALL
            .iter()
            .all(|&kind| self.get(kind).iter().all(|&g| g == 0.0))
    }

    /// Returns the first kind holding a NaN or infinite entry, if any.
    #[must_use]
    pub fn first_non_finite(&self) -> Option<ParameterKind> {
        ParameterKind::ALL
            .into_iter()
            .find(|&kind| self.get(kind).iter().any(|g| !g.is_finite()))
    }

    /// Returns the squared Euclidean norm over all arrays.
    #[must_use]
    pub fn norm_squared(&self) -> f64 {
        ParameterKind::ALL
            .iter()
            .map(|&kind| self.get(kind).norm_squared())
            .sum()
    }

    /// Adds `scale * other` into `self`.
    ///
    /// # Panics
    ///
    /// Panics if `other` was shaped for a different state.
    pub fn add_scaled(&mut self, other: &Self, scale: f64) {
        for kind in ParameterKind::ALL {
            *self.get_mut(kind) += other.get(kind) * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn gradients() -> StateGradients {
        StateGradients {
            body_scales: DMatrix::from_element(3, 2, 1.0),
            marker_offsets: DMatrix::zeros(3, 1),
            marker_residuals: DMatrix::zeros(6, 1),
            joint_residuals: DMatrix::zeros(0, 0),
            poses: DMatrix::from_element(2, 2, -2.0),
        }
    }

    #[test]
    fn norm_squared_sums_every_kind() {
        // 6 ones plus 4 entries of -2.
        assert_relative_eq!(gradients().norm_squared(), 6.0 + 16.0);
    }

    #[test]
    fn add_scaled_accumulates() {
        let mut total = gradients();
        total.add_scaled(&gradients(), 0.5);

        assert_relative_eq!(total.body_scales[(2, 1)], 1.5);
        assert_relative_eq!(total.poses[(0, 0)], -3.0);
    }

    #[test]
    fn detects_non_finite_entries() {
        let mut g = gradients();
        assert_eq!(g.first_non_finite(), None);

        g.marker_residuals[(4, 0)] = f64::NAN;
        assert_eq!(g.first_non_finite(), Some(ParameterKind::MarkerResiduals));
    }
}
