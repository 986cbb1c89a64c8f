use std::collections::HashSet;

use nalgebra::DMatrix;

use crate::{ParameterKind, StateError, StateGradients};

/// Rows a marker or joint occupies per timestep, and rows of a marker offset.
pub const POINT_DIM: usize = 3;

/// The raw positional arrays a fitter reports for one iteration.
///
/// Columns are keyed by position to the matching name list, so the name lists
/// are the single source of truth for which column belongs to which entity.
#[derive(Debug, Clone, PartialEq)]
pub struct StateArrays {
    /// Body names, one per column of `body_scales`.
    pub body_names: Vec<String>,

    /// Scale factors: rows are scale dimensions, columns are bodies.
    pub body_scales: DMatrix<f64>,

    /// Marker names, one per column of the marker arrays.
    pub marker_order: Vec<String>,

    /// Marker offsets: 3 rows, one column per marker.
    pub marker_offsets: DMatrix<f64>,

    /// Marker residuals: 3 rows per timestep, one column per marker.
    pub marker_residuals: DMatrix<f64>,

    /// Joint names, one per column of `joint_residuals`.
    pub joint_order: Vec<String>,

    /// Joint residuals: 3 rows per timestep, one column per joint.
    pub joint_residuals: DMatrix<f64>,

    /// Generalized coordinates: one column per timestep.
    pub poses: DMatrix<f64>,
}

/// One iteration of a marker fitter: value arrays in, gradient arrays out.
///
/// A `FitterState` is always shape-consistent. Every check happens in
/// [`FitterState::new`], so code that binds or scatters against a state can
/// index it without further validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FitterState {
    arrays: StateArrays,
    visibility: Option<DMatrix<bool>>,
    gradients: StateGradients,
}

impl FitterState {
    /// Builds a state from raw arrays, checking every shape against the name lists.
    ///
    /// The timestep count is the number of pose columns.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] if a name list has duplicates, or if any array's
    /// row or column count disagrees with its names or with the timestep count.
    pub fn new(arrays: StateArrays) -> Result<Self, StateError> {
        let timesteps = arrays.poses.ncols();

        check_unique(ParameterKind::BodyScales, &arrays.body_names)?;
        check_unique(ParameterKind::MarkerOffsets, &arrays.marker_order)?;
        check_unique(ParameterKind::JointResiduals, &arrays.joint_order)?;

        check_columns(
            ParameterKind::BodyScales,
            &arrays.body_scales,
            arrays.body_names.len(),
        )?;
        check_columns(
            ParameterKind::MarkerOffsets,
            &arrays.marker_offsets,
            arrays.marker_order.len(),
        )?;
        check_rows(ParameterKind::MarkerOffsets, &arrays.marker_offsets, POINT_DIM)?;
        check_columns(
            ParameterKind::MarkerResiduals,
            &arrays.marker_residuals,
            arrays.marker_order.len(),
        )?;
        check_rows(
            ParameterKind::MarkerResiduals,
            &arrays.marker_residuals,
            POINT_DIM * timesteps,
        )?;
        check_columns(
            ParameterKind::JointResiduals,
            &arrays.joint_residuals,
            arrays.joint_order.len(),
        )?;
        check_rows(
            ParameterKind::JointResiduals,
            &arrays.joint_residuals,
            POINT_DIM * timesteps,
        )?;

        let gradients = StateGradients::zeros_for(&arrays);
        Ok(Self {
            arrays,
            visibility: None,
            gradients,
        })
    }

    /// Attaches a marker visibility mask (rows are timesteps, columns are markers).
    ///
    /// A `false` entry means the marker was not observed at that timestep.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::VisibilityShape`] if the mask is not
    /// timesteps x markers.
    pub fn with_marker_visibility(mut self, mask: DMatrix<bool>) -> Result<Self, StateError> {
        let expected = (self.timesteps(), self.arrays.marker_order.len());
        let found = mask.shape();
        if found != expected {
            return Err(StateError::VisibilityShape { expected, found });
        }
        self.visibility = Some(mask);
        Ok(self)
    }

    /// Returns the number of timesteps.
    #[must_use]
    pub fn timesteps(&self) -> usize {
        self.arrays.poses.ncols()
    }

    /// Returns the body names in column order.
    #[must_use]
    pub fn body_names(&self) -> &[String] {
        &self.arrays.body_names
    }

    /// Returns the marker names in column order.
    #[must_use]
    pub fn marker_order(&self) -> &[String] {
        &self.arrays.marker_order
    }

    /// Returns the joint names in column order.
    #[must_use]
    pub fn joint_order(&self) -> &[String] {
        &self.arrays.joint_order
    }

    #[must_use]
    pub fn body_scales(&self) -> &DMatrix<f64> {
        &self.arrays.body_scales
    }

    #[must_use]
    pub fn marker_offsets(&self) -> &DMatrix<f64> {
        &self.arrays.marker_offsets
    }

    #[must_use]
    pub fn marker_residuals(&self) -> &DMatrix<f64> {
        &self.arrays.marker_residuals
    }

    #[must_use]
    pub fn joint_residuals(&self) -> &DMatrix<f64> {
        &self.arrays.joint_residuals
    }

    #[must_use]
    pub fn poses(&self) -> &DMatrix<f64> {
        &self.arrays.poses
    }

    /// Returns the value array for a parameter kind.
    #[must_use]
    pub fn values(&self, kind: ParameterKind) -> &DMatrix<f64> {
        match kind {
            ParameterKind::BodyScales => &self.arrays.body_scales,
            ParameterKind::MarkerOffsets => &self.arrays.marker_offsets,
            ParameterKind::MarkerResiduals => &self.arrays.marker_residuals,
            ParameterKind::JointResiduals => &self.arrays.joint_residuals,
            ParameterKind::Poses => &self.arrays.poses,
        }
    }

    /// Returns the values of a parameter kind as a mutable column-major slice.
    ///
    /// Only the values can change; the shape is fixed for the life of the state.
    pub fn values_mut(&mut self, kind: ParameterKind) -> &mut [f64] {
        let matrix = match kind {
            ParameterKind::BodyScales => &mut self.arrays.body_scales,
            ParameterKind::MarkerOffsets => &mut self.arrays.marker_offsets,
            ParameterKind::MarkerResiduals => &mut self.arrays.marker_residuals,
            ParameterKind::JointResiduals => &mut self.arrays.joint_residuals,
            ParameterKind::Poses => &mut self.arrays.poses,
        };
        matrix.as_mut_slice()
    }

    /// Returns whether a marker (by column index) was observed at `timestep`.
    ///
    /// Without a visibility mask every marker is observed.
    #[must_use]
    pub fn is_marker_observed(&self, timestep: usize, marker: usize) -> bool {
        self.visibility
            .as_ref()
            .is_none_or(|mask| mask[(timestep, marker)])
    }

    /// Returns the gradients most recently written by a callback.
    #[must_use]
    pub fn gradients(&self) -> &StateGradients {
        &self.gradients
    }

    /// Stores gradients for the fitter to read back.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::GradientShape`] if any gradient array's shape
    /// differs from the matching value array. The stored gradients are left
    /// unchanged in that case.
    pub fn set_gradients(&mut self, gradients: StateGradients) -> Result<(), StateError> {
        for kind in ParameterKind::ALL {
            let expected = self.values(kind).shape();
            let found = gradients.get(kind).shape();
            if found != expected {
                return Err(StateError::GradientShape {
                    kind,
                    expected,
                    found,
                });
            }
        }
        self.gradients = gradients;
        Ok(())
    }

    /// Resets every gradient array to zero.
    pub fn clear_gradients(&mut self) {
        self.gradients = StateGradients::zeros_for(&self.arrays);
    }

    /// Consumes the state, returning its arrays.
    #[must_use]
    pub fn into_arrays(self) -> StateArrays {
        self.arrays
    }
}

fn check_unique(kind: ParameterKind, names: &[String]) -> Result<(), StateError> {
    let mut seen = HashSet::with_capacity(names.len());
    match names.iter().find(|name| !seen.insert(name.as_str())) {
        Some(name) => Err(StateError::DuplicateName {
            kind,
            name: name.clone(),
        }),
        None => Ok(()),
    }
}

fn check_columns(
    kind: ParameterKind,
    matrix: &DMatrix<f64>,
    names: usize,
) -> Result<(), StateError> {
    if matrix.ncols() == names {
        Ok(())
    } else {
        Err(StateError::ColumnCount {
            kind,
            names,
            columns: matrix.ncols(),
        })
    }
}

fn check_rows(kind: ParameterKind, matrix: &DMatrix<f64>, expected: usize) -> Result<(), StateError> {
    if matrix.nrows() == expected {
        Ok(())
    } else {
        Err(StateError::RowCount {
            kind,
            expected,
            found: matrix.nrows(),
        })
    }
}
