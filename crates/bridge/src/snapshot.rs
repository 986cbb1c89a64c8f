use indexmap::IndexMap;
use markerfit_autodiff::{Tape, VarVec};
use markerfit_core::FitterState;

/// Differentiable vectors keyed by entity name, in the fitter's column order.
#[derive(Debug, Clone, Default)]
pub struct NamedVectors<'t> {
    entries: IndexMap<&'t str, VarVec<'t>>,
}

impl<'t> NamedVectors<'t> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, name: &'t str, vector: VarVec<'t>) {
        self.entries.insert(name, vector);
    }

    /// Returns the vector bound for `name`, if it is present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VarVec<'t>> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the bound names in fitter order.
    pub fn names(&self) -> impl Iterator<Item = &'t str> + '_ {
        self.entries.keys().copied()
    }

    /// Returns `(name, vector)` pairs in fitter order.
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, &VarVec<'t>)> + '_ {
        self.entries.iter().map(|(name, vector)| (*name, vector))
    }
}

/// One fitter iteration viewed as named differentiable parameters.
///
/// Built by [`OptimizationSnapshot::bind`], read by a loss function, and
/// finished by [`OptimizationSnapshot::scatter_gradients`]. Every variable
/// lives on the same tape, which can be differentiated only once, so a
/// snapshot yields gradients at most once.
#[derive(Debug)]
pub struct OptimizationSnapshot<'t> {
    pub(crate) tape: &'t Tape,
    pub(crate) state: &'t FitterState,
    pub(crate) body_scales: NamedVectors<'t>,
    pub(crate) marker_offsets: NamedVectors<'t>,
    pub(crate) marker_residuals: Vec<NamedVectors<'t>>,
    pub(crate) joint_residuals: Vec<NamedVectors<'t>>,
    pub(crate) poses: Vec<VarVec<'t>>,
}

impl<'t> OptimizationSnapshot<'t> {
    /// Returns the tape the parameters are recorded on.
    ///
    /// Use it to create constants that take part in a loss.
    #[must_use]
    pub fn tape(&self) -> &'t Tape {
        self.tape
    }

    /// Returns the raw fitter state the snapshot was bound from.
    #[must_use]
    pub fn state(&self) -> &'t FitterState {
        self.state
    }

    #[must_use]
    pub fn timesteps(&self) -> usize {
        self.poses.len()
    }

    /// Returns `true` once gradients have been harvested.
    #[must_use]
    pub fn is_differentiated(&self) -> bool {
        self.tape.is_differentiated()
    }

    #[must_use]
    pub fn body_scales(&self) -> &NamedVectors<'t> {
        &self.body_scales
    }

    #[must_use]
    pub fn body_scale(&self, body: &str) -> Option<&VarVec<'t>> {
        self.body_scales.get(body)
    }

    #[must_use]
    pub fn marker_offsets(&self) -> &NamedVectors<'t> {
        &self.marker_offsets
    }

    #[must_use]
    pub fn marker_offset(&self, marker: &str) -> Option<&VarVec<'t>> {
        self.marker_offsets.get(marker)
    }

    /// Returns the marker residuals observed at `timestep`.
    ///
    /// Markers not observed at that timestep are absent from the map.
    #[must_use]
    pub fn marker_residuals(&self, timestep: usize) -> Option<&NamedVectors<'t>> {
        self.marker_residuals.get(timestep)
    }

    #[must_use]
    pub fn marker_residual(&self, timestep: usize, marker: &str) -> Option<&VarVec<'t>> {
        self.marker_residuals(timestep)?.get(marker)
    }

    #[must_use]
    pub fn joint_residuals(&self, timestep: usize) -> Option<&NamedVectors<'t>> {
        self.joint_residuals.get(timestep)
    }

    #[must_use]
    pub fn joint_residual(&self, timestep: usize, joint: &str) -> Option<&VarVec<'t>> {
        self.joint_residuals(timestep)?.get(joint)
    }

    /// Returns the generalized coordinates at `timestep`.
    #[must_use]
    pub fn pose(&self, timestep: usize) -> Option<&VarVec<'t>> {
        self.poses.get(timestep)
    }

    #[must_use]
    pub fn poses(&self) -> &[VarVec<'t>] {
        &self.poses
    }
}
