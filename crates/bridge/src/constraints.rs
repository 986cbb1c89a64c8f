use std::rc::Rc;

use indexmap::IndexMap;
use markerfit_core::FitterState;

use crate::LossAdapter;

/// Named zero constraints, kept in registration order.
#[derive(Debug, Default)]
pub struct ZeroConstraints {
    entries: IndexMap<String, Rc<LossAdapter>>,
}

impl ZeroConstraints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constraint, returning the one it replaces.
    ///
    /// A replaced name keeps its original position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        constraint: Rc<LossAdapter>,
    ) -> Option<Rc<LossAdapter>> {
        self.entries.insert(name.into(), constraint)
    }

    /// Removes a constraint. Removing an unknown name is a no-op.
    pub fn remove(&mut self, name: &str) -> Option<Rc<LossAdapter>> {
        self.entries.shift_remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Rc<LossAdapter>> {
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

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Evaluates the named constraint against `state`.
    ///
    /// Returns `None` if no constraint has that name.
    pub fn evaluate(&self, name: &str, state: &mut FitterState) -> Option<f64> {
        self.get(name).map(|constraint| constraint.evaluate(state))
    }
}
