use markerfit_core::Observer;

use crate::traits::{HasGradientNorm, HasObjective};

/// One observed event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Event number, starting at 1.
    pub iter: usize,
    pub objective: f64,
    pub gradient_norm: f64,
}

/// Records the objective and gradient norm of every event it sees.
///
/// Never acts, so it can observe any solver whose events expose both values.
/// Pass `&mut history` to keep the records after the solver returns.
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<Record>,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if the objective never increased between events.
    #[must_use]
    pub fn is_monotone(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[1].objective <= pair[0].objective)
    }
}

impl<E, A> Observer<E, A> for History
where
    E: HasObjective + HasGradientNorm,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.records.push(Record {
            iter: self.records.len() + 1,
            objective: event.objective(),
            gradient_norm: event.gradient_norm(),
        });
        None
    }
}

impl<E, A> Observer<E, A> for &mut History
where
    E: HasObjective + HasGradientNorm,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        (*self).observe(event)
    }
}
