use markerfit_core::Observer;

use crate::traits::{CanStopEarly, HasObjective};

/// Stops a solver once the objective drops below a threshold.
///
/// The first `min_iters` events are never acted on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveBelow {
    threshold: f64,
    min_iters: usize,
    seen: usize,
}

impl ObjectiveBelow {
    #[must_use]
    pub fn new(threshold: f64, min_iters: usize) -> Self {
        Self {
            threshold,
            min_iters,
            seen: 0,
        }
    }

    /// Returns how many events have been observed.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl<E: HasObjective, A: CanStopEarly> Observer<E, A> for ObjectiveBelow {
    fn observe(&mut self, event: &E) -> Option<A> {
        self.seen += 1;
        (self.seen >= self.min_iters && event.objective() < self.threshold).then(A::stop_early)
    }
}
