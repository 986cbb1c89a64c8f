/// Receives solver events and decides how the iteration should proceed.
///
/// Observers let callers watch a fit or stop it without the solver knowing
/// anything about logging, plotting, or custom termination rules.
///
/// `Some(action)` requests a solver-specific action, `None` lets the solver
/// carry on. Closures implement `Observer` automatically, and `()` is a no-op
/// observer.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Stop {
        Now,
    }

    fn drive<Obs: Observer<usize, Stop>>(mut observer: Obs, events: usize) -> Option<usize> {
        (0..events).find(|event| observer.observe(event).is_some())
    }

    #[test]
    fn unit_observer_never_acts() {
        assert_eq!(drive((), 10), None);
    }

    #[test]
    fn closure_observer_can_stop() {
        let observer = |event: &usize| (*event == 3).then_some(Stop::Now);
        assert_eq!(drive(observer, 10), Some(3));
    }
}
