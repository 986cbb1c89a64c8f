/// Actions an observer can take during gradient descent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current step and report the state as it stands.
    StopEarly,
}
