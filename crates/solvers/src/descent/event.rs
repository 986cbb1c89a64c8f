use markerfit_core::FitterState;

/// Emitted after every descent step.
///
/// `objective` and `gradient_norm` describe `state` after the step.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Step number, starting at 1.
    pub iter: usize,

    /// Combined objective: loss plus weighted squared constraints.
    pub objective: f64,

    /// Euclidean norm of the combined gradient over every array.
    pub gradient_norm: f64,

    /// The state after the step.
    pub state: &'a FitterState,
}
