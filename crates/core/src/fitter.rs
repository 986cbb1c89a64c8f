use crate::FitterState;

/// A callback the fitter invokes with its current state.
///
/// The returned value is the loss (or constraint value) for the iteration.
/// Gradients travel back through [`FitterState::set_gradients`], not through
/// the return value.
pub type StateCallback = Box<dyn Fn(&mut FitterState) -> f64>;

/// Callback registration interface of a marker fitter.
///
/// Implementors own the optimization loop and call the registered callbacks
/// synchronously on their own stack, one at a time.
pub trait MarkerFitter {
    /// Replaces the custom loss evaluated on every iteration.
    fn set_custom_loss_and_grad(&mut self, loss: StateCallback);

    /// Registers a named constraint the fitter drives toward zero.
    ///
    /// Registering a name that already exists replaces the earlier callback.
    fn add_zero_constraint(&mut self, name: &str, constraint: StateCallback);

    /// Removes a named constraint.
    ///
    /// Removing a name that was never registered does nothing.
    fn remove_zero_constraint(&mut self, name: &str);
}
