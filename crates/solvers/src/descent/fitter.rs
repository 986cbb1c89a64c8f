use std::fmt;

use indexmap::IndexMap;
use markerfit_core::{FitterState, MarkerFitter, Observer, StateCallback};
use tracing::debug;

use super::{Action, Config, Error, Event, Solution, search::search};

/// A gradient-descent marker fitter.
///
/// Holds at most one custom loss and any number of named zero constraints,
/// registered through [`MarkerFitter`]. Constraints are evaluated in
/// registration order.
pub struct DescentFitter {
    config: Config,
    pub(super) custom_loss: Option<StateCallback>,
    pub(super) zero_constraints: IndexMap<String, StateCallback>,
}

impl DescentFitter {
    /// Creates a fitter with no callbacks registered.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            custom_loss: None,
            zero_constraints: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn has_custom_loss(&self) -> bool {
        self.custom_loss.is_some()
    }

    /// Returns the registered constraint names in registration order.
    pub fn constraint_names(&self) -> impl Iterator<Item = &str> {
        self.zero_constraints.keys().map(String::as_str)
    }

    /// Calls the custom loss once against `state`.
    ///
    /// Returns `None` if no custom loss is registered.
    pub fn evaluate_custom_loss(&self, state: &mut FitterState) -> Option<f64> {
        let loss = self.custom_loss.as_ref()?;
        Some(loss(state))
    }

    /// Calls the named zero constraint once against `state`.
    ///
    /// Returns `None`, leaving `state` untouched, if no constraint has that name.
    pub fn evaluate_zero_constraint(&self, name: &str, state: &mut FitterState) -> Option<f64> {
        let constraint = self.zero_constraints.get(name)?;
        Some(constraint(state))
    }

    /// Runs gradient descent on `state` until it converges or stops.
    ///
    /// Every array of `state` is treated as a free variable and updated in
    /// place. The observer receives an [`Event`] after each step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoObjective`] if nothing is registered, or
    /// [`Error::Diverged`] if the objective becomes non-finite.
    pub fn fit<Obs>(&self, state: &mut FitterState, observer: Obs) -> Result<Solution, Error>
    where
        Obs: for<'a> Observer<Event<'a>, Action>,
    {
        search(self, state, observer)
    }

    /// Runs gradient descent without observer support.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`DescentFitter::fit`].
    pub fn fit_unobserved(&self, state: &mut FitterState) -> Result<Solution, Error> {
        self.fit(state, ())
    }
}

impl Default for DescentFitter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl MarkerFitter for DescentFitter {
    fn set_custom_loss_and_grad(&mut self, loss: StateCallback) {
        self.custom_loss = Some(loss);
    }

    fn add_zero_constraint(&mut self, name: &str, constraint: StateCallback) {
        self.zero_constraints.insert(name.to_owned(), constraint);
    }

    fn remove_zero_constraint(&mut self, name: &str) {
        if self.zero_constraints.shift_remove(name).is_none() {
            debug!(name, "zero constraint was not registered");
        }
    }
}

impl fmt::Debug for DescentFitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescentFitter")
            .field("config", &self.config)
            .field("has_custom_loss", &self.has_custom_loss())
            .field(
                "zero_constraints",
                &self.constraint_names().collect::<Vec<_>>(),
            )
            .finish()
    }
}
