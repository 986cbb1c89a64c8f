use std::rc::Rc;

use markerfit_core::MarkerFitter;
use tracing::debug;

use crate::{LossAdapter, LossResult, OptimizationSnapshot, ZeroConstraints};

const CUSTOM_LOSS_LABEL: &str = "custom loss";

/// A marker fitter together with the differentiable callbacks registered on it.
///
/// Each registration wraps the user function in a [`LossAdapter`], keeps a
/// handle to it, and hands the fitter a callback that shares that adapter.
#[derive(Debug)]
pub struct MarkerMocap<F> {
    fitter: F,
    custom_loss: Option<Rc<LossAdapter>>,
    zero_constraints: ZeroConstraints,
}

impl<F: MarkerFitter> MarkerMocap<F> {
    /// Wraps a fitter with no callbacks registered.
    pub fn new(fitter: F) -> Self {
        Self {
            fitter,
            custom_loss: None,
            zero_constraints: ZeroConstraints::new(),
        }
    }

    /// Installs `loss` as the fitter's custom loss, replacing any earlier one.
    pub fn set_custom_loss<L>(&mut self, loss: L)
    where
        L: for<'t> Fn(&OptimizationSnapshot<'t>) -> LossResult<'t> + 'static,
    {
        let adapter = Rc::new(LossAdapter::new(CUSTOM_LOSS_LABEL, loss));
        self.fitter
            .set_custom_loss_and_grad(Rc::clone(&adapter).into_callback());
        if self.custom_loss.replace(adapter).is_some() {
            debug!("replaced custom loss");
        }
    }

    /// Registers a named constraint the fitter drives toward zero.
    ///
    /// Reusing a name replaces the earlier constraint.
    pub fn add_zero_constraint<L>(&mut self, name: &str, constraint: L)
    where
        L: for<'t> Fn(&OptimizationSnapshot<'t>) -> LossResult<'t> + 'static,
    {
        let adapter = Rc::new(LossAdapter::new(name, constraint));
        self.fitter
            .add_zero_constraint(name, Rc::clone(&adapter).into_callback());
        if self.zero_constraints.insert(name, adapter).is_some() {
            debug!(name, "replaced zero constraint");
        }
    }

    /// Removes a named constraint from the fitter.
    ///
    /// Removing a name that is not registered does nothing.
    pub fn remove_zero_constraint(&mut self, name: &str) {
        if self.zero_constraints.remove(name).is_none() {
            debug!(name, "no zero constraint to remove");
        }
        self.fitter.remove_zero_constraint(name);
    }

    pub fn fitter(&self) -> &F {
        &self.fitter
    }

    pub fn fitter_mut(&mut self) -> &mut F {
        &mut self.fitter
    }

    pub fn into_fitter(self) -> F {
        self.fitter
    }

    /// Returns the adapter for the current custom loss, if one is set.
    pub fn custom_loss(&self) -> Option<&LossAdapter> {
        self.custom_loss.as_deref()
    }

    pub fn zero_constraints(&self) -> &ZeroConstraints {
        &self.zero_constraints
    }
}
