use crate::{Var, VarVec};

/// Adjoints produced by one backward pass over a [`Tape`](crate::Tape).
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    adjoints: Vec<f64>,
}

impl Gradients {
    pub(crate) fn new(adjoints: Vec<f64>) -> Self {
        Self { adjoints }
    }

    /// Returns the derivative of the differentiated output with respect to `var`.
    ///
    /// Variables recorded after the output, or not reached by it, yield zero.
    /// `var` must come from the tape these gradients were computed on.
    #[must_use]
    pub fn wrt(&self, var: Var<'_>) -> f64 {
        self.adjoints.get(var.index()).copied().unwrap_or(0.0)
    }

    /// Returns the derivative with respect to each element of `vars`, in order.
    #[must_use]
    pub fn wrt_vec(&self, vars: &VarVec<'_>) -> Vec<f64> {
        vars.iter().map(|var| self.wrt(var)).collect()
    }

    /// Returns the number of tape entries covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adjoints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adjoints.is_empty()
    }
}
