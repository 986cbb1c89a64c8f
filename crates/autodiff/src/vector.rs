use std::fmt;
use std::ops::Index;
use std::ptr;

use crate::{Tape, TapeError, Var};

/// A fixed-length vector of [`Var`]s recorded on one tape.
#[derive(Clone)]
pub struct VarVec<'t> {
    tape: &'t Tape,
    vars: Vec<Var<'t>>,
}

impl<'t> VarVec<'t> {
    pub(crate) fn new(tape: &'t Tape, vars: Vec<Var<'t>>) -> Self {
        Self { tape, vars }
    }

    /// Collects existing variables into a vector.
    ///
    /// # Panics
    ///
    /// Panics if any variable was recorded on a tape other than `tape`.
    #[must_use]
    pub fn from_vars(tape: &'t Tape, vars: Vec<Var<'t>>) -> Self {
        assert!(
            vars.iter().all(|var| ptr::eq(var.tape(), tape)),
            "cannot combine variables from different tapes"
        );
        Self::new(tape, vars)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<Var<'t>> {
        self.vars.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Var<'t>> + '_ {
        self.vars.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Var<'t>] {
        &self.vars
    }

    /// Returns the forward values.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.vars.iter().map(Var::value).collect()
    }

    /// Returns the sum of the elements; zero for an empty vector.
    #[must_use]
    pub fn sum(&self) -> Var<'t> {
        let mut iter = self.iter();
        match iter.next() {
            Some(first) => iter.fold(first, |acc, var| acc + var),
            None => self.tape.constant(0.0),
        }
    }

    /// Returns the squared Euclidean norm.
    #[must_use]
    pub fn norm_squared(&self) -> Var<'t> {
        self.map(Var::square).sum()
    }

    /// Returns the Euclidean norm, with a subgradient of zero at the origin.
    #[must_use]
    pub fn norm(&self) -> Var<'t> {
        let squared = self.norm_squared();
        if squared.value() == 0.0 {
            squared.unary(0.0, 0.0)
        } else {
            squared.sqrt()
        }
    }

    /// Returns the dot product.
    ///
    /// # Errors
    ///
    /// Returns [`TapeError::LengthMismatch`] if the lengths differ.
    pub fn dot(&self, other: &Self) -> Result<Var<'t>, TapeError> {
        Ok(self.zip_with(other, |a, b| a * b)?.sum())
    }

    /// Returns the element-wise sum.
    ///
    /// # Errors
    ///
    /// Returns [`TapeError::LengthMismatch`] if the lengths differ.
    pub fn add_vec(&self, other: &Self) -> Result<Self, TapeError> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Returns the element-wise difference.
    ///
    /// # Errors
    ///
    /// Returns [`TapeError::LengthMismatch`] if the lengths differ.
    pub fn sub_vec(&self, other: &Self) -> Result<Self, TapeError> {
        self.zip_with(other, |a, b| a - b)
    }

    /// Returns the element-wise difference from constant values.
    ///
    /// # Errors
    ///
    /// Returns [`TapeError::LengthMismatch`] if the lengths differ.
    pub fn sub_values(&self, values: &[f64]) -> Result<Self, TapeError> {
        check_lengths(self.len(), values.len())?;
        let vars = self.iter().zip(values).map(|(a, &b)| a - b).collect();
        Ok(Self::new(self.tape, vars))
    }

    /// Multiplies every element by a constant.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|var| var * factor)
    }

    /// Applies `f` to every element.
    #[must_use]
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(Var<'t>) -> Var<'t>,
    {
        Self::new(self.tape, self.iter().map(f).collect())
    }

    fn zip_with<F>(&self, other: &Self, mut f: F) -> Result<Self, TapeError>
    where
        F: FnMut(Var<'t>, Var<'t>) -> Var<'t>,
    {
        check_lengths(self.len(), other.len())?;
        let vars = self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect();
        Ok(Self::new(self.tape, vars))
    }
}

fn check_lengths(left: usize, right: usize) -> Result<(), TapeError> {
    if left == right {
        Ok(())
    } else {
        Err(TapeError::LengthMismatch { left, right })
    }
}

impl<'t> Index<usize> for VarVec<'t> {
    type Output = Var<'t>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vars[index]
    }
}

impl fmt::Debug for VarVec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.vars.iter()).finish()
    }
}
