use std::cell::{Cell, RefCell};
use std::ptr;

use crate::{Gradients, TapeError, Var, VarVec};

/// A recorded operation and the local partial derivative toward each parent.
#[derive(Debug, Clone, Copy)]
enum Node {
    Leaf,
    Unary {
        parent: usize,
        partial: f64,
    },
    Binary {
        lhs: usize,
        lhs_partial: f64,
        rhs: usize,
        rhs_partial: f64,
    },
}

/// An append-only record of operations, replayed backward to get gradients.
///
/// Values live in the [`Var`] handles; the tape keeps only the graph. Leaves
/// copy their value on creation, so later changes to the source data never
/// reach the tape.
#[derive(Debug, Default)]
pub struct Tape {
    nodes: RefCell<Vec<Node>>,
    differentiated: Cell<bool>,
}

impl Tape {
    /// Creates an empty tape.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an independent variable.
    pub fn var(&self, value: f64) -> Var<'_> {
        let index = self.push(Node::Leaf);
        Var::new(self, index, value)
    }

    /// Records a constant.
    ///
    /// A constant is a leaf like any other; it just never gets asked for its
    /// gradient.
    pub fn constant(&self, value: f64) -> Var<'_> {
        self.var(value)
    }

    /// Records one independent variable per value.
    pub fn vector<I>(&self, values: I) -> VarVec<'_>
    where
        I: IntoIterator<Item = f64>,
    {
        let vars = values.into_iter().map(|value| self.var(value)).collect();
        VarVec::new(self, vars)
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Returns `true` once [`Tape::gradients`] has succeeded.
    #[must_use]
    pub fn is_differentiated(&self) -> bool {
        self.differentiated.get()
    }

    /// Runs the backward pass from `output`.
    ///
    /// # Errors
    ///
    /// Returns [`TapeError::ForeignVariable`] if `output` was recorded on a
    /// different tape, or [`TapeError::AlreadyDifferentiated`] if this tape
    /// has already been differentiated.
    pub fn gradients(&self, output: Var<'_>) -> Result<Gradients, TapeError> {
        if !ptr::eq(output.tape(), self) {
            return Err(TapeError::ForeignVariable);
        }
        if self.differentiated.replace(true) {
            return Err(TapeError::AlreadyDifferentiated);
        }

        let nodes = self.nodes.borrow();
        let mut adjoints = vec![0.0; nodes.len()];
        adjoints[output.index()] = 1.0;

        for index in (0..=output.index()).rev() {
            let adjoint = adjoints[index];
            if adjoint == 0.0 {
                continue;
            }
            match nodes[index] {
                Node::Leaf => {}
                Node::Unary { parent, partial } => {
                    adjoints[parent] += chain(adjoint, partial);
                }
                Node::Binary {
                    lhs,
                    lhs_partial,
                    rhs,
                    rhs_partial,
                } => {
                    adjoints[lhs] += chain(adjoint, lhs_partial);
                    adjoints[rhs] += chain(adjoint, rhs_partial);
                }
            }
        }

        Ok(Gradients::new(adjoints))
    }

    pub(crate) fn push_unary(&self, parent: usize, partial: f64) -> usize {
        self.push(Node::Unary { parent, partial })
    }

    pub(crate) fn push_binary(
        &self,
        (lhs, lhs_partial): (usize, f64),
        (rhs, rhs_partial): (usize, f64),
    ) -> usize {
        self.push(Node::Binary {
            lhs,
            lhs_partial,
            rhs,
            rhs_partial,
        })
    }

    fn push(&self, node: Node) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }
}

/// One chain-rule term. A zero partial contributes nothing, even when the
/// incoming adjoint is infinite.
fn chain(adjoint: f64, partial: f64) -> f64 {
    if partial == 0.0 { 0.0 } else { adjoint * partial }
}
