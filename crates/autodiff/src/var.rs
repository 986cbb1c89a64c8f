use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use std::ptr;

use crate::Tape;

/// A scalar recorded on a [`Tape`].
///
/// `Var` is a cheap `Copy` handle: the value plus its position on the tape.
/// Arithmetic on vars records new entries; arithmetic with plain `f64`
/// treats the `f64` as a constant.
#[derive(Clone, Copy)]
pub struct Var<'t> {
    tape: &'t Tape,
    index: usize,
    value: f64,
}

impl<'t> Var<'t> {
    pub(crate) fn new(tape: &'t Tape, index: usize, value: f64) -> Self {
        Self { tape, index, value }
    }

    /// Returns the value computed in the forward pass.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns this variable's position on its tape.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the tape this variable was recorded on.
    #[must_use]
    pub fn tape(&self) -> &'t Tape {
        self.tape
    }

    #[must_use]
    pub fn square(self) -> Self {
        self.unary(self.value * self.value, 2.0 * self.value)
    }

    /// Integer power. `powi(0)` is constant, with zero slope everywhere.
    #[must_use]
    pub fn powi(self, n: i32) -> Self {
        let slope = if n == 0 {
            0.0
        } else {
            f64::from(n) * self.value.powi(n - 1)
        };
        self.unary(self.value.powi(n), slope)
    }

    #[must_use]
    pub fn powf(self, p: f64) -> Self {
        let slope = if p == 0.0 {
            0.0
        } else {
            p * self.value.powf(p - 1.0)
        };
        self.unary(self.value.powf(p), slope)
    }

    /// Square root. The derivative is infinite at zero.
    #[must_use]
    pub fn sqrt(self) -> Self {
        let root = self.value.sqrt();
        self.unary(root, 0.5 / root)
    }

    #[must_use]
    pub fn exp(self) -> Self {
        let e = self.value.exp();
        self.unary(e, e)
    }

    #[must_use]
    pub fn ln(self) -> Self {
        self.unary(self.value.ln(), 1.0 / self.value)
    }

    #[must_use]
    pub fn sin(self) -> Self {
        self.unary(self.value.sin(), self.value.cos())
    }

    #[must_use]
    pub fn cos(self) -> Self {
        self.unary(self.value.cos(), -self.value.sin())
    }

    #[must_use]
    pub fn tanh(self) -> Self {
        let t = self.value.tanh();
        self.unary(t, 1.0 - t * t)
    }

    /// Absolute value, with a subgradient of zero at zero.
    #[must_use]
    pub fn abs(self) -> Self {
        let slope = if self.value == 0.0 {
            0.0
        } else {
            self.value.signum()
        };
        self.unary(self.value.abs(), slope)
    }

    pub(crate) fn unary(self, value: f64, partial: f64) -> Self {
        let index = self.tape.push_unary(self.index, partial);
        Self::new(self.tape, index, value)
    }

    fn binary(self, rhs: Self, value: f64, lhs_partial: f64, rhs_partial: f64) -> Self {
        assert!(
            ptr::eq(self.tape, rhs.tape),
            "cannot combine variables from different tapes"
        );
        let index = self
            .tape
            .push_binary((self.index, lhs_partial), (rhs.index, rhs_partial));
        Self::new(self.tape, index, value)
    }
}

impl fmt::Debug for Var<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("index", &self.index)
            .field("value", &self.value)
            .finish()
    }
}

impl<'t> Add for Var<'t> {
    type Output = Var<'t>;

    fn add(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.value + rhs.value, 1.0, 1.0)
    }
}

impl<'t> Add<f64> for Var<'t> {
    type Output = Var<'t>;

    fn add(self, rhs: f64) -> Self::Output {
        self.unary(self.value + rhs, 1.0)
    }
}

impl<'t> Add<Var<'t>> for f64 {
    type Output = Var<'t>;

    fn add(self, rhs: Var<'t>) -> Self::Output {
        rhs.unary(self + rhs.value, 1.0)
    }
}

impl<'t> Sub for Var<'t> {
    type Output = Var<'t>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.value - rhs.value, 1.0, -1.0)
    }
}

impl<'t> Sub<f64> for Var<'t> {
    type Output = Var<'t>;

    fn sub(self, rhs: f64) -> Self::Output {
        self.unary(self.value - rhs, 1.0)
    }
}

impl<'t> Sub<Var<'t>> for f64 {
    type Output = Var<'t>;

    fn sub(self, rhs: Var<'t>) -> Self::Output {
        rhs.unary(self - rhs.value, -1.0)
    }
}

impl<'t> Mul for Var<'t> {
    type Output = Var<'t>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.binary(rhs, self.value * rhs.value, rhs.value, self.value)
    }
}

impl<'t> Mul<f64> for Var<'t> {
    type Output = Var<'t>;

    fn mul(self, rhs: f64) -> Self::Output {
        self.unary(self.value * rhs, rhs)
    }
}

impl<'t> Mul<Var<'t>> for f64 {
    type Output = Var<'t>;

    fn mul(self, rhs: Var<'t>) -> Self::Output {
        rhs.unary(self * rhs.value, self)
    }
}

impl<'t> Div for Var<'t> {
    type Output = Var<'t>;

    fn div(self, rhs: Self) -> Self::Output {
        let inv = 1.0 / rhs.value;
        self.binary(
            rhs,
            self.value * inv,
            inv,
            -self.value * inv * inv,
        )
    }
}

impl<'t> Div<f64> for Var<'t> {
    type Output = Var<'t>;

    fn div(self, rhs: f64) -> Self::Output {
        self.unary(self.value / rhs, 1.0 / rhs)
    }
}

impl<'t> Div<Var<'t>> for f64 {
    type Output = Var<'t>;

    fn div(self, rhs: Var<'t>) -> Self::Output {
        let inv = 1.0 / rhs.value;
        rhs.unary(self * inv, -self * inv * inv)
    }
}

impl<'t> Neg for Var<'t> {
    type Output = Var<'t>;

    fn neg(self) -> Self::Output {
        self.unary(-self.value, -1.0)
    }
}

impl AddAssign for Var<'_> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Var<'_> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Var<'_> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    /// Compares the tape gradient of `f` at `x` against a central difference.
    fn check_derivative(f: impl for<'t> Fn(Var<'t>) -> Var<'t>, g: impl Fn(f64) -> f64, x: f64) {
        let tape = Tape::new();
        let v = tape.var(x);
        let out = f(v);
        let grads = tape.gradients(out).unwrap();

        let h = 1e-6;
        let numeric = (g(x + h) - g(x - h)) / (2.0 * h);
        assert_relative_eq!(grads.wrt(v), numeric, epsilon = 1e-6, max_relative = 1e-6);
        assert_relative_eq!(out.value(), g(x));
    }

    #[test]
    fn elementary_functions_match_finite_differences() {
        check_derivative(|v| v.powi(3), |x| x.powi(3), 1.3);
        check_derivative(|v| v.powf(2.5), |x| x.powf(2.5), 0.7);
        check_derivative(|v| v.sqrt(), f64::sqrt, 2.0);
        check_derivative(|v| v.exp(), f64::exp, -0.4);
        check_derivative(|v| v.ln(), f64::ln, 3.1);
        check_derivative(|v| v.sin(), f64::sin, 0.9);
        check_derivative(|v| v.cos(), f64::cos, 0.9);
        check_derivative(|v| v.tanh(), f64::tanh, 0.2);
        check_derivative(|v| v.abs(), f64::abs, -2.0);
    }

    #[test]
    fn mixed_scalar_arithmetic() {
        check_derivative(
            |v| (2.0 - v) / v + 3.0 * v - v / 4.0 - 1.0 / v,
            |x| (2.0 - x) / x + 3.0 * x - x / 4.0 - 1.0 / x,
            1.7,
        );
    }

    #[test]
    fn quotient_of_vars() {
        let tape = Tape::new();
        let a = tape.var(3.0);
        let b = tape.var(2.0);
        let q = a / b;

        let grads = tape.gradients(q).unwrap();
        assert_relative_eq!(q.value(), 1.5);
        assert_relative_eq!(grads.wrt(a), 0.5);
        assert_relative_eq!(grads.wrt(b), -0.75);
    }

    #[test]
    fn assign_operators_record_on_tape() {
        let tape = Tape::new();
        let x = tape.var(2.0);
        let mut acc = tape.constant(0.0);
        acc += x;
        acc *= x;
        acc -= -x;

        // acc = x^2 + x
        let grads = tape.gradients(acc).unwrap();
        assert_relative_eq!(acc.value(), 6.0);
        assert_relative_eq!(grads.wrt(x), 5.0);
    }

    #[test]
    fn abs_has_zero_subgradient_at_origin() {
        let tape = Tape::new();
        let x = tape.var(0.0);
        let grads = tape.gradients(x.abs()).unwrap();
        assert_eq!(grads.wrt(x), 0.0);
    }

    #[test]
    fn zeroth_power_is_flat_at_origin() {
        let tape = Tape::new();
        let x = tape.var(0.0);
        let y = x.powi(0) + x.powf(0.0);

        let grads = tape.gradients(y).unwrap();
        assert_eq!(y.value(), 2.0);
        assert_eq!(grads.wrt(x), 0.0);
    }

    #[test]
    #[should_panic(expected = "different tapes")]
    fn mixing_tapes_panics() {
        let a = Tape::new();
        let b = Tape::new();
        let _ = a.var(1.0) + b.var(1.0);
    }
}
