//! Value-and-derivative pairs for two independent solutions of a second-order ODE.

use serde::{Deserialize, Serialize};

/// Values and derivatives of two independent solutions at one point.
///
/// When one solution is regular at the origin and the other is not, the
/// regular one is the first. For the Coulomb equation the first solution is
/// `F_L(eta, rho)` and the second `G_L(eta, rho)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SolutionPair {
    first: f64,
    first_prime: f64,
    second: f64,
    second_prime: f64,
}

impl SolutionPair {
    /// Bundles the two solutions and their derivatives.
    pub fn new(first: f64, first_prime: f64, second: f64, second_prime: f64) -> Self {
        Self {
            first,
            first_prime,
            second,
            second_prime,
        }
    }

    /// Value of the first (regular) solution.
    pub fn first_value(&self) -> f64 {
        self.first
    }

    /// Derivative of the first (regular) solution.
    pub fn first_derivative(&self) -> f64 {
        self.first_prime
    }

    /// Value of the second (irregular) solution.
    pub fn second_value(&self) -> f64 {
        self.second
    }

    /// Derivative of the second (irregular) solution.
    pub fn second_derivative(&self) -> f64 {
        self.second_prime
    }

    /// The Wronskian `first * second' - second * first'`.
    ///
    /// Coulomb pairs satisfy `F' G - F G' = 1`, so this evaluates to `-1`
    /// up to rounding. It is computed on demand because the difference can
    /// cancel badly deep in the tunneling region, where `F` underflows
    /// toward zero while `G` overflows.
    pub fn wronskian(&self) -> f64 {
        self.first * self.second_prime - self.second * self.first_prime
    }

    /// `sqrt(first^2 + second^2)`, the envelope of an oscillating pair.
    pub fn modulus(&self) -> f64 {
        self.first.hypot(self.second)
    }

    /// Whether all four components are finite.
    pub(crate) fn is_finite(&self) -> bool {
        self.first.is_finite()
            && self.first_prime.is_finite()
            && self.second.is_finite()
            && self.second_prime.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_cosine_pair_has_unit_wronskian() {
        let x = 0.7_f64;
        let pair = SolutionPair::new(x.sin(), x.cos(), x.cos(), -x.sin());
        assert!((pair.wronskian() + 1.0).abs() < 1e-15);
        assert!((pair.modulus() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn detects_non_finite_components() {
        assert!(SolutionPair::new(1.0, 2.0, 3.0, 4.0).is_finite());
        assert!(!SolutionPair::new(1.0, f64::NAN, 3.0, 4.0).is_finite());
    }
}
