//! Coulomb barrier penetrability, shift factor and phases.
//!
//! These are the combinations of `F` and `G` that statistical decay models
//! use to build charged-particle transmission coefficients.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::dispatch::{evaluate_pair, validate};
use crate::error::{CoulombError, Result};
use crate::gamma::log_gamma_complex;
use crate::options::CoulombOptions;
use crate::solution::SolutionPair;

/// The Coulomb phase shift `sigma_L(eta) = arg Gamma(L + 1 + i eta)`.
///
/// The value is the continuous branch, not reduced to `(-pi, pi]`.
pub fn coulomb_phase_shift(l: u32, eta: f64) -> f64 {
    log_gamma_complex(Complex64::new(f64::from(l) + 1.0, eta)).im
}

/// Barrier quantities of one partial wave at the channel radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarrierFactors {
    /// `P_L = rho / (F^2 + G^2)`.
    pub penetrability: f64,
    /// `S_L = rho (F F' + G G') / (F^2 + G^2)`.
    pub shift: f64,
    /// Hard-sphere phase `phi_L = atan2(F, G)`.
    pub hard_sphere_phase: f64,
}

impl BarrierFactors {
    /// Builds the factors from an evaluated pair at radius `rho`.
    pub fn from_pair(pair: &SolutionPair, rho: f64) -> Self {
        let (f, g) = (pair.first_value(), pair.second_value());
        // Scale by the larger magnitude so the squares cannot overflow.
        let scale = f.abs().max(g.abs());
        let (fs, gs) = (f / scale, g / scale);
        let norm = fs * fs + gs * gs;
        let derivative = fs * pair.first_derivative() / scale + gs * pair.second_derivative() / scale;
        Self {
            penetrability: rho / norm / scale / scale,
            shift: rho * derivative / norm,
            hard_sphere_phase: f.atan2(g),
        }
    }
}

/// Penetrability, shift factor and hard-sphere phase with default options.
pub fn barrier_factors(l: i32, eta: f64, rho: f64) -> Result<BarrierFactors> {
    barrier_factors_with_options(l, eta, rho, &CoulombOptions::default())
}

/// Penetrability, shift factor and hard-sphere phase with custom options.
pub fn barrier_factors_with_options(
    l: i32,
    eta: f64,
    rho: f64,
    options: &CoulombOptions,
) -> Result<BarrierFactors> {
    let order = validate(l, eta, rho, options)?;
    if rho == 0.0 {
        return Err(CoulombError::NonPositiveRadius { rho });
    }
    let pair = evaluate_pair(order, eta, rho, options)?;
    Ok(BarrierFactors::from_pair(&pair, rho))
}

/// `P_L(eta, rho)`, the probability of tunneling through the Coulomb and centrifugal barrier.
pub fn penetrability(l: i32, eta: f64, rho: f64) -> Result<f64> {
    barrier_factors(l, eta, rho).map(|factors| factors.penetrability)
}

/// `S_L(eta, rho)`, the logarithmic derivative of the outgoing wave at the channel radius.
pub fn shift_factor(l: i32, eta: f64, rho: f64) -> Result<f64> {
    barrier_factors(l, eta, rho).map(|factors| factors.shift)
}
