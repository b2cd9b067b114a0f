//! Three-term recurrences in the angular momentum index.
//!
//! With `R_K = sqrt(1 + eta^2 / K^2)` and `S_K = K / rho + eta / K`, every
//! Coulomb solution `u` satisfies
//!
//! ```text
//! R_K u_K      = S_K u_{K-1} - u'_{K-1}
//! R_K u_{K-1}  = S_K u_K     + u'_K
//! ```
//!
//! `G` grows with `L` and is only stable upward; `F` is the minimal solution
//! and is only stable downward once `L` passes the turning point.

use crate::solution::SolutionPair;

fn coefficients(k: u32, eta: f64, rho: f64) -> (f64, f64) {
    let k = f64::from(k);
    let ek = eta / k;
    ((1.0 + ek * ek).sqrt(), k / rho + ek)
}

/// Carries `(u, u')` of one solution from order `l_from` up to `l_to`.
pub fn recurse_upward(l_from: u32, l_to: u32, eta: f64, rho: f64, u: f64, u_prime: f64) -> (f64, f64) {
    ((l_from + 1)..=l_to).fold((u, u_prime), |(u, u_prime), k| {
        let (r, s) = coefficients(k, eta, rho);
        let next = (s * u - u_prime) / r;
        (next, r * u - s * next)
    })
}

/// Carries `(u, u')` of one solution from order `l_from` down to `l_to`.
pub fn recurse_downward(l_from: u32, l_to: u32, eta: f64, rho: f64, u: f64, u_prime: f64) -> (f64, f64) {
    ((l_to + 1)..=l_from).rev().fold((u, u_prime), |(u, u_prime), k| {
        let (r, s) = coefficients(k, eta, rho);
        let next = (s * u + u_prime) / r;
        (next, s * next - r * u)
    })
}

/// Carries both solutions of a pair from order `l_from` to `l_to`, in either direction.
///
/// Only the direction that is stable for the solution in question keeps full
/// accuracy; callers needing `F` deep in the tunneling region should recurse
/// it downward from a higher order.
pub fn recurse_pair(pair: &SolutionPair, l_from: u32, l_to: u32, eta: f64, rho: f64) -> SolutionPair {
    let step = if l_to >= l_from {
        recurse_upward
    } else {
        recurse_downward
    };
    let (f, f_prime) = step(l_from, l_to, eta, rho, pair.first_value(), pair.first_derivative());
    let (g, g_prime) = step(l_from, l_to, eta, rho, pair.second_value(), pair.second_derivative());
    SolutionPair::new(f, f_prime, g, g_prime)
}
