//! Power series of the Coulomb functions about the origin.

use num_complex::Complex64;

use crate::barrier::{log_coulomb_factor, log_coulomb_factor_zero};
use crate::error::{CoulombError, Result};
use crate::gamma::{digamma_complex, EULER_GAMMA};
use crate::options::CoulombOptions;
use crate::solution::SolutionPair;

/// Whether `(l, eta, rho)` lies inside the region where the power series
/// converges within the iteration ceiling.
///
/// With `X = series_radius^2` the region is `rho < sqrt(X) (1 + sqrt(L))`
/// and `|2 eta rho| < X (1 + L)`.
pub fn series_applicable(l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> bool {
    let l = f64::from(l);
    let radius = options.series_radius;
    rho < radius * (1.0 + l.sqrt()) && (2.0 * eta * rho).abs() < radius * radius * (1.0 + l)
}

/// `F_L(eta, rho)` and `F'_L(eta, rho)` from the power series about the origin.
///
/// `F_L = C_L rho^(L+1) sum_k u_k rho^k` with `u_0 = 1`, `u_1 = eta / (L+1)`
/// and `(k-1)(k+2L) u_k = 2 eta u_{k-1} - u_{k-2}`. The series is summed in
/// powers of `rho` folded into the terms, then scaled by `C_L` in log space.
///
/// Fails with [`CoulombError::Cancellation`] when the largest term dwarfs the
/// sum, since the result would then carry too few correct digits.
pub fn coulomb_f_series(
    l: u32,
    eta: f64,
    rho: f64,
    options: &CoulombOptions,
) -> Result<(f64, f64)> {
    let lf = f64::from(l);
    let eta_rho = eta * rho;
    let rho_sq = rho * rho;

    let mut u0 = 0.0;
    let mut u1 = 1.0;
    let mut u = 1.0;
    let mut v = lf + 1.0;
    let mut largest: f64 = 1.0;

    for k in 2..options.max_iterations.max(2) {
        let kf = k as f64;
        let u2 = (2.0 * eta_rho * u1 - rho_sq * u0) / ((kf - 1.0) * (kf + 2.0 * lf));
        u += u2;
        v += (lf + kf) * u2;
        largest = largest.max(u2.abs());

        if u2.abs() + u1.abs() <= options.accuracy * u.abs() {
            let ratio = largest / u.abs();
            if ratio > options.cancellation_limit {
                return Err(CoulombError::Cancellation {
                    method: "regular power series",
                    ratio,
                });
            }
            let log_c = log_coulomb_factor(l, eta);
            let ln_rho = rho.ln();
            let f = (log_c + (lf + 1.0) * ln_rho).exp() * u;
            let f_prime = (log_c + lf * ln_rho).exp() * v;
            return Ok((f, f_prime));
        }

        u0 = u1;
        u1 = u2;
    }

    Err(CoulombError::did_not_converge(
        "regular power series",
        options.max_iterations,
    ))
}

/// `F_0`, `F_0'`, `G_0` and `G_0'` from the power series about the origin.
///
/// `G_0` carries a logarithmic term, `G_0 = (v + 2 eta u (ln 2rho + Re psi(1 + i eta) + 2 gamma - 1)) / C_0`,
/// where `u = F_0 / C_0` and `v` is the analytic remainder whose coefficients
/// are driven by those of `u`.
pub fn coulomb_zero_series(eta: f64, rho: f64, options: &CoulombOptions) -> Result<SolutionPair> {
    let eta_rho = eta * rho;
    let rho_sq = rho * rho;

    let (mut u0, mut u1) = (0.0, rho);
    let (mut u, mut u_sum_prime) = (rho, rho);
    let (mut v0, mut v1) = (1.0, 0.0);
    let (mut v, mut v_sum_prime) = (1.0, 0.0);
    let mut largest_u = rho.abs();
    let mut largest_v: f64 = 1.0;

    for n in 2..options.max_iterations.max(2) {
        let nf = n as f64;
        let denominator = nf * (nf - 1.0);
        let u2 = (2.0 * eta_rho * u1 - rho_sq * u0) / denominator;
        let v2 = (2.0 * eta_rho * v1 - rho_sq * v0 - 2.0 * eta * (2.0 * nf - 1.0) * u2) / denominator;
        u += u2;
        u_sum_prime += nf * u2;
        v += v2;
        v_sum_prime += nf * v2;
        largest_u = largest_u.max(u2.abs());
        largest_v = largest_v.max(v2.abs());

        let u_done = u2.abs() + u1.abs() <= options.accuracy * u.abs();
        let v_done = v2.abs() + v1.abs() <= options.accuracy * v.abs();
        if u_done && v_done {
            let shift = (2.0 * rho).ln() + digamma_complex(Complex64::new(1.0, eta)).re
                + 2.0 * EULER_GAMMA
                - 1.0;
            let log_term = 2.0 * eta * u * shift;
            let w = v + log_term;

            let ratio = (largest_u / u.abs()).max((largest_v + log_term.abs()) / w.abs());
            if ratio > options.cancellation_limit {
                return Err(CoulombError::Cancellation {
                    method: "L = 0 power series",
                    ratio,
                });
            }

            let c0 = log_coulomb_factor_zero(eta).exp();
            let g_prime = (v_sum_prime + 2.0 * eta * (u_sum_prime * shift + u)) / rho / c0;
            return Ok(SolutionPair::new(c0 * u, c0 * u_sum_prime / rho, w / c0, g_prime));
        }

        u0 = u1;
        u1 = u2;
        v0 = v1;
        v1 = v2;
    }

    Err(CoulombError::did_not_converge(
        "L = 0 power series",
        options.max_iterations,
    ))
}
