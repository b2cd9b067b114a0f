//! Asymptotic expansion of the Coulomb functions far above the turning point.

use std::f64::consts::{FRAC_PI_2, TAU};

use num_complex::Complex64;

use crate::error::{CoulombError, Result};
use crate::gamma::log_gamma_complex;
use crate::options::CoulombOptions;
use crate::solution::SolutionPair;

/// Whether `rho` is far enough above the turning point for the expansion
/// to converge within the iteration ceiling: `rho > offset + (L(L+1) + eta^2) / 2`.
pub fn asymptotic_applicable(l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> bool {
    let lf = f64::from(l);
    rho > options.asymptotic_offset + 0.5 * (lf * (lf + 1.0) + eta * eta)
}

/// Sum of two angles, each reduced modulo `2 pi` first.
///
/// The Coulomb phase `rho - eta ln 2rho + sigma_L - L pi / 2` adds terms that
/// can each be large; reducing them separately keeps the sum small without
/// letting one term's rounding swamp the other.
pub fn reduce_angle(x: f64, y: f64) -> f64 {
    x % TAU + y % TAU
}

/// Running terms and sums of the two expansion series and their derivatives.
#[derive(Default)]
struct Expansion {
    f: f64,
    g: f64,
    f_star: f64,
    g_star: f64,
}

impl Expansion {
    fn add(&mut self, term: &Expansion) {
        self.f += term.f;
        self.g += term.g;
        self.f_star += term.f_star;
        self.g_star += term.g_star;
    }
}

/// `F`, `F'`, `G` and `G'` from the asymptotic expansion in `1 / rho`.
///
/// `G + i F = exp(i theta) (f + i g)` with phase
/// `theta = rho - eta ln 2rho + sigma_L - L pi / 2` and Coulomb phase shift
/// `sigma_L = arg Gamma(L + 1 + i eta)`; the derivative follows from the
/// companion series `f* + i g*`.
pub fn coulomb_asymptotic(
    l: u32,
    eta: f64,
    rho: f64,
    options: &CoulombOptions,
) -> Result<SolutionPair> {
    let lf = f64::from(l);
    let barrier = lf * (lf + 1.0) + eta * eta;

    let mut term = Expansion {
        f: 1.0,
        g: 0.0,
        f_star: 0.0,
        g_star: 1.0 - eta / rho,
    };
    let mut sum = Expansion::default();
    sum.add(&term);

    for k in 0..options.max_iterations {
        let kf = k as f64;
        let denominator = 2.0 * (kf + 1.0) * rho;
        let a = (2.0 * kf + 1.0) * eta / denominator;
        let b = (barrier - kf * (kf + 1.0)) / denominator;

        let f = a * term.f - b * term.g;
        let g = a * term.g + b * term.f;
        term = Expansion {
            f,
            g,
            f_star: a * term.f_star - b * term.g_star - f / rho,
            g_star: a * term.g_star + b * term.f_star - g / rho,
        };
        sum.add(&term);

        let settled = term.f.abs() + term.g.abs() <= options.accuracy * (sum.f.abs() + sum.g.abs());
        let settled_star = term.f_star.abs() + term.g_star.abs()
            <= options.accuracy * (sum.f_star.abs() + sum.g_star.abs());
        if settled && settled_star {
            let sigma = log_gamma_complex(Complex64::new(lf + 1.0, eta)).im;
            let theta = reduce_angle(rho - eta * (2.0 * rho).ln(), sigma - lf * FRAC_PI_2);
            let (sin, cos) = theta.sin_cos();
            return Ok(SolutionPair::new(
                sum.g * cos + sum.f * sin,
                sum.g_star * cos + sum.f_star * sin,
                sum.f * cos - sum.g * sin,
                sum.f_star * cos - sum.g_star * sin,
            ));
        }
    }

    Err(CoulombError::did_not_converge(
        "asymptotic expansion",
        options.max_iterations,
    ))
}
