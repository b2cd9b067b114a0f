//! Classical turning point and Gamow normalization of the Coulomb functions.

use std::f64::consts::PI;

/// Radius separating the tunneling region from the oscillatory region.
///
/// Solves `rho^2 - 2 eta rho - L(L+1) = 0` for its non-negative root. For
/// attractive potentials the root is rewritten to avoid cancellation; with
/// `L = 0` and `eta <= 0` there is no tunneling region and the result is 0.
pub fn turning_point(l: f64, eta: f64) -> f64 {
    let p = l * (l + 1.0);
    let q = (eta * eta + p).sqrt();
    if eta >= 0.0 {
        eta + q
    } else if p == 0.0 {
        0.0
    } else {
        p / (q - eta)
    }
}

/// `ln C_0(eta)`, where `C_0(eta)^2 = 2 pi eta / (exp(2 pi eta) - 1)`.
pub fn log_coulomb_factor_zero(eta: f64) -> f64 {
    let x = 2.0 * PI * eta;
    if x == 0.0 {
        0.0
    } else if x > 0.0 {
        // exp(x) would overflow long before C_0 underflows.
        0.5 * (x.ln() - x - (-(-x).exp_m1()).ln())
    } else {
        0.5 * (x / x.exp_m1()).ln()
    }
}

/// The Gamow factor `C_0(eta)`.
pub fn coulomb_factor_zero(eta: f64) -> f64 {
    log_coulomb_factor_zero(eta).exp()
}

/// `ln C_L(eta)`.
///
/// `C_L(eta) = 2^L e^(-pi eta / 2) |Gamma(L + 1 + i eta)| / Gamma(2L + 2)`. The
/// Gamma ratio against `C_0` telescopes to
/// `prod_{k=1..L} sqrt(k^2 + eta^2) / (k (2k + 1))`, which is summed here in
/// log space so large `L` or `|eta|` cannot overflow.
pub fn log_coulomb_factor(l: u32, eta: f64) -> f64 {
    (1..=l).fold(log_coulomb_factor_zero(eta), |sum, k| {
        let k = f64::from(k);
        sum + 0.5 * (k * k + eta * eta).ln() - k.ln() - (2.0 * k + 1.0).ln()
    })
}

/// The Gamow factor `C_L(eta)`, setting `F ~ C_L rho^(L+1)` and `G ~ rho^(-L) / ((2L+1) C_L)` near the origin.
pub fn coulomb_factor(l: u32, eta: f64) -> f64 {
    log_coulomb_factor(l, eta).exp()
}
