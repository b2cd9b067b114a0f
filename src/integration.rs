//! Direct integration of the Coulomb equation for the regimes where the
//! closed-form methods lose precision.
//!
//! Both routines seed the integrator with values from a reliable regime and
//! integrate only in the direction in which the transported solution grows,
//! so the unwanted solution decays relative to it.

use crate::barrier::{log_coulomb_factor, turning_point};
use crate::error::{CoulombError, Result};
use crate::fractions::{coulomb_cf1, coulomb_steed};
use crate::ode::{integrate, BulirschStoerStoermer, OdeSettings, OdeState};
use crate::options::CoulombOptions;
use crate::series::coulomb_f_series;
use crate::solution::SolutionPair;

/// Smallest radius at which the inward integration is seeded.
const MIN_SEED_RADIUS: f64 = 1.0e-3;

/// Simpson panels of the barrier integral; must be even.
const BARRIER_PANELS: usize = 128;

/// `u'' = (L(L+1) / rho^2 + 2 eta / rho - 1) u`.
fn coulomb_rhs(l: u32, eta: f64) -> impl Fn(f64, f64) -> f64 {
    let barrier = f64::from(l) * (f64::from(l) + 1.0);
    move |x, u| (barrier / (x * x) + 2.0 * eta / x - 1.0) * u
}

/// WKB exponent `int_a^b kappa(x) dx` with `kappa^2 = L(L+1)/x^2 + 2 eta / x - 1`
/// clipped at zero, so only the tunneling part of `[a, b]` contributes.
///
/// Integrated in `ln x`, where the integrand `x kappa` stays bounded at the origin.
fn barrier_integral(l: u32, eta: f64, a: f64, b: f64) -> f64 {
    if !(a > 0.0 && a < b) {
        return 0.0;
    }
    let barrier = f64::from(l) * (f64::from(l) + 1.0);
    let integrand = |s: f64| {
        let x = s.exp();
        (barrier + 2.0 * eta * x - x * x).max(0.0).sqrt()
    };
    let (lo, hi) = (a.ln(), b.ln());
    let h = (hi - lo) / BARRIER_PANELS as f64;
    let mut sum = integrand(lo) + integrand(hi);
    for i in 1..BARRIER_PANELS {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * integrand(lo + i as f64 * h);
    }
    sum * h / 3.0
}

fn run(
    l: u32,
    eta: f64,
    options: &CoulombOptions,
    mut state: OdeState,
    target: f64,
) -> Result<OdeState> {
    let settings = OdeSettings::new(options.ode_accuracy, options.ode_max_evaluations)?;
    let rhs = coulomb_rhs(l, eta);
    let mut stepper = BulirschStoerStoermer::default();
    integrate(&mut stepper, &mut state, &rhs, &settings, target)?;
    log::trace!(
        "integrated L = {l}, eta = {eta} to rho = {target} in {} evaluations",
        state.evaluations()
    );
    Ok(state)
}

/// `F`, `F'`, `G` and `G'` below the turning point by inward integration of `G`.
///
/// Steed's method supplies `G` at the turning point (or at a small floor
/// radius when there is none); `G` is integrated inward to `rho`, where it
/// dominates. `F` follows from CF1 and the Wronskian, `F = 1 / (f G - G')`.
pub fn coulomb_integrate(
    l: u32,
    eta: f64,
    rho: f64,
    options: &CoulombOptions,
) -> Result<SolutionPair> {
    let seed_radius = turning_point(f64::from(l), eta).max(MIN_SEED_RADIUS);
    let seed = coulomb_steed(l, eta, seed_radius, options)?;
    let ln_g = seed.second_value().abs().ln() + barrier_integral(l, eta, rho, seed_radius);
    if ln_g > f64::MAX.ln() {
        return Err(CoulombError::numerical("G overflow"));
    }

    let step = options.ode_initial_step.copysign(rho - seed_radius);
    let state = OdeState::new(
        seed_radius,
        seed.second_value(),
        seed.second_derivative(),
        step,
    );
    let state = run(l, eta, options, state, rho)?;
    let (g, g_prime) = (state.y, state.y_prime);

    let (f_ratio, _) = coulomb_cf1(l, eta, rho, options)?;
    let f = 1.0 / (f_ratio * g - g_prime);
    Ok(SolutionPair::new(f, f_ratio * f, g, g_prime))
}

/// Radius at which the power series for `F_L` is started before integrating outward.
///
/// Inside `rho < 1 + sqrt(L)` and `|2 eta rho| < 1 + L` the series terms stay
/// small and cancel little.
pub(crate) fn series_seed_radius(l: u32, eta: f64, rho: f64) -> f64 {
    let lf = f64::from(l);
    let mut radius = 1.0 + lf.sqrt();
    if eta != 0.0 {
        radius = radius.min((1.0 + lf) / (2.0 * eta.abs()));
    }
    radius.min(rho)
}

/// `F` and `F'` by outward integration from the power-series region.
///
/// `F` grows outward until the turning point and oscillates beyond it, so
/// this is stable everywhere, but slow far from the origin.
pub fn coulomb_f_integrate(
    l: u32,
    eta: f64,
    rho: f64,
    options: &CoulombOptions,
) -> Result<(f64, f64)> {
    let seed_radius = series_seed_radius(l, eta, rho);
    let (f, f_prime) = coulomb_f_series(l, eta, seed_radius, options)?;
    if seed_radius == rho {
        return Ok((f, f_prime));
    }
    if f == 0.0 && f_prime == 0.0 {
        // The seed underflowed. Below the turning point F may still be too
        // small to represent at rho; otherwise there is nothing to integrate.
        let rho_t = turning_point(f64::from(l), eta);
        let ln_f = log_coulomb_factor(l, eta)
            + (f64::from(l) + 1.0) * seed_radius.ln()
            + barrier_integral(l, eta, seed_radius, rho);
        if rho < rho_t && ln_f < f64::MIN_POSITIVE.ln() {
            return Ok((0.0, 0.0));
        }
        return Err(CoulombError::numerical("F underflow"));
    }

    let state = OdeState::new(seed_radius, f, f_prime, options.ode_initial_step);
    let state = run(l, eta, options, state, rho)?;
    Ok((state.y, state.y_prime))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn inward_integration_matches_reference_in_tunneling_region() {
        let options = CoulombOptions::default();
        // F_0(5, 3) and G_0(5, 3).
        let pair = coulomb_integrate(0, 5.0, 3.0, &options).unwrap();
        assert_relative_eq!(pair.first_value(), 0.001_882_936_638_103_694_9, max_relative = 1e-11);
        assert_relative_eq!(pair.second_value(), 173.540_880_840_001_78, max_relative = 1e-11);
        assert_relative_eq!(pair.wronskian(), -1.0, epsilon = 1e-11);
    }

    #[test]
    fn outward_integration_matches_reference() {
        let options = CoulombOptions::default();
        let cases = [
            (3, 10.0, 6.0, 3.660_279_986_707_104_8e-6),
            (2, -3.0, 15.0, 0.348_459_977_413_763_5),
            (10, 2.0, 5.0, 1.826_534_136_424_477_8e-4),
        ];
        for &(l, eta, rho, expected) in &cases {
            let (f, _) = coulomb_f_integrate(l, eta, rho, &options).unwrap();
            assert_relative_eq!(f, expected, max_relative = 1e-11);
        }
    }

    #[test]
    fn outward_integration_reduces_to_series_near_origin() {
        let options = CoulombOptions::default();
        let (f, f_prime) = coulomb_f_integrate(20, -5.0, 2.0, &options).unwrap();
        let (series, series_prime) = coulomb_f_series(20, -5.0, 2.0, &options).unwrap();
        assert_eq!(f, series);
        assert_eq!(f_prime, series_prime);
    }

    #[test]
    fn reports_exhausted_evaluation_budget() {
        let options = CoulombOptions::default().with_ode(1e-12, 10);
        let result = coulomb_f_integrate(0, 20.0, 10.0, &options);
        assert!(matches!(result, Err(CoulombError::EvaluationLimit { .. })));
    }

    #[test]
    fn refuses_irregular_solution_beyond_double_range() {
        // G_0(300, 10) is about exp(788).
        let options = CoulombOptions::default();
        assert_eq!(
            coulomb_integrate(0, 300.0, 10.0, &options),
            Err(CoulombError::numerical("G overflow"))
        );
    }

    #[test]
    fn barrier_integral_matches_closed_form() {
        // For L = 0: int_rho^(2 eta) sqrt(2 eta / x - 1) dx
        //   = 2 eta (acos(sqrt(t)) - sqrt(t (1 - t))) with t = rho / (2 eta).
        let (eta, rho) = (300.0_f64, 10.0_f64);
        let t = rho / (2.0 * eta);
        let exact = 2.0 * eta * (t.sqrt().acos() - (t * (1.0 - t)).sqrt());
        let estimate = barrier_integral(0, eta, rho, 2.0 * eta);
        assert_relative_eq!(estimate, exact, max_relative = 2e-3);
        assert_eq!(barrier_integral(0, eta, 2.0 * eta, rho), 0.0);
    }
}
