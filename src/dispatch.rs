//! Argument validation and regime selection for the public entry points.

use serde::{Deserialize, Serialize};

use crate::asymptotic::{asymptotic_applicable, coulomb_asymptotic};
use crate::barrier::{log_coulomb_factor_zero, turning_point};
use crate::error::{CoulombError, Result};
use crate::fractions::{coulomb_cf1, coulomb_steed};
use crate::integration::{coulomb_f_integrate, coulomb_integrate};
use crate::options::CoulombOptions;
use crate::recursion::recurse_upward;
use crate::series::{coulomb_f_series, coulomb_zero_series, series_applicable};
use crate::solution::SolutionPair;

/// Numerical method used to evaluate a full `(F, F', G, G')` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regime {
    /// Power series about the origin; `G` comes from `L = 0` by upward recursion.
    Series,
    /// Expansion in `1 / rho` far above the turning point.
    Asymptotic,
    /// Steed's method at or above the turning point.
    Steed,
    /// Steed's method at the highest order whose turning point lies below
    /// `rho`, then upward recursion for `G` and CF1 for `F`.
    Recursion,
    /// Inward integration of `G` from the turning point.
    Integration,
}

impl Regime {
    /// Short human-readable name used in log messages.
    pub fn name(self) -> &'static str {
        match self {
            Regime::Series => "power series",
            Regime::Asymptotic => "asymptotic expansion",
            Regime::Steed => "Steed's method",
            Regime::Recursion => "L recursion",
            Regime::Integration => "ODE integration",
        }
    }

    /// Evaluates the pair with this method alone, without falling back.
    ///
    /// The method is not checked against [`applicable_regimes`]; outside its
    /// region it reports a convergence failure, such as
    /// [`CoulombError::OutsideRegion`] for Steed's method below the turning point.
    pub fn evaluate(self, l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<SolutionPair> {
        match self {
            Regime::Series => {
                let (f, f_prime) = coulomb_f_series(l, eta, rho, options)?;
                let zero = coulomb_zero_series(eta, rho, options)?;
                let (g, g_prime) =
                    recurse_upward(0, l, eta, rho, zero.second_value(), zero.second_derivative());
                Ok(SolutionPair::new(f, f_prime, g, g_prime))
            }
            Regime::Asymptotic => coulomb_asymptotic(l, eta, rho, options),
            Regime::Steed => coulomb_steed(l, eta, rho, options),
            Regime::Recursion => {
                let mut base = l;
                while base > 0 && rho < turning_point(f64::from(base), eta) {
                    base -= 1;
                }
                let seed = coulomb_steed(base, eta, rho, options)?;
                let (g, g_prime) =
                    recurse_upward(base, l, eta, rho, seed.second_value(), seed.second_derivative());
                complete_from_irregular(l, eta, rho, g, g_prime, options)
            }
            Regime::Integration => coulomb_integrate(l, eta, rho, options),
        }
    }
}

/// Recovers `F` from `G` through CF1 and the Wronskian `F' G - F G' = 1`.
fn complete_from_irregular(
    l: u32,
    eta: f64,
    rho: f64,
    g: f64,
    g_prime: f64,
    options: &CoulombOptions,
) -> Result<SolutionPair> {
    let (f_ratio, _) = coulomb_cf1(l, eta, rho, options)?;
    let f = 1.0 / (f_ratio * g - g_prime);
    Ok(SolutionPair::new(f, f_ratio * f, g, g_prime))
}

/// Regimes worth trying for `(l, eta, rho)`, most accurate and cheapest first.
///
/// The list always ends with [`Regime::Integration`], which works everywhere
/// but is the slowest.
pub fn applicable_regimes(l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> Vec<Regime> {
    let mut regimes = Vec::with_capacity(3);
    if series_applicable(0, eta, rho, options) {
        regimes.push(Regime::Series);
    }
    if asymptotic_applicable(l, eta, rho, options) {
        regimes.push(Regime::Asymptotic);
    }
    if rho >= turning_point(f64::from(l), eta) {
        regimes.push(Regime::Steed);
    } else if rho >= turning_point(0.0, eta) {
        regimes.push(Regime::Recursion);
    }
    regimes.push(Regime::Integration);
    regimes
}

pub(crate) fn validate(l: i32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<u32> {
    let order = u32::try_from(l).map_err(|_| CoulombError::NegativeOrder { l })?;
    if !eta.is_finite() {
        return Err(CoulombError::NonFiniteArgument {
            name: "eta",
            value: eta,
        });
    }
    if !rho.is_finite() {
        return Err(CoulombError::NonFiniteArgument {
            name: "rho",
            value: rho,
        });
    }
    if rho < 0.0 {
        return Err(CoulombError::NegativeRadius { rho });
    }
    options.validate()?;
    Ok(order)
}

/// Limits at the origin: `F_L(0) = 0` and `G_0(0) = 1 / C_0`; higher `G_L` diverge.
fn pair_at_origin(l: u32, eta: f64) -> SolutionPair {
    let c0 = log_coulomb_factor_zero(eta).exp();
    if l == 0 {
        let g_prime = if eta == 0.0 {
            0.0
        } else {
            -eta.signum() * f64::INFINITY
        };
        SolutionPair::new(0.0, c0, 1.0 / c0, g_prime)
    } else {
        SolutionPair::new(0.0, 0.0, f64::INFINITY, f64::NEG_INFINITY)
    }
}

pub(crate) fn evaluate_pair(l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<SolutionPair> {
    if rho == 0.0 {
        return Ok(pair_at_origin(l, eta));
    }

    let mut last_error = None;
    for regime in applicable_regimes(l, eta, rho, options) {
        match regime.evaluate(l, eta, rho, options) {
            Ok(pair) if pair.is_finite() => {
                log::debug!("L = {l}, eta = {eta}, rho = {rho}: {}", regime.name());
                return Ok(pair);
            }
            Ok(_) => {
                log::debug!("{} produced a non-finite pair, falling back", regime.name());
                last_error = Some(CoulombError::numerical(regime.name()));
            }
            Err(error) if error.is_convergence_failure() => {
                log::debug!("{} failed ({error}), falling back", regime.name());
                last_error = Some(error);
            }
            Err(error) => return Err(error),
        }
    }

    let error = last_error.unwrap_or_else(|| CoulombError::numerical("regime selection"));
    log::warn!("no regime evaluated L = {l}, eta = {eta}, rho = {rho}: {error}");
    Err(error)
}

/// `F_L`, `F_L'`, `G_L` and `G_L'` with default options.
///
/// # Errors
///
/// Fails with a domain error when `l < 0`, `rho < 0`, or an argument is not
/// finite, and with the last convergence failure when every applicable
/// regime fails.
pub fn coulomb(l: i32, eta: f64, rho: f64) -> Result<SolutionPair> {
    coulomb_with_options(l, eta, rho, &CoulombOptions::default())
}

/// `F_L`, `F_L'`, `G_L` and `G_L'` with custom options.
pub fn coulomb_with_options(
    l: i32,
    eta: f64,
    rho: f64,
    options: &CoulombOptions,
) -> Result<SolutionPair> {
    let l = validate(l, eta, rho, options)?;
    evaluate_pair(l, eta, rho, options)
}

/// The regular Coulomb wave function `F_L(eta, rho)`.
///
/// # Errors
///
/// See [`coulomb`].
pub fn coulomb_f(l: i32, eta: f64, rho: f64) -> Result<f64> {
    coulomb_f_with_options(l, eta, rho, &CoulombOptions::default())
}

/// `F_L(eta, rho)` with custom options.
///
/// The regular power series at order `l` is tried first, since it needs no
/// irregular solution and covers more ground than the `L = 0` series. When
/// the full pair cannot be had either, `F` is integrated outward from the
/// origin.
pub fn coulomb_f_with_options(l: i32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<f64> {
    let l = validate(l, eta, rho, options)?;
    if rho == 0.0 {
        return Ok(0.0);
    }

    if series_applicable(l, eta, rho, options) {
        match coulomb_f_series(l, eta, rho, options) {
            Ok((f, _)) => return Ok(f),
            Err(error) => log::debug!("regular power series failed ({error}), falling back"),
        }
    }

    match evaluate_pair(l, eta, rho, options) {
        Ok(pair) => Ok(pair.first_value()),
        Err(error) if error.is_convergence_failure() => {
            log::debug!("evaluating F alone by outward integration");
            coulomb_f_integrate(l, eta, rho, options).map(|(f, _)| f)
        }
        Err(error) => Err(error),
    }
}

/// The irregular Coulomb wave function `G_L(eta, rho)`.
///
/// # Errors
///
/// See [`coulomb`].
pub fn coulomb_g(l: i32, eta: f64, rho: f64) -> Result<f64> {
    coulomb_g_with_options(l, eta, rho, &CoulombOptions::default())
}

/// `G_L(eta, rho)` with custom options.
pub fn coulomb_g_with_options(l: i32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<f64> {
    coulomb_with_options(l, eta, rho, options).map(|pair| pair.second_value())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn regime_lists_follow_the_turning_point() {
        let options = CoulombOptions::default();
        assert_eq!(
            applicable_regimes(0, 0.0, 1.0, &options),
            vec![Regime::Series, Regime::Steed, Regime::Integration]
        );
        assert_eq!(
            applicable_regimes(2, 1.0, 100.0, &options),
            vec![Regime::Asymptotic, Regime::Steed, Regime::Integration]
        );
        // Turning points: 2 for L = 0 and about 4.6 for L = 3.
        assert_eq!(
            applicable_regimes(3, 1.0, 4.0, &options),
            vec![Regime::Recursion, Regime::Integration]
        );
        assert_eq!(
            applicable_regimes(0, 5.0, 3.0, &options),
            vec![Regime::Integration]
        );
    }

    #[test]
    fn every_listed_regime_agrees() {
        let options = CoulombOptions::default();
        let (l, eta, rho) = (1, -0.5, 3.5);
        let reference = coulomb_with_options(l, eta, rho, &options).unwrap();
        for regime in applicable_regimes(l as u32, eta, rho, &options) {
            let pair = regime.evaluate(l as u32, eta, rho, &options).unwrap();
            assert_relative_eq!(pair.first_value(), reference.first_value(), epsilon = 1e-11);
            assert_relative_eq!(pair.second_value(), reference.second_value(), epsilon = 1e-11);
        }
    }

    #[test]
    fn rejects_invalid_arguments() {
        assert_eq!(
            coulomb_f(-1, 0.0, 1.0),
            Err(CoulombError::NegativeOrder { l: -1 })
        );
        assert_eq!(
            coulomb_g(0, 0.0, -1.0),
            Err(CoulombError::NegativeRadius { rho: -1.0 })
        );
        assert!(matches!(
            coulomb(0, f64::NAN, 1.0),
            Err(CoulombError::NonFiniteArgument { name: "eta", .. })
        ));
        let options = CoulombOptions::default().with_accuracy(0.0);
        assert!(matches!(
            coulomb_f_with_options(0, 0.0, 1.0, &options),
            Err(CoulombError::InvalidAccuracy { .. })
        ));
    }

    #[test]
    fn origin_limits() {
        assert_eq!(coulomb_f(3, 1.0, 0.0), Ok(0.0));
        assert_eq!(coulomb_g(0, 0.0, 0.0), Ok(1.0));
        assert_eq!(coulomb_g(2, -1.0, 0.0), Ok(f64::INFINITY));
        let pair = coulomb(0, 0.0, 0.0).unwrap();
        assert_eq!(pair.first_derivative(), 1.0);
    }

    #[test]
    fn deep_tunneling_falls_back_to_integration() {
        // Neither the series nor Steed's method apply at L = 0, eta = 5, rho = 3.
        let pair = coulomb(0, 5.0, 3.0).unwrap();
        assert_relative_eq!(pair.first_value(), 0.001_882_936_638_103_694_9, max_relative = 1e-11);
        assert_relative_eq!(pair.second_value(), 173.540_880_840_001_78, max_relative = 1e-11);
    }
}
