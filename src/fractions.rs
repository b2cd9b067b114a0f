//! Continued fractions CF1 and CF2 and Steed's method that combines them.

use num_complex::Complex64;

use crate::barrier::turning_point;
use crate::error::{CoulombError, Result};
use crate::options::CoulombOptions;
use crate::solution::SolutionPair;

/// Stand-in for an exactly vanishing denominator in the Lentz recurrences.
const TINY: f64 = 1.0e-300;

/// CF1: the logarithmic derivative `F'_L / F_L` and the sign of `F_L`.
///
/// Evaluated with the modified Lentz algorithm. The sign of `F_L` is the
/// parity of the number of negative Lentz denominators, because every sign
/// change of the denominator marks a zero of `F` between consecutive orders.
/// The fraction converges everywhere but needs about `rho` terms above the
/// turning point.
pub fn coulomb_cf1(l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<(f64, f64)> {
    let max_terms = options.fraction_iterations(rho);
    let mut pk = f64::from(l) + 1.0;
    let mut f = eta / pk + pk / rho;
    if f == 0.0 {
        f = TINY;
    }
    let mut c = f;
    let mut d = 0.0;
    let mut sign = 1.0;

    for _ in 0..max_terms {
        let pk1 = pk + 1.0;
        let ek = eta / pk;
        let a = -(1.0 + ek * ek);
        let b = (pk + pk1) * (1.0 / rho + ek / pk1);

        d = b + a * d;
        if d == 0.0 {
            d = TINY;
        }
        c = b + a / c;
        if c == 0.0 {
            c = TINY;
        }
        d = 1.0 / d;
        if d < 0.0 {
            sign = -sign;
        }

        let delta = c * d;
        f *= delta;
        if (delta - 1.0).abs() <= options.accuracy {
            return Ok((f, sign));
        }
        pk = pk1;
    }

    Err(CoulombError::did_not_converge("CF1", max_terms))
}

/// CF2: `p + i q = (G' + i F') / (G + i F)`.
///
/// Converges quickly at and above the turning point. Below it the fraction
/// settles on a value that is not the ratio above, so such radii are
/// refused with [`CoulombError::OutsideRegion`].
pub fn coulomb_cf2(l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<Complex64> {
    let rho_t = turning_point(f64::from(l), eta);
    if rho < rho_t {
        return Err(CoulombError::OutsideRegion {
            method: "CF2",
            rho,
            turning_point: rho_t,
        });
    }
    let max_terms = options.fraction_iterations(rho);
    let lf = f64::from(l);
    let mut a = Complex64::new(-(eta * eta + lf * (lf + 1.0)), eta);
    let mut b = Complex64::new(2.0 * (rho - eta), 2.0);
    let mut d = b.inv();
    let mut delta = Complex64::i() * a * d / rho;
    let mut f = Complex64::new(0.0, 1.0 - eta / rho) + delta;
    let mut pk = 0.0;

    for _ in 0..max_terms {
        pk += 2.0;
        a += Complex64::new(pk, 2.0 * eta);
        b += Complex64::new(0.0, 2.0);
        d = (b + a * d).inv();
        delta *= b * d - 1.0;
        f += delta;
        if delta.l1_norm() <= options.accuracy * f.l1_norm() {
            return Ok(f);
        }
    }

    Err(CoulombError::did_not_converge("CF2", max_terms))
}

/// Steed's method: `F`, `F'`, `G` and `G'` from CF1, CF2 and the Wronskian.
///
/// With `f = F'/F` and `p + i q` from CF2, `G = gamma F` where
/// `gamma = (f - p) / q`, and the Wronskian `F' G - F G' = 1` fixes
/// `|F| = 1 / sqrt(q (1 + gamma^2))`.
pub fn coulomb_steed(l: u32, eta: f64, rho: f64, options: &CoulombOptions) -> Result<SolutionPair> {
    let (f, sign) = coulomb_cf1(l, eta, rho, options)?;
    let pq = coulomb_cf2(l, eta, rho, options)?;
    let (p, q) = (pq.re, pq.im);
    if q.is_nan() || q <= 0.0 {
        return Err(CoulombError::numerical("Steed normalization"));
    }

    let gamma = (f - p) / q;
    let value = sign / (q * (1.0 + gamma * gamma)).sqrt();
    let pair = SolutionPair::new(value, f * value, gamma * value, (p * gamma - q) * value);
    if !pair.is_finite() {
        return Err(CoulombError::numerical("Steed normalization"));
    }
    Ok(pair)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn options() -> CoulombOptions {
        CoulombOptions::default()
    }

    #[test]
    fn cf1_survives_vanishing_denominator() {
        // b vanishes in the first Lentz step for these arguments.
        let (f, sign) = coulomb_cf1(1, -1.0, 6.0, &options()).unwrap();
        assert_relative_eq!(f, 2.812_098_909_826_407, max_relative = 1e-12);
        assert_eq!(sign, 1.0);
    }

    #[test]
    fn steed_matches_reference_values() {
        let cases = [
            (0, 1.0, 10.0, 0.477_560_815_862_574_04, 0.942_874_242_653_780_87),
            (3, -2.0, 8.0, 0.699_756_810_189_144_15, 0.618_949_081_175_987_29),
            (5, 0.5, 20.0, -0.618_646_756_279_529_17, 0.828_288_039_648_438_99),
        ];
        for &(l, eta, rho, f, g) in &cases {
            assert!(rho >= turning_point(f64::from(l), eta));
            let pair = coulomb_steed(l, eta, rho, &options()).unwrap();
            assert_relative_eq!(pair.first_value(), f, epsilon = 1e-13);
            assert_relative_eq!(pair.second_value(), g, epsilon = 1e-13);
            assert_relative_eq!(pair.wronskian(), -1.0, epsilon = 1e-13);
        }
    }

    #[test]
    fn free_particle_cf2_is_pure_phase() {
        // With eta = 0 and L = 0, (G' + iF') / (G + iF) = i.
        let pq = coulomb_cf2(0, 0.0, 3.0, &options()).unwrap();
        assert_relative_eq!(pq.re, 0.0, epsilon = 1e-15);
        assert_relative_eq!(pq.im, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn cf1_tracks_sign_of_regular_solution() {
        // F_0(0, 4) = sin(4) < 0 and F'/F = cot(4).
        let (f, sign) = coulomb_cf1(0, 0.0, 4.0, &options()).unwrap();
        assert_relative_eq!(f, 4f64.tan().recip(), max_relative = 1e-13);
        assert_eq!(sign, -1.0);
    }

    #[test]
    fn steed_refuses_tunneling_region() {
        // The turning point of L = 2, eta = 1 lies near 3.65.
        let result = coulomb_steed(2, 1.0, 2.0, &options());
        assert!(matches!(
            result,
            Err(CoulombError::OutsideRegion { method: "CF2", .. })
        ));
        assert!(result.unwrap_err().is_convergence_failure());
    }

    #[test]
    fn cf1_gives_up_at_fraction_cap() {
        // Far above the turning point CF1 needs about rho terms.
        let capped = options().with_max_fraction_iterations(1_000);
        assert_eq!(
            coulomb_cf1(0, 1.0, 1.0e6, &capped),
            Err(CoulombError::did_not_converge("CF1", 1_000))
        );
    }
}
