//! Every order `0..=L` at once, and parallel tabulation over many radii.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dispatch::{evaluate_pair, validate};
use crate::error::Result;
use crate::options::CoulombOptions;
use crate::recursion::{recurse_downward, recurse_upward};
use crate::solution::SolutionPair;

/// Pairs for orders `0..=l_max` at a single `(eta, rho)`.
///
/// Two full evaluations anchor the ladder: `G` is carried upward from
/// `L = 0` and `F` downward from `L = l_max`, each in its stable direction.
pub fn coulomb_ladder(
    l_max: u32,
    eta: f64,
    rho: f64,
    options: &CoulombOptions,
) -> Result<Vec<SolutionPair>> {
    validate(0, eta, rho, options)?;
    if rho == 0.0 {
        return (0..=l_max)
            .map(|l| evaluate_pair(l, eta, rho, options))
            .collect();
    }

    let bottom = evaluate_pair(0, eta, rho, options)?;
    let top = if l_max == 0 {
        bottom
    } else {
        evaluate_pair(l_max, eta, rho, options)?
    };

    let mut regular = vec![(0.0, 0.0); l_max as usize + 1];
    let mut f = (top.first_value(), top.first_derivative());
    regular[l_max as usize] = f;
    for l in (0..l_max).rev() {
        f = recurse_downward(l + 1, l, eta, rho, f.0, f.1);
        regular[l as usize] = f;
    }

    let mut g = (bottom.second_value(), bottom.second_derivative());
    let mut ladder = Vec::with_capacity(regular.len());
    for (l, &(f, f_prime)) in regular.iter().enumerate() {
        if l > 0 {
            let l = l as u32;
            g = recurse_upward(l - 1, l, eta, rho, g.0, g.1);
        }
        ladder.push(SolutionPair::new(f, f_prime, g.0, g.1));
    }
    Ok(ladder)
}

/// Coulomb functions for orders `0..=l_max` on a grid of radii at fixed `eta`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoulombTable {
    eta: f64,
    radii: Vec<f64>,
    /// `ladders[i][l]` holds the pair of order `l` at `radii[i]`.
    ladders: Vec<Vec<SolutionPair>>,
}

impl CoulombTable {
    /// Tabulates every radius in parallel.
    pub fn new(l_max: u32, eta: f64, radii: Vec<f64>, options: &CoulombOptions) -> Result<Self> {
        let ladders = radii
            .par_iter()
            .map(|&rho| coulomb_ladder(l_max, eta, rho, options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { eta, radii, ladders })
    }

    /// Charge parameter shared by every entry.
    pub fn eta(&self) -> f64 {
        self.eta
    }

    /// Radii in the order they were supplied.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Pair of order `l` at the `index`-th radius.
    pub fn pair(&self, l: u32, index: usize) -> Option<&SolutionPair> {
        self.ladders.get(index)?.get(l as usize)
    }

    /// All orders at the `index`-th radius.
    pub fn ladder(&self, index: usize) -> Option<&[SolutionPair]> {
        self.ladders.get(index).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::dispatch::coulomb;
    use crate::error::CoulombError;

    #[test]
    fn ladder_matches_individual_evaluations() {
        let options = CoulombOptions::default();
        for &(eta, rho) in &[(1.0, 3.0), (-2.0, 10.0), (0.5, 40.0)] {
            let ladder = coulomb_ladder(8, eta, rho, &options).unwrap();
            assert_eq!(ladder.len(), 9);
            for (l, pair) in ladder.iter().enumerate() {
                let direct = coulomb(l as i32, eta, rho).unwrap();
                let scale = direct.modulus();
                assert_relative_eq!(pair.first_value() / scale, direct.first_value() / scale, epsilon = 1e-11);
                assert_relative_eq!(pair.second_value() / scale, direct.second_value() / scale, epsilon = 1e-11);
                assert_relative_eq!(pair.wronskian(), -1.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn table_indexes_by_radius_then_order() {
        let options = CoulombOptions::default();
        let radii = vec![0.0, 0.5, 2.0, 12.0];
        let table = CoulombTable::new(3, -0.7, radii.clone(), &options).unwrap();
        assert_eq!(table.radii(), radii.as_slice());
        assert_eq!(table.eta(), -0.7);
        assert_eq!(table.pair(2, 0).map(SolutionPair::first_value), Some(0.0));
        let pair = table.pair(3, 3).copied().unwrap();
        let direct = coulomb(3, -0.7, 12.0).unwrap();
        assert_relative_eq!(pair.first_value(), direct.first_value(), epsilon = 1e-12);
        assert!(table.pair(4, 0).is_none());
        assert!(table.ladder(4).is_none());
    }

    #[test]
    fn table_rejects_negative_radius() {
        let options = CoulombOptions::default();
        let result = CoulombTable::new(2, 0.0, vec![1.0, -1.0], &options);
        assert!(matches!(result, Err(CoulombError::NegativeRadius { .. })));
    }

    #[test]
    fn table_round_trips_through_json() {
        let options = CoulombOptions::default();
        let table = CoulombTable::new(2, 1.5, vec![1.0, 5.0], &options).unwrap();
        let json = serde_json::to_string(&table).unwrap();
        let restored: CoulombTable = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.radii(), table.radii());
        assert_eq!(restored.ladder(1).map(<[SolutionPair]>::len), Some(3));
    }
}
