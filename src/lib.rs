//! Regular and irregular Coulomb wave functions `F_L(eta, rho)` and `G_L(eta, rho)`.
//!
//! The Coulomb wave functions are the radial solutions of
//!
//! ```text
//! u'' + (1 - 2 eta / rho - L (L + 1) / rho^2) u = 0
//! ```
//!
//! for a non-relativistic particle in a Coulomb potential. A repulsive
//! potential has `eta > 0` and an attractive one `eta < 0`. Inside the
//! classical turning point the functions are exponential; beyond it they
//! oscillate.
//!
//! No single method covers the whole `(L, eta, rho)` domain, so the crate
//! keeps several and picks among them:
//!
//! - power series about the origin (`series` module),
//! - Steed's method built on the continued fractions CF1 and CF2 (`fractions` module),
//! - an asymptotic expansion far above the turning point (`asymptotic` module),
//! - recursion in `L` (`recursion` module), and
//! - direct integration of the differential equation (`integration` module),
//!   which keeps nearly full precision deep in the tunneling region.
//!
//! When one method fails to converge the next applicable one is tried, and
//! an error is returned only when all of them fail.
//!
//! # Quick start
//!
//! ```no_run
//! use coulomb_wave::{coulomb, coulomb_f, coulomb_g, CoulombOptions};
//!
//! let f = coulomb_f(2, 1.0, 5.0).expect("valid arguments");
//! let g = coulomb_g(2, 1.0, 5.0).expect("valid arguments");
//!
//! // Values and derivatives at once; F' G - F G' = 1.
//! let pair = coulomb(2, 1.0, 5.0).expect("valid arguments");
//! assert!((pair.wronskian() + 1.0).abs() < 1e-12);
//!
//! // Coarser accuracy for a cheaper evaluation.
//! let options = CoulombOptions::default().with_accuracy(1e-10);
//! let fast = coulomb_wave::coulomb_with_options(2, 1.0, 5.0, &options);
//! println!("F = {f}, G = {g}, fast = {fast:?}");
//! ```
//!
//! Every function is pure and keeps its state on the stack, so evaluations
//! can run concurrently; [`CoulombTable`] uses this to tabulate many radii
//! in parallel.

pub mod asymptotic;
pub mod barrier;
pub mod dispatch;
pub mod error;
pub mod fractions;
pub mod gamma;
pub mod integration;
mod ode;
pub mod options;
pub mod penetration;
pub mod recursion;
pub mod series;
pub mod solution;
pub mod table;

pub use dispatch::{
    applicable_regimes, coulomb, coulomb_f, coulomb_f_with_options, coulomb_g,
    coulomb_g_with_options, coulomb_with_options, Regime,
};
pub use error::{CoulombError, Result};
pub use options::CoulombOptions;
pub use penetration::{barrier_factors, penetrability, shift_factor, BarrierFactors};
pub use solution::SolutionPair;
pub use table::{coulomb_ladder, CoulombTable};
