//! Accuracy and iteration controls shared by every evaluation regime.

use serde::{Deserialize, Serialize};

use crate::error::{CoulombError, Result};

/// Smallest relative accuracy that may be requested, `2^-49`.
///
/// A double carries 52 mantissa bits; asking for three bits less keeps
/// termination tests away from the rounding floor.
pub const MAX_ACCURACY: f64 = 1.776_356_839_400_250_5e-15;

/// Default ceiling on series and expansion terms.
pub const SERIES_MAX: usize = 250;

/// Default hard cap on continued-fraction terms, whatever the radius.
pub const FRACTION_MAX: usize = 1_000_000;

/// Configuration for a Coulomb wave function evaluation.
///
/// The defaults reproduce full double precision. Every field can be loaded
/// from a configuration file through `serde`; omitted fields fall back to
/// their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoulombOptions {
    /// Target relative accuracy for series, continued fractions, and expansions.
    pub accuracy: f64,
    /// Maximum number of terms in a power series or asymptotic expansion.
    pub max_iterations: usize,
    /// Hard cap on continued-fraction terms; see [`CoulombOptions::fraction_iterations`].
    pub max_fraction_iterations: usize,
    /// Scale `X^(1/2)` of the power-series region: `rho < X^(1/2) (1 + sqrt(L))`
    /// and `|2 eta rho| < X (1 + L)`.
    pub series_radius: f64,
    /// Largest tolerated ratio between the biggest series term and the sum.
    pub cancellation_limit: f64,
    /// Constant offset of the asymptotic region `rho > offset + (L(L+1) + eta^2) / 2`.
    pub asymptotic_offset: f64,
    /// Relative accuracy of the ODE fallback.
    pub ode_accuracy: f64,
    /// Right-hand-side evaluation budget of the ODE fallback.
    pub ode_max_evaluations: usize,
    /// Magnitude of the first trial step of the ODE fallback.
    pub ode_initial_step: f64,
}

impl Default for CoulombOptions {
    fn default() -> Self {
        Self {
            accuracy: MAX_ACCURACY,
            max_iterations: SERIES_MAX,
            max_fraction_iterations: FRACTION_MAX,
            series_radius: 4.0,
            cancellation_limit: 256.0,
            asymptotic_offset: 32.0,
            ode_accuracy: 2.5e-13,
            ode_max_evaluations: 100_000,
            ode_initial_step: 0.25,
        }
    }
}

impl CoulombOptions {
    /// Override the target accuracy while preserving other defaults.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the maximum number of series terms that should be attempted.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Cap the number of continued-fraction terms at any radius.
    pub fn with_max_fraction_iterations(mut self, max_fraction_iterations: usize) -> Self {
        self.max_fraction_iterations = max_fraction_iterations;
        self
    }

    /// Override the power-series region scale.
    pub fn with_series_radius(mut self, radius: f64) -> Self {
        self.series_radius = radius;
        self
    }

    /// Override the ODE fallback accuracy and evaluation budget.
    pub fn with_ode(mut self, accuracy: f64, max_evaluations: usize) -> Self {
        self.ode_accuracy = accuracy;
        self.ode_max_evaluations = max_evaluations;
        self
    }

    /// Checks that every setting lies in its admissible range.
    pub fn validate(&self) -> Result<()> {
        validate_accuracy(self.accuracy)?;
        validate_accuracy(self.ode_accuracy)?;
        if self.max_iterations == 0 {
            return Err(CoulombError::InvalidIterationLimit {
                context: "series terms",
            });
        }
        if self.max_fraction_iterations == 0 {
            return Err(CoulombError::InvalidIterationLimit {
                context: "continued-fraction terms",
            });
        }
        if self.ode_max_evaluations == 0 {
            return Err(CoulombError::InvalidIterationLimit {
                context: "ODE evaluations",
            });
        }
        for (name, value) in [
            ("series_radius", self.series_radius),
            ("cancellation_limit", self.cancellation_limit),
            ("asymptotic_offset", self.asymptotic_offset),
            ("ode_initial_step", self.ode_initial_step),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoulombError::NonFiniteArgument { name, value });
            }
        }
        Ok(())
    }

    /// Ceiling on continued-fraction terms at radius `rho`.
    ///
    /// CF1 needs roughly `rho` terms above the turning point, so the ceiling
    /// grows with the argument, up to `max_fraction_iterations`. Beyond that
    /// the fractions report non-convergence and evaluation moves on.
    pub fn fraction_iterations(&self, rho: f64) -> usize {
        let wanted = 4.0 * self.max_iterations as f64 + 2.0 * rho.ceil();
        wanted.min(self.max_fraction_iterations as f64) as usize
    }
}

/// Rejects accuracies outside `[2^-49, 1)`.
pub fn validate_accuracy(value: f64) -> Result<f64> {
    if !(MAX_ACCURACY..1.0).contains(&value) {
        return Err(CoulombError::InvalidAccuracy { value });
    }
    Ok(value)
}
