//! Adaptive extrapolation integrator for `y'' = f(x, y)`.
//!
//! Only the Coulomb fallback regimes use this; it is not a general ODE
//! solver. One stepping strategy is chosen at construction and driven
//! through [`OdeStepper`], while all mutable quantities live in an
//! [`OdeState`] owned by a single integration.

use crate::error::{CoulombError, Result};
use crate::options::validate_accuracy;

/// Right-hand side `f(x, y)` of `y'' = f(x, y)`.
pub(crate) type RightHandSide<'a> = dyn Fn(f64, f64) -> f64 + 'a;

/// Accuracy target and evaluation budget for one integration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OdeSettings {
    accuracy: f64,
    max_evaluations: usize,
}

impl OdeSettings {
    pub(crate) fn new(accuracy: f64, max_evaluations: usize) -> Result<Self> {
        Ok(Self {
            accuracy: validate_accuracy(accuracy)?,
            max_evaluations,
        })
    }
}

/// Independent and dependent variables plus step bookkeeping.
#[derive(Clone, Debug)]
pub(crate) struct OdeState {
    /// Current value of the independent variable.
    pub x: f64,
    /// Current value of the dependent variable.
    pub y: f64,
    /// Current first derivative of the dependent variable.
    pub y_prime: f64,
    /// Step size to attempt next; its sign is reset toward the target.
    pub step: f64,
    evaluations: usize,
}

impl OdeState {
    pub(crate) fn new(x: f64, y: f64, y_prime: f64, step: f64) -> Self {
        Self {
            x,
            y,
            y_prime,
            step,
            evaluations: 0,
        }
    }

    /// Number of right-hand-side evaluations so far.
    pub(crate) fn evaluations(&self) -> usize {
        self.evaluations
    }

    fn evaluate(&mut self, rhs: &RightHandSide<'_>, x: f64, y: f64) -> f64 {
        self.evaluations += 1;
        rhs(x, y)
    }
}

/// A single-step method that advances an [`OdeState`].
pub(crate) trait OdeStepper {
    /// Advances the state by one accepted step and returns the step actually taken.
    ///
    /// The stepper may shrink `state.step` before accepting and may grow it
    /// afterwards for the next call.
    fn step(
        &mut self,
        state: &mut OdeState,
        rhs: &RightHandSide<'_>,
        settings: &OdeSettings,
    ) -> Result<f64>;
}

/// Substep counts of successive trial steps.
const SUBSTEPS: [usize; 8] = [2, 4, 6, 8, 12, 16, 24, 32];

/// Bulirsch-Stoer extrapolation on top of Stoermer's rule.
///
/// Stoermer's rule has an error expansion in even powers of the substep,
/// so trial steps with increasing substep counts are extrapolated to zero
/// substep size with Neville's scheme.
#[derive(Clone, Debug)]
pub(crate) struct BulirschStoerStoermer {
    target_k: usize,
}

impl Default for BulirschStoerStoermer {
    fn default() -> Self {
        Self { target_k: 4 }
    }
}

/// Outcome of one Stoermer trial step.
struct Trial {
    y: f64,
    y_prime: f64,
    y_second: f64,
}

impl BulirschStoerStoermer {
    /// Covers `state.step` with `n` Stoermer substeps without mutating the position.
    fn trial_step(state: &mut OdeState, rhs: &RightHandSide<'_>, n: usize) -> Trial {
        let h = state.step / n as f64;
        let mut x = state.x;
        let mut y = state.y;
        let mut delta = h * (state.y_prime + 0.5 * h * state.evaluate(rhs, x, y));
        for _ in 1..n {
            y += delta;
            x += h;
            delta += h * h * state.evaluate(rhs, x, y);
        }
        y += delta;
        let y_second = state.evaluate(rhs, state.x + state.step, y);
        Trial {
            y,
            y_prime: delta / h + 0.5 * h * y_second,
            y_second,
        }
    }
}

impl OdeStepper for BulirschStoerStoermer {
    fn step(
        &mut self,
        state: &mut OdeState,
        rhs: &RightHandSide<'_>,
        settings: &OdeSettings,
    ) -> Result<f64> {
        loop {
            let mut table_y: Vec<Vec<f64>> = Vec::with_capacity(SUBSTEPS.len());
            let mut table_p: Vec<Vec<f64>> = Vec::with_capacity(SUBSTEPS.len());

            for (k, &n) in SUBSTEPS.iter().enumerate() {
                let trial = Self::trial_step(state, rhs, n);
                let mut row_y = Vec::with_capacity(k + 1);
                let mut row_p = Vec::with_capacity(k + 1);
                row_y.push(trial.y);
                row_p.push(trial.y_prime);
                for j in 1..=k {
                    let ratio = n as f64 / SUBSTEPS[k - j] as f64;
                    let factor = ratio * ratio - 1.0;
                    let y = row_y[j - 1] + (row_y[j - 1] - table_y[k - 1][j - 1]) / factor;
                    let p = row_p[j - 1] + (row_p[j - 1] - table_p[k - 1][j - 1]) / factor;
                    row_y.push(y);
                    row_p.push(p);
                }

                if k > 0 {
                    let y = row_y[k];
                    let p = row_p[k];
                    let error_y = (y - row_y[k - 1]).abs();
                    let error_p = (p - row_p[k - 1]).abs();
                    let scale_y = y.abs() + (state.step * p).abs();
                    let scale_p = p.abs() + (state.step * trial.y_second).abs();
                    if error_y <= settings.accuracy * scale_y && error_p <= settings.accuracy * scale_p
                    {
                        let taken = state.step;
                        state.x += taken;
                        state.y = y;
                        state.y_prime = p;
                        if k < self.target_k {
                            state.step *= 1.5;
                        } else if k > self.target_k {
                            state.step /= 1.5;
                        }
                        return Ok(taken);
                    }
                }

                if state.evaluations > settings.max_evaluations {
                    return Err(CoulombError::EvaluationLimit {
                        evaluations: settings.max_evaluations,
                    });
                }
                table_y.push(row_y);
                table_p.push(row_p);
            }

            state.step /= 2.0;
            if state.step.abs() <= f64::EPSILON * state.x.abs().max(f64::MIN_POSITIVE) {
                return Err(CoulombError::StepSizeUnderflow {
                    x: state.x,
                    step: state.step,
                });
            }
        }
    }
}

/// Advances `state` until `state.x` reaches `x1` exactly.
pub(crate) fn integrate<S: OdeStepper>(
    stepper: &mut S,
    state: &mut OdeState,
    rhs: &RightHandSide<'_>,
    settings: &OdeSettings,
    x1: f64,
) -> Result<()> {
    while state.x != x1 {
        let remaining = x1 - state.x;
        let mut magnitude = state.step.abs();
        if magnitude == 0.0 || !magnitude.is_finite() {
            magnitude = remaining.abs();
        }
        state.step = magnitude.min(remaining.abs()).copysign(remaining);

        let taken = stepper.step(state, rhs, settings)?;
        if taken == remaining {
            state.x = x1;
        }
        if !state.y.is_finite() || !state.y_prime.is_finite() {
            return Err(CoulombError::numerical("ODE integration"));
        }
        // Accepted steps count against the budget too.
        if state.evaluations > settings.max_evaluations {
            return Err(CoulombError::EvaluationLimit {
                evaluations: settings.max_evaluations,
            });
        }
    }
    Ok(())
}
