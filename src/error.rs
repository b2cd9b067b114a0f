use thiserror::Error;

/// Unified error type for Coulomb wave function evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoulombError {
    /// Raised when the angular momentum index is negative.
    #[error("angular momentum index must be non-negative, found {l}")]
    NegativeOrder { l: i32 },

    /// Raised when the radial argument is negative.
    #[error("radial argument rho must be non-negative, found {rho}")]
    NegativeRadius { rho: f64 },

    /// Raised when a quantity is only defined away from the origin.
    #[error("channel radius must be positive, found {rho}")]
    NonPositiveRadius { rho: f64 },

    /// Raised when an argument is NaN or infinite.
    #[error("argument `{name}` must be finite, found {value}")]
    NonFiniteArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// The value that was supplied.
        value: f64,
    },

    /// Raised when a requested accuracy lies outside `[2^-49, 1)`.
    #[error("accuracy must lie in [2^-49, 1), found {value}")]
    InvalidAccuracy { value: f64 },

    /// Raised when an iteration ceiling is configured as zero.
    #[error("iteration ceiling for {context} must be positive")]
    InvalidIterationLimit { context: &'static str },

    /// Raised when a series, continued fraction, or expansion misses the target accuracy.
    #[error("{method} did not converge after {iterations} iterations")]
    DidNotConverge {
        /// The numerical method that failed.
        method: &'static str,
        /// Number of terms evaluated before giving up.
        iterations: usize,
    },

    /// Raised when a method is asked for a point outside the region where it holds.
    #[error("{method} requires rho >= {turning_point}, found {rho}")]
    OutsideRegion {
        /// The numerical method that was refused.
        method: &'static str,
        /// The requested radial argument.
        rho: f64,
        /// Smallest radius the method accepts.
        turning_point: f64,
    },

    /// Raised when a series converges but its terms cancel too strongly to trust the sum.
    #[error("{method} lost precision to cancellation (largest term {ratio:.3e} times the sum)")]
    Cancellation {
        /// The numerical method that failed.
        method: &'static str,
        /// Ratio of the largest term to the final partial sum.
        ratio: f64,
    },

    /// Raised when the ODE step size shrinks below resolution without meeting the accuracy target.
    #[error("ODE step size underflowed at x = {x} (step {step})")]
    StepSizeUnderflow { x: f64, step: f64 },

    /// Raised when the ODE integrator exhausts its right-hand-side evaluation budget.
    #[error("ODE integration exceeded {evaluations} right-hand-side evaluations")]
    EvaluationLimit { evaluations: usize },

    /// Raised when numerical routines produce NaN or an unusable intermediate.
    #[error("encountered an invalid intermediate value during {context}")]
    NumericalError { context: &'static str },
}

impl CoulombError {
    /// Helper to format a [`DidNotConverge`](CoulombError::DidNotConverge) error.
    pub fn did_not_converge(method: &'static str, iterations: usize) -> Self {
        Self::DidNotConverge { method, iterations }
    }

    /// Helper for reporting numerical breakdown in an intermediate step.
    pub fn numerical(context: &'static str) -> Self {
        Self::NumericalError { context }
    }

    /// Whether the error reflects a numerical method giving up rather than invalid input.
    ///
    /// The dispatcher recovers from these by trying the next applicable regime;
    /// domain errors are returned to the caller immediately.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::DidNotConverge { .. }
                | Self::OutsideRegion { .. }
                | Self::Cancellation { .. }
                | Self::StepSizeUnderflow { .. }
                | Self::EvaluationLimit { .. }
                | Self::NumericalError { .. }
        )
    }

    /// Whether the error reflects invalid arguments or configuration.
    pub fn is_domain_error(&self) -> bool {
        !self.is_convergence_failure()
    }
}

/// Type alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, CoulombError>;
