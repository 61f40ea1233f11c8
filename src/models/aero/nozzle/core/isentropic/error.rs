use thiserror::Error;
use twine_solvers::equation::bisection;

/// Errors from the isentropic nozzle estimate.
#[derive(Debug, Error)]
pub enum IsentropicError {
    /// The wall has no positive radius to use as a throat.
    #[error("wall radius must be positive; smallest is {min_radius}")]
    Throat { min_radius: f64 },

    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual}")]
    MaxIters {
        /// Best area ratio residual achieved.
        residual: f64,

        /// Iteration count performed by the solver.
        iters: usize,
    },
}

/// The area–Mach relation overflowed for a trial Mach number.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("area ratio is not finite at M = {mach}")]
pub struct AreaRatioOverflow {
    pub mach: f64,
}
