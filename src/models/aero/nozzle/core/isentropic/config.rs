use twine_solvers::equation::bisection;

/// Solver configuration for the area–Mach inversion.
#[derive(Debug, Clone, Copy)]
pub struct IsentropicConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Absolute tolerance on the exit Mach number.
    pub mach_tol: f64,

    /// Absolute tolerance on the area ratio residual (achieved - target).
    pub area_ratio_tol: f64,

    /// Upper end of the supersonic Mach bracket.
    pub max_mach: f64,
}

impl Default for IsentropicConfig {
    fn default() -> Self {
        Self {
            max_iters: 200,
            mach_tol: 1e-12,
            area_ratio_tol: 1e-12,
            max_mach: 100.0,
        }
    }
}

impl IsentropicConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.mach_tol,
            x_rel_tol: 0.0,
            residual_tol: self.area_ratio_tol,
        }
    }
}
