use super::Error;

/// Tolerances and limits for a boundary value solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    /// Allowed relative RMS residual of the collocation polynomial in each interval.
    pub tolerance: f64,

    /// Allowed absolute boundary condition residual.
    pub bc_tolerance: f64,

    /// Largest mesh the refinement may produce.
    pub max_nodes: usize,

    /// Newton iterations per refinement pass.
    pub max_newton_iterations: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tolerance: 5e-3,
            bc_tolerance: 5e-3,
            max_nodes: 1000,
            max_newton_iterations: 8,
        }
    }
}

impl Config {
    pub(super) fn validate<E: std::error::Error + 'static>(&self) -> Result<(), Error<E>> {
        if !(self.tolerance > 0.0) {
            return Err(Error::Tolerance(self.tolerance));
        }
        if !(self.bc_tolerance > 0.0) {
            return Err(Error::Tolerance(self.bc_tolerance));
        }
        if self.max_newton_iterations == 0 {
            return Err(Error::NewtonIterations);
        }
        Ok(())
    }
}
