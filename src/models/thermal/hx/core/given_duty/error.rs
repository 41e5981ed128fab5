use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::Power;

use crate::models::thermal::hx::core::SolveError;

/// Errors that can occur while sizing for a target duty.
#[derive(Debug, Error)]
pub enum GivenDutyError {
    /// A counter-flow solve failed.
    #[error("counter-flow solve failed")]
    Solve(#[from] SolveError),

    /// The bisection solver encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The solver reached the iteration limit without converging.
    #[error("solver hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Best duty residual achieved.
        residual: Power,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// No finite exchanger reaches the target.
    #[error("target duty {target:?} is not below the counter-flow limit {q_max:?}")]
    Unreachable { target: Power, q_max: Power },
}
