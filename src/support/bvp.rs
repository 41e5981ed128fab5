//! Two-point boundary value problems for first-order ODE systems.
//!
//! Solves `y' = f(x, y)` on `[a, b]` subject to `g(y(a), y(b)) = 0` with
//! fourth-order collocation (the three-stage Lobatto IIIA scheme, whose
//! interval residual is Simpson's rule) and adaptive mesh refinement.
//!
//! Each pass runs a damped Newton iteration on the collocation equations,
//! estimates the residual of the piecewise-cubic solution inside every
//! interval, and inserts nodes where that residual exceeds the tolerance.
//! The solve ends when every interval meets the tolerance and the boundary
//! residuals meet theirs, when refinement would exceed the node budget, when
//! repeated passes cannot satisfy the boundary conditions, or when the
//! collocation Jacobian is singular. The failures are reported through
//! [`Status`], not as errors.

mod collocation;
mod config;
mod error;
mod mesh;

pub use config::Config;
pub use error::Error;

use tracing::debug;

use collocation::{Newton, NewtonOutcome};

/// Newton passes allowed on an unchanged mesh while only the boundary
/// residuals are out of tolerance.
const MAX_BOUNDARY_PASSES: usize = 10;

/// A first-order system of `N` ODEs with `N` two-point boundary conditions.
pub trait BoundaryValueProblem<const N: usize> {
    /// Error raised when the right-hand side cannot be evaluated.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns `dy/dx` at `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the derivative cannot be evaluated.
    fn rhs(&self, x: f64, y: &[f64; N]) -> Result<[f64; N], Self::Error>;

    /// Returns the boundary residuals `g(y(a), y(b))`.
    fn boundary_residuals(&self, ya: &[f64; N], yb: &[f64; N]) -> [f64; N];
}

/// How a solve ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every interval met the residual tolerance and every boundary
    /// residual met [`Config::bc_tolerance`].
    Converged,

    /// Refinement would have exceeded [`Config::max_nodes`].
    MaxNodesExceeded,

    /// The linearized collocation system could not be solved.
    SingularJacobian,

    /// The collocation residuals converged but the boundary residuals did not.
    BoundaryResiduals,
}

impl Status {
    /// Human-readable description of the status.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Converged => "the algorithm converged to the desired accuracy",
            Self::MaxNodesExceeded => "the maximum number of mesh nodes is exceeded",
            Self::SingularJacobian => {
                "a singular Jacobian was encountered when solving the collocation system"
            }
            Self::BoundaryResiduals => "the solver was unable to satisfy the boundary conditions",
        }
    }
}

/// The result of a boundary value solve.
///
/// A solution is returned for every status so callers can inspect how far
/// the solver got. Only a [`Status::Converged`] solution meets the tolerance.
#[derive(Debug, Clone)]
pub struct Solution<const N: usize> {
    pub status: Status,

    /// Final mesh, strictly increasing from `a` to `b`.
    pub mesh: Vec<f64>,

    /// Solution values at each mesh node.
    pub y: Vec<[f64; N]>,

    /// Derivatives `f(x, y)` at each mesh node.
    pub yp: Vec<[f64; N]>,

    /// Relative RMS collocation residual of each interval.
    pub rms_residuals: Vec<f64>,

    /// Boundary residuals `g(y(a), y(b))` of the returned solution.
    pub bc_residuals: [f64; N],

    /// Number of Newton/refinement passes performed.
    pub passes: usize,

    pub message: String,
}

impl<const N: usize> Solution<N> {
    /// Returns `true` if the solve converged.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Status::Converged
    }

    /// Largest interval residual, or zero for an empty residual list.
    #[must_use]
    pub fn max_rms_residual(&self) -> f64 {
        self.rms_residuals.iter().copied().fold(0.0, f64::max)
    }

    /// Largest absolute boundary residual.
    #[must_use]
    pub fn max_bc_residual(&self) -> f64 {
        max_abs(&self.bc_residuals)
    }
}

/// Solves a boundary value problem from an initial mesh and guess.
///
/// # Errors
///
/// Returns [`Error`] if the inputs are malformed or the right-hand side fails.
/// Convergence failures are reported through [`Solution::status`].
pub fn solve<P, const N: usize>(
    problem: &P,
    mesh: Vec<f64>,
    guess: Vec<[f64; N]>,
    config: &Config,
) -> Result<Solution<N>, Error<P::Error>>
where
    P: BoundaryValueProblem<N>,
{
    config.validate()?;
    mesh::validate(&mesh, &guess, config.max_nodes)?;

    let mut x = mesh;
    let mut y = guess;
    let mut passes = 0;
    let mut boundary_passes = 0;

    loop {
        passes += 1;

        let Newton {
            outcome,
            collocation,
        } = collocation::newton(problem, &x, &mut y, config)?;
        let bc = problem.boundary_residuals(&y[0], &y[y.len() - 1]);

        if outcome == NewtonOutcome::Singular {
            let status = Status::SingularJacobian;
            return Ok(finish(status, x, y, collocation.f, Vec::new(), bc, passes));
        }

        let rms = collocation::rms_residuals(problem, &x, &y, &collocation)?;
        let max_rms = rms.iter().copied().fold(0.0, f64::max);
        let max_bc = max_abs(&bc);
        debug!(
            pass = passes,
            nodes = x.len(),
            max_rms,
            max_bc,
            newton = ?outcome,
            "collocation pass"
        );

        if max_rms <= config.tolerance {
            if max_bc <= config.bc_tolerance {
                return Ok(finish(Status::Converged, x, y, collocation.f, rms, bc, passes));
            }

            // Refinement cannot help; iterate again from the current solution.
            boundary_passes += 1;
            if boundary_passes >= MAX_BOUNDARY_PASSES {
                let status = Status::BoundaryResiduals;
                return Ok(finish(status, x, y, collocation.f, rms, bc, passes));
            }
            continue;
        }

        let (refined_x, refined_y) = mesh::refine(&x, &y, &collocation.f, &rms, config.tolerance);
        if refined_x.len() > config.max_nodes {
            debug!(
                requested = refined_x.len(),
                max_nodes = config.max_nodes,
                "node budget exhausted"
            );
            let status = Status::MaxNodesExceeded;
            return Ok(finish(status, x, y, collocation.f, rms, bc, passes));
        }

        x = refined_x;
        y = refined_y;
        boundary_passes = 0;
    }
}

fn finish<const N: usize>(
    status: Status,
    mesh: Vec<f64>,
    y: Vec<[f64; N]>,
    yp: Vec<[f64; N]>,
    rms_residuals: Vec<f64>,
    bc_residuals: [f64; N],
    passes: usize,
) -> Solution<N> {
    Solution {
        status,
        mesh,
        y,
        yp,
        rms_residuals,
        bc_residuals,
        passes,
        message: status.message().to_owned(),
    }
}

fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |max, v| max.max(v.abs()))
}
