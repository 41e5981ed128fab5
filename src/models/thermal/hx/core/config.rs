use uom::si::{f64::Power, power::watt, thermal_conductance::watt_per_kelvin};

use crate::support::{bvp, constraint::NonNegative, units::EntropyRate};

use super::SolveError;

/// Numerical settings for a counter-flow solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveConfig {
    /// Nodes in the initial uniform mesh, including both ends.
    pub mesh_points: usize,

    /// Collocation residual tolerance, also used for the boundary conditions.
    pub tolerance: f64,

    /// Largest mesh adaptive refinement may produce.
    pub max_nodes: usize,

    /// Newton iterations per refinement pass.
    pub max_newton_iterations: usize,

    /// Relative slack on `|duty| ≤ |q_max|`.
    pub duty_rel_tol: f64,

    /// Absolute slack on `|duty| ≤ |q_max|`.
    pub duty_abs_tol: Power,

    /// Absolute slack on `S_gen ≥ 0`.
    pub entropy_abs_tol: EntropyRate,

    /// Slack on `S_gen ≥ 0` relative to the summed endpoint entropy flows.
    pub entropy_rel_tol: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            mesh_points: 100,
            tolerance: 5e-3,
            max_nodes: 1000,
            max_newton_iterations: 8,
            duty_rel_tol: 1e-3,
            duty_abs_tol: Power::new::<watt>(1e-6),
            entropy_abs_tol: EntropyRate::new::<watt_per_kelvin>(1e-9),
            entropy_rel_tol: 1e-6,
        }
    }
}

impl SolveConfig {
    /// Checks that the settings can drive a solve.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Configuration`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), SolveError> {
        let reason = if self.mesh_points < 2 {
            format!("mesh_points must be at least 2, got {}", self.mesh_points)
        } else if self.mesh_points > self.max_nodes {
            format!(
                "mesh_points ({}) exceeds max_nodes ({})",
                self.mesh_points, self.max_nodes
            )
        } else if !(self.tolerance > 0.0) {
            format!("tolerance must be positive, got {}", self.tolerance)
        } else if self.max_newton_iterations == 0 {
            "max_newton_iterations must be at least 1".to_owned()
        } else if !non_negative(&[self.duty_rel_tol, self.duty_abs_tol.value]) {
            "duty tolerances must be non-negative".to_owned()
        } else if !non_negative(&[self.entropy_rel_tol, self.entropy_abs_tol.value]) {
            "entropy tolerances must be non-negative".to_owned()
        } else {
            return Ok(());
        };
        Err(SolveError::Configuration { reason })
    }

    pub(super) fn bvp(&self) -> bvp::Config {
        bvp::Config {
            tolerance: self.tolerance,
            bc_tolerance: self.tolerance,
            max_nodes: self.max_nodes,
            max_newton_iterations: self.max_newton_iterations,
        }
    }
}

fn non_negative(values: &[f64]) -> bool {
    values.iter().all(|&value| NonNegative::new(value).is_ok())
}
