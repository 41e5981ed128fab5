use twine_solvers::equation::bisection;
use uom::si::{
    f64::{HeatTransfer, Power},
    heat_transfer::watt_per_square_meter_kelvin,
    power::watt,
};

use crate::models::thermal::hx::core::SolveConfig;

/// Solver configuration for sizing against a target duty.
#[derive(Debug, Clone, Copy)]
pub struct GivenDutyConfig {
    /// Maximum iteration count for the bisection solve.
    pub max_iters: usize,

    /// Search interval for the heat transfer coefficient.
    pub bracket: [HeatTransfer; 2],

    /// Absolute tolerance on the coefficient.
    pub coefficient_tol: HeatTransfer,

    /// Absolute tolerance on the duty residual (`|duty| - target`).
    pub duty_tol: Power,

    /// Settings for each inner counter-flow solve.
    pub solve: SolveConfig,
}

impl Default for GivenDutyConfig {
    fn default() -> Self {
        Self {
            max_iters: 100,
            bracket: [
                HeatTransfer::new::<watt_per_square_meter_kelvin>(1.0),
                HeatTransfer::new::<watt_per_square_meter_kelvin>(5000.0),
            ],
            coefficient_tol: HeatTransfer::new::<watt_per_square_meter_kelvin>(1e-6),
            duty_tol: Power::new::<watt>(1e-3),
            solve: SolveConfig::default(),
        }
    }
}

impl GivenDutyConfig {
    /// Converts this configuration into a bisection solver configuration.
    pub(super) fn bisection(&self) -> bisection::Config {
        bisection::Config {
            max_iters: self.max_iters,
            x_abs_tol: self.coefficient_tol.get::<watt_per_square_meter_kelvin>(),
            x_rel_tol: 0.0,
            residual_tol: self.duty_tol.get::<watt>(),
        }
    }

    pub(super) fn bracket_si(&self) -> [f64; 2] {
        self.bracket
            .map(|coefficient| coefficient.get::<watt_per_square_meter_kelvin>())
    }
}
