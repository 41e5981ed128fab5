//! Iterative sizing for a target duty.
//!
//! This module searches for the uniform heat transfer coefficient at which
//! the converged counter-flow duty matches a requested magnitude. Geometry
//! and streams are held fixed; only `U` varies.

mod config;
mod error;
mod problem;

pub use config::GivenDutyConfig;
pub use error::GivenDutyError;

use tracing::info;
use twine_solvers::equation::bisection;
use uom::si::{
    f64::{HeatTransfer, Power},
    heat_transfer::watt_per_square_meter_kelvin,
    power::watt,
};

use crate::support::{
    constraint::{Constrained, StrictlyPositive},
    thermo::StateEvaluator,
};

use super::{BvpSolution, Geometry, SolveError, Streams, q_max::q_max};

use problem::{GivenDutyModel, GivenDutyProblem};

/// A coefficient found by sizing, with the solve it produced.
#[derive(Debug, Clone)]
pub struct SizedExchanger {
    pub coefficient: HeatTransfer,
    pub solution: BvpSolution,
}

/// Finds the heat transfer coefficient that reaches `|duty| = target`.
///
/// Uses bisection over [`GivenDutyConfig::bracket`], solving the energy
/// balance at every candidate coefficient.
///
/// # Errors
///
/// Returns [`GivenDutyError::Unreachable`] if the target is not below
/// `|q_max|`, and other [`GivenDutyError`] variants if a solve fails or the
/// search does not converge.
pub(super) fn given_duty<InnerFluid, OuterFluid>(
    streams: &Streams<InnerFluid, OuterFluid>,
    geometry: &Geometry,
    target: Constrained<Power, StrictlyPositive>,
    config: &GivenDutyConfig,
    thermo_inner: &impl StateEvaluator<InnerFluid>,
    thermo_outer: &impl StateEvaluator<OuterFluid>,
) -> Result<SizedExchanger, GivenDutyError>
where
    InnerFluid: Clone,
    OuterFluid: Clone,
{
    let target = target.into_inner();

    let limit = q_max(streams, thermo_inner, thermo_outer)
        .map_err(|err| SolveError::property("counter-flow limit", err))?;
    if target >= limit.q_max.abs() {
        return Err(GivenDutyError::Unreachable {
            target,
            q_max: limit.q_max,
        });
    }

    let model = GivenDutyModel::new(streams, geometry, &config.solve, thermo_inner, thermo_outer);
    let problem = GivenDutyProblem::new(target);

    let solution = bisection::solve(
        &model,
        &problem,
        config.bracket_si(),
        &config.bisection(),
        |event: &bisection::Event<'_, _, _>| {
            // An unconverged solve is taken as overshooting the target, which
            // moves the search towards smaller coefficients.
            if event.result().is_err() {
                return Some(bisection::Action::assume_positive());
            }
            None
        },
    )?;

    if solution.status != bisection::Status::Converged {
        return Err(GivenDutyError::MaxIters {
            residual: Power::new::<watt>(solution.residual),
            iters: solution.iters,
        });
    }

    let sized = solution.snapshot.output;
    info!(
        coefficient_w_per_m2_k = sized.coefficient.get::<watt_per_square_meter_kelvin>(),
        duty = ?sized.solution.duty(),
        iters = solution.iters,
        "sized for target duty"
    );

    Ok(sized)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::thermal::hx::core::{
        CounterFlowHx, SolveConfig,
        test_support::{air, air_water_streams, example_geometry, water},
    };

    fn coarse() -> GivenDutyConfig {
        GivenDutyConfig {
            bracket: [
                HeatTransfer::new::<watt_per_square_meter_kelvin>(1.0),
                HeatTransfer::new::<watt_per_square_meter_kelvin>(200.0),
            ],
            coefficient_tol: HeatTransfer::new::<watt_per_square_meter_kelvin>(1e-4),
            duty_tol: Power::new::<watt>(1e-2),
            solve: SolveConfig {
                mesh_points: 30,
                ..SolveConfig::default()
            },
            ..GivenDutyConfig::default()
        }
    }

    #[test]
    fn roundtrip() {
        let (thermo_air, thermo_water) = (air(), water());
        let config = coarse();
        let hx = CounterFlowHx::new(
            air_water_streams(0.012, 354.0, 0.0213, 290.0),
            example_geometry(),
            HeatTransfer::new::<watt_per_square_meter_kelvin>(20.0),
        )
        .unwrap();
        let baseline = hx.solve(&config.solve, &thermo_air, &thermo_water).unwrap();
        assert!(baseline.success());

        let sized = hx
            .given_duty(
                StrictlyPositive::new(baseline.duty()).unwrap(),
                &config,
                &thermo_air,
                &thermo_water,
            )
            .expect("duty sizing should succeed");

        assert_relative_eq!(
            sized.coefficient.get::<watt_per_square_meter_kelvin>(),
            20.0,
            max_relative = 1e-2
        );
        assert_relative_eq!(
            sized.solution.duty().get::<watt>(),
            baseline.duty().get::<watt>(),
            epsilon = 0.05
        );
    }

    #[test]
    fn target_at_the_limit_is_unreachable() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = CounterFlowHx::new(
            air_water_streams(0.012, 354.0, 0.0213, 290.0),
            example_geometry(),
            HeatTransfer::new::<watt_per_square_meter_kelvin>(20.0),
        )
        .unwrap();
        let limit = hx.q_max(&thermo_air, &thermo_water).unwrap();

        let result = hx.given_duty(
            StrictlyPositive::new(limit.q_max.abs() * 1.01).unwrap(),
            &coarse(),
            &thermo_air,
            &thermo_water,
        );

        assert!(matches!(result, Err(GivenDutyError::Unreachable { .. })));
    }

    #[test]
    fn config_maps_to_bisection() {
        let config = GivenDutyConfig::default();
        let bisection = config.bisection();

        assert_eq!(bisection.max_iters, 100);
        assert_relative_eq!(bisection.x_abs_tol, 1e-6);
        assert_relative_eq!(bisection.residual_tol, 1e-3);
        assert_eq!(config.bracket_si(), [1.0, 5000.0]);
    }
}
