//! Collocation solve of the counter-flow energy balance.

mod error;

pub use error::SolveError;

use tracing::{debug, info, warn};
use uom::{
    ConstZero,
    si::{
        available_energy::joule_per_kilogram,
        f64::{HeatTransfer, Length, MassRate, Power, ThermalConductance},
        length::meter,
        thermal_conductance::watt_per_kelvin,
    },
};

use crate::support::{bvp, thermo::StateEvaluator, units::SpecificEnthalpy};

use super::{
    EnergyBalance, EnthalpySweeps, Geometry, HeatFlowLimit, SolutionProfile, SolveConfig, Streams,
    linspace, q_max::q_max,
};

/// The outcome of a counter-flow solve.
///
/// A solution is returned whatever the [`bvp::Status`], so a caller can
/// decide whether to refine the settings and solve again.
#[derive(Debug, Clone)]
pub struct BvpSolution {
    pub status: bvp::Status,
    pub message: String,

    /// Final mesh from `0` to `L`.
    pub mesh: Vec<Length>,

    /// `h0` at each mesh node.
    pub inner_enthalpy: Vec<SpecificEnthalpy>,

    /// `h1` at each mesh node.
    pub outer_enthalpy: Vec<SpecificEnthalpy>,

    /// Ideal limit for the same streams.
    pub limit: HeatFlowLimit,

    /// Enthalpies spanning the limit, one per initial mesh point.
    pub sweeps: EnthalpySweeps,

    /// Overall conductance `UA`.
    pub conductance: ThermalConductance,

    /// Largest relative collocation residual on the final mesh.
    pub max_residual: f64,

    /// Largest absolute boundary residual, J/kg.
    pub max_bc_residual: f64,

    /// Newton and refinement passes performed.
    pub passes: usize,

    outer_mass_flow: MassRate,
}

impl BvpSolution {
    /// Returns `true` if the solve converged.
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == bvp::Status::Converged
    }

    /// Heat absorbed by the outer stream, `m1·(h1(0) − h1(L))`.
    ///
    /// Positive when the inner stream is the hotter one.
    #[must_use]
    pub fn duty(&self) -> Power {
        match (self.outer_enthalpy.first(), self.outer_enthalpy.last()) {
            (Some(&left), Some(&right)) => self.outer_mass_flow * (left - right),
            _ => Power::ZERO,
        }
    }

    /// Resolves full states at every mesh node.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::NotConverged`] for an unconverged solution, or
    /// [`SolveError::PropertyEvaluation`] if a state cannot be resolved.
    pub fn profile<InnerFluid, OuterFluid>(
        &self,
        streams: &Streams<InnerFluid, OuterFluid>,
        thermo_inner: &impl StateEvaluator<InnerFluid>,
        thermo_outer: &impl StateEvaluator<OuterFluid>,
    ) -> Result<SolutionProfile, SolveError>
    where
        InnerFluid: Clone,
        OuterFluid: Clone,
    {
        if !self.success() {
            return Err(SolveError::NotConverged {
                status: self.status,
                message: self.message.clone(),
            });
        }
        SolutionProfile::new(self, streams, thermo_inner, thermo_outer)
    }
}

/// Solves the energy balance from a uniform mesh and a flat initial guess.
///
/// Each stream's enthalpy starts at its inlet value over the whole mesh.
///
/// # Errors
///
/// Returns [`SolveError`] if the configuration is invalid, an inlet or
/// limiting state cannot be resolved, or the energy balance fails.
pub(super) fn solve<InnerFluid, OuterFluid>(
    streams: &Streams<InnerFluid, OuterFluid>,
    geometry: &Geometry,
    coefficient: HeatTransfer,
    config: &SolveConfig,
    thermo_inner: &impl StateEvaluator<InnerFluid>,
    thermo_outer: &impl StateEvaluator<OuterFluid>,
) -> Result<BvpSolution, SolveError>
where
    InnerFluid: Clone,
    OuterFluid: Clone,
{
    config.validate()?;

    let limit = q_max(streams, thermo_inner, thermo_outer)
        .map_err(|err| SolveError::property("counter-flow limit", err))?;
    let conductance = geometry.conductance(coefficient);

    let sweeps = limit.enthalpy_sweeps(streams, config.mesh_points);
    debug!(
        q_max = ?limit.q_max,
        limiting = ?limit.limiting,
        ua_w_per_k = conductance.get::<watt_per_kelvin>(),
        inner_bracket = ?(sweeps.inner.first(), sweeps.inner.last()),
        outer_bracket = ?(sweeps.outer.first(), sweeps.outer.last()),
        "counter-flow limit"
    );

    let balance = EnergyBalance::new(streams, geometry, coefficient, thermo_inner, thermo_outer);
    let mesh = linspace(0.0, geometry.length().get::<meter>(), config.mesh_points);
    let guess = vec![
        [
            streams.inner.inlet_enthalpy().get::<joule_per_kilogram>(),
            streams.outer.inlet_enthalpy().get::<joule_per_kilogram>(),
        ];
        mesh.len()
    ];

    let solution =
        bvp::solve(&balance, mesh, guess, &config.bvp()).map_err(SolveError::from_bvp)?;

    let result = BvpSolution {
        status: solution.status,
        max_residual: solution.max_rms_residual(),
        max_bc_residual: solution.max_bc_residual(),
        passes: solution.passes,
        mesh: solution.mesh.iter().copied().map(Length::new::<meter>).collect(),
        inner_enthalpy: solution
            .y
            .iter()
            .map(|y| SpecificEnthalpy::new::<joule_per_kilogram>(y[0]))
            .collect(),
        outer_enthalpy: solution
            .y
            .iter()
            .map(|y| SpecificEnthalpy::new::<joule_per_kilogram>(y[1]))
            .collect(),
        message: solution.message,
        limit,
        sweeps,
        conductance,
        outer_mass_flow: streams.outer.mass_flow(),
    };

    if result.success() {
        info!(
            nodes = result.mesh.len(),
            passes = result.passes,
            duty = ?result.duty(),
            q_max = ?result.limit.q_max,
            "counter-flow solve converged"
        );
    } else {
        warn!(
            status = ?result.status,
            nodes = result.mesh.len(),
            max_residual = result.max_residual,
            "counter-flow solve did not converge: {}",
            result.message
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{heat_transfer::watt_per_square_meter_kelvin, power::watt};

    use crate::models::thermal::hx::core::test_support::{
        air, air_water_streams, example_geometry, water,
    };

    fn coefficient(u: f64) -> HeatTransfer {
        HeatTransfer::new::<watt_per_square_meter_kelvin>(u)
    }

    #[test]
    fn mesh_spans_the_exchanger() {
        let streams = air_water_streams(0.012, 354.0, 0.0213, 290.0);
        let geometry = example_geometry();

        let solution = solve(
            &streams,
            &geometry,
            coefficient(500.0),
            &SolveConfig::default(),
            &air(),
            &water(),
        )
        .unwrap();

        assert!(solution.success(), "{}", solution.message);
        assert_eq!(solution.mesh.first(), Some(&Length::new::<meter>(0.0)));
        assert_eq!(solution.mesh.last(), Some(&geometry.length()));
        assert!(solution.mesh.len() >= 100);
        assert_eq!(solution.inner_enthalpy.len(), solution.mesh.len());
        assert_eq!(solution.outer_enthalpy.len(), solution.mesh.len());
        assert!(solution.max_residual <= 5e-3);
        assert!(solution.max_bc_residual <= 5e-3);
        assert_relative_eq!(
            solution.conductance.get::<watt_per_kelvin>(),
            240.0 * std::f64::consts::PI,
            max_relative = 1e-12
        );
    }

    #[test]
    fn reference_duty_is_near_the_limit() {
        let streams = air_water_streams(0.012, 354.0, 0.0213, 290.0);

        let solution = solve(
            &streams,
            &example_geometry(),
            coefficient(500.0),
            &SolveConfig::default(),
            &air(),
            &water(),
        )
        .unwrap();

        // NTU ≈ 62, so the air leaves within a fraction of a kelvin of 290 K.
        let duty = solution.duty().get::<watt>();
        assert_relative_eq!(duty, -solution.limit.q_max.get::<watt>(), max_relative = 1e-3);
        assert!(duty > 770.0 && duty < 775.0, "duty = {duty}");
    }

    #[test]
    fn invalid_configuration_is_rejected_before_solving() {
        let streams = air_water_streams(0.012, 354.0, 0.0213, 290.0);
        let config = SolveConfig {
            mesh_points: 1,
            ..SolveConfig::default()
        };

        let result = solve(
            &streams,
            &example_geometry(),
            coefficient(500.0),
            &config,
            &air(),
            &water(),
        );

        assert!(matches!(result, Err(SolveError::Configuration { .. })));
    }

    #[test]
    fn exhausted_node_budget_is_reported_not_raised() {
        let streams = air_water_streams(0.012, 354.0, 0.0213, 290.0);
        let config = SolveConfig {
            mesh_points: 3,
            max_nodes: 4,
            tolerance: 1e-9,
            ..SolveConfig::default()
        };

        let solution = solve(
            &streams,
            &example_geometry(),
            coefficient(20.0),
            &config,
            &air(),
            &water(),
        )
        .unwrap();

        assert_eq!(solution.status, bvp::Status::MaxNodesExceeded);
        assert!(!solution.success());
        assert!(matches!(
            solution.profile(&streams, &air(), &water()),
            Err(SolveError::NotConverged {
                status: bvp::Status::MaxNodesExceeded,
                ..
            })
        ));
    }

    #[test]
    fn sweeps_follow_the_initial_mesh() {
        let streams = air_water_streams(0.012, 354.0, 0.0213, 290.0);
        let config = SolveConfig {
            mesh_points: 40,
            ..SolveConfig::default()
        };

        let solution = solve(
            &streams,
            &example_geometry(),
            coefficient(500.0),
            &config,
            &air(),
            &water(),
        )
        .unwrap();

        let sweeps = &solution.sweeps;
        assert_eq!(sweeps.inner.len(), 40);
        assert_eq!(sweeps.outer.len(), 40);
        assert_eq!(sweeps.inner[0], streams.inner.inlet_enthalpy());
        assert_eq!(sweeps.outer[39], streams.outer.inlet_enthalpy());

        // The inner sweep reaches the limit exit enthalpy of the inner stream.
        assert_relative_eq!(
            sweeps.inner[39].get::<joule_per_kilogram>(),
            solution.limit.inner_exit.enthalpy.get::<joule_per_kilogram>(),
            max_relative = 1e-9
        );
    }
}
