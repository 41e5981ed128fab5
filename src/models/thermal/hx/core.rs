//! Counter-flow heat exchanger posed as a two-point boundary value problem.
//!
//! Two streams exchange heat across a tube bundle of length `L`. The inner
//! stream enters at `x = 0` and the outer stream enters at `x = L`. The
//! unknowns are the specific enthalpy profiles `h0(x)` and `h1(x)`, which
//! satisfy a convective energy balance with one inlet condition at each end.
//! Fluid properties are resolved at every evaluation of the balance, so any
//! model implementing [`StateEvaluator`] can be used on either side.

mod config;
mod energy;
mod exergy;
mod given_duty;
mod input;
mod profile;
mod q_max;
mod solve;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::SolveConfig;
pub use energy::EnergyBalance;
pub use exergy::{exergy_destruction, exergy_entering};
pub use given_duty::{GivenDutyConfig, GivenDutyError, SizedExchanger};
pub use input::{FluidStream, Geometry, InputError, Streams};
pub use profile::{SolutionProfile, ThCurves};
pub use q_max::{EnthalpySweeps, HeatFlowLimit, LimitingStream, q_max};
pub use solve::{BvpSolution, SolveError};

use uom::si::f64::{HeatTransfer, Power, ThermalConductance};

use crate::support::{
    constraint::{Constrained, StrictlyPositive},
    thermo::StateEvaluator,
};

/// A counter-flow exchanger ready to be solved.
///
/// Holds the two streams, the bundle geometry, and a uniform heat transfer
/// coefficient `U`. Thermodynamic models are supplied per call, one per
/// stream, so each side can use a different fluid and property model.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterFlowHx<InnerFluid, OuterFluid> {
    streams: Streams<InnerFluid, OuterFluid>,
    geometry: Geometry,
    coefficient: HeatTransfer,
}

impl<InnerFluid, OuterFluid> CounterFlowHx<InnerFluid, OuterFluid> {
    /// Constructs an exchanger.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the heat transfer coefficient is not strictly positive.
    pub fn new(
        streams: Streams<InnerFluid, OuterFluid>,
        geometry: Geometry,
        coefficient: HeatTransfer,
    ) -> Result<Self, InputError> {
        let coefficient = StrictlyPositive::new(coefficient)
            .map_err(InputError::constraint("heat transfer coefficient"))?;
        Ok(Self::from_constrained(streams, geometry, coefficient))
    }

    #[must_use]
    pub fn from_constrained(
        streams: Streams<InnerFluid, OuterFluid>,
        geometry: Geometry,
        coefficient: Constrained<HeatTransfer, StrictlyPositive>,
    ) -> Self {
        Self {
            streams,
            geometry,
            coefficient: coefficient.into_inner(),
        }
    }

    #[must_use]
    pub fn streams(&self) -> &Streams<InnerFluid, OuterFluid> {
        &self.streams
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[must_use]
    pub fn coefficient(&self) -> HeatTransfer {
        self.coefficient
    }

    /// Overall conductance `UA`.
    #[must_use]
    pub fn conductance(&self) -> ThermalConductance {
        self.geometry.conductance(self.coefficient)
    }

    /// Builds the energy balance for this exchanger.
    pub fn energy_balance<'a, InnerThermo, OuterThermo>(
        &'a self,
        thermo_inner: &'a InnerThermo,
        thermo_outer: &'a OuterThermo,
    ) -> EnergyBalance<'a, InnerFluid, OuterFluid, InnerThermo, OuterThermo> {
        EnergyBalance::new(
            &self.streams,
            &self.geometry,
            self.coefficient,
            thermo_inner,
            thermo_outer,
        )
    }

    /// Evaluates the ideal counter-flow limit for this exchanger's streams.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::PropertyEvaluation`] if a state cannot be resolved.
    pub fn q_max(
        &self,
        thermo_inner: &impl StateEvaluator<InnerFluid>,
        thermo_outer: &impl StateEvaluator<OuterFluid>,
    ) -> Result<HeatFlowLimit, SolveError>
    where
        InnerFluid: Clone,
        OuterFluid: Clone,
    {
        q_max(&self.streams, thermo_inner, thermo_outer)
            .map_err(|err| SolveError::property("counter-flow limit", err))
    }

    /// Solves the energy balance on an adaptive collocation mesh.
    ///
    /// A solve that exhausts its node budget or meets a singular Jacobian is
    /// returned with the corresponding [`BvpSolution::status`]; it is not retried.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] if the configuration is invalid or a property
    /// evaluation fails.
    pub fn solve(
        &self,
        config: &SolveConfig,
        thermo_inner: &impl StateEvaluator<InnerFluid>,
        thermo_outer: &impl StateEvaluator<OuterFluid>,
    ) -> Result<BvpSolution, SolveError>
    where
        InnerFluid: Clone,
        OuterFluid: Clone,
    {
        solve::solve(
            &self.streams,
            &self.geometry,
            self.coefficient,
            config,
            thermo_inner,
            thermo_outer,
        )
    }

    /// Solves, resolves full states, and checks thermodynamic consistency.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError`] if the solve fails or does not converge, or if
    /// the converged profile violates the duty limit or the second law.
    pub fn solve_profile(
        &self,
        config: &SolveConfig,
        thermo_inner: &impl StateEvaluator<InnerFluid>,
        thermo_outer: &impl StateEvaluator<OuterFluid>,
    ) -> Result<(BvpSolution, SolutionProfile), SolveError>
    where
        InnerFluid: Clone,
        OuterFluid: Clone,
    {
        let solution = self.solve(config, thermo_inner, thermo_outer)?;
        let profile = solution.profile(&self.streams, thermo_inner, thermo_outer)?;
        profile.check_consistency(&solution.limit, config)?;
        Ok((solution, profile))
    }

    /// Finds the heat transfer coefficient that reaches a target duty magnitude.
    ///
    /// The coefficient stored in `self` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GivenDutyError`] if the target is unreachable, a solve fails,
    /// or the search does not converge.
    pub fn given_duty(
        &self,
        target: Constrained<Power, StrictlyPositive>,
        config: &GivenDutyConfig,
        thermo_inner: &impl StateEvaluator<InnerFluid>,
        thermo_outer: &impl StateEvaluator<OuterFluid>,
    ) -> Result<SizedExchanger, GivenDutyError>
    where
        InnerFluid: Clone,
        OuterFluid: Clone,
    {
        given_duty::given_duty(
            &self.streams,
            &self.geometry,
            target,
            config,
            thermo_inner,
            thermo_outer,
        )
    }
}

/// `points` evenly spaced values from `start` to `end`, both included.
fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points)
                .map(|i| {
                    if i == points - 1 {
                        end
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        heat_transfer::watt_per_square_meter_kelvin, power::watt,
        thermal_conductance::watt_per_kelvin,
    };

    use test_support::{
        air, air_water_streams, example_geometry, ntu_duty, water, water_air_streams,
    };

    fn coefficient(u: f64) -> HeatTransfer {
        HeatTransfer::new::<watt_per_square_meter_kelvin>(u)
    }

    #[test]
    fn linspace_hits_both_ends() {
        let values = linspace(0.0, 4.0, 5);
        assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(linspace(0.1, 0.7, 7).last(), Some(&0.7));
    }

    #[test]
    fn rejects_non_positive_coefficient() {
        let streams = air_water_streams(0.012, 354.0, 0.0213, 290.0);
        let result = CounterFlowHx::new(streams, example_geometry(), coefficient(0.0));
        assert!(matches!(
            result,
            Err(InputError::Constraint {
                quantity: "heat transfer coefficient",
                ..
            })
        ));
    }

    #[test]
    fn reference_scenario_reaches_the_limit() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = CounterFlowHx::new(
            air_water_streams(0.012, 354.0, 0.0213, 290.0),
            example_geometry(),
            coefficient(500.0),
        )
        .unwrap();
        assert_relative_eq!(
            hx.conductance().get::<watt_per_kelvin>(),
            753.98,
            epsilon = 0.01
        );

        let (solution, profile) = hx
            .solve_profile(&SolveConfig::default(), &thermo_air, &thermo_water)
            .unwrap();

        assert!(solution.success(), "{}", solution.message);
        let duty = profile.duty().get::<watt>();
        assert!(duty > 0.0);
        assert_relative_eq!(duty, ntu_duty(&hx, &thermo_air, &thermo_water), max_relative = 2e-3);
        assert!(profile.entropy_production().value >= 0.0);
    }

    #[test]
    fn moderate_ntu_matches_effectiveness_relation() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = CounterFlowHx::new(
            air_water_streams(0.012, 354.0, 0.0213, 290.0),
            example_geometry(),
            coefficient(20.0),
        )
        .unwrap();

        let (_, profile) = hx
            .solve_profile(&SolveConfig::default(), &thermo_air, &thermo_water)
            .unwrap();

        let expected = ntu_duty(&hx, &thermo_air, &thermo_water);
        assert_relative_eq!(profile.duty().get::<watt>(), expected, max_relative = 1e-3);
        // Energy released by the inner stream is absorbed by the outer one.
        assert_relative_eq!(
            profile.inner_duty().get::<watt>(),
            profile.duty().get::<watt>(),
            max_relative = 1e-3
        );
    }

    #[test]
    fn swapped_streams_still_converge() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = CounterFlowHx::new(
            water_air_streams(0.0213, 290.0, 0.012, 354.0),
            example_geometry(),
            coefficient(500.0),
        )
        .unwrap();

        let (solution, profile) = hx
            .solve_profile(&SolveConfig::default(), &thermo_water, &thermo_air)
            .unwrap();

        assert!(solution.success(), "{}", solution.message);
        // The hot outer stream is cooled, so the duty seen by it is negative.
        assert!(profile.duty().get::<watt>() < 0.0);
        assert_relative_eq!(
            profile.duty().get::<watt>().abs(),
            solution.limit.q_max.get::<watt>().abs(),
            max_relative = 2e-3
        );
    }

    #[test]
    fn equal_inlet_temperatures_transfer_nothing() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = CounterFlowHx::new(
            air_water_streams(0.012, 300.0, 0.0213, 300.0),
            example_geometry(),
            coefficient(500.0),
        )
        .unwrap();

        let (solution, profile) = hx
            .solve_profile(&SolveConfig::default(), &thermo_air, &thermo_water)
            .unwrap();

        assert_relative_eq!(solution.limit.q_max.get::<watt>(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(profile.duty().get::<watt>(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(profile.entropy_production().value, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn duty_grows_with_conductance() {
        let (thermo_air, thermo_water) = (air(), water());
        let config = SolveConfig::default();

        let duties: Vec<f64> = [5.0, 20.0, 80.0, 500.0]
            .into_iter()
            .map(|u| {
                let hx = CounterFlowHx::new(
                    air_water_streams(0.012, 354.0, 0.0213, 290.0),
                    example_geometry(),
                    coefficient(u),
                )
                .unwrap();
                let solution = hx.solve(&config, &thermo_air, &thermo_water).unwrap();
                assert!(solution.success());
                solution.duty().get::<watt>()
            })
            .collect();

        assert!(duties.windows(2).all(|w| w[1] >= w[0]), "{duties:?}");
    }

    #[test]
    fn solves_are_repeatable() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = CounterFlowHx::new(
            air_water_streams(0.012, 354.0, 0.0213, 290.0),
            example_geometry(),
            coefficient(100.0),
        )
        .unwrap();
        let config = SolveConfig::default();

        let (first, first_profile) = hx.solve_profile(&config, &thermo_air, &thermo_water).unwrap();
        let (second, second_profile) =
            hx.solve_profile(&config, &thermo_air, &thermo_water).unwrap();

        assert_eq!(first.status, second.status);
        assert_eq!(first.mesh, second.mesh);
        assert_eq!(first_profile.duty(), second_profile.duty());
        assert_eq!(
            first_profile.entropy_production(),
            second_profile.entropy_production()
        );
    }

    #[test]
    fn converged_solution_satisfies_boundary_conditions() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = CounterFlowHx::new(
            air_water_streams(0.012, 354.0, 0.0213, 290.0),
            example_geometry(),
            coefficient(500.0),
        )
        .unwrap();
        let config = SolveConfig::default();

        let solution = hx.solve(&config, &thermo_air, &thermo_water).unwrap();
        let balance = hx.energy_balance(&thermo_air, &thermo_water);

        let last = solution.mesh.len() - 1;
        let residuals = balance.bc(
            [solution.inner_enthalpy[0], solution.outer_enthalpy[0]],
            [solution.inner_enthalpy[last], solution.outer_enthalpy[last]],
        );
        for residual in residuals {
            assert!(residual.value.abs() < config.tolerance);
        }
    }
}
