//! Counter-flow heat exchanger models.
//!
//! This module provides a [`twine_core::Model`] implementation for a
//! counter-flow exchanger solved as a boundary value problem.
//! The computational core is in the internal [`core`] module; its public
//! types are re-exported here.

pub mod config;
pub mod report;

pub(crate) mod core;

pub use self::core::{
    BvpSolution, CounterFlowHx, EnergyBalance, EnthalpySweeps, FluidStream, Geometry,
    GivenDutyConfig, GivenDutyError, HeatFlowLimit, InputError, LimitingStream, SizedExchanger,
    SolutionProfile, SolveConfig, SolveError, Streams, ThCurves, exergy_destruction,
    exergy_entering, q_max,
};

use twine_core::Model;
use uom::si::f64::{Power, Pressure, ThermodynamicTemperature};

use crate::support::{
    thermo::{
        ReferenceEnvironment,
        capability::{HasEnthalpy, HasEntropy, HasQuality, StateFrom, ThermoModel},
    },
    units::{EntropyRate, SpecificEnthalpy},
};

/// Solves a [`CounterFlowHx`] and evaluates its entropy and exergy balance.
///
/// Each stream gets its own thermodynamic model.
#[derive(Debug, Clone)]
pub struct CounterFlowModel<InnerThermo, OuterThermo> {
    pub thermo_inner: InnerThermo,
    pub thermo_outer: OuterThermo,
    pub config: SolveConfig,
    pub environment: ReferenceEnvironment,
}

impl<InnerThermo, OuterThermo> CounterFlowModel<InnerThermo, OuterThermo> {
    /// Creates a model with default solve settings and reference environment.
    pub fn new(thermo_inner: InnerThermo, thermo_outer: OuterThermo) -> Self {
        Self {
            thermo_inner,
            thermo_outer,
            config: SolveConfig::default(),
            environment: ReferenceEnvironment::default(),
        }
    }
}

/// Everything a converged, consistent counter-flow solve yields.
#[derive(Debug, Clone)]
pub struct CounterFlowOutput {
    pub solution: BvpSolution,
    pub profile: SolutionProfile,

    /// Heat absorbed by the outer stream.
    pub duty: Power,
    pub q_max: Power,
    pub entropy_production: EntropyRate,

    /// `T_ref·S_gen`.
    pub exergy_destruction: Power,

    /// Flow exergy carried in by both inlets.
    pub exergy_entering: Power,
}

impl<InnerThermo, OuterThermo> Model for CounterFlowModel<InnerThermo, OuterThermo>
where
    InnerThermo: ThermoModel
        + HasEnthalpy
        + HasEntropy
        + HasQuality
        + StateFrom<(<InnerThermo as ThermoModel>::Fluid, ThermodynamicTemperature, Pressure)>
        + StateFrom<(<InnerThermo as ThermoModel>::Fluid, Pressure, SpecificEnthalpy)>,
    OuterThermo: ThermoModel
        + HasEnthalpy
        + HasEntropy
        + HasQuality
        + StateFrom<(<OuterThermo as ThermoModel>::Fluid, ThermodynamicTemperature, Pressure)>
        + StateFrom<(<OuterThermo as ThermoModel>::Fluid, Pressure, SpecificEnthalpy)>,
    InnerThermo::Fluid: Clone,
    OuterThermo::Fluid: Clone,
{
    type Input = CounterFlowHx<InnerThermo::Fluid, OuterThermo::Fluid>;
    type Output = CounterFlowOutput;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self.environment.validate()?;

        let (solution, profile) =
            input.solve_profile(&self.config, &self.thermo_inner, &self.thermo_outer)?;

        let exergy_entering = exergy_entering(
            input.streams(),
            &self.thermo_inner,
            &self.thermo_outer,
            &self.environment,
        )
        .map_err(|source| SolveError::PropertyEvaluation {
            context: "entering exergy".to_owned(),
            source,
        })?;

        let entropy_production = profile.entropy_production();

        Ok(CounterFlowOutput {
            duty: profile.duty(),
            q_max: solution.limit.q_max,
            entropy_production,
            exergy_destruction: exergy_destruction(entropy_production, &self.environment),
            exergy_entering,
            solution,
            profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{HeatTransfer, Length, MassRate, Pressure, ThermodynamicTemperature},
        heat_transfer::watt_per_square_meter_kelvin,
        length::meter,
        mass_rate::kilogram_per_second,
        power::watt,
        pressure::pascal,
        thermodynamic_temperature::kelvin,
    };

    use crate::support::thermo::{
        EnvironmentError,
        fluid::{Air, Water},
        model::{Incompressible, PerfectGas},
    };

    #[test]
    fn model_reports_duty_and_exergy() {
        let thermo_air = PerfectGas::<Air>::new().unwrap();
        let thermo_water = Incompressible::<Water>::new().unwrap();

        let inner = FluidStream::from_inlet_temperature(
            &thermo_air,
            Air,
            MassRate::new::<kilogram_per_second>(0.012),
            Pressure::new::<pascal>(5e5),
            ThermodynamicTemperature::new::<kelvin>(354.0),
        )
        .unwrap();
        let outer = FluidStream::from_inlet_temperature(
            &thermo_water,
            Water,
            MassRate::new::<kilogram_per_second>(0.0213),
            Pressure::new::<pascal>(4e5),
            ThermodynamicTemperature::new::<kelvin>(290.0),
        )
        .unwrap();
        let geometry = Geometry::new(
            Length::new::<meter>(4.0),
            Length::new::<meter>(0.01),
            Length::new::<meter>(0.0125),
            12,
        )
        .unwrap();
        let hx = CounterFlowHx::new(
            Streams { inner, outer },
            geometry,
            HeatTransfer::new::<watt_per_square_meter_kelvin>(500.0),
        )
        .unwrap();

        let model = CounterFlowModel::new(thermo_air, thermo_water);
        let output = model.call(&hx).unwrap();

        assert!(output.solution.success());
        assert!(output.duty.get::<watt>() > 0.0);
        assert!(output.entropy_production.value > 0.0);
        assert_relative_eq!(
            output.exergy_destruction.get::<watt>(),
            output.entropy_production.value * 298.15,
            max_relative = 1e-12
        );
        // The exchanger cannot destroy more exergy than enters it.
        assert!(output.exergy_destruction < output.exergy_entering);
    }

    /// Runs any model through the trait alone, as generic callers do.
    fn call_model<M: Model>(model: &M, input: &M::Input) -> Result<M::Output, M::Error> {
        model.call(input)
    }

    #[test]
    fn runtime_backends_drive_the_model() {
        let case = config::from_yaml_str(include_str!("../../../demos/air_water.yaml")).unwrap();
        let model = CounterFlowModel {
            thermo_inner: case.thermo_inner,
            thermo_outer: case.thermo_outer,
            config: case.solve,
            environment: case.environment,
        };

        let output = call_model(&model, &case.hx).unwrap();

        assert!(output.solution.success());
        assert!(output.duty.get::<watt>() > 0.0);
        assert!(output.duty.abs() <= output.q_max.abs() * 1.001);
        assert!(output.entropy_production.value > 0.0);
    }

    #[test]
    fn non_physical_environment_is_rejected() {
        let thermo_air = PerfectGas::<Air>::new().unwrap();
        let thermo_water = Incompressible::<Water>::new().unwrap();
        let hx = CounterFlowHx::new(
            Streams {
                inner: FluidStream::from_inlet_temperature(
                    &thermo_air,
                    Air,
                    MassRate::new::<kilogram_per_second>(0.012),
                    Pressure::new::<pascal>(5e5),
                    ThermodynamicTemperature::new::<kelvin>(354.0),
                )
                .unwrap(),
                outer: FluidStream::from_inlet_temperature(
                    &thermo_water,
                    Water,
                    MassRate::new::<kilogram_per_second>(0.0213),
                    Pressure::new::<pascal>(4e5),
                    ThermodynamicTemperature::new::<kelvin>(290.0),
                )
                .unwrap(),
            },
            Geometry::new(
                Length::new::<meter>(4.0),
                Length::new::<meter>(0.01),
                Length::new::<meter>(0.0125),
                12,
            )
            .unwrap(),
            HeatTransfer::new::<watt_per_square_meter_kelvin>(500.0),
        )
        .unwrap();

        let mut model = CounterFlowModel::new(thermo_air, thermo_water);
        model.environment.temperature = ThermodynamicTemperature::new::<kelvin>(0.0);

        assert!(matches!(
            model.call(&hx),
            Err(SolveError::Environment(EnvironmentError::Temperature { .. }))
        ));
    }
}
