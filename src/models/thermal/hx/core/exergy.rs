//! Exergy bookkeeping against a reference environment.

use uom::si::f64::Power;

use crate::support::{
    thermo::{EvaluationError, ReferenceEnvironment, StateEvaluator},
    units::EntropyRate,
};

use super::Streams;

/// Flow exergy carried into the exchanger by both streams.
///
/// Sums `m·ex(h_in, p)` over the two inlets, where
/// `ex = (h − h_ref) − T_ref·(s − s_ref)` and the reference state is each
/// fluid at the environment's temperature and pressure.
///
/// # Errors
///
/// Returns [`EvaluationError`] if an inlet or reference state cannot be resolved.
pub fn exergy_entering<InnerFluid, OuterFluid>(
    streams: &Streams<InnerFluid, OuterFluid>,
    thermo_inner: &impl StateEvaluator<InnerFluid>,
    thermo_outer: &impl StateEvaluator<OuterFluid>,
    environment: &ReferenceEnvironment,
) -> Result<Power, EvaluationError>
where
    InnerFluid: Clone,
    OuterFluid: Clone,
{
    let inner = &streams.inner;
    let outer = &streams.outer;

    let ex_inner = thermo_inner.specific_exergy(
        inner.fluid(),
        inner.pressure(),
        inner.inlet_enthalpy(),
        environment,
    )?;
    let ex_outer = thermo_outer.specific_exergy(
        outer.fluid(),
        outer.pressure(),
        outer.inlet_enthalpy(),
        environment,
    )?;

    Ok(inner.mass_flow() * ex_inner + outer.mass_flow() * ex_outer)
}

/// Exergy destroyed by entropy production, `S_gen·T_ref`.
#[must_use]
pub fn exergy_destruction(
    entropy_production: EntropyRate,
    environment: &ReferenceEnvironment,
) -> Power {
    entropy_production * environment.temperature
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        f64::{Pressure, ThermodynamicTemperature},
        power::watt,
        pressure::pascal,
        thermal_conductance::watt_per_kelvin,
        thermodynamic_temperature::kelvin,
    };

    use crate::models::thermal::hx::core::test_support::{
        air, air_air_streams, air_water_streams, water,
    };

    #[test]
    fn destruction_scales_with_reference_temperature() {
        let s_gen = EntropyRate::new::<watt_per_kelvin>(0.2);
        let environment =
            ReferenceEnvironment::at_temperature(ThermodynamicTemperature::new::<kelvin>(300.0));

        assert_relative_eq!(
            exergy_destruction(s_gen, &environment).get::<watt>(),
            60.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn nothing_enters_at_the_dead_state() {
        let thermo = air();
        let environment = ReferenceEnvironment {
            temperature: ThermodynamicTemperature::new::<kelvin>(300.0),
            pressure: Pressure::new::<pascal>(5e5),
        };
        let streams = air_air_streams(0.1, 300.0, 0.2, 300.0);

        let entering = exergy_entering(&streams, &thermo, &thermo, &environment).unwrap();

        assert_relative_eq!(entering.get::<watt>(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn hot_and_cold_inlets_both_carry_exergy() {
        let environment = ReferenceEnvironment::default();
        let streams = air_water_streams(0.012, 354.0, 0.0213, 290.0);

        let entering = exergy_entering(&streams, &air(), &water(), &environment).unwrap();

        // Hot air above and cold water below the environment both have positive exergy.
        assert!(entering.get::<watt>() > 0.0);
    }
}
