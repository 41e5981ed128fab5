//! Adiabatic compression and expansion with an isentropic efficiency.
//!
//! Both machines start from the inlet entropy, find the isentropic outlet
//! enthalpy `h_s` at the discharge pressure, and scale the ideal work:
//!
//! - compressor: `w = (h_s − h_in) / η`
//! - expander: `w = (h_s − h_in) · η`
//!
//! The outlet is the state at `(p_out, h_in + w)` and the power is `m·w`.
//! Work is positive when it enters the fluid, so an expander delivers a
//! negative power.

mod error;
mod input;

pub use error::MachineError;
pub use input::{IsentropicEfficiency, MachineInput};

use tracing::debug;
use uom::si::f64::{Power, Pressure};

use crate::support::{
    thermo::{
        EvaluationError, StateEvaluator, StateVector,
        capability::{HasEnthalpy, StateFrom},
    },
    units::{SpecificEnthalpy, SpecificEntropy},
};

/// States and work of a single machine pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineOutput {
    pub inlet: StateVector,
    pub outlet: StateVector,

    /// State reached by a reversible machine at the same discharge pressure.
    pub isentropic_outlet: StateVector,

    /// Work per unit mass, positive into the fluid.
    pub specific_work: SpecificEnthalpy,
    pub power: Power,
}

/// Which way the machine moves the pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Machine {
    Compressor,
    Expander,
}

impl Machine {
    fn name(self) -> &'static str {
        match self {
            Self::Compressor => "compressor",
            Self::Expander => "expander",
        }
    }

    /// Actual work from the isentropic work.
    fn work(
        self,
        isentropic: SpecificEnthalpy,
        efficiency: IsentropicEfficiency,
    ) -> SpecificEnthalpy {
        match self {
            Self::Compressor => isentropic / efficiency.get(),
            Self::Expander => isentropic * efficiency.get(),
        }
    }

    fn accepts(self, inlet: Pressure, outlet: Pressure) -> bool {
        match self {
            Self::Compressor => outlet >= inlet,
            Self::Expander => outlet <= inlet,
        }
    }
}

/// Runs one machine pass.
///
/// # Errors
///
/// Returns [`MachineError::PressureRatio`] if the discharge pressure moves the
/// wrong way for `machine`, or [`MachineError::Property`] if a state cannot
/// be resolved.
pub(super) fn run<Fluid, Thermo>(
    machine: Machine,
    thermo: &Thermo,
    efficiency: IsentropicEfficiency,
    input: &MachineInput<Fluid>,
) -> Result<MachineOutput, MachineError>
where
    Fluid: Clone,
    Thermo: StateEvaluator<Fluid> + StateFrom<(Fluid, Pressure, SpecificEntropy)>,
{
    let p_in = input.inlet_pressure();
    let p_out = input.outlet_pressure();
    if !machine.accepts(p_in, p_out) {
        return Err(MachineError::PressureRatio {
            machine: machine.name(),
            inlet: p_in,
            outlet: p_out,
        });
    }

    let fluid = input.fluid();
    let inlet = thermo
        .evaluate_hp(fluid, p_in, input.inlet_enthalpy())
        .map_err(|source| MachineError::property("inlet", source))?;

    let isentropic_state = thermo
        .state_from((fluid.clone(), p_out, inlet.entropy))
        .map_err(|err| {
            MachineError::property(
                "isentropic outlet",
                EvaluationError::construction("pressure and entropy", err),
            )
        })?;
    let h_s = thermo
        .enthalpy(&isentropic_state)
        .map_err(|err| MachineError::property("isentropic outlet", err.into()))?;
    let isentropic_outlet = thermo
        .evaluate_hp(fluid, p_out, h_s)
        .map_err(|source| MachineError::property("isentropic outlet", source))?;

    let specific_work = machine.work(h_s - inlet.enthalpy, efficiency);
    let outlet = thermo
        .evaluate_hp(fluid, p_out, inlet.enthalpy + specific_work)
        .map_err(|source| MachineError::property("outlet", source))?;
    let power = input.mass_flow() * specific_work;

    debug!(
        machine = machine.name(),
        ?p_in,
        ?p_out,
        efficiency = efficiency.get(),
        ?power,
        "machine pass"
    );

    Ok(MachineOutput {
        inlet,
        outlet,
        isentropic_outlet,
        specific_work,
        power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use uom::si::{
        available_energy::joule_per_kilogram,
        f64::{MassRate, ThermodynamicTemperature},
        mass_rate::kilogram_per_second,
        power::watt,
        pressure::pascal,
        specific_heat_capacity::joule_per_kilogram_kelvin,
        thermodynamic_temperature::kelvin,
    };

    use crate::support::thermo::{fluid::Air, model::PerfectGas};

    const CP_AIR: f64 = 1005.0;

    fn gas_constant(thermo: &PerfectGas<Air>) -> f64 {
        thermo.gas_constant().get::<joule_per_kilogram_kelvin>()
    }

    fn air_input(t_in: f64, p_in: f64, p_out: f64) -> MachineInput<Air> {
        let thermo = PerfectGas::<Air>::new().unwrap();
        let inlet = thermo
            .evaluate_tp(
                &Air,
                ThermodynamicTemperature::new::<kelvin>(t_in),
                Pressure::new::<pascal>(p_in),
            )
            .unwrap();
        MachineInput::new(
            Air,
            MassRate::new::<kilogram_per_second>(0.5),
            inlet.pressure,
            inlet.enthalpy,
            Pressure::new::<pascal>(p_out),
        )
        .unwrap()
    }

    fn eta(value: f64) -> IsentropicEfficiency {
        IsentropicEfficiency::new(value).unwrap()
    }

    #[test]
    fn compressor_divides_the_ideal_work() {
        let thermo = PerfectGas::<Air>::new().unwrap();
        let input = air_input(300.0, 1e5, 3e5);

        let output = run(Machine::Compressor, &thermo, eta(0.75), &input).unwrap();

        let t_s = 300.0 * 3.0_f64.powf(gas_constant(&thermo) / CP_AIR);
        let ideal = CP_AIR * (t_s - 300.0);
        assert_relative_eq!(
            output.isentropic_outlet.temperature.get::<kelvin>(),
            t_s,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            output.specific_work.get::<joule_per_kilogram>(),
            ideal / 0.75,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            output.power.get::<watt>(),
            0.5 * ideal / 0.75,
            max_relative = 1e-9
        );
        assert!(output.outlet.temperature > output.isentropic_outlet.temperature);
        assert_eq!(output.outlet.pressure, Pressure::new::<pascal>(3e5));
    }

    #[test]
    fn expander_scales_the_ideal_work() {
        let thermo = PerfectGas::<Air>::new().unwrap();
        let input = air_input(600.0, 4e5, 1e5);

        let output = run(Machine::Expander, &thermo, eta(0.8), &input).unwrap();

        let t_s = 600.0 * 0.25_f64.powf(gas_constant(&thermo) / CP_AIR);
        assert_relative_eq!(
            output.specific_work.get::<joule_per_kilogram>(),
            0.8 * CP_AIR * (t_s - 600.0),
            max_relative = 1e-9
        );
        assert!(output.power.get::<watt>() < 0.0);
        assert!(output.outlet.temperature > output.isentropic_outlet.temperature);
        assert!(output.outlet.temperature < output.inlet.temperature);
    }

    #[test]
    fn reversible_machine_keeps_entropy() {
        let thermo = PerfectGas::<Air>::new().unwrap();
        let input = air_input(300.0, 1e5, 2e5);

        let output = run(Machine::Compressor, &thermo, eta(1.0), &input).unwrap();

        assert_relative_eq!(
            output.outlet.entropy.value,
            output.inlet.entropy.value,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            output.outlet.enthalpy.value,
            output.isentropic_outlet.enthalpy.value,
            epsilon = 1e-9
        );
    }

    #[test]
    fn pressure_must_move_the_right_way() {
        let thermo = PerfectGas::<Air>::new().unwrap();

        let compressor = run(
            Machine::Compressor,
            &thermo,
            eta(0.8),
            &air_input(300.0, 3e5, 1e5),
        );
        let expander = run(
            Machine::Expander,
            &thermo,
            eta(0.8),
            &air_input(300.0, 1e5, 3e5),
        );

        assert!(matches!(
            compressor,
            Err(MachineError::PressureRatio {
                machine: "compressor",
                ..
            })
        ));
        assert!(matches!(
            expander,
            Err(MachineError::PressureRatio {
                machine: "expander",
                ..
            })
        ));
    }

    #[test]
    fn equal_pressures_do_no_work() {
        let thermo = PerfectGas::<Air>::new().unwrap();
        let input = air_input(350.0, 2e5, 2e5);

        for machine in [Machine::Compressor, Machine::Expander] {
            let output = run(machine, &thermo, eta(0.7), &input).unwrap();
            assert_relative_eq!(
                output.specific_work.get::<joule_per_kilogram>(),
                0.0,
                epsilon = 1e-6
            );
        }
    }

    proptest! {
        #[test]
        fn irreversibility_generates_entropy(
            eta_value in 0.3..1.0_f64,
            ratio in 1.1..8.0_f64,
        ) {
            let thermo = PerfectGas::<Air>::new().unwrap();
            let compressed = run(
                Machine::Compressor,
                &thermo,
                eta(eta_value),
                &air_input(300.0, 1e5, 1e5 * ratio),
            )
            .unwrap();
            let expanded = run(
                Machine::Expander,
                &thermo,
                eta(eta_value),
                &air_input(900.0, 1e5 * ratio, 1e5),
            )
            .unwrap();

            prop_assert!(compressed.outlet.entropy > compressed.inlet.entropy);
            prop_assert!(expanded.outlet.entropy > expanded.inlet.entropy);
        }
    }
}
