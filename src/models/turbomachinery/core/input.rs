use uom::si::f64::{MassRate, Pressure};

use crate::support::{constraint::StrictlyPositive, units::SpecificEnthalpy};

use super::MachineError;

/// Isentropic efficiency in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct IsentropicEfficiency(f64);

impl IsentropicEfficiency {
    /// # Errors
    ///
    /// Returns [`MachineError::Efficiency`] unless `0 < value <= 1`.
    pub fn new(value: f64) -> Result<Self, MachineError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(MachineError::Efficiency { value })
        }
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Inlet state, flow rate and discharge pressure of a machine.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineInput<Fluid> {
    fluid: Fluid,
    mass_flow: MassRate,
    inlet_pressure: Pressure,
    inlet_enthalpy: SpecificEnthalpy,
    outlet_pressure: Pressure,
}

impl<Fluid> MachineInput<Fluid> {
    /// Creates a machine input.
    ///
    /// # Errors
    ///
    /// Returns [`MachineError::Input`] if the mass flow or either pressure is
    /// not strictly positive.
    pub fn new(
        fluid: Fluid,
        mass_flow: MassRate,
        inlet_pressure: Pressure,
        inlet_enthalpy: SpecificEnthalpy,
        outlet_pressure: Pressure,
    ) -> Result<Self, MachineError> {
        let mass_flow =
            StrictlyPositive::new(mass_flow).map_err(MachineError::input("mass flow"))?;
        let inlet_pressure =
            StrictlyPositive::new(inlet_pressure).map_err(MachineError::input("inlet pressure"))?;
        let outlet_pressure = StrictlyPositive::new(outlet_pressure)
            .map_err(MachineError::input("outlet pressure"))?;

        Ok(Self {
            fluid,
            mass_flow: mass_flow.into_inner(),
            inlet_pressure: inlet_pressure.into_inner(),
            inlet_enthalpy,
            outlet_pressure: outlet_pressure.into_inner(),
        })
    }

    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    pub fn mass_flow(&self) -> MassRate {
        self.mass_flow
    }

    pub fn inlet_pressure(&self) -> Pressure {
        self.inlet_pressure
    }

    pub fn inlet_enthalpy(&self) -> SpecificEnthalpy {
        self.inlet_enthalpy
    }

    pub fn outlet_pressure(&self) -> Pressure {
        self.outlet_pressure
    }
}
