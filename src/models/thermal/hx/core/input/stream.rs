use uom::si::f64::{MassRate, Pressure, ThermodynamicTemperature};

use crate::support::{
    constraint::{Constrained, StrictlyPositive},
    thermo::{EvaluationError, StateEvaluator, StateVector},
    units::SpecificEnthalpy,
};

use super::InputError;

/// One fluid stream passing through the exchanger.
///
/// Pressure is constant along the exchanger. The mass flow and pressure are
/// guaranteed to be strictly positive and the inlet enthalpy to be finite.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidStream<Fluid> {
    fluid: Fluid,
    mass_flow: MassRate,
    pressure: Pressure,
    inlet_enthalpy: SpecificEnthalpy,
}

impl<Fluid> FluidStream<Fluid> {
    /// Constructs a validated stream.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the mass flow or pressure is not strictly
    /// positive, or if the inlet enthalpy is not finite.
    pub fn new(
        fluid: Fluid,
        mass_flow: MassRate,
        pressure: Pressure,
        inlet_enthalpy: SpecificEnthalpy,
    ) -> Result<Self, InputError> {
        let mass_flow = StrictlyPositive::new(mass_flow).map_err(InputError::constraint("mass flow"))?;
        let pressure = StrictlyPositive::new(pressure).map_err(InputError::constraint("pressure"))?;
        if !inlet_enthalpy.value.is_finite() {
            return Err(InputError::NonFiniteEnthalpy);
        }
        Ok(Self::from_constrained(
            fluid,
            mass_flow,
            pressure,
            inlet_enthalpy,
        ))
    }

    /// Constructs a stream from pre-validated values.
    #[must_use]
    pub fn from_constrained(
        fluid: Fluid,
        mass_flow: Constrained<MassRate, StrictlyPositive>,
        pressure: Constrained<Pressure, StrictlyPositive>,
        inlet_enthalpy: SpecificEnthalpy,
    ) -> Self {
        Self {
            fluid,
            mass_flow: mass_flow.into_inner(),
            pressure: pressure.into_inner(),
            inlet_enthalpy,
        }
    }

    /// Constructs a stream whose inlet is given by temperature.
    ///
    /// The temperature is converted to an enthalpy once, through `thermo`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if validation fails or the inlet state cannot be resolved.
    pub fn from_inlet_temperature(
        thermo: &impl StateEvaluator<Fluid>,
        fluid: Fluid,
        mass_flow: MassRate,
        pressure: Pressure,
        inlet_temperature: ThermodynamicTemperature,
    ) -> Result<Self, InputError>
    where
        Fluid: Clone,
    {
        let pressure = StrictlyPositive::new(pressure)
            .map_err(InputError::constraint("pressure"))?
            .into_inner();
        let inlet = thermo
            .evaluate_tp(&fluid, inlet_temperature, pressure)
            .map_err(InputError::InletState)?;
        Self::new(fluid, mass_flow, pressure, inlet.enthalpy)
    }

    #[must_use]
    pub fn fluid(&self) -> &Fluid {
        &self.fluid
    }

    #[must_use]
    pub fn mass_flow(&self) -> MassRate {
        self.mass_flow
    }

    #[must_use]
    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    #[must_use]
    pub fn inlet_enthalpy(&self) -> SpecificEnthalpy {
        self.inlet_enthalpy
    }

    /// Resolves the full inlet state.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if the model cannot resolve the state.
    pub fn inlet_state(
        &self,
        thermo: &impl StateEvaluator<Fluid>,
    ) -> Result<StateVector, EvaluationError>
    where
        Fluid: Clone,
    {
        thermo.evaluate_hp(&self.fluid, self.pressure, self.inlet_enthalpy)
    }
}

/// The two streams of a counter-flow exchanger.
///
/// Position `x` runs from 0 to the exchanger length. The inner stream enters
/// at `x = 0` and the outer stream enters at `x = L`.
#[derive(Debug, Clone, PartialEq)]
pub struct Streams<InnerFluid, OuterFluid> {
    pub inner: FluidStream<InnerFluid>,
    pub outer: FluidStream<OuterFluid>,
}
