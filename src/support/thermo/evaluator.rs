use uom::si::{
    f64::{Pressure, SpecificVolume, ThermodynamicTemperature},
    specific_volume::cubic_meter_per_kilogram,
};

use crate::support::units::{SpecificEnthalpy, SpecificEntropy};

use super::{
    EvaluationError, ReferenceEnvironment, State, StateVector,
    capability::{HasEnthalpy, HasEntropy, HasQuality, StateFrom, ThermoModel},
};

/// Resolves full [`StateVector`]s from pressure plus enthalpy or temperature.
///
/// This is the single entry point the heat exchanger uses to talk to a
/// property model. It is implemented for every model with the required
/// capabilities, so it never needs to be implemented by hand.
///
/// Pressure is an input in every call and is reported back unchanged.
/// Models such as [`Incompressible`](super::model::Incompressible) do not carry
/// pressure in their [`State`], so the evaluator is the one place that keeps it.
pub trait StateEvaluator<Fluid>:
    ThermoModel<Fluid = Fluid>
    + HasEnthalpy
    + HasEntropy
    + HasQuality
    + StateFrom<(Fluid, ThermodynamicTemperature, Pressure)>
    + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
    /// Resolves the state at `(pressure, enthalpy)`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if the model cannot resolve the state.
    fn evaluate_hp(
        &self,
        fluid: &Fluid,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
    ) -> Result<StateVector, EvaluationError>
    where
        Fluid: Clone,
    {
        let state = self
            .state_from((fluid.clone(), pressure, enthalpy))
            .map_err(|err| EvaluationError::construction("pressure and enthalpy", err))?;
        vector_from(self, &state, pressure)
    }

    /// Resolves the state at `(temperature, pressure)`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if the model cannot resolve the state.
    fn evaluate_tp(
        &self,
        fluid: &Fluid,
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<StateVector, EvaluationError>
    where
        Fluid: Clone,
    {
        let state = self
            .state_from((fluid.clone(), temperature, pressure))
            .map_err(|err| EvaluationError::construction("temperature and pressure", err))?;
        vector_from(self, &state, pressure)
    }

    /// Resolves one state per enthalpy, all at the same pressure.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvaluationError`] encountered.
    fn evaluate_hp_many(
        &self,
        fluid: &Fluid,
        pressure: Pressure,
        enthalpies: &[SpecificEnthalpy],
    ) -> Result<Vec<StateVector>, EvaluationError>
    where
        Fluid: Clone,
    {
        enthalpies
            .iter()
            .map(|&h| self.evaluate_hp(fluid, pressure, h))
            .collect()
    }

    /// Resolves one state per temperature, all at the same pressure.
    ///
    /// # Errors
    ///
    /// Returns the first [`EvaluationError`] encountered.
    fn evaluate_tp_many(
        &self,
        fluid: &Fluid,
        temperatures: &[ThermodynamicTemperature],
        pressure: Pressure,
    ) -> Result<Vec<StateVector>, EvaluationError>
    where
        Fluid: Clone,
    {
        temperatures
            .iter()
            .map(|&t| self.evaluate_tp(fluid, t, pressure))
            .collect()
    }

    /// Returns only the temperature at `(pressure, enthalpy)`.
    ///
    /// This skips entropy and quality, which the energy balance never needs.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if the model cannot resolve the state.
    fn temperature_hp(
        &self,
        fluid: &Fluid,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
    ) -> Result<ThermodynamicTemperature, EvaluationError>
    where
        Fluid: Clone,
    {
        self.state_from((fluid.clone(), pressure, enthalpy))
            .map(|state| state.temperature)
            .map_err(|err| EvaluationError::construction("pressure and enthalpy", err))
    }

    /// Specific flow exergy `(h − h₀) − T₀·(s − s₀)` at `(pressure, enthalpy)`.
    ///
    /// The dead state `(h₀, s₀)` is the same fluid at the reference
    /// environment's temperature and pressure.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if either state cannot be resolved.
    fn specific_exergy(
        &self,
        fluid: &Fluid,
        pressure: Pressure,
        enthalpy: SpecificEnthalpy,
        environment: &ReferenceEnvironment,
    ) -> Result<SpecificEnthalpy, EvaluationError>
    where
        Fluid: Clone,
    {
        let actual = self.evaluate_hp(fluid, pressure, enthalpy)?;
        let dead = self.evaluate_tp(fluid, environment.temperature, environment.pressure)?;

        let entropy_excess: SpecificEntropy = actual.entropy - dead.entropy;
        Ok((actual.enthalpy - dead.enthalpy) - entropy_excess * environment.temperature)
    }
}

impl<Fluid, T> StateEvaluator<Fluid> for T where
    T: ThermoModel<Fluid = Fluid>
        + HasEnthalpy
        + HasEntropy
        + HasQuality
        + StateFrom<(Fluid, ThermodynamicTemperature, Pressure)>
        + StateFrom<(Fluid, Pressure, SpecificEnthalpy)>
{
}

fn vector_from<M>(
    model: &M,
    state: &State<<M as ThermoModel>::Fluid>,
    pressure: Pressure,
) -> Result<StateVector, EvaluationError>
where
    M: ThermoModel + HasEnthalpy + HasEntropy + HasQuality + ?Sized,
{
    Ok(StateVector {
        temperature: state.temperature,
        pressure,
        enthalpy: model.enthalpy(state)?,
        specific_volume: SpecificVolume::new::<cubic_meter_per_kilogram>(
            1.0 / state.density.value,
        ),
        entropy: model.entropy(state)?,
        quality: model.quality(state)?,
    })
}
