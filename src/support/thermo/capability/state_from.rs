use crate::support::thermo::State;

use super::ThermoModel;

/// Capability for constructing a [`State`] from a typed input.
///
/// The `Fluid` carried by a state may hold state-defining data, such as the
/// mole fractions of a [`Mixture`](crate::support::thermo::fluid::Mixture).
/// Inputs are plain tuples, so the set of supported input pairs is visible in
/// the type system:
///
/// - `(Fluid, ThermodynamicTemperature, Pressure)`
/// - `(Fluid, Pressure, SpecificEnthalpy)`
/// - `(Fluid, Pressure, SpecificEntropy)`
///
/// A model that cannot build a state from some pair simply does not implement
/// `StateFrom` for it.
pub trait StateFrom<Input>: ThermoModel {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a thermodynamic state from the provided input.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the state cannot be created from `input`.
    fn state_from(&self, input: Input) -> Result<State<Self::Fluid>, Self::Error>;
}

/// Marker fluids such as [`Air`](crate::support::thermo::fluid::Air) carry no
/// data, so `(A, B)` inputs are accepted and the fluid is filled in with
/// `Fluid::default()`.
impl<M, A, B> StateFrom<(A, B)> for M
where
    M: ThermoModel + StateFrom<(<M as ThermoModel>::Fluid, A, B)>,
    <M as ThermoModel>::Fluid: Default,
{
    type Error = <M as StateFrom<(<M as ThermoModel>::Fluid, A, B)>>::Error;

    fn state_from(&self, (a, b): (A, B)) -> Result<State<Self::Fluid>, Self::Error> {
        self.state_from((<M as ThermoModel>::Fluid::default(), a, b))
    }
}
