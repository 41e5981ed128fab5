//! Incompressible liquid model with constant heat capacity.
//!
//! # Assumptions
//!
//! - Density is constant (`ρ = ρ_ref`)
//! - `cp` is constant and pressure does not enter enthalpy or entropy
//! - The liquid never boils, so quality is always `None`
//!
//! # Reference State
//!
//! Enthalpy and entropy are reported relative to a configurable reference state
//! (`T_ref`, `ρ_ref`, `h_ref`, `s_ref`).

use std::marker::PhantomData;

use thiserror::Error;
use uom::{
    ConstZero,
    si::{
        f64::{MassDensity, Pressure, Ratio, SpecificHeatCapacity, ThermodynamicTemperature},
        ratio::ratio,
        thermodynamic_temperature::{degree_celsius, kelvin},
    },
};

use crate::support::units::{SpecificEnthalpy, SpecificEntropy, TemperatureDifference};
use crate::support::{
    constraint::{Constraint, StrictlyPositive},
    thermo::{
        PropertyError, State,
        capability::{HasCp, HasEnthalpy, HasEntropy, HasQuality, StateFrom, ThermoModel},
    },
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum IncompressibleParametersError {
    #[error("invalid cp: {cp:?}")]
    Cp { cp: SpecificHeatCapacity },
    #[error("invalid reference temperature: {t_ref:?}")]
    ReferenceTemperature { t_ref: ThermodynamicTemperature },
    #[error("invalid reference density: {rho_ref:?}")]
    ReferenceDensity { rho_ref: MassDensity },
}

/// Reference values used to define enthalpy/entropy offsets for an [`Incompressible`] model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncompressibleReference {
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
    pub enthalpy: SpecificEnthalpy,
    pub entropy: SpecificEntropy,
}

impl IncompressibleReference {
    /// Returns a reference with `T_ref = 25°C`, `h_ref = 0`, `s_ref = 0`, and the provided `ρ_ref`.
    #[must_use]
    pub fn standard(density: MassDensity) -> Self {
        Self {
            temperature: ThermodynamicTemperature::new::<degree_celsius>(25.0),
            density,
            enthalpy: SpecificEnthalpy::ZERO,
            entropy: SpecificEntropy::ZERO,
        }
    }
}

/// Constant parameters for the [`Incompressible`] model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncompressibleParameters {
    pub cp: SpecificHeatCapacity,
    pub reference: IncompressibleReference,
}

impl IncompressibleParameters {
    #[must_use]
    pub fn new(cp: SpecificHeatCapacity, reference_density: MassDensity) -> Self {
        Self {
            cp,
            reference: IncompressibleReference::standard(reference_density),
        }
    }
}

/// Fluid constants required by [`Incompressible::new`].
pub trait IncompressibleFluid {
    /// Returns the constant parameters for use with [`Incompressible`].
    fn parameters() -> IncompressibleParameters;
}

/// Incompressible liquid model with constant density and constant heat capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incompressible<Fluid> {
    cp: SpecificHeatCapacity,
    t_ref: ThermodynamicTemperature,
    rho_ref: MassDensity,
    h_ref: SpecificEnthalpy,
    s_ref: SpecificEntropy,
    _marker: PhantomData<Fluid>,
}

impl<Fluid> ThermoModel for Incompressible<Fluid> {
    type Fluid = Fluid;
}

impl<Fluid: IncompressibleFluid> Incompressible<Fluid> {
    /// Creates an incompressible model using constants defined by `Fluid`.
    ///
    /// # Errors
    ///
    /// Returns [`IncompressibleParametersError`] if any required constant is invalid.
    pub fn new() -> Result<Self, IncompressibleParametersError> {
        Self::from_parameters(Fluid::parameters())
    }
}

impl<Fluid> Incompressible<Fluid> {
    /// Creates an incompressible model from parameters known only at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`IncompressibleParametersError`] if any constant is invalid.
    pub fn from_parameters(
        parameters: IncompressibleParameters,
    ) -> Result<Self, IncompressibleParametersError> {
        let cp = parameters.cp;
        if StrictlyPositive::check(&cp.value).is_err() {
            return Err(IncompressibleParametersError::Cp { cp });
        }

        let t_ref = parameters.reference.temperature;
        if StrictlyPositive::check(&t_ref.value).is_err() {
            return Err(IncompressibleParametersError::ReferenceTemperature { t_ref });
        }

        let rho_ref = parameters.reference.density;
        if StrictlyPositive::check(&rho_ref.value).is_err() {
            return Err(IncompressibleParametersError::ReferenceDensity { rho_ref });
        }

        Ok(Self {
            cp,
            t_ref,
            rho_ref,
            h_ref: parameters.reference.enthalpy,
            s_ref: parameters.reference.entropy,
            _marker: PhantomData,
        })
    }

    fn state_at(
        &self,
        fluid: Fluid,
        temperature: ThermodynamicTemperature,
    ) -> Result<State<Fluid>, PropertyError> {
        if temperature.get::<kelvin>() <= 0.0 || !temperature.value.is_finite() {
            return Err(PropertyError::OutOfDomain {
                context: format!("liquid temperature {:.3} K", temperature.get::<kelvin>()),
            });
        }
        Ok(State::new(temperature, self.rho_ref, fluid))
    }
}

impl<Fluid> HasEnthalpy for Incompressible<Fluid> {
    /// Computes enthalpy using `h = h₀ + c·(T − T₀)`.
    fn enthalpy(&self, state: &State<Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        Ok(self.h_ref + self.cp * state.temperature.minus(self.t_ref))
    }
}

impl<Fluid> HasEntropy for Incompressible<Fluid> {
    /// Computes entropy with `s = s₀ + c·ln(T/T₀)`.
    fn entropy(&self, state: &State<Fluid>) -> Result<SpecificEntropy, PropertyError> {
        Ok(self.s_ref + self.cp * (state.temperature / self.t_ref).ln())
    }
}

impl<Fluid> HasCp for Incompressible<Fluid> {
    /// Returns the constant specific heat of the liquid.
    fn cp(&self, _state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        Ok(self.cp)
    }
}

impl<Fluid> HasQuality for Incompressible<Fluid> {
    fn quality(&self, _state: &State<Fluid>) -> Result<Option<Ratio>, PropertyError> {
        Ok(None)
    }
}

/// Pressure is accepted for a uniform interface and otherwise ignored.
impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, Pressure)> for Incompressible<Fluid> {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, temperature, _pressure): (Fluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Fluid>, Self::Error> {
        self.state_at(fluid, temperature)
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEnthalpy)> for Incompressible<Fluid> {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, _pressure, enthalpy): (Fluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<Fluid>, Self::Error> {
        let temperature = self.t_ref + (enthalpy - self.h_ref) / self.cp;
        self.state_at(fluid, temperature)
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEntropy)> for Incompressible<Fluid> {
    type Error = PropertyError;

    fn state_from(
        &self,
        (fluid, _pressure, entropy): (Fluid, Pressure, SpecificEntropy),
    ) -> Result<State<Fluid>, Self::Error> {
        let exponent = (entropy - self.s_ref) / self.cp;
        let temperature = self.t_ref * exponent.get::<ratio>().exp();
        self.state_at(fluid, temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        available_energy::joule_per_kilogram, mass_density::kilogram_per_cubic_meter,
        pressure::kilopascal, specific_heat_capacity::kilojoule_per_kilogram_kelvin,
    };

    use crate::support::thermo::fluid::Water;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct MockLiquid;

    impl IncompressibleFluid for MockLiquid {
        fn parameters() -> IncompressibleParameters {
            IncompressibleParameters::new(
                SpecificHeatCapacity::new::<kilojoule_per_kilogram_kelvin>(10.0),
                MassDensity::new::<kilogram_per_cubic_meter>(1.0),
            )
        }
    }

    fn mock_liquid_model() -> Incompressible<MockLiquid> {
        Incompressible::<MockLiquid>::new()
            .expect("mock liquid parameters must be physically valid")
    }

    #[test]
    fn enthalpy_and_entropy_follow_constant_cp() -> Result<(), PropertyError> {
        let thermo = mock_liquid_model();
        let p = Pressure::new::<kilopascal>(100.0);

        let state_a: State<MockLiquid> =
            thermo.state_from((ThermodynamicTemperature::new::<degree_celsius>(30.0), p))?;
        let state_b = state_a.with_temperature(ThermodynamicTemperature::new::<degree_celsius>(60.0));

        let c = thermo.cp(&state_a)?;
        assert_relative_eq!(
            (thermo.enthalpy(&state_b)? - thermo.enthalpy(&state_a)?).value,
            (c * state_b.temperature.minus(state_a.temperature)).value,
        );
        assert_relative_eq!(
            (thermo.entropy(&state_b)? - thermo.entropy(&state_a)?).value,
            (c * (state_b.temperature / state_a.temperature).ln()).value,
            epsilon = 1e-10,
        );
        Ok(())
    }

    #[test]
    fn pressure_does_not_change_the_state() -> Result<(), PropertyError> {
        let thermo = Incompressible::<Water>::new().unwrap();
        let h = SpecificEnthalpy::new::<joule_per_kilogram>(-36_000.0);

        let low: State<Water> = thermo.state_from((Pressure::new::<kilopascal>(100.0), h))?;
        let high: State<Water> = thermo.state_from((Pressure::new::<kilopascal>(400.0), h))?;

        assert_eq!(low, high);
        assert_eq!(low.density, thermo.rho_ref);
        Ok(())
    }

    #[test]
    fn entropy_roundtrip() -> Result<(), PropertyError> {
        let thermo = mock_liquid_model();
        let p = Pressure::new::<kilopascal>(100.0);
        let t = ThermodynamicTemperature::new::<kelvin>(290.0);

        let state: State<MockLiquid> = thermo.state_from((t, p))?;
        let s = thermo.entropy(&state)?;
        let back: State<MockLiquid> = thermo.state_from((p, s))?;

        assert_relative_eq!(back.temperature.get::<kelvin>(), 290.0, epsilon = 1e-9);
        Ok(())
    }

    #[test]
    fn runtime_parameters_are_validated() {
        let bad = IncompressibleParameters::new(
            SpecificHeatCapacity::new::<kilojoule_per_kilogram_kelvin>(-1.0),
            MassDensity::new::<kilogram_per_cubic_meter>(1000.0),
        );
        assert!(matches!(
            Incompressible::<MockLiquid>::from_parameters(bad),
            Err(IncompressibleParametersError::Cp { .. })
        ));
    }
}
