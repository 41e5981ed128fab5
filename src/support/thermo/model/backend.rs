//! Runtime selection between property models.
//!
//! Compile-time model choice (`PerfectGas<Air>`) is the norm inside the crate.
//! Streams read from a configuration file only learn their model at runtime,
//! so [`Backend`] wraps any of them behind one type with the same
//! capabilities. The real-fluid variants need the `coolprop` feature.

use serde::Deserialize;
use thiserror::Error;
use uom::si::f64::{Pressure, Ratio, SpecificHeatCapacity, ThermodynamicTemperature};

use crate::support::{
    thermo::{
        PropertyError, State,
        capability::{HasCp, HasEnthalpy, HasEntropy, HasQuality, StateFrom, ThermoModel},
        fluid::{Mixture, MixtureError},
    },
    units::{SpecificEnthalpy, SpecificEntropy},
};

#[cfg(feature = "coolprop")]
use super::{CoolProp, coolprop::CoolPropError};
use super::{
    Incompressible, PerfectGas, incompressible::IncompressibleParametersError,
    perfect_gas::PerfectGasParametersError,
};

/// Which model a stream uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    PerfectGas,
    Incompressible,

    /// CoolProp's Helmholtz-energy backend.
    #[serde(rename = "coolprop")]
    CoolProp,

    /// REFPROP, reached through CoolProp.
    Refprop,
}

/// Errors that can occur while building a [`Backend`] for a mixture.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Mixture(#[from] MixtureError),

    #[error(transparent)]
    PerfectGas(#[from] PerfectGasParametersError),

    #[error(transparent)]
    Incompressible(#[from] IncompressibleParametersError),

    #[cfg(feature = "coolprop")]
    #[error(transparent)]
    CoolProp(#[from] CoolPropError),

    #[error("the {0:?} backend needs the `coolprop` feature")]
    Unavailable(BackendKind),
}

/// A property model chosen at runtime.
///
/// Each real-fluid backend owns its own CoolProp handle, so a `Backend` is
/// not `Clone`; build one per stream.
#[derive(Debug)]
pub enum Backend<Fluid> {
    PerfectGas(PerfectGas<Fluid>),
    Incompressible(Incompressible<Fluid>),
    #[cfg(feature = "coolprop")]
    CoolProp(CoolProp<Fluid>),
}

impl Backend<Mixture> {
    /// Builds the selected model with parameters from ideal mixing rules.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the mixture has no data for the selected
    /// model or the mixed parameters are non-physical.
    pub fn for_mixture(kind: BackendKind, mixture: &Mixture) -> Result<Self, BackendError> {
        match kind {
            BackendKind::PerfectGas => Ok(Self::PerfectGas(PerfectGas::from_parameters(
                mixture.perfect_gas_parameters(),
            )?)),
            BackendKind::Incompressible => Ok(Self::Incompressible(
                Incompressible::from_parameters(mixture.incompressible_parameters()?)?,
            )),
            #[cfg(feature = "coolprop")]
            BackendKind::CoolProp => Ok(Self::CoolProp(CoolProp::for_mixture(mixture)?)),
            #[cfg(feature = "coolprop")]
            BackendKind::Refprop => Ok(Self::CoolProp(CoolProp::for_mixture_in(
                "REFPROP", mixture,
            )?)),
            #[cfg(not(feature = "coolprop"))]
            BackendKind::CoolProp | BackendKind::Refprop => Err(BackendError::Unavailable(kind)),
        }
    }
}

impl<Fluid> ThermoModel for Backend<Fluid> {
    type Fluid = Fluid;
}

impl<Fluid> HasEnthalpy for Backend<Fluid> {
    fn enthalpy(&self, state: &State<Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        match self {
            Self::PerfectGas(model) => model.enthalpy(state),
            Self::Incompressible(model) => model.enthalpy(state),
            #[cfg(feature = "coolprop")]
            Self::CoolProp(model) => model.enthalpy(state),
        }
    }
}

impl<Fluid> HasEntropy for Backend<Fluid> {
    fn entropy(&self, state: &State<Fluid>) -> Result<SpecificEntropy, PropertyError> {
        match self {
            Self::PerfectGas(model) => model.entropy(state),
            Self::Incompressible(model) => model.entropy(state),
            #[cfg(feature = "coolprop")]
            Self::CoolProp(model) => model.entropy(state),
        }
    }
}

impl<Fluid> HasCp for Backend<Fluid> {
    fn cp(&self, state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        match self {
            Self::PerfectGas(model) => model.cp(state),
            Self::Incompressible(model) => model.cp(state),
            #[cfg(feature = "coolprop")]
            Self::CoolProp(model) => model.cp(state),
        }
    }
}

impl<Fluid> HasQuality for Backend<Fluid> {
    fn quality(&self, state: &State<Fluid>) -> Result<Option<Ratio>, PropertyError> {
        match self {
            Self::PerfectGas(model) => model.quality(state),
            Self::Incompressible(model) => model.quality(state),
            #[cfg(feature = "coolprop")]
            Self::CoolProp(model) => model.quality(state),
        }
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, Pressure)> for Backend<Fluid> {
    type Error = PropertyError;

    fn state_from(
        &self,
        input: (Fluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Fluid>, Self::Error> {
        match self {
            Self::PerfectGas(model) => model.state_from(input),
            Self::Incompressible(model) => model.state_from(input),
            #[cfg(feature = "coolprop")]
            Self::CoolProp(model) => model.state_from(input).map_err(PropertyError::from),
        }
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEnthalpy)> for Backend<Fluid> {
    type Error = PropertyError;

    fn state_from(
        &self,
        input: (Fluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<Fluid>, Self::Error> {
        match self {
            Self::PerfectGas(model) => model.state_from(input),
            Self::Incompressible(model) => model.state_from(input),
            #[cfg(feature = "coolprop")]
            Self::CoolProp(model) => model.state_from(input).map_err(PropertyError::from),
        }
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEntropy)> for Backend<Fluid> {
    type Error = PropertyError;

    fn state_from(
        &self,
        input: (Fluid, Pressure, SpecificEntropy),
    ) -> Result<State<Fluid>, Self::Error> {
        match self {
            Self::PerfectGas(model) => model.state_from(input),
            Self::Incompressible(model) => model.state_from(input),
            #[cfg(feature = "coolprop")]
            Self::CoolProp(model) => model.state_from(input).map_err(PropertyError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{pressure::kilopascal, thermodynamic_temperature::kelvin};

    use crate::support::thermo::{StateEvaluator, fluid::Component};

    #[test]
    fn dispatches_to_the_selected_model() {
        let water = Mixture::pure(Component::Water);
        let gas = Backend::for_mixture(BackendKind::PerfectGas, &water).unwrap();
        let liquid = Backend::for_mixture(BackendKind::Incompressible, &water).unwrap();

        let t = ThermodynamicTemperature::new::<kelvin>(350.0);
        let p = Pressure::new::<kilopascal>(100.0);
        let vapor = gas.evaluate_tp(&water, t, p).unwrap();
        let condensed = liquid.evaluate_tp(&water, t, p).unwrap();

        assert!(vapor.specific_volume > condensed.specific_volume * 1000.0);
        assert_relative_eq!(
            condensed.specific_volume.value,
            1.0 / 997.047,
            max_relative = 1e-12
        );
    }

    #[test]
    fn gas_only_mixture_cannot_be_incompressible() {
        let helium = Mixture::pure(Component::Helium);
        assert!(matches!(
            Backend::for_mixture(BackendKind::Incompressible, &helium),
            Err(BackendError::Mixture(MixtureError::NoLiquidData(Component::Helium)))
        ));
    }

    #[cfg(not(feature = "coolprop"))]
    #[test]
    fn real_fluid_backends_need_the_feature() {
        let mixture =
            Mixture::new(&[Component::Propane, Component::NPentane], &[0.6, 0.4]).unwrap();
        assert!(matches!(
            Backend::for_mixture(BackendKind::CoolProp, &mixture),
            Err(BackendError::Unavailable(BackendKind::CoolProp))
        ));
    }

    #[cfg(feature = "coolprop")]
    #[test]
    fn coolprop_backend_resolves_a_real_liquid() {
        let water = Mixture::pure(Component::Water);
        let real = Backend::for_mixture(BackendKind::CoolProp, &water).unwrap();
        let ideal = Backend::for_mixture(BackendKind::Incompressible, &water).unwrap();

        let t = ThermodynamicTemperature::new::<kelvin>(300.0);
        let p = Pressure::new::<kilopascal>(500.0);
        let real_state = real.evaluate_tp(&water, t, p).unwrap();
        let ideal_state = ideal.evaluate_tp(&water, t, p).unwrap();

        assert!(real_state.quality.is_none());
        assert_relative_eq!(
            real_state.specific_volume.value,
            ideal_state.specific_volume.value,
            max_relative = 5e-3
        );
    }
}
