//! Property queries on a constructed [`State`].
//!
//! Each returns [`PropertyError`] when the model cannot produce the value at
//! that state.

use uom::si::f64::{Pressure, Ratio, SpecificHeatCapacity};

use crate::support::thermo::{PropertyError, State};
use crate::support::units::{SpecificEnthalpy, SpecificEntropy};

use super::ThermoModel;

pub trait HasPressure: ThermoModel {
    fn pressure(&self, state: &State<Self::Fluid>) -> Result<Pressure, PropertyError>;
}

/// Specific enthalpy relative to the model's reference state.
pub trait HasEnthalpy: ThermoModel {
    fn enthalpy(&self, state: &State<Self::Fluid>) -> Result<SpecificEnthalpy, PropertyError>;
}

/// Specific entropy relative to the model's reference state.
pub trait HasEntropy: ThermoModel {
    fn entropy(&self, state: &State<Self::Fluid>) -> Result<SpecificEntropy, PropertyError>;
}

/// Isobaric specific heat.
pub trait HasCp: ThermoModel {
    fn cp(&self, state: &State<Self::Fluid>) -> Result<SpecificHeatCapacity, PropertyError>;
}

/// Vapor mass fraction, `None` outside the two-phase region.
///
/// Single-phase models return `None` for every state.
pub trait HasQuality: ThermoModel {
    fn quality(&self, state: &State<Self::Fluid>) -> Result<Option<Ratio>, PropertyError>;
}
