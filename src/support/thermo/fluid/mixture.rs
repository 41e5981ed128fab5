use std::{fmt, sync::Arc};

use thiserror::Error;
use uom::si::{
    f64::{MassDensity, MolarMass, SpecificHeatCapacity},
    mass_density::kilogram_per_cubic_meter,
    molar_mass::gram_per_mole,
    specific_heat_capacity::joule_per_kilogram_kelvin,
};

use crate::support::{
    constraint::{Constraint, NonNegative},
    thermo::model::{incompressible::IncompressibleParameters, perfect_gas::PerfectGasParameters},
    units::SpecificGasConstant,
};

use super::{Component, component::MOLAR_GAS_CONSTANT};

/// Allowed deviation of the mole fraction sum from one.
const FRACTION_SUM_TOLERANCE: f64 = 1e-6;

/// Errors that can occur while defining a [`Mixture`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixtureError {
    #[error("a mixture needs at least one component")]
    Empty,

    #[error("{components} components but {fractions} mole fractions")]
    LengthMismatch { components: usize, fractions: usize },

    #[error("invalid mole fraction {value} for {component}")]
    InvalidFraction { component: Component, value: f64 },

    #[error("mole fractions sum to {sum}, expected 1")]
    FractionSum { sum: f64 },

    #[error("component {0} is listed more than once")]
    Duplicate(Component),

    #[error("component {0} has no liquid property data")]
    NoLiquidData(Component),
}

/// An ideal mixture of [`Component`]s with fixed mole fractions.
///
/// Mixtures are the fluid identity used when streams are configured at
/// runtime. A pure fluid is a mixture with one component.
///
/// Cloning is cheap; the composition is shared.
#[derive(Debug, Clone, PartialEq)]
pub struct Mixture {
    composition: Arc<[(Component, f64)]>,
}

impl Mixture {
    /// Creates a mixture from parallel component and mole fraction lists.
    ///
    /// # Errors
    ///
    /// Returns [`MixtureError`] if the lists are empty or differ in length,
    /// a component repeats, a fraction is negative or not a number, or the
    /// fractions do not sum to one.
    pub fn new(components: &[Component], mole_fractions: &[f64]) -> Result<Self, MixtureError> {
        if components.is_empty() {
            return Err(MixtureError::Empty);
        }
        if components.len() != mole_fractions.len() {
            return Err(MixtureError::LengthMismatch {
                components: components.len(),
                fractions: mole_fractions.len(),
            });
        }

        for (i, &component) in components.iter().enumerate() {
            if components[..i].contains(&component) {
                return Err(MixtureError::Duplicate(component));
            }
        }

        for (&component, &value) in components.iter().zip(mole_fractions) {
            if NonNegative::check(&value).is_err() || value > 1.0 {
                return Err(MixtureError::InvalidFraction { component, value });
            }
        }

        let sum: f64 = mole_fractions.iter().sum();
        if (sum - 1.0).abs() > FRACTION_SUM_TOLERANCE {
            return Err(MixtureError::FractionSum { sum });
        }

        Ok(Self {
            composition: components
                .iter()
                .zip(mole_fractions)
                .map(|(&c, &x)| (c, x / sum))
                .collect(),
        })
    }

    /// Creates a single-component mixture.
    #[must_use]
    pub fn pure(component: Component) -> Self {
        Self {
            composition: Arc::from([(component, 1.0)]),
        }
    }

    /// Iterates over `(component, mole fraction)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        self.composition.iter().copied()
    }

    /// Mole-fraction-weighted molar mass.
    #[must_use]
    pub fn molar_mass(&self) -> MolarMass {
        MolarMass::new::<gram_per_mole>(
            self.iter()
                .map(|(c, x)| x * c.molar_mass().get::<gram_per_mole>())
                .sum(),
        )
    }

    /// Mass fractions in component order.
    fn mass_fractions(&self) -> impl Iterator<Item = (Component, f64)> + '_ {
        let total = self.molar_mass().get::<gram_per_mole>();
        self.iter()
            .map(move |(c, x)| (c, x * c.molar_mass().get::<gram_per_mole>() / total))
    }

    /// Ideal-gas mixing: `R = Rᵤ / M_mix` and mass-weighted `cp`.
    #[must_use]
    pub fn perfect_gas_parameters(&self) -> PerfectGasParameters {
        let molar_mass_kg = self.molar_mass().get::<gram_per_mole>() / 1000.0;
        let gas_constant = SpecificGasConstant::new::<joule_per_kilogram_kelvin>(
            MOLAR_GAS_CONSTANT / molar_mass_kg,
        );
        let cp = self
            .mass_fractions()
            .map(|(c, w)| w * c.cp_gas().get::<joule_per_kilogram_kelvin>())
            .sum();

        PerfectGasParameters::new(
            gas_constant,
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp),
        )
    }

    /// Liquid mixing: mass-weighted `cp` and volume-additive density.
    ///
    /// # Errors
    ///
    /// Returns [`MixtureError::NoLiquidData`] for components without liquid data.
    pub fn incompressible_parameters(&self) -> Result<IncompressibleParameters, MixtureError> {
        let mut cp = 0.0;
        let mut specific_volume = 0.0;
        for (component, w) in self.mass_fractions() {
            let (cp_l, rho_l) = component
                .liquid()
                .ok_or(MixtureError::NoLiquidData(component))?;
            cp += w * cp_l.get::<joule_per_kilogram_kelvin>();
            specific_volume += w / rho_l.get::<kilogram_per_cubic_meter>();
        }

        Ok(IncompressibleParameters::new(
            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp),
            MassDensity::new::<kilogram_per_cubic_meter>(1.0 / specific_volume),
        ))
    }
}

impl fmt::Display for Mixture {
    /// Formats as `Propane * Pentane (0.6, 0.4)`, or just the name when pure.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(|(c, _)| c.to_string()).collect();
        write!(f, "{}", names.join(" * "))?;
        if self.composition.len() > 1 {
            let fractions: Vec<String> = self.iter().map(|(_, x)| format!("{x}")).collect();
            write!(f, " ({})", fractions.join(", "))?;
        }
        Ok(())
    }
}
