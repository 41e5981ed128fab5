use std::fmt;

use serde::Deserialize;
use uom::si::{
    f64::{MassDensity, MolarMass, SpecificHeatCapacity},
    mass_density::kilogram_per_cubic_meter,
    molar_mass::gram_per_mole,
    specific_heat_capacity::joule_per_kilogram_kelvin,
};

use crate::support::units::SpecificGasConstant;

/// Molar gas constant, J/mol·K.
pub(super) const MOLAR_GAS_CONSTANT: f64 = 8.314_462_618;

/// A pure substance that can appear in a [`Mixture`](super::Mixture).
///
/// Each component carries constant ideal-gas heat capacity near 300 K and,
/// where it is commonly handled as a liquid, constant liquid heat capacity
/// and density near 25 °C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum Component {
    Air,
    Argon,
    #[serde(alias = "CO2")]
    CarbonDioxide,
    Ethanol,
    Helium,
    Isobutane,
    Methane,
    #[serde(alias = "Butane")]
    NButane,
    #[serde(alias = "Pentane")]
    NPentane,
    Nitrogen,
    Oxygen,
    Propane,
    Water,
}

#[derive(Debug, Clone, Copy)]
struct ComponentData {
    molar_mass: f64,
    cp_gas: f64,
    liquid: Option<(f64, f64)>,
}

impl Component {
    fn data(self) -> ComponentData {
        let (molar_mass, cp_gas, liquid) = match self {
            Self::Air => (28.9647, 1005.0, None),
            Self::Argon => (39.948, 520.3, None),
            Self::CarbonDioxide => (44.0095, 844.0, None),
            Self::Ethanol => (46.0684, 1420.0, Some((2440.0, 789.0))),
            Self::Helium => (4.002_602, 5193.0, None),
            Self::Isobutane => (58.1222, 1650.0, Some((2380.0, 551.0))),
            Self::Methane => (16.0428, 2226.0, None),
            Self::NButane => (58.1222, 1700.0, Some((2390.0, 573.0))),
            Self::NPentane => (72.1488, 1660.0, Some((2320.0, 621.0))),
            Self::Nitrogen => (28.0134, 1040.0, None),
            Self::Oxygen => (31.9988, 918.0, None),
            Self::Propane => (44.0956, 1670.0, Some((2520.0, 493.0))),
            Self::Water => (18.015_28, 1864.0, Some((4184.0, 997.047))),
        };
        ComponentData {
            molar_mass,
            cp_gas,
            liquid,
        }
    }

    /// Returns the molar mass.
    #[must_use]
    pub fn molar_mass(self) -> MolarMass {
        MolarMass::new::<gram_per_mole>(self.data().molar_mass)
    }

    /// Returns the specific gas constant `R = Rᵤ / M`.
    #[must_use]
    pub fn gas_constant(self) -> SpecificGasConstant {
        let molar_mass_kg = self.data().molar_mass / 1000.0;
        SpecificGasConstant::new::<joule_per_kilogram_kelvin>(MOLAR_GAS_CONSTANT / molar_mass_kg)
    }

    /// Returns the constant ideal-gas `cp`.
    #[must_use]
    pub fn cp_gas(self) -> SpecificHeatCapacity {
        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(self.data().cp_gas)
    }

    /// Returns the liquid `cp` and density, if the component has liquid data.
    #[must_use]
    pub fn liquid(self) -> Option<(SpecificHeatCapacity, MassDensity)> {
        self.data().liquid.map(|(cp, density)| {
            (
                SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp),
                MassDensity::new::<kilogram_per_cubic_meter>(density),
            )
        })
    }

    /// The CoolProp fluid name.
    #[cfg(feature = "coolprop")]
    #[must_use]
    pub fn coolprop_name(self) -> &'static str {
        match self {
            Self::Air => "Air",
            Self::Argon => "Argon",
            Self::CarbonDioxide => "CarbonDioxide",
            Self::Ethanol => "Ethanol",
            Self::Helium => "Helium",
            Self::Isobutane => "IsoButane",
            Self::Methane => "Methane",
            Self::NButane => "n-Butane",
            Self::NPentane => "n-Pentane",
            Self::Nitrogen => "Nitrogen",
            Self::Oxygen => "Oxygen",
            Self::Propane => "Propane",
            Self::Water => "Water",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Air => "Air",
            Self::Argon => "Argon",
            Self::CarbonDioxide => "CarbonDioxide",
            Self::Ethanol => "Ethanol",
            Self::Helium => "Helium",
            Self::Isobutane => "Isobutane",
            Self::Methane => "Methane",
            Self::NButane => "Butane",
            Self::NPentane => "Pentane",
            Self::Nitrogen => "Nitrogen",
            Self::Oxygen => "Oxygen",
            Self::Propane => "Propane",
            Self::Water => "Water",
        };
        f.write_str(name)
    }
}
