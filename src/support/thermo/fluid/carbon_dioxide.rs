use crate::support::thermo::model::perfect_gas::{PerfectGasFluid, PerfectGasParameters};

use super::{Component, Mixture};

/// Canonical identifier for carbon dioxide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarbonDioxide;

impl PerfectGasFluid for CarbonDioxide {
    fn parameters() -> PerfectGasParameters {
        Mixture::pure(Component::CarbonDioxide).perfect_gas_parameters()
    }
}

#[cfg(feature = "coolprop")]
impl crate::support::thermo::model::coolprop::CoolPropFluid for CarbonDioxide {
    const BACKEND: &'static str = "HEOS";
    const NAME: &'static str = "CarbonDioxide";
}
