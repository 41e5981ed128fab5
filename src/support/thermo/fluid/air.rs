use crate::support::thermo::model::perfect_gas::{PerfectGasFluid, PerfectGasParameters};

use super::{Component, Mixture};

/// Canonical identifier for dry air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Air;

impl PerfectGasFluid for Air {
    fn parameters() -> PerfectGasParameters {
        Mixture::pure(Component::Air).perfect_gas_parameters()
    }
}

#[cfg(feature = "coolprop")]
impl crate::support::thermo::model::coolprop::CoolPropFluid for Air {
    const BACKEND: &'static str = "HEOS";
    const NAME: &'static str = "Air";
}
