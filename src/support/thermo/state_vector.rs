use uom::si::f64::{Pressure, Ratio, SpecificVolume, ThermodynamicTemperature};

use crate::support::units::{SpecificEnthalpy, SpecificEntropy};

/// Every property of a resolved state, in reporting order.
///
/// A `StateVector` is produced by a [`StateEvaluator`](super::StateEvaluator)
/// and is never updated in place. The field order matches the column order
/// used for tabulated output: `T, p, h, v, s, q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
    pub enthalpy: SpecificEnthalpy,
    pub specific_volume: SpecificVolume,
    pub entropy: SpecificEntropy,

    /// Vapor mass fraction, `None` for single-phase states.
    pub quality: Option<Ratio>,
}

impl StateVector {
    /// Column labels in reporting order.
    pub const FIELD_NAMES: [&'static str; 6] = ["T", "p", "h", "v", "s", "q"];

    /// Returns the fields as SI values in reporting order.
    ///
    /// Quality is `NaN` for single-phase states.
    #[must_use]
    pub fn to_si_array(&self) -> [f64; 6] {
        [
            self.temperature.value,
            self.pressure.value,
            self.enthalpy.value,
            self.specific_volume.value,
            self.entropy.value,
            self.quality.map_or(f64::NAN, |q| q.value),
        ]
    }
}
