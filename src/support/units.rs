//! Quantity aliases and helpers on top of [`uom`].
//!
//! Every physical value in the crate is a [`uom`] quantity. Heat exchanger
//! work needs a few derived quantities that [`uom`] does not name, such as
//! [`SpecificEnthalpyGradient`] for the axial energy balance and
//! [`EntropyRate`] for entropy production, and a way to subtract two
//! absolute temperatures:
//!
//! ```
//! use counterflow_hx::support::units::TemperatureDifference;
//! use uom::si::{
//!     f64::ThermodynamicTemperature, temperature_interval, thermodynamic_temperature::kelvin,
//! };
//!
//! let hot = ThermodynamicTemperature::new::<kelvin>(354.0);
//! let cold = ThermodynamicTemperature::new::<kelvin>(290.0);
//! assert_eq!(hot.minus(cold).get::<temperature_interval::kelvin>(), 64.0);
//! ```

mod quantities;
mod temperature_difference;

pub use quantities::{
    EntropyRate, SpecificEnthalpy, SpecificEnthalpyGradient, SpecificEntropy,
    SpecificGasConstant,
};
pub use temperature_difference::TemperatureDifference;
