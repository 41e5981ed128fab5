use thiserror::Error;
use uom::si::{
    f64::{Pressure, ThermodynamicTemperature},
    pressure::{atmosphere, pascal},
    thermodynamic_temperature::kelvin,
};

use crate::support::constraint::{ConstraintError, StrictlyPositive};

/// Errors that can occur while defining a [`ReferenceEnvironment`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvironmentError {
    #[error("invalid reference temperature {value:?} K")]
    Temperature {
        value: f64,
        #[source]
        source: ConstraintError,
    },

    #[error("invalid reference pressure {value:?} Pa")]
    Pressure {
        value: f64,
        #[source]
        source: ConstraintError,
    },
}

/// Dead state used as the zero point for exergy.
///
/// Both fields are public for struct-literal construction; models call
/// [`ReferenceEnvironment::validate`] before using one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceEnvironment {
    pub temperature: ThermodynamicTemperature,
    pub pressure: Pressure,
}

impl ReferenceEnvironment {
    /// Creates a validated reference environment.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] unless both values are strictly positive.
    pub fn new(
        temperature: ThermodynamicTemperature,
        pressure: Pressure,
    ) -> Result<Self, EnvironmentError> {
        let environment = Self {
            temperature,
            pressure,
        };
        environment.validate()?;
        Ok(environment)
    }

    /// Creates a reference environment at the given temperature and 1 atm.
    #[must_use]
    pub fn at_temperature(temperature: ThermodynamicTemperature) -> Self {
        Self {
            temperature,
            pressure: Pressure::new::<atmosphere>(1.0),
        }
    }

    /// Checks that the dead state is physical.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] for a temperature or pressure that is
    /// zero, negative, or not a number.
    pub fn validate(&self) -> Result<(), EnvironmentError> {
        let temperature = self.temperature.get::<kelvin>();
        StrictlyPositive::new(temperature).map_err(|source| EnvironmentError::Temperature {
            value: temperature,
            source,
        })?;

        let pressure = self.pressure.get::<pascal>();
        StrictlyPositive::new(pressure).map_err(|source| EnvironmentError::Pressure {
            value: pressure,
            source,
        })?;

        Ok(())
    }
}

impl Default for ReferenceEnvironment {
    /// 298.15 K and 1 atm.
    fn default() -> Self {
        Self::at_temperature(ThermodynamicTemperature::new::<kelvin>(298.15))
    }
}
