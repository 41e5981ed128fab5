use thiserror::Error;
use uom::si::f64::Pressure;

use crate::support::{constraint::ConstraintError, thermo::EvaluationError};

/// Errors that can occur while evaluating a compressor or expander.
#[derive(Debug, Error)]
pub enum MachineError {
    /// The isentropic efficiency is outside `(0, 1]`.
    #[error("isentropic efficiency must be in (0, 1], got {value}")]
    Efficiency { value: f64 },

    /// A machine input violates its constraint.
    #[error("invalid {field}")]
    Input {
        field: &'static str,

        #[source]
        source: ConstraintError,
    },

    /// The discharge pressure moves the wrong way for the machine.
    #[error("{machine} cannot go from {inlet:?} to {outlet:?}")]
    PressureRatio {
        machine: &'static str,
        inlet: Pressure,
        outlet: Pressure,
    },

    /// A thermodynamic state could not be resolved.
    #[error("thermodynamic model failed at the {context}")]
    Property {
        context: &'static str,

        #[source]
        source: EvaluationError,
    },
}

impl MachineError {
    pub(super) fn property(context: &'static str, source: EvaluationError) -> Self {
        Self::Property { context, source }
    }

    pub(super) fn input(field: &'static str) -> impl FnOnce(ConstraintError) -> Self {
        move |source| Self::Input { field, source }
    }
}
