mod geometry;
mod stream;

pub use geometry::Geometry;
pub use stream::{FluidStream, Streams};

use thiserror::Error;

use crate::support::{constraint::ConstraintError, thermo::EvaluationError};

/// Errors raised while constructing heat exchanger inputs.
#[derive(Debug, Error)]
pub enum InputError {
    /// A quantity violated its sign constraint.
    #[error("invalid {quantity}")]
    Constraint {
        quantity: &'static str,
        #[source]
        source: ConstraintError,
    },

    #[error("inlet enthalpy must be finite")]
    NonFiniteEnthalpy,

    /// The inlet temperature could not be converted to an enthalpy.
    #[error("inlet state could not be resolved")]
    InletState(#[source] EvaluationError),
}

impl InputError {
    pub(super) fn constraint(quantity: &'static str) -> impl FnOnce(ConstraintError) -> Self {
        move |source| Self::Constraint { quantity, source }
    }
}
