use thiserror::Error;
use uom::si::f64::Power;

use crate::support::{
    bvp,
    thermo::{EnvironmentError, EvaluationError},
    units::EntropyRate,
};

/// Errors that can occur while solving a counter-flow exchanger.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The numerical settings are unusable.
    #[error("invalid solve configuration: {reason}")]
    Configuration { reason: String },

    /// The exergy dead state is non-physical.
    #[error(transparent)]
    Environment(#[from] EnvironmentError),

    /// A thermodynamic model could not resolve a state.
    #[error("thermodynamic model failed: {context}")]
    PropertyEvaluation {
        /// Where the failing evaluation happened.
        context: String,

        #[source]
        source: EvaluationError,
    },

    /// The collocation solver rejected its inputs.
    #[error("collocation solve failed")]
    Collocation(#[source] bvp::Error<EvaluationError>),

    /// Post-processing was requested for a solve that did not converge.
    #[error("solve did not converge: {message}")]
    NotConverged {
        status: bvp::Status,
        message: String,
    },

    /// The converged duty is larger than the counter-flow limit allows.
    #[error("duty {duty:?} exceeds the counter-flow limit {q_max:?}")]
    DutyExceedsLimit { duty: Power, q_max: Power },

    /// The converged profile destroys less than zero entropy.
    #[error("negative entropy production: {entropy_production:?}")]
    NegativeEntropyProduction { entropy_production: EntropyRate },
}

impl SolveError {
    /// Wraps a property failure with context.
    pub(in crate::models::thermal::hx::core) fn property(
        context: impl Into<String>,
        source: EvaluationError,
    ) -> Self {
        Self::PropertyEvaluation {
            context: context.into(),
            source,
        }
    }

    /// Surfaces right-hand side failures as property failures at their position.
    pub(super) fn from_bvp(err: bvp::Error<EvaluationError>) -> Self {
        match err {
            bvp::Error::Rhs { x, source } => {
                Self::property(format!("energy balance at x = {x} m"), source)
            }
            other => Self::Collocation(other),
        }
    }
}
