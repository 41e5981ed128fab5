use thiserror::Error;

/// Errors that may occur when evaluating thermodynamic properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The property is undefined at the given state.
    #[error("undefined property: {context}")]
    Undefined { context: String },

    /// The input state is outside the model's valid domain.
    ///
    /// For example, a perfect gas asked for a state below absolute zero.
    #[error("out of domain: {context}")]
    OutOfDomain { context: String },

    /// The calculation failed due to a numerical or internal error.
    #[error("calculation error: {context}")]
    Calculation { context: String },
}

/// Errors returned by a [`StateEvaluator`](super::StateEvaluator).
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// A property could not be computed from a constructed state.
    #[error(transparent)]
    Property(#[from] PropertyError),

    /// The model could not construct a state from the given inputs.
    #[error("state construction failed: {context}")]
    StateConstruction {
        /// Which input pair was being resolved.
        context: String,

        /// Underlying model error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl EvaluationError {
    pub(crate) fn construction(
        context: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::StateConstruction {
            context: context.into(),
            source: Box::new(err),
        }
    }
}
