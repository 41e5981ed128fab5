//! Thermodynamic and fluid property modeling.
//!
//! Models expose what they can compute through [`capability`] traits.
//! The [`StateEvaluator`] extension bundles those capabilities into the
//! `(p, h)` and `(T, p)` lookups that produce a full [`StateVector`].

mod environment;
mod error;
mod evaluator;
mod state;
mod state_vector;

pub mod capability;
pub mod fluid;
pub mod model;

pub use environment::{EnvironmentError, ReferenceEnvironment};
pub use error::{EvaluationError, PropertyError};
pub use evaluator::StateEvaluator;
pub use state::State;
pub use state_vector::StateVector;
