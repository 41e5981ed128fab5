//! # Counter-flow heat exchanger models
//!
//! Counter-flow heat exchangers posed as two-point boundary value problems,
//! plus the compressor and expander models that sit around them in a cycle.
//! Everything is exposed as [`twine_core::Model`] implementations.
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//! - [`support`]: Supporting utilities used by models.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once more than one model needs it. The collocation solver in
//! [`support::bvp`] and the property layer in [`support::thermo`] followed
//! that path.

pub mod models;
pub mod support;
