//! Public Twine models.
//!
//! Models are organized into domain submodules: [`thermal`] for heat
//! exchangers and [`turbomachinery`] for compressors and expanders.
//!
//! # Model structure
//!
//! Each model lives in its own module and contains an internal `core` submodule
//! where the actual computation and domain logic lives. The `core` module is an
//! implementation detail and is **not** re-exported as part of the public API.
//!
//! The [`twine_core::Model`] implementation is a thin adapter that delegates
//! to the model-specific core API.

pub mod thermal;
pub mod turbomachinery;
