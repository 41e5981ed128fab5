//! Fluid identifiers.
//!
//! Marker fluids ([`Air`], [`Water`], [`CarbonDioxide`]) carry no data and
//! supply constants to the built-in models at compile time.
//! A [`Mixture`] carries its composition and is the fluid identity used for
//! streams configured at runtime.

mod air;
mod carbon_dioxide;
mod component;
mod mixture;
mod water;

pub use air::Air;
pub use carbon_dioxide::CarbonDioxide;
pub use component::Component;
pub use mixture::{Mixture, MixtureError};
pub use water::Water;
