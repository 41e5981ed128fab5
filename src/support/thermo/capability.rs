//! Capability traits used to query and construct thermodynamic states.
//!
//! A model advertises what it can do by implementing these traits.
//! Code that needs a property asks for the capability in its bounds, so a
//! model that cannot provide it is rejected at compile time.

mod base;
mod properties;
mod state_from;

pub use base::ThermoModel;
pub use properties::*;
pub use state_from::StateFrom;
