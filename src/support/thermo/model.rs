//! Thermodynamic property models.

pub mod backend;
#[cfg(feature = "coolprop")]
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub mod coolprop;
pub mod incompressible;
pub mod perfect_gas;

pub use backend::{Backend, BackendError, BackendKind};
#[cfg(feature = "coolprop")]
#[cfg_attr(docsrs, doc(cfg(feature = "coolprop")))]
pub use coolprop::CoolProp;
pub use incompressible::Incompressible;
pub use perfect_gas::PerfectGas;
