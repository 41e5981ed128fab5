/// A thermodynamic model over a particular kind of fluid.
///
/// The associated `Fluid` is the value stored in every [`State`] the model
/// produces. Property capabilities such as [`HasEnthalpy`] build on this trait.
///
/// [`State`]: crate::support::thermo::State
/// [`HasEnthalpy`]: super::HasEnthalpy
pub trait ThermoModel {
    type Fluid;
}
