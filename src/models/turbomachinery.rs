//! Compressor and expander models.
//!
//! Both machines are adiabatic and characterized by a single isentropic
//! efficiency. They accept any property model that can resolve states from
//! `(p, h)` and from `(p, s)`.

mod core;

pub use self::core::{IsentropicEfficiency, MachineError, MachineInput, MachineOutput};

use twine_core::Model;
use uom::si::f64::{Pressure, ThermodynamicTemperature};

use crate::support::{
    thermo::capability::{HasEnthalpy, HasEntropy, HasQuality, StateFrom, ThermoModel},
    units::{SpecificEnthalpy, SpecificEntropy},
};

use self::core::Machine;

/// Raises the pressure of a stream, `w = (h_s − h_in) / η`.
#[derive(Debug, Clone)]
pub struct Compressor<Thermo> {
    pub thermo: Thermo,
    pub efficiency: IsentropicEfficiency,
}

/// Extracts work from a stream, `w = (h_s − h_in) · η`.
///
/// The reported power is negative.
#[derive(Debug, Clone)]
pub struct Expander<Thermo> {
    pub thermo: Thermo,
    pub efficiency: IsentropicEfficiency,
}

impl<Thermo> Compressor<Thermo> {
    pub fn new(thermo: Thermo, efficiency: IsentropicEfficiency) -> Self {
        Self { thermo, efficiency }
    }
}

impl<Thermo> Expander<Thermo> {
    pub fn new(thermo: Thermo, efficiency: IsentropicEfficiency) -> Self {
        Self { thermo, efficiency }
    }
}

impl<Thermo> Model for Compressor<Thermo>
where
    Thermo: ThermoModel
        + HasEnthalpy
        + HasEntropy
        + HasQuality
        + StateFrom<(<Thermo as ThermoModel>::Fluid, ThermodynamicTemperature, Pressure)>
        + StateFrom<(<Thermo as ThermoModel>::Fluid, Pressure, SpecificEnthalpy)>
        + StateFrom<(<Thermo as ThermoModel>::Fluid, Pressure, SpecificEntropy)>,
    Thermo::Fluid: Clone,
{
    type Input = MachineInput<Thermo::Fluid>;
    type Output = MachineOutput;
    type Error = MachineError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self::core::run(Machine::Compressor, &self.thermo, self.efficiency, input)
    }
}

impl<Thermo> Model for Expander<Thermo>
where
    Thermo: ThermoModel
        + HasEnthalpy
        + HasEntropy
        + HasQuality
        + StateFrom<(<Thermo as ThermoModel>::Fluid, ThermodynamicTemperature, Pressure)>
        + StateFrom<(<Thermo as ThermoModel>::Fluid, Pressure, SpecificEnthalpy)>
        + StateFrom<(<Thermo as ThermoModel>::Fluid, Pressure, SpecificEntropy)>,
    Thermo::Fluid: Clone,
{
    type Input = MachineInput<Thermo::Fluid>;
    type Output = MachineOutput;
    type Error = MachineError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self::core::run(Machine::Expander, &self.thermo, self.efficiency, input)
    }
}
