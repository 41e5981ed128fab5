use uom::si::f64::{MassDensity, ThermodynamicTemperature};

/// Temperature, density and fluid: what a model needs to derive any property.
///
/// Pressure is not stored. Models that need it compute it from density
/// (a perfect gas), and the [`StateEvaluator`](super::StateEvaluator)
/// carries it alongside for models that ignore it (an incompressible liquid).
///
/// ```
/// use counterflow_hx::support::thermo::{State, fluid::Water};
/// use uom::si::{
///     f64::{MassDensity, ThermodynamicTemperature},
///     mass_density::kilogram_per_cubic_meter,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let state = State::new(
///     ThermodynamicTemperature::new::<kelvin>(290.0),
///     MassDensity::new::<kilogram_per_cubic_meter>(997.047),
///     Water,
/// );
/// assert_eq!(state.fluid, Water);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<Fluid> {
    pub temperature: ThermodynamicTemperature,
    pub density: MassDensity,
    pub fluid: Fluid,
}

impl<Fluid> State<Fluid> {
    #[must_use]
    pub fn new(temperature: ThermodynamicTemperature, density: MassDensity, fluid: Fluid) -> Self {
        Self {
            temperature,
            density,
            fluid,
        }
    }

    /// Same fluid and density at another temperature.
    #[must_use]
    pub fn with_temperature(self, temperature: ThermodynamicTemperature) -> Self {
        Self {
            temperature,
            ..self
        }
    }
}
