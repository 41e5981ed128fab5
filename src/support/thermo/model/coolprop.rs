//! CoolProp-backed fluid property model.
//!
//! Pure fluids use a marker type implementing [`CoolPropFluid`]. Runtime
//! mixtures use [`CoolProp::for_mixture`], which builds a Helmholtz-energy
//! mixture from the components and mole fractions of a [`Mixture`].
//!
//! Every instance owns its own `AbstractState`, so two streams never share
//! flash state.

mod error;

use std::{
    fmt,
    marker::PhantomData,
    sync::{Mutex, MutexGuard},
};

use rfluids::{
    io::{FluidInputPair, FluidParam, FluidTrivialParam},
    native::AbstractState,
};
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{
        MassDensity, MolarMass, Pressure, Ratio, SpecificHeatCapacity, ThermodynamicTemperature,
    },
    mass_density::kilogram_per_cubic_meter,
    molar_mass::kilogram_per_mole,
    pressure::pascal,
    ratio::ratio,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    thermo::{
        PropertyError, State,
        capability::{
            HasCp, HasEnthalpy, HasEntropy, HasPressure, HasQuality, StateFrom, ThermoModel,
        },
        fluid::Mixture,
    },
    units::{SpecificEnthalpy, SpecificEntropy},
};

pub use error::CoolPropError;

/// Default CoolProp backend for runtime mixtures.
pub const HEOS: &str = "HEOS";

/// Trait used to mark fluids as usable with [`CoolProp::new`].
///
/// Implementors provide the backend and fluid identifiers needed to construct a
/// `CoolProp` `AbstractState`.
pub trait CoolPropFluid: Default + Send + Sync + 'static {
    const BACKEND: &'static str;
    const NAME: &'static str;
}

/// A fluid property model backed by `CoolProp`.
pub struct CoolProp<Fluid> {
    state: Mutex<AbstractState>,
    name: String,
    _fluid: PhantomData<Fluid>,
}

impl<Fluid> fmt::Debug for CoolProp<Fluid> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoolProp")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<Fluid> ThermoModel for CoolProp<Fluid> {
    type Fluid = Fluid;
}

impl<F: CoolPropFluid> CoolProp<F> {
    /// Construct a new CoolProp-backed model instance.
    ///
    /// # Errors
    ///
    /// Returns [`CoolPropError`] if the underlying `AbstractState` cannot be
    /// created for the given `F::BACKEND` and `F::NAME`.
    pub fn new() -> Result<Self, CoolPropError> {
        let state = AbstractState::new(F::BACKEND, F::NAME)?;
        Ok(Self::from_abstract_state(state, F::NAME.to_owned()))
    }
}

impl CoolProp<Mixture> {
    /// Builds a Helmholtz-energy ([`HEOS`]) model for `mixture`.
    ///
    /// # Errors
    ///
    /// See [`CoolProp::for_mixture_in`].
    pub fn for_mixture(mixture: &Mixture) -> Result<Self, CoolPropError> {
        Self::for_mixture_in(HEOS, mixture)
    }

    /// Builds a model for `mixture` on the named CoolProp backend.
    ///
    /// A single-component mixture is treated as the pure fluid. `HEOS` only
    /// flashes mixtures from `(T, p)` and saturation inputs reliably; use
    /// `REFPROP` for `(p, h)` states inside the two-phase dome.
    ///
    /// # Errors
    ///
    /// Returns [`CoolPropError`] if the backend is unavailable, a component is
    /// unknown, a pair has no interaction parameters, or the mole fractions
    /// are rejected.
    pub fn for_mixture_in(backend: &str, mixture: &Mixture) -> Result<Self, CoolPropError> {
        let name = mixture
            .iter()
            .map(|(component, _)| component.coolprop_name())
            .collect::<Vec<_>>()
            .join("&");
        let fractions: Vec<f64> = mixture.iter().map(|(_, x)| x).collect();

        let mut state = AbstractState::new(backend, name.as_str())?;
        if fractions.len() > 1 {
            state.set_fractions(&fractions)?;
        }
        Ok(Self::from_abstract_state(state, name))
    }
}

impl<Fluid> CoolProp<Fluid> {
    fn from_abstract_state(state: AbstractState, name: String) -> Self {
        Self {
            state: Mutex::new(state),
            name,
            _fluid: PhantomData,
        }
    }

    /// The CoolProp fluid string, such as `Propane&n-Pentane`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the molar mass of the fluid.
    ///
    /// # Errors
    ///
    /// Returns [`CoolPropError`] if the call fails.
    pub fn molar_mass(&self) -> Result<MolarMass, CoolPropError> {
        let abstract_state = self.state.lock()?;
        let molar_mass = abstract_state.keyed_output(FluidTrivialParam::MolarMass)?;
        Ok(MolarMass::new::<kilogram_per_mole>(molar_mass))
    }

    /// Locks the underlying `AbstractState` positioned at `state`.
    ///
    /// The last flash is reused when it produced exactly this `(T, ρ)`.
    /// Mixture flashes from `(ρ, T)` are unreliable inside the two-phase
    /// dome, and every state handed out by `state_from` comes from a flash
    /// on this handle.
    fn lock_with_state(
        &self,
        state: &State<Fluid>,
    ) -> Result<MutexGuard<'_, AbstractState>, CoolPropError> {
        let mut abstract_state = self.state.lock()?;
        let temperature = state.temperature.get::<kelvin>();
        let density = state.density.get::<kilogram_per_cubic_meter>();

        let current = (
            abstract_state.keyed_output(FluidParam::T),
            abstract_state.keyed_output(FluidParam::DMass),
        );
        let positioned = matches!(
            current,
            (Ok(t), Ok(d)) if t.to_bits() == temperature.to_bits()
                && d.to_bits() == density.to_bits()
        );

        if !positioned {
            abstract_state.update(FluidInputPair::DMassT, density, temperature)?;
        }
        Ok(abstract_state)
    }

    fn output(&self, state: &State<Fluid>, param: FluidParam) -> Result<f64, CoolPropError> {
        let abstract_state = self.lock_with_state(state)?;
        Ok(abstract_state.keyed_output(param)?)
    }

    /// Flashes from `pair` and reads back the `(T, ρ)` that identify the state.
    fn flash(
        &self,
        fluid: Fluid,
        pair: FluidInputPair,
        first: f64,
        second: f64,
    ) -> Result<State<Fluid>, CoolPropError> {
        let mut abstract_state = self.state.lock()?;
        abstract_state.update(pair, first, second)?;

        let temperature = abstract_state.keyed_output(FluidParam::T)?;
        let density = abstract_state.keyed_output(FluidParam::DMass)?;

        Ok(State {
            temperature: ThermodynamicTemperature::new::<kelvin>(temperature),
            density: MassDensity::new::<kilogram_per_cubic_meter>(density),
            fluid,
        })
    }
}

impl<Fluid> HasPressure for CoolProp<Fluid> {
    fn pressure(&self, state: &State<Fluid>) -> Result<Pressure, PropertyError> {
        let pressure = self.output(state, FluidParam::P)?;
        Ok(Pressure::new::<pascal>(pressure))
    }
}

impl<Fluid> HasEnthalpy for CoolProp<Fluid> {
    fn enthalpy(&self, state: &State<Fluid>) -> Result<SpecificEnthalpy, PropertyError> {
        let enthalpy = self.output(state, FluidParam::HMass)?;
        Ok(SpecificEnthalpy::new::<joule_per_kilogram>(enthalpy))
    }
}

impl<Fluid> HasEntropy for CoolProp<Fluid> {
    fn entropy(&self, state: &State<Fluid>) -> Result<SpecificEntropy, PropertyError> {
        let entropy = self.output(state, FluidParam::SMass)?;
        Ok(SpecificEntropy::new::<joule_per_kilogram_kelvin>(entropy))
    }
}

impl<Fluid> HasCp for CoolProp<Fluid> {
    fn cp(&self, state: &State<Fluid>) -> Result<SpecificHeatCapacity, PropertyError> {
        let cp = self.output(state, FluidParam::CpMass)?;
        Ok(SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp))
    }
}

impl<Fluid> HasQuality for CoolProp<Fluid> {
    /// Vapor mass fraction inside the two-phase region, `None` outside it.
    fn quality(&self, state: &State<Fluid>) -> Result<Option<Ratio>, PropertyError> {
        let quality = self.output(state, FluidParam::Q)?;
        Ok((0.0..=1.0)
            .contains(&quality)
            .then_some(Ratio::new::<ratio>(quality)))
    }
}

impl<Fluid> StateFrom<(Fluid, ThermodynamicTemperature, Pressure)> for CoolProp<Fluid> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, temperature, pressure): (Fluid, ThermodynamicTemperature, Pressure),
    ) -> Result<State<Fluid>, Self::Error> {
        self.flash(
            fluid,
            FluidInputPair::PT,
            pressure.get::<pascal>(),
            temperature.get::<kelvin>(),
        )
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEnthalpy)> for CoolProp<Fluid> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, pressure, enthalpy): (Fluid, Pressure, SpecificEnthalpy),
    ) -> Result<State<Fluid>, Self::Error> {
        self.flash(
            fluid,
            FluidInputPair::HMassP,
            enthalpy.get::<joule_per_kilogram>(),
            pressure.get::<pascal>(),
        )
    }
}

impl<Fluid> StateFrom<(Fluid, Pressure, SpecificEntropy)> for CoolProp<Fluid> {
    type Error = CoolPropError;

    fn state_from(
        &self,
        (fluid, pressure, entropy): (Fluid, Pressure, SpecificEntropy),
    ) -> Result<State<Fluid>, Self::Error> {
        self.flash(
            fluid,
            FluidInputPair::PSMass,
            pressure.get::<pascal>(),
            entropy.get::<joule_per_kilogram_kelvin>(),
        )
    }
}

// Static assertion: CoolProp<Mixture> must be Send + Sync so streams can be
// solved from worker threads. rfluids serializes the FFI calls and the local
// mutex keeps each update/query pair atomic.
#[allow(dead_code)]
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn check() {
        assert_send_sync::<CoolProp<Mixture>>();
    }
};
