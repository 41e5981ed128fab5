use uom::si::{
    f64::{Length, MassRate, Pressure, ThermodynamicTemperature},
    length::meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    thermal_conductance::watt_per_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::thermo::{
    StateEvaluator,
    capability::HasCp,
    fluid::{Air, Water},
    model::{Incompressible, PerfectGas},
};

use super::{CounterFlowHx, FluidStream, Geometry, Streams};

pub(crate) fn air() -> PerfectGas<Air> {
    PerfectGas::new().unwrap()
}

pub(crate) fn water() -> Incompressible<Water> {
    Incompressible::new().unwrap()
}

pub(crate) fn air_stream(mass_flow: f64, temperature: f64) -> FluidStream<Air> {
    FluidStream::from_inlet_temperature(
        &air(),
        Air,
        MassRate::new::<kilogram_per_second>(mass_flow),
        Pressure::new::<pascal>(5e5),
        ThermodynamicTemperature::new::<kelvin>(temperature),
    )
    .unwrap()
}

pub(crate) fn water_stream(mass_flow: f64, temperature: f64) -> FluidStream<Water> {
    FluidStream::from_inlet_temperature(
        &water(),
        Water,
        MassRate::new::<kilogram_per_second>(mass_flow),
        Pressure::new::<pascal>(4e5),
        ThermodynamicTemperature::new::<kelvin>(temperature),
    )
    .unwrap()
}

/// Hot air inside, water outside.
pub(crate) fn air_water_streams(
    m_air: f64,
    t_air: f64,
    m_water: f64,
    t_water: f64,
) -> Streams<Air, Water> {
    Streams {
        inner: air_stream(m_air, t_air),
        outer: water_stream(m_water, t_water),
    }
}

/// Water inside, air outside.
pub(crate) fn water_air_streams(
    m_water: f64,
    t_water: f64,
    m_air: f64,
    t_air: f64,
) -> Streams<Water, Air> {
    Streams {
        inner: water_stream(m_water, t_water),
        outer: air_stream(m_air, t_air),
    }
}

pub(crate) fn air_air_streams(
    m_inner: f64,
    t_inner: f64,
    m_outer: f64,
    t_outer: f64,
) -> Streams<Air, Air> {
    Streams {
        inner: air_stream(m_inner, t_inner),
        outer: air_stream(m_outer, t_outer),
    }
}

/// 12 tubes, 10 mm bore, 4 m long.
pub(crate) fn example_geometry() -> Geometry {
    Geometry::new(
        Length::new::<meter>(4.0),
        Length::new::<meter>(0.01),
        Length::new::<meter>(0.0125),
        12,
    )
    .unwrap()
}

/// Capacity rate `m·cp` at the stream inlet, in W/K.
pub(crate) fn capacity_rate<Fluid, Thermo>(thermo: &Thermo, stream: &FluidStream<Fluid>) -> f64
where
    Fluid: Clone,
    Thermo: StateEvaluator<Fluid> + HasCp,
{
    let state = thermo
        .state_from((
            stream.fluid().clone(),
            stream.pressure(),
            stream.inlet_enthalpy(),
        ))
        .unwrap();
    (stream.mass_flow() * thermo.cp(&state).unwrap()).get::<watt_per_kelvin>()
}

/// Counter-flow duty magnitude from the effectiveness-NTU relation, in W.
///
/// Exact for constant heat capacities.
pub(crate) fn ntu_duty<InnerFluid, OuterFluid, InnerThermo, OuterThermo>(
    hx: &CounterFlowHx<InnerFluid, OuterFluid>,
    thermo_inner: &InnerThermo,
    thermo_outer: &OuterThermo,
) -> f64
where
    InnerFluid: Clone,
    OuterFluid: Clone,
    InnerThermo: StateEvaluator<InnerFluid> + HasCp,
    OuterThermo: StateEvaluator<OuterFluid> + HasCp,
{
    let c_inner = capacity_rate(thermo_inner, &hx.streams().inner);
    let c_outer = capacity_rate(thermo_outer, &hx.streams().outer);
    let (c_min, c_max) = (c_inner.min(c_outer), c_inner.max(c_outer));
    let cr = c_min / c_max;
    let ntu = hx.conductance().get::<watt_per_kelvin>() / c_min;

    let effectiveness = if (1.0 - cr).abs() < 1e-12 {
        ntu / (1.0 + ntu)
    } else {
        let e = (-ntu * (1.0 - cr)).exp();
        (1.0 - e) / (1.0 - cr * e)
    };

    let t_inner = hx
        .streams()
        .inner
        .inlet_state(thermo_inner)
        .unwrap()
        .temperature
        .get::<kelvin>();
    let t_outer = hx
        .streams()
        .outer
        .inlet_state(thermo_outer)
        .unwrap()
        .temperature
        .get::<kelvin>();

    effectiveness * c_min * (t_inner - t_outer).abs()
}
