//! Axial energy balance between the two streams.

use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{HeatTransfer, Length, ThermalConductivity},
    length::meter,
};

use crate::support::{
    bvp::BoundaryValueProblem,
    thermo::{EvaluationError, StateEvaluator},
    units::{SpecificEnthalpy, SpecificEnthalpyGradient, TemperatureDifference},
};

use super::{Geometry, Streams};

/// Convective energy balance of a counter-flow exchanger.
///
/// With `P` the wetted perimeter and `U` the heat transfer coefficient,
///
/// ```text
/// dh0/dx = (U·P / m0)·(T1 − T0)
/// dh1/dx = (U·P / m1)·(T1 − T0)
/// ```
///
/// Both derivatives carry the same sign. The inner stream flows towards
/// increasing `x` and the outer stream towards decreasing `x`, so a stream
/// that is heated along its own flow direction has a positive gradient on
/// the inner side and a negative one on the outer side.
///
/// Temperatures are resolved from `(p, h)` at every evaluation.
pub struct EnergyBalance<'a, InnerFluid, OuterFluid, InnerThermo, OuterThermo> {
    streams: &'a Streams<InnerFluid, OuterFluid>,
    thermo_inner: &'a InnerThermo,
    thermo_outer: &'a OuterThermo,
    conductance_per_length: ThermalConductivity,
    length: Length,
}

impl<'a, InnerFluid, OuterFluid, InnerThermo, OuterThermo>
    EnergyBalance<'a, InnerFluid, OuterFluid, InnerThermo, OuterThermo>
{
    pub(super) fn new(
        streams: &'a Streams<InnerFluid, OuterFluid>,
        geometry: &Geometry,
        coefficient: HeatTransfer,
        thermo_inner: &'a InnerThermo,
        thermo_outer: &'a OuterThermo,
    ) -> Self {
        Self {
            streams,
            thermo_inner,
            thermo_outer,
            conductance_per_length: coefficient * geometry.perimeter(),
            length: geometry.length(),
        }
    }

    /// Exchanger length, the right end of the domain.
    #[must_use]
    pub fn length(&self) -> Length {
        self.length
    }

    /// Boundary residuals `[h0(0) − h0_in, h1(L) − h1_in]`.
    #[must_use]
    pub fn bc(
        &self,
        left: [SpecificEnthalpy; 2],
        right: [SpecificEnthalpy; 2],
    ) -> [SpecificEnthalpy; 2] {
        [
            left[0] - self.streams.inner.inlet_enthalpy(),
            right[1] - self.streams.outer.inlet_enthalpy(),
        ]
    }
}

impl<InnerFluid, OuterFluid, InnerThermo, OuterThermo>
    EnergyBalance<'_, InnerFluid, OuterFluid, InnerThermo, OuterThermo>
where
    InnerFluid: Clone,
    OuterFluid: Clone,
    InnerThermo: StateEvaluator<InnerFluid>,
    OuterThermo: StateEvaluator<OuterFluid>,
{
    /// Enthalpy gradients `[dh0/dx, dh1/dx]` at `(x, [h0, h1])`.
    ///
    /// The coefficient is uniform, so `x` does not enter the balance.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] if either temperature cannot be resolved.
    pub fn energy(
        &self,
        _x: Length,
        h: [SpecificEnthalpy; 2],
    ) -> Result<[SpecificEnthalpyGradient; 2], EvaluationError> {
        let inner = &self.streams.inner;
        let outer = &self.streams.outer;

        let t_inner = self
            .thermo_inner
            .temperature_hp(inner.fluid(), inner.pressure(), h[0])?;
        let t_outer = self
            .thermo_outer
            .temperature_hp(outer.fluid(), outer.pressure(), h[1])?;

        let heat_per_length = self.conductance_per_length * t_outer.minus(t_inner);

        Ok([
            heat_per_length / inner.mass_flow(),
            heat_per_length / outer.mass_flow(),
        ])
    }
}

impl<InnerFluid, OuterFluid, InnerThermo, OuterThermo> BoundaryValueProblem<2>
    for EnergyBalance<'_, InnerFluid, OuterFluid, InnerThermo, OuterThermo>
where
    InnerFluid: Clone,
    OuterFluid: Clone,
    InnerThermo: StateEvaluator<InnerFluid>,
    OuterThermo: StateEvaluator<OuterFluid>,
{
    type Error = EvaluationError;

    fn rhs(&self, x: f64, y: &[f64; 2]) -> Result<[f64; 2], Self::Error> {
        let gradients = self.energy(Length::new::<meter>(x), y.map(enthalpy))?;
        Ok(gradients.map(|gradient| gradient.value))
    }

    fn boundary_residuals(&self, ya: &[f64; 2], yb: &[f64; 2]) -> [f64; 2] {
        self.bc(ya.map(enthalpy), yb.map(enthalpy))
            .map(|residual| residual.get::<joule_per_kilogram>())
    }
}

fn enthalpy(value: f64) -> SpecificEnthalpy {
    SpecificEnthalpy::new::<joule_per_kilogram>(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::heat_transfer::watt_per_square_meter_kelvin;

    use crate::{
        models::thermal::hx::core::{
            CounterFlowHx,
            test_support::{air, air_water_streams, example_geometry, water},
        },
        support::thermo::fluid::{Air, Water},
    };

    fn reference_hx() -> CounterFlowHx<Air, Water> {
        CounterFlowHx::new(
            air_water_streams(0.012, 354.0, 0.0213, 290.0),
            example_geometry(),
            HeatTransfer::new::<watt_per_square_meter_kelvin>(500.0),
        )
        .unwrap()
    }

    #[test]
    fn hot_inner_stream_cools_along_x() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = reference_hx();
        let balance = hx.energy_balance(&thermo_air, &thermo_water);
        let inlets = [
            hx.streams().inner.inlet_enthalpy(),
            hx.streams().outer.inlet_enthalpy(),
        ];

        let [dh0, dh1] = balance.energy(Length::new::<meter>(0.0), inlets).unwrap();

        // U·P·ΔT = 500 · 0.12π · (−64) W/m
        let heat_per_length = 500.0 * 0.12 * std::f64::consts::PI * -64.0;
        assert_relative_eq!(dh0.value, heat_per_length / 0.012, max_relative = 1e-9);
        assert_relative_eq!(dh1.value, heat_per_length / 0.0213, max_relative = 1e-9);
        assert!(dh0.value < 0.0 && dh1.value < 0.0);
    }

    #[test]
    fn boundary_residuals_vanish_at_the_inlets() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = reference_hx();
        let balance = hx.energy_balance(&thermo_air, &thermo_water);
        let h0 = hx.streams().inner.inlet_enthalpy().get::<joule_per_kilogram>();
        let h1 = hx.streams().outer.inlet_enthalpy().get::<joule_per_kilogram>();

        // Only h0 at x = 0 and h1 at x = L are constrained.
        assert_eq!(
            balance.boundary_residuals(&[h0, -1.0], &[7.0, h1]),
            [0.0, 0.0]
        );
        let [r0, r1] = balance.boundary_residuals(&[h0 + 2.0, 0.0], &[0.0, h1 - 3.0]);
        assert_relative_eq!(r0, 2.0, epsilon = 1e-9);
        assert_relative_eq!(r1, -3.0, epsilon = 1e-9);
    }

    #[test]
    fn rhs_matches_the_typed_balance() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = reference_hx();
        let balance = hx.energy_balance(&thermo_air, &thermo_water);
        let h = [
            hx.streams().inner.inlet_enthalpy() - enthalpy(10_000.0),
            hx.streams().outer.inlet_enthalpy() + enthalpy(5_000.0),
        ];

        let typed = balance.energy(Length::new::<meter>(1.5), h).unwrap();
        let raw = balance.rhs(1.5, &h.map(|v| v.value)).unwrap();

        assert_eq!(raw, typed.map(|g| g.value));
    }

    #[test]
    fn unresolvable_states_are_reported() {
        let (thermo_air, thermo_water) = (air(), water());
        let hx = reference_hx();
        let balance = hx.energy_balance(&thermo_air, &thermo_water);

        let result = balance.rhs(0.0, &[-1e9, hx.streams().outer.inlet_enthalpy().value]);

        assert!(matches!(
            result,
            Err(EvaluationError::StateConstruction { .. })
        ));
    }
}
