use std::f64::consts::PI;

use uom::si::f64::{Area, HeatTransfer, Length, ThermalConductance};

use crate::support::constraint::StrictlyPositive;

use super::InputError;

/// Tube bundle dimensions.
///
/// Heat transfer is referred to the inner tube surface. The outer diameter
/// is carried for reporting and downstream sizing only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    length: Length,
    inner_diameter: Length,
    outer_diameter: Length,
    tubes: u32,
}

impl Geometry {
    /// Constructs validated geometry.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if any dimension or the tube count is not strictly positive.
    pub fn new(
        length: Length,
        inner_diameter: Length,
        outer_diameter: Length,
        tubes: u32,
    ) -> Result<Self, InputError> {
        Ok(Self {
            length: StrictlyPositive::new(length)
                .map_err(InputError::constraint("length"))?
                .into_inner(),
            inner_diameter: StrictlyPositive::new(inner_diameter)
                .map_err(InputError::constraint("inner diameter"))?
                .into_inner(),
            outer_diameter: StrictlyPositive::new(outer_diameter)
                .map_err(InputError::constraint("outer diameter"))?
                .into_inner(),
            tubes: StrictlyPositive::new(tubes)
                .map_err(InputError::constraint("tube count"))?
                .into_inner(),
        })
    }

    #[must_use]
    pub fn length(&self) -> Length {
        self.length
    }

    #[must_use]
    pub fn inner_diameter(&self) -> Length {
        self.inner_diameter
    }

    #[must_use]
    pub fn outer_diameter(&self) -> Length {
        self.outer_diameter
    }

    #[must_use]
    pub fn tubes(&self) -> u32 {
        self.tubes
    }

    /// Wetted perimeter of all tubes, `π·d_in·n`.
    #[must_use]
    pub fn perimeter(&self) -> Length {
        self.inner_diameter * PI * f64::from(self.tubes)
    }

    /// Heat transfer area, `L·P`.
    #[must_use]
    pub fn area(&self) -> Area {
        self.length * self.perimeter()
    }

    /// Overall conductance `UA` for a uniform heat transfer coefficient.
    #[must_use]
    pub fn conductance(&self, coefficient: HeatTransfer) -> ThermalConductance {
        coefficient * self.area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        area::square_meter, heat_transfer::watt_per_square_meter_kelvin, length::meter,
        thermal_conductance::watt_per_kelvin,
    };

    fn bundle() -> Geometry {
        Geometry::new(
            Length::new::<meter>(4.0),
            Length::new::<meter>(0.01),
            Length::new::<meter>(0.0125),
            12,
        )
        .unwrap()
    }

    #[test]
    fn derived_quantities() {
        let geometry = bundle();

        assert_relative_eq!(geometry.perimeter().get::<meter>(), 0.12 * PI);
        assert_relative_eq!(geometry.area().get::<square_meter>(), 0.48 * PI);
        assert_relative_eq!(
            geometry
                .conductance(HeatTransfer::new::<watt_per_square_meter_kelvin>(500.0))
                .get::<watt_per_kelvin>(),
            240.0 * PI,
            epsilon = 1e-9
        );
    }

    #[test]
    fn rejects_empty_bundles() {
        let meters = Length::new::<meter>;
        assert!(matches!(
            Geometry::new(meters(4.0), meters(0.01), meters(0.0125), 0),
            Err(InputError::Constraint {
                quantity: "tube count",
                ..
            })
        ));
        assert!(matches!(
            Geometry::new(meters(0.0), meters(0.01), meters(0.0125), 1),
            Err(InputError::Constraint {
                quantity: "length",
                ..
            })
        ));
    }
}
