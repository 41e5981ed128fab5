//! Ideal counter-flow heat transfer limit.

use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{MassRate, Power},
};

use crate::support::{
    thermo::{EvaluationError, StateEvaluator, StateVector},
    units::SpecificEnthalpy,
};

use super::{Streams, linspace};

/// The stream whose hypothetical duty sets the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitingStream {
    Inner,
    Outer,
}

/// The largest duty an infinitely long counter-flow exchanger could reach.
///
/// Each stream is taken to leave at the other stream's inlet temperature
/// and its own pressure. The stream with the smaller resulting duty limits
/// the exchanger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatFlowLimit {
    /// Duty of smaller magnitude, signed as the limiting stream experiences it.
    pub q_max: Power,
    pub limiting: LimitingStream,

    /// `m·(h_exit − h_in)` for each stream.
    pub inner_duty: Power,
    pub outer_duty: Power,

    pub inner_inlet: StateVector,
    pub outer_inlet: StateVector,

    /// Hypothetical exit states at the opposite inlet temperature.
    pub inner_exit: StateVector,
    pub outer_exit: StateVector,
}

/// Bounding enthalpy arrays spanning the limiting duty.
#[derive(Debug, Clone, PartialEq)]
pub struct EnthalpySweeps {
    pub inner: Vec<SpecificEnthalpy>,
    pub outer: Vec<SpecificEnthalpy>,
}

impl HeatFlowLimit {
    /// Mass flow of the limiting stream.
    #[must_use]
    pub fn limiting_mass_flow<InnerFluid, OuterFluid>(
        &self,
        streams: &Streams<InnerFluid, OuterFluid>,
    ) -> MassRate {
        match self.limiting {
            LimitingStream::Inner => streams.inner.mass_flow(),
            LimitingStream::Outer => streams.outer.mass_flow(),
        }
    }

    /// Evenly spaced enthalpies spanning `q_max / m_limit` from each inlet.
    ///
    /// The inner sweep starts at the inner inlet and the outer sweep ends at
    /// the outer inlet, matching where each stream enters.
    #[must_use]
    pub fn enthalpy_sweeps<InnerFluid, OuterFluid>(
        &self,
        streams: &Streams<InnerFluid, OuterFluid>,
        points: usize,
    ) -> EnthalpySweeps {
        let span: SpecificEnthalpy = self.q_max / self.limiting_mass_flow(streams);
        let span = span.get::<joule_per_kilogram>();
        let h0 = streams.inner.inlet_enthalpy().get::<joule_per_kilogram>();
        let h1 = streams.outer.inlet_enthalpy().get::<joule_per_kilogram>();

        let to_enthalpy = |values: Vec<f64>| {
            values
                .into_iter()
                .map(SpecificEnthalpy::new::<joule_per_kilogram>)
                .collect()
        };

        EnthalpySweeps {
            inner: to_enthalpy(linspace(h0, h0 + span, points)),
            outer: to_enthalpy(linspace(h1 - span, h1, points)),
        }
    }
}

/// Evaluates the ideal counter-flow heat transfer limit.
///
/// When both hypothetical duties have the same magnitude the inner stream
/// is reported as limiting.
///
/// # Errors
///
/// Returns [`EvaluationError`] if any inlet or hypothetical exit state
/// cannot be resolved.
pub fn q_max<InnerFluid, OuterFluid>(
    streams: &Streams<InnerFluid, OuterFluid>,
    thermo_inner: &impl StateEvaluator<InnerFluid>,
    thermo_outer: &impl StateEvaluator<OuterFluid>,
) -> Result<HeatFlowLimit, EvaluationError>
where
    InnerFluid: Clone,
    OuterFluid: Clone,
{
    let inner_inlet = streams.inner.inlet_state(thermo_inner)?;
    let outer_inlet = streams.outer.inlet_state(thermo_outer)?;

    let inner_exit = thermo_inner.evaluate_tp(
        streams.inner.fluid(),
        outer_inlet.temperature,
        streams.inner.pressure(),
    )?;
    let outer_exit = thermo_outer.evaluate_tp(
        streams.outer.fluid(),
        inner_inlet.temperature,
        streams.outer.pressure(),
    )?;

    let inner_duty = streams.inner.mass_flow() * (inner_exit.enthalpy - inner_inlet.enthalpy);
    let outer_duty = streams.outer.mass_flow() * (outer_exit.enthalpy - outer_inlet.enthalpy);

    let (q_max, limiting) = smaller_duty(inner_duty, outer_duty);

    Ok(HeatFlowLimit {
        q_max,
        limiting,
        inner_duty,
        outer_duty,
        inner_inlet,
        outer_inlet,
        inner_exit,
        outer_exit,
    })
}

fn smaller_duty(inner_duty: Power, outer_duty: Power) -> (Power, LimitingStream) {
    if inner_duty.abs() > outer_duty.abs() {
        (outer_duty, LimitingStream::Outer)
    } else {
        (inner_duty, LimitingStream::Inner)
    }
}
