//! Full thermodynamic states along a converged solution.

use tracing::warn;
use uom::si::f64::{Length, MassRate, Power, ThermodynamicTemperature};

use crate::support::{
    thermo::{ReferenceEnvironment, StateEvaluator, StateVector},
    units::EntropyRate,
};

use super::{BvpSolution, HeatFlowLimit, SolveConfig, SolveError, Streams, exergy};

/// States of both streams at every node of a converged mesh.
///
/// Holds at least two nodes; the first is at `x = 0` and the last at `x = L`.
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionProfile {
    mesh: Vec<Length>,
    inner: Vec<StateVector>,
    outer: Vec<StateVector>,
    inner_mass_flow: MassRate,
    outer_mass_flow: MassRate,
}

/// Temperature against position and against cumulative heat flow.
///
/// The heat flow of each stream is `H̄(x) = m·(h(x) − h(L))`, so both curves
/// reach zero at `x = L`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThCurves {
    pub position: Vec<Length>,
    pub inner_temperature: Vec<ThermodynamicTemperature>,
    pub outer_temperature: Vec<ThermodynamicTemperature>,
    pub inner_heat_flow: Vec<Power>,
    pub outer_heat_flow: Vec<Power>,
}

impl SolutionProfile {
    pub(super) fn new<InnerFluid, OuterFluid>(
        solution: &BvpSolution,
        streams: &Streams<InnerFluid, OuterFluid>,
        thermo_inner: &impl StateEvaluator<InnerFluid>,
        thermo_outer: &impl StateEvaluator<OuterFluid>,
    ) -> Result<Self, SolveError>
    where
        InnerFluid: Clone,
        OuterFluid: Clone,
    {
        if solution.mesh.len() < 2 {
            return Err(SolveError::Configuration {
                reason: format!("profile needs at least 2 nodes, got {}", solution.mesh.len()),
            });
        }

        let inner = thermo_inner
            .evaluate_hp_many(
                streams.inner.fluid(),
                streams.inner.pressure(),
                &solution.inner_enthalpy,
            )
            .map_err(|err| SolveError::property("inner stream profile", err))?;
        let outer = thermo_outer
            .evaluate_hp_many(
                streams.outer.fluid(),
                streams.outer.pressure(),
                &solution.outer_enthalpy,
            )
            .map_err(|err| SolveError::property("outer stream profile", err))?;

        Ok(Self {
            mesh: solution.mesh.clone(),
            inner,
            outer,
            inner_mass_flow: streams.inner.mass_flow(),
            outer_mass_flow: streams.outer.mass_flow(),
        })
    }

    #[must_use]
    pub fn mesh(&self) -> &[Length] {
        &self.mesh
    }

    #[must_use]
    pub fn inner(&self) -> &[StateVector] {
        &self.inner
    }

    #[must_use]
    pub fn outer(&self) -> &[StateVector] {
        &self.outer
    }

    #[must_use]
    pub fn inner_mass_flow(&self) -> MassRate {
        self.inner_mass_flow
    }

    #[must_use]
    pub fn outer_mass_flow(&self) -> MassRate {
        self.outer_mass_flow
    }

    /// `m0·(s0(L) − s0(0)) + m1·(s1(0) − s1(L))`.
    #[must_use]
    pub fn entropy_production(&self) -> EntropyRate {
        let (inner_in, inner_out) = ends(&self.inner);
        let (outer_out, outer_in) = ends(&self.outer);

        self.inner_mass_flow * (inner_out.entropy - inner_in.entropy)
            + self.outer_mass_flow * (outer_out.entropy - outer_in.entropy)
    }

    /// Heat absorbed by the outer stream, `m1·(h1(0) − h1(L))`.
    #[must_use]
    pub fn duty(&self) -> Power {
        let (outer_out, outer_in) = ends(&self.outer);
        self.outer_mass_flow * (outer_out.enthalpy - outer_in.enthalpy)
    }

    /// Heat released by the inner stream, `m0·(h0(0) − h0(L))`.
    ///
    /// Equal to [`duty`](Self::duty) for a converged energy balance.
    #[must_use]
    pub fn inner_duty(&self) -> Power {
        let (inner_in, inner_out) = ends(&self.inner);
        self.inner_mass_flow * (inner_in.enthalpy - inner_out.enthalpy)
    }

    /// Lost work `T_ref·S_gen`.
    #[must_use]
    pub fn exergy_destruction(&self, environment: &ReferenceEnvironment) -> Power {
        exergy::exergy_destruction(self.entropy_production(), environment)
    }

    /// Builds the T–x and T–H̄ curves.
    #[must_use]
    pub fn th_curves(&self) -> ThCurves {
        let heat_flow = |states: &[StateVector], mass_flow: MassRate| -> Vec<Power> {
            let (_, last) = ends(states);
            states
                .iter()
                .map(|state| mass_flow * (state.enthalpy - last.enthalpy))
                .collect()
        };

        ThCurves {
            position: self.mesh.clone(),
            inner_temperature: self.inner.iter().map(|s| s.temperature).collect(),
            outer_temperature: self.outer.iter().map(|s| s.temperature).collect(),
            inner_heat_flow: heat_flow(&self.inner, self.inner_mass_flow),
            outer_heat_flow: heat_flow(&self.outer, self.outer_mass_flow),
        }
    }

    /// Checks the converged profile against the counter-flow limit and the second law.
    ///
    /// The duty may exceed `|q_max|` by `duty_rel_tol·|q_max| + duty_abs_tol`.
    /// Entropy production may fall below zero by `entropy_abs_tol` plus
    /// `entropy_rel_tol` times the summed endpoint entropy flows `Σ m·|s|`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::DutyExceedsLimit`] or
    /// [`SolveError::NegativeEntropyProduction`].
    pub fn check_consistency(
        &self,
        limit: &HeatFlowLimit,
        config: &SolveConfig,
    ) -> Result<(), SolveError> {
        let duty = self.duty();
        let allowed = limit.q_max.abs() * (1.0 + config.duty_rel_tol) + config.duty_abs_tol;
        if duty.abs() > allowed {
            warn!(?duty, q_max = ?limit.q_max, "duty exceeds the counter-flow limit");
            return Err(SolveError::DutyExceedsLimit {
                duty,
                q_max: limit.q_max,
            });
        }

        let entropy_production = self.entropy_production();
        let slack = config.entropy_abs_tol + self.entropy_flow_scale() * config.entropy_rel_tol;
        if entropy_production < -slack {
            warn!(?entropy_production, "negative entropy production");
            return Err(SolveError::NegativeEntropyProduction { entropy_production });
        }

        Ok(())
    }

    /// `Σ m·|s|` over both ends of both streams.
    fn entropy_flow_scale(&self) -> EntropyRate {
        let (inner_a, inner_b) = ends(&self.inner);
        let (outer_a, outer_b) = ends(&self.outer);

        self.inner_mass_flow * (inner_a.entropy.abs() + inner_b.entropy.abs())
            + self.outer_mass_flow * (outer_a.entropy.abs() + outer_b.entropy.abs())
    }
}

/// First and last states of a profile with at least two nodes.
fn ends(states: &[StateVector]) -> (&StateVector, &StateVector) {
    (&states[0], &states[states.len() - 1])
}
