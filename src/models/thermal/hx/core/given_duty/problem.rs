//! Problem formulation for duty-targeted sizing.

use std::convert::Infallible;

use twine_core::{EquationProblem, Model};
use uom::si::{
    f64::{HeatTransfer, Power},
    heat_transfer::watt_per_square_meter_kelvin,
    power::watt,
};

use crate::{
    models::thermal::hx::core::{
        Geometry, SolveConfig, SolveError, Streams, solve::solve,
    },
    support::thermo::StateEvaluator,
};

use super::SizedExchanger;

/// Model adapter exposing the heat transfer coefficient as the sole input.
///
/// A solve that does not converge is reported as an error so the search
/// can steer away from it.
pub(super) struct GivenDutyModel<'a, InnerFluid, OuterFluid, InnerThermo, OuterThermo> {
    streams: &'a Streams<InnerFluid, OuterFluid>,
    geometry: &'a Geometry,
    config: &'a SolveConfig,
    thermo_inner: &'a InnerThermo,
    thermo_outer: &'a OuterThermo,
}

impl<'a, InnerFluid, OuterFluid, InnerThermo, OuterThermo>
    GivenDutyModel<'a, InnerFluid, OuterFluid, InnerThermo, OuterThermo>
{
    pub(super) fn new(
        streams: &'a Streams<InnerFluid, OuterFluid>,
        geometry: &'a Geometry,
        config: &'a SolveConfig,
        thermo_inner: &'a InnerThermo,
        thermo_outer: &'a OuterThermo,
    ) -> Self {
        Self {
            streams,
            geometry,
            config,
            thermo_inner,
            thermo_outer,
        }
    }
}

impl<InnerFluid, OuterFluid, InnerThermo, OuterThermo> Model
    for GivenDutyModel<'_, InnerFluid, OuterFluid, InnerThermo, OuterThermo>
where
    InnerFluid: Clone,
    OuterFluid: Clone,
    InnerThermo: StateEvaluator<InnerFluid>,
    OuterThermo: StateEvaluator<OuterFluid>,
{
    type Input = HeatTransfer;
    type Output = SizedExchanger;
    type Error = SolveError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let solution = solve(
            self.streams,
            self.geometry,
            *input,
            self.config,
            self.thermo_inner,
            self.thermo_outer,
        )?;

        if !solution.success() {
            return Err(SolveError::NotConverged {
                status: solution.status,
                message: solution.message,
            });
        }

        Ok(SizedExchanger {
            coefficient: *input,
            solution,
        })
    }
}

/// Equation problem definition for duty matching.
///
/// Computes the residual as `|duty| - target`, which grows with the coefficient.
pub(super) struct GivenDutyProblem {
    target: Power,
}

impl GivenDutyProblem {
    pub(super) fn new(target: Power) -> Self {
        Self { target }
    }
}

impl EquationProblem<1> for GivenDutyProblem {
    type Input = HeatTransfer;
    type Output = SizedExchanger;
    type Error = Infallible;

    fn input(&self, x: &[f64; 1]) -> Result<Self::Input, Self::Error> {
        Ok(HeatTransfer::new::<watt_per_square_meter_kelvin>(x[0]))
    }

    fn residuals(
        &self,
        _input: &Self::Input,
        output: &Self::Output,
    ) -> Result<[f64; 1], Self::Error> {
        let duty = output.solution.duty().abs().get::<watt>();
        Ok([duty - self.target.get::<watt>()])
    }
}
