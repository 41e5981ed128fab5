//! YAML case files for counter-flow runs.
//!
//! A case file names the run, describes both streams by composition and
//! property backend, and gives the geometry and heat transfer coefficient.
//! Every quantity is in SI units. Unknown fields are rejected.
//!
//! ```yaml
//! name: air-water
//! calc_type: const
//! coefficient: 500.0
//! mesh_points: 100
//! geometry: { length: 4.0, inner_diameter: 0.01, outer_diameter: 0.0125, tubes: 12 }
//! inner:
//!   components: [Air]
//!   fractions: [1.0]
//!   backend: perfect_gas
//!   mass_flow: 0.012
//!   pressure: 5.0e5
//!   inlet_temperature: 354.0
//! outer:
//!   components: [Water]
//!   fractions: [1.0]
//!   backend: incompressible
//!   mass_flow: 0.0213
//!   pressure: 4.0e5
//!   inlet_temperature: 290.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use uom::si::{
    available_energy::joule_per_kilogram,
    f64::{
        HeatTransfer, Length, MassDensity, MassRate, Pressure, SpecificHeatCapacity,
        ThermodynamicTemperature,
    },
    heat_transfer::watt_per_square_meter_kelvin,
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    pressure::pascal,
    specific_heat_capacity::joule_per_kilogram_kelvin,
    thermodynamic_temperature::kelvin,
};

use crate::support::{
    thermo::{
        EnvironmentError, ReferenceEnvironment,
        fluid::{Component, Mixture, MixtureError},
        model::{
            Backend, BackendError, BackendKind, Incompressible, PerfectGas,
            incompressible::IncompressibleParameters, perfect_gas::PerfectGasParameters,
        },
    },
    units::{SpecificEnthalpy, SpecificGasConstant},
};

use super::core::{
    CounterFlowHx, FluidStream, Geometry, InputError, SolveConfig, SolveError, Streams,
};

/// Errors that can occur while loading a case file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Only a constant coefficient is supported.
    #[error("calc_type `calc` (position-dependent coefficient) is not supported")]
    VariableCoefficient,

    #[error("{stream} stream: invalid composition")]
    Composition {
        stream: &'static str,
        #[source]
        source: MixtureError,
    },

    #[error("{stream} stream: cannot build property backend")]
    Backend {
        stream: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("{stream} stream: override `{field}` does not apply to the {backend:?} backend")]
    Override {
        stream: &'static str,
        field: &'static str,
        backend: BackendKind,
    },

    #[error("{stream} stream: give exactly one of inlet_enthalpy and inlet_temperature")]
    Inlet { stream: &'static str },

    #[error("invalid {context}")]
    Input {
        context: &'static str,
        #[source]
        source: InputError,
    },

    #[error("invalid solver settings")]
    Solve(#[source] SolveError),

    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

/// Coefficient model flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcType {
    /// Uniform coefficient along the exchanger.
    Const,

    /// Position-dependent coefficient, rejected at load.
    Calc,
}

/// A case file as written.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    pub name: String,
    #[serde(default = "default_calc_type")]
    pub calc_type: CalcType,
    pub inner: RawStream,
    pub outer: RawStream,
    pub geometry: RawGeometry,
    /// W/m²·K.
    pub coefficient: f64,
    #[serde(default = "default_mesh_points")]
    pub mesh_points: usize,
    #[serde(default)]
    pub tolerance: Option<f64>,
    #[serde(default)]
    pub max_nodes: Option<usize>,
    #[serde(default)]
    pub environment: Option<RawEnvironment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawStream {
    pub components: Vec<Component>,
    pub fractions: Vec<f64>,
    pub backend: BackendKind,
    #[serde(default)]
    pub overrides: Option<RawOverrides>,
    /// kg/s.
    pub mass_flow: f64,
    /// Pa.
    pub pressure: f64,
    /// J/kg.
    #[serde(default)]
    pub inlet_enthalpy: Option<f64>,
    /// K.
    #[serde(default)]
    pub inlet_temperature: Option<f64>,
}

/// Explicit model constants replacing the mixing-rule values.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOverrides {
    /// J/kg·K, perfect gas only.
    pub gas_constant: Option<f64>,
    /// J/kg·K.
    pub cp: Option<f64>,
    /// kg/m³, incompressible only.
    pub density: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawGeometry {
    pub length: f64,
    pub inner_diameter: f64,
    pub outer_diameter: f64,
    pub tubes: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawEnvironment {
    /// K.
    pub temperature: f64,
    /// Pa.
    pub pressure: f64,
}

fn default_calc_type() -> CalcType {
    CalcType::Const
}

fn default_mesh_points() -> usize {
    SolveConfig::default().mesh_points
}

/// A validated case, ready to solve.
///
/// Each stream owns its property backend.
#[derive(Debug)]
pub struct HxConfig {
    pub name: String,
    pub hx: CounterFlowHx<Mixture, Mixture>,
    pub thermo_inner: Backend<Mixture>,
    pub thermo_outer: Backend<Mixture>,
    pub solve: SolveConfig,
    pub environment: ReferenceEnvironment,
}

/// Reads and validates a case file.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read, is not valid YAML for
/// the schema, or describes a non-physical case.
pub fn load_yaml(path: &Path) -> Result<HxConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_yaml_str(&content)
}

/// Parses and validates a case from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError`] if the text does not match the schema or
/// describes a non-physical case.
pub fn from_yaml_str(content: &str) -> Result<HxConfig, ConfigError> {
    let raw: RawConfig = serde_yaml::from_str(content)?;
    raw.validate()
}

impl RawConfig {
    /// Converts the record into typed, constrained inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any part of the case is non-physical.
    pub fn validate(self) -> Result<HxConfig, ConfigError> {
        if self.calc_type == CalcType::Calc {
            return Err(ConfigError::VariableCoefficient);
        }

        let (inner, thermo_inner) = self.inner.build("inner")?;
        let (outer, thermo_outer) = self.outer.build("outer")?;

        let geometry = Geometry::new(
            Length::new::<meter>(self.geometry.length),
            Length::new::<meter>(self.geometry.inner_diameter),
            Length::new::<meter>(self.geometry.outer_diameter),
            self.geometry.tubes,
        )
        .map_err(input("geometry"))?;

        let hx = CounterFlowHx::new(
            Streams { inner, outer },
            geometry,
            HeatTransfer::new::<watt_per_square_meter_kelvin>(self.coefficient),
        )
        .map_err(input("heat transfer coefficient"))?;

        let defaults = SolveConfig::default();
        let solve = SolveConfig {
            mesh_points: self.mesh_points,
            tolerance: self.tolerance.unwrap_or(defaults.tolerance),
            max_nodes: self.max_nodes.unwrap_or(defaults.max_nodes),
            ..defaults
        };
        solve.validate().map_err(ConfigError::Solve)?;

        let environment = match self.environment {
            Some(env) => ReferenceEnvironment::new(
                ThermodynamicTemperature::new::<kelvin>(env.temperature),
                Pressure::new::<pascal>(env.pressure),
            )?,
            None => ReferenceEnvironment::default(),
        };

        Ok(HxConfig {
            name: self.name,
            hx,
            thermo_inner,
            thermo_outer,
            solve,
            environment,
        })
    }
}

impl RawStream {
    fn build(
        &self,
        stream: &'static str,
    ) -> Result<(FluidStream<Mixture>, Backend<Mixture>), ConfigError> {
        let mixture = Mixture::new(&self.components, &self.fractions)
            .map_err(|source| ConfigError::Composition { stream, source })?;
        let thermo = self.backend(stream, &mixture)?;

        let mass_flow = MassRate::new::<kilogram_per_second>(self.mass_flow);
        let pressure = Pressure::new::<pascal>(self.pressure);

        let fluid_stream = match (self.inlet_enthalpy, self.inlet_temperature) {
            (Some(h), None) => FluidStream::new(
                mixture,
                mass_flow,
                pressure,
                SpecificEnthalpy::new::<joule_per_kilogram>(h),
            ),
            (None, Some(t)) => FluidStream::from_inlet_temperature(
                &thermo,
                mixture,
                mass_flow,
                pressure,
                ThermodynamicTemperature::new::<kelvin>(t),
            ),
            _ => return Err(ConfigError::Inlet { stream }),
        }
        .map_err(input(stream))?;

        Ok((fluid_stream, thermo))
    }

    fn backend(
        &self,
        stream: &'static str,
        mixture: &Mixture,
    ) -> Result<Backend<Mixture>, ConfigError> {
        let backend_error = |source: BackendError| ConfigError::Backend { stream, source };
        let overrides = self.overrides.unwrap_or_default();
        let misplaced = |field| ConfigError::Override {
            stream,
            field,
            backend: self.backend,
        };

        match self.backend {
            kind @ (BackendKind::CoolProp | BackendKind::Refprop) => {
                if overrides.gas_constant.is_some() {
                    return Err(misplaced("gas_constant"));
                }
                if overrides.cp.is_some() {
                    return Err(misplaced("cp"));
                }
                if overrides.density.is_some() {
                    return Err(misplaced("density"));
                }
                Backend::for_mixture(kind, mixture).map_err(backend_error)
            }
            BackendKind::PerfectGas => {
                if overrides.density.is_some() {
                    return Err(misplaced("density"));
                }
                if overrides.gas_constant.is_none() && overrides.cp.is_none() {
                    return Backend::for_mixture(self.backend, mixture).map_err(backend_error);
                }
                let mixed = mixture.perfect_gas_parameters();
                let parameters = PerfectGasParameters::new(
                    overrides.gas_constant.map_or(mixed.gas_constant, |r| {
                        SpecificGasConstant::new::<joule_per_kilogram_kelvin>(r)
                    }),
                    overrides.cp.map_or(mixed.cp, |cp| {
                        SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp)
                    }),
                );
                PerfectGas::from_parameters(parameters)
                    .map(Backend::PerfectGas)
                    .map_err(|err| backend_error(err.into()))
            }
            BackendKind::Incompressible => {
                if overrides.gas_constant.is_some() {
                    return Err(misplaced("gas_constant"));
                }
                match (overrides.cp, overrides.density) {
                    (None, None) => {
                        Backend::for_mixture(self.backend, mixture).map_err(backend_error)
                    }
                    (Some(cp), Some(density)) => Incompressible::from_parameters(
                        IncompressibleParameters::new(
                            SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp),
                            MassDensity::new::<kilogram_per_cubic_meter>(density),
                        ),
                    )
                    .map(Backend::Incompressible)
                    .map_err(|err| backend_error(err.into())),
                    (cp, density) => {
                        let mixed = mixture
                            .incompressible_parameters()
                            .map_err(|err| backend_error(err.into()))?;
                        let parameters = IncompressibleParameters::new(
                            cp.map_or(mixed.cp, |cp| {
                                SpecificHeatCapacity::new::<joule_per_kilogram_kelvin>(cp)
                            }),
                            density.map_or(mixed.reference.density, |rho| {
                                MassDensity::new::<kilogram_per_cubic_meter>(rho)
                            }),
                        );
                        Incompressible::from_parameters(parameters)
                            .map(Backend::Incompressible)
                            .map_err(|err| backend_error(err.into()))
                    }
                }
            }
        }
    }
}

fn input(context: &'static str) -> impl FnOnce(InputError) -> ConfigError {
    move |source| ConfigError::Input { context, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::thermal_conductance::watt_per_kelvin;

    use crate::support::thermo::StateEvaluator;

    const CASE: &str = r"
name: air-water
calc_type: const
coefficient: 500.0
mesh_points: 100
geometry: { length: 4.0, inner_diameter: 0.01, outer_diameter: 0.0125, tubes: 12 }
inner:
  components: [Air]
  fractions: [1.0]
  backend: perfect_gas
  mass_flow: 0.012
  pressure: 5.0e5
  inlet_temperature: 354.0
outer:
  components: [Water]
  fractions: [1.0]
  backend: incompressible
  mass_flow: 0.0213
  pressure: 4.0e5
  inlet_temperature: 290.0
";

    #[test]
    fn loads_the_reference_case() {
        let config = from_yaml_str(CASE).unwrap();

        assert_eq!(config.name, "air-water");
        assert_eq!(config.solve.mesh_points, 100);
        assert_eq!(config.environment, ReferenceEnvironment::default());
        assert_relative_eq!(
            config.hx.conductance().get::<watt_per_kelvin>(),
            240.0 * std::f64::consts::PI,
            max_relative = 1e-12
        );

        let inner = config.hx.streams().inner.inlet_state(&config.thermo_inner).unwrap();
        assert_relative_eq!(inner.temperature.get::<kelvin>(), 354.0, epsilon = 1e-9);
        assert!(matches!(config.thermo_outer, Backend::Incompressible(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let case = CASE.replace("mesh_points: 100", "mesh_points: 100\nrelaxation: 0.5");
        assert!(matches!(from_yaml_str(&case), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn rejects_position_dependent_coefficient() {
        let case = CASE.replace("calc_type: const", "calc_type: calc");
        assert!(matches!(
            from_yaml_str(&case),
            Err(ConfigError::VariableCoefficient)
        ));
    }

    #[test]
    fn rejects_mismatched_composition() {
        let case = CASE.replacen("fractions: [1.0]", "fractions: [0.5, 0.5]", 1);
        assert!(matches!(
            from_yaml_str(&case),
            Err(ConfigError::Composition {
                stream: "inner",
                source: MixtureError::LengthMismatch { .. },
            })
        ));
    }

    #[test]
    fn requires_exactly_one_inlet_specification() {
        let case = CASE.replacen(
            "inlet_temperature: 354.0",
            "inlet_temperature: 354.0\n  inlet_enthalpy: 1.0e5",
            1,
        );
        assert!(matches!(
            from_yaml_str(&case),
            Err(ConfigError::Inlet { stream: "inner" })
        ));
    }

    #[test]
    fn rejects_non_physical_inputs() {
        let case = CASE.replace("mass_flow: 0.0213", "mass_flow: -1.0");
        assert!(matches!(
            from_yaml_str(&case),
            Err(ConfigError::Input {
                context: "outer",
                ..
            })
        ));

        let case = CASE.replace("coefficient: 500.0", "coefficient: 0.0");
        assert!(matches!(
            from_yaml_str(&case),
            Err(ConfigError::Input {
                context: "heat transfer coefficient",
                ..
            })
        ));
    }

    #[test]
    fn overrides_replace_mixing_rule_constants() {
        let case = CASE.replacen(
            "backend: incompressible",
            "backend: incompressible\n  overrides: { cp: 4000.0 }",
            1,
        );
        let config = from_yaml_str(&case).unwrap();
        let outer = &config.hx.streams().outer;

        let warm = config
            .thermo_outer
            .evaluate_tp(
                outer.fluid(),
                ThermodynamicTemperature::new::<kelvin>(300.0),
                outer.pressure(),
            )
            .unwrap();
        let cold = config
            .thermo_outer
            .evaluate_tp(
                outer.fluid(),
                ThermodynamicTemperature::new::<kelvin>(290.0),
                outer.pressure(),
            )
            .unwrap();
        assert_relative_eq!(
            (warm.enthalpy - cold.enthalpy).get::<joule_per_kilogram>(),
            40_000.0,
            max_relative = 1e-9
        );

        let misplaced = CASE.replacen(
            "backend: perfect_gas",
            "backend: perfect_gas\n  overrides: { density: 1.2 }",
            1,
        );
        assert!(matches!(
            from_yaml_str(&misplaced),
            Err(ConfigError::Override {
                stream: "inner",
                field: "density",
                ..
            })
        ));
    }

    #[test]
    fn demo_cases_load() {
        let air_water = from_yaml_str(include_str!("../../../../demos/air_water.yaml")).unwrap();
        let mixture = from_yaml_str(include_str!("../../../../demos/propane_butane.yaml")).unwrap();

        assert_eq!(air_water.name, "air-water");
        assert_eq!(mixture.solve.max_nodes, 2000);
        assert_relative_eq!(
            mixture.environment.temperature.get::<kelvin>(),
            293.15,
            epsilon = 1e-12
        );
        assert!(matches!(mixture.thermo_outer, Backend::PerfectGas(_)));
    }

    #[test]
    fn rejects_unusable_solver_settings_at_load() {
        let single_node = CASE.replace("mesh_points: 100", "mesh_points: 1");
        assert!(matches!(
            from_yaml_str(&single_node),
            Err(ConfigError::Solve(SolveError::Configuration { .. }))
        ));

        let no_tolerance = CASE.replace("mesh_points: 100", "mesh_points: 100\ntolerance: 0.0");
        assert!(matches!(
            from_yaml_str(&no_tolerance),
            Err(ConfigError::Solve(SolveError::Configuration { .. }))
        ));

        let over_budget = CASE.replace("mesh_points: 100", "mesh_points: 100\nmax_nodes: 50");
        assert!(matches!(
            from_yaml_str(&over_budget),
            Err(ConfigError::Solve(SolveError::Configuration { .. }))
        ));
    }

    #[test]
    fn rejects_non_physical_environment() {
        let frozen = format!("{CASE}environment: {{ temperature: 0.0, pressure: 1.01325e5 }}\n");
        assert!(matches!(
            from_yaml_str(&frozen),
            Err(ConfigError::Environment(EnvironmentError::Temperature { .. }))
        ));

        let vacuum = format!("{CASE}environment: {{ temperature: 283.0, pressure: -1.0 }}\n");
        assert!(matches!(
            from_yaml_str(&vacuum),
            Err(ConfigError::Environment(EnvironmentError::Pressure { .. }))
        ));
    }

    #[test]
    fn real_fluid_backends_take_no_overrides() {
        let case = CASE.replacen(
            "backend: incompressible",
            "backend: coolprop\n  overrides: { cp: 4000.0 }",
            1,
        );
        assert!(matches!(
            from_yaml_str(&case),
            Err(ConfigError::Override {
                stream: "outer",
                field: "cp",
                backend: BackendKind::CoolProp,
            })
        ));
    }

    #[cfg(not(feature = "coolprop"))]
    #[test]
    fn condensing_demo_needs_the_coolprop_feature() {
        let result = from_yaml_str(include_str!("../../../../demos/propane_pentane_water.yaml"));
        assert!(matches!(
            result,
            Err(ConfigError::Backend {
                stream: "inner",
                source: BackendError::Unavailable(BackendKind::Refprop),
            })
        ));
    }

    #[cfg(feature = "coolprop")]
    #[test]
    fn condensing_demo_loads_with_coolprop() {
        let case = include_str!("../../../../demos/propane_pentane_water.yaml")
            .replace("backend: refprop", "backend: coolprop");
        let config = from_yaml_str(&case).unwrap();

        assert!(matches!(config.thermo_inner, Backend::CoolProp(_)));
        assert!(matches!(config.thermo_outer, Backend::CoolProp(_)));
        assert_relative_eq!(
            config.environment.temperature.get::<kelvin>(),
            283.0,
            epsilon = 1e-12
        );

        let outer = config.hx.streams().outer.inlet_state(&config.thermo_outer).unwrap();
        assert!(outer.quality.is_none());
        assert_relative_eq!(outer.temperature.get::<kelvin>(), 290.0, epsilon = 1e-6);
    }
}
