//! Solves a counter-flow case file and writes its profile and summary.

use std::path::PathBuf;

use clap::Parser;
use counterflow_hx::models::thermal::hx::{
    CounterFlowModel, SolveError,
    config::{ConfigError, load_yaml},
    report::{ReportError, write_profile_csv, write_summary_csv},
};
use thiserror::Error;
use tracing::info;
use twine_core::Model;
use uom::si::{power::watt, thermal_conductance::watt_per_kelvin};

#[derive(Parser)]
#[command(name = "hx-run")]
#[command(about = "Solve a counter-flow heat exchanger case", long_about = None)]
struct Cli {
    /// Path to the case YAML file
    config: PathBuf,

    /// Directory for the result CSV files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Collocation residual tolerance, overriding the case file
    #[arg(long)]
    tolerance: Option<f64>,

    /// Mesh node budget, overriding the case file
    #[arg(long)]
    max_nodes: Option<usize>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("cannot create output directory {path:?}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let case = load_yaml(&cli.config)?;

    let mut solve = case.solve;
    if let Some(tolerance) = cli.tolerance {
        solve.tolerance = tolerance;
    }
    if let Some(max_nodes) = cli.max_nodes {
        solve.max_nodes = max_nodes;
    }

    let model = CounterFlowModel {
        thermo_inner: case.thermo_inner,
        thermo_outer: case.thermo_outer,
        config: solve,
        environment: case.environment,
    };
    let output = model.call(&case.hx)?;

    std::fs::create_dir_all(&cli.output).map_err(|source| CliError::OutputDir {
        path: cli.output.clone(),
        source,
    })?;
    let results = cli.output.join(format!("{}_results.csv", case.name));
    let summary = cli.output.join(format!("{}_summary.csv", case.name));
    write_profile_csv(&results, &output.profile)?;
    write_summary_csv(&summary, output.entropy_production, output.duty)?;
    info!(?results, ?summary, "wrote results");

    println!("Case: {}", case.name);
    println!(
        "  Nodes:              {} ({} passes)",
        output.solution.mesh.len(),
        output.solution.passes
    );
    println!(
        "  Entropy production: {:.6} W/K",
        output.entropy_production.get::<watt_per_kelvin>()
    );
    println!(
        "  Exergy loss:        {:.3} W",
        output.exergy_destruction.get::<watt>()
    );
    println!("  Duty:               {:.3} W", output.duty.get::<watt>());
    println!("  Q_max:              {:.3} W", output.q_max.get::<watt>());
    println!(
        "  Exergy entering:    {:.3} W",
        output.exergy_entering.get::<watt>()
    );

    Ok(())
}
