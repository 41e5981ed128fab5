//! Tabulated export of solved profiles.
//!
//! Values are written in SI units. Columns for the inner stream carry the
//! suffix `_fl1` and columns for the outer stream `_fl2`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uom::si::{f64::Power, length::meter, power::watt, thermal_conductance::watt_per_kelvin};

use crate::support::{thermo::StateVector, units::EntropyRate};

use super::core::SolutionProfile;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders one row per mesh node: `x`, then `T, p, h, v, s, q` per stream.
///
/// Quality is `NaN` for single-phase states.
#[must_use]
pub fn profile_csv(profile: &SolutionProfile) -> String {
    let mut header = vec!["x".to_owned()];
    for suffix in ["fl1", "fl2"] {
        header.extend(
            StateVector::FIELD_NAMES
                .iter()
                .map(|name| format!("{name}_{suffix}")),
        );
    }

    let mut csv = header.join(",");
    csv.push('\n');

    let rows = profile
        .mesh()
        .iter()
        .zip(profile.inner())
        .zip(profile.outer());
    for ((x, inner), outer) in rows {
        let values = std::iter::once(x.get::<meter>())
            .chain(inner.to_si_array())
            .chain(outer.to_si_array())
            .map(|value| value.to_string())
            .collect::<Vec<_>>();
        csv.push_str(&values.join(","));
        csv.push('\n');
    }
    csv
}

/// Renders the one-row summary: entropy production `ds` (W/K) and duty `dq` (W).
#[must_use]
pub fn summary_csv(entropy_production: EntropyRate, duty: Power) -> String {
    format!(
        "ds,dq\n{},{}\n",
        entropy_production.get::<watt_per_kelvin>(),
        duty.get::<watt>()
    )
}

/// Writes [`profile_csv`] to `path`.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub fn write_profile_csv(path: &Path, profile: &SolutionProfile) -> Result<(), ReportError> {
    write(path, &profile_csv(profile))
}

/// Writes [`summary_csv`] to `path`.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file cannot be written.
pub fn write_summary_csv(
    path: &Path,
    entropy_production: EntropyRate,
    duty: Power,
) -> Result<(), ReportError> {
    write(path, &summary_csv(entropy_production, duty))
}

fn write(path: &Path, content: &str) -> Result<(), ReportError> {
    std::fs::write(path, content).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
