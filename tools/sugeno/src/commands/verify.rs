//! `sugeno verify`

use super::write_json;
use crate::OutputFormat;
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::Path;
use sugeno_engine::SugenoSystem;
use tracing::info;

/// Load rows from a JSON array of arrays, or fall back to the preset's reference rows
fn load_rows(
    system: &SugenoSystem,
    dataset: Option<&Path>,
    reference: Option<Vec<Vec<f64>>>,
) -> Result<Vec<Vec<f64>>> {
    match dataset {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read dataset '{}'", path.display()))?;
            let rows: Vec<Vec<f64>> = serde_json::from_str(&text)
                .with_context(|| format!("Dataset '{}' is not an array of rows", path.display()))?;
            info!("Loaded {} rows from {}", rows.len(), path.display());
            Ok(rows)
        }
        None => reference.with_context(|| {
            format!(
                "system '{}' has no built-in reference rows; pass --dataset",
                system.name()
            )
        }),
    }
}

pub fn run(
    system: &SugenoSystem,
    dataset: Option<&Path>,
    reference: Option<Vec<Vec<f64>>>,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let rows = load_rows(system, dataset, reference)?;
    if rows.is_empty() {
        bail!("dataset is empty");
    }
    let report = sugeno_engine::verify(system, &rows)?;

    match format {
        OutputFormat::Json => write_json(out, &report),
        OutputFormat::Text => {
            for (i, row) in report.rows.iter().enumerate() {
                writeln!(
                    out,
                    "{:>3}  expected {:>10.4}  predicted {:>10.4}  error {:>+10.4}",
                    i + 1,
                    row.expected,
                    row.predicted,
                    row.error()
                )?;
            }
            writeln!(
                out,
                "MAE {:.4}  RMSE {:.4}  max {:.4}  ({} rows)",
                report.mae,
                report.rmse,
                report.max_abs_error,
                report.rows.len()
            )?;
            Ok(())
        }
    }
}
