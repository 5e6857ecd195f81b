//! `sugeno fuzzify`

use super::write_json;
use crate::OutputFormat;
use anyhow::Result;
use serde_json::{json, Map, Value};
use std::io::Write;
use sugeno_engine::SugenoSystem;

pub fn run(
    system: &SugenoSystem,
    inputs: &[f64],
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    // Arity and finiteness are checked once for the whole row
    system.fuzzify(inputs)?;

    match format {
        OutputFormat::Json => {
            let variables: Vec<Value> = system
                .variables()
                .iter()
                .zip(inputs)
                .map(|(var, &value)| {
                    let degrees: Map<String, Value> = var
                        .fuzzify_named(value)
                        .into_iter()
                        .map(|(term, degree)| (term.to_string(), json!(degree)))
                        .collect();
                    json!({ "variable": var.name, "value": value, "degrees": degrees })
                })
                .collect();
            write_json(out, &variables)
        }
        OutputFormat::Text => {
            for (var, &value) in system.variables().iter().zip(inputs) {
                let degrees: Vec<String> = var
                    .fuzzify_named(value)
                    .into_iter()
                    .map(|(term, degree)| format!("{term}={degree:.6}"))
                    .collect();
                let note = if var.contains(value) { "" } else { "  (outside domain)" };
                writeln!(out, "{} = {}: {}{}", var.name, value, degrees.join(" "), note)?;
            }
            Ok(())
        }
    }
}
