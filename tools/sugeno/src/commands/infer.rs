//! `sugeno infer`

use super::write_json;
use crate::OutputFormat;
use anyhow::Result;
use serde_json::json;
use std::io::Write;
use sugeno_engine::SugenoSystem;
use tracing::info;

pub fn run(
    system: &SugenoSystem,
    inputs: &[f64],
    explain: bool,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let result = system.infer(inputs)?;
    info!(
        "{}: {} of {} rules fired, score {}",
        system.name(),
        result.fired.len(),
        system.rule_base().len(),
        result.score
    );

    match format {
        OutputFormat::Json => {
            let value = if explain {
                json!({
                    "system": system.name(),
                    "inputs": inputs,
                    "score": result.score,
                    "fallback_used": result.fallback_used,
                    "total_strength": result.total_strength,
                    "degrees": result.degrees,
                    "fired": result.fired,
                })
            } else {
                json!({
                    "system": system.name(),
                    "inputs": inputs,
                    "score": result.score,
                    "fallback_used": result.fallback_used,
                })
            };
            write_json(out, &value)
        }
        OutputFormat::Text => {
            writeln!(out, "{}", result.score)?;
            if result.fallback_used {
                writeln!(
                    out,
                    "no rule fired; fallback ({:?}) applied",
                    system.fallback()
                )?;
            }
            if explain {
                for fired in &result.fired {
                    let description = system
                        .rule_base()
                        .get(fired.index)
                        .map(|rule| system.rule_base().describe(rule, system.variables()))
                        .unwrap_or_default();
                    writeln!(
                        out,
                        "  #{:<4} w={:.6}  {}",
                        fired.index, fired.strength, description
                    )?;
                }
                writeln!(out, "  total strength {:.6}", result.total_strength)?;
            }
            Ok(())
        }
    }
}
