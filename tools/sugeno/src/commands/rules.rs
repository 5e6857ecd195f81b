//! `sugeno rules`

use super::write_json;
use crate::OutputFormat;
use anyhow::Result;
use serde_json::{json, Value};
use std::io::Write;
use sugeno_engine::SugenoSystem;

pub fn run(system: &SugenoSystem, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let rule_base = system.rule_base();

    match format {
        OutputFormat::Json => {
            let rules: Vec<Value> = rule_base
                .iter()
                .map(|rule| {
                    let when: Vec<&str> = system
                        .variables()
                        .iter()
                        .zip(&rule.antecedent)
                        .map(|(var, &index)| var.term_name(index).unwrap_or("?"))
                        .collect();
                    json!({
                        "index": rule.index,
                        "when": when,
                        "then": rule.consequent,
                    })
                })
                .collect();
            write_json(
                out,
                &json!({
                    "system": system.name(),
                    "cardinalities": rule_base.cardinalities(),
                    "rules": rules,
                }),
            )
        }
        OutputFormat::Text => {
            let (lo, hi) = rule_base.consequent_range();
            writeln!(
                out,
                "{}: {} rules, consequents in [{}, {}]",
                system.name(),
                rule_base.len(),
                lo,
                hi
            )?;
            for rule in rule_base {
                writeln!(
                    out,
                    "#{:<4} {}",
                    rule.index,
                    rule_base.describe(rule, system.variables())
                )?;
            }
            Ok(())
        }
    }
}
