//! Subcommand implementations
//!
//! Each command takes an already-built system and writes its result to the
//! supplied writer, so the same code path serves stdout and tests.

pub mod fuzzify;
pub mod infer;
pub mod rules;
pub mod verify;

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Write a value as pretty-printed JSON followed by a newline
pub(crate) fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
