//! Sugeno CLI entry point

use clap::Parser;
use sugeno::{init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    run(cli)
}
