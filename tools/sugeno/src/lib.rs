//! # Sugeno CLI Tool
//!
//! Command-line driver for the `sugeno-engine` inference systems.
//!
//! ## Commands
//!
//! - `infer`: score one set of crisp inputs, optionally with the fired rules
//! - `fuzzify`: show the membership degrees of each input
//! - `rules`: list the enumerated rule base
//! - `verify`: score reference rows and report MAE / RMSE
//!
//! ## Quick Start
//!
//! ```bash
//! # Production planning (demand, supply)
//! sugeno infer 1310 750
//!
//! # Five-indicator scoring with the fired rules
//! sugeno infer --preset indicators --explain 84.57 83.54 87.13 66.08 94.14
//!
//! # Same system described by a TOML file, JSON output
//! sugeno infer --config configs/indicators.toml --format json 84.57 83.54 87.13 66.08 94.14
//!
//! # Training-set check of the weighted-threshold heuristic
//! sugeno verify --preset indicators-weighted
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use sugeno_engine::presets::{self, IndicatorScorer, INDICATOR_TRAINING};
use sugeno_engine::{LookupTable, SugenoSystem, SystemConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub mod commands;

/// Sugeno CLI application
#[derive(Parser, Debug)]
#[command(name = "sugeno")]
#[command(about = "Zero-order Takagi-Sugeno fuzzy inference")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score one set of crisp inputs
    Infer {
        #[command(flatten)]
        system: SystemArgs,
        /// Crisp inputs in variable order
        #[arg(required = true, allow_negative_numbers = true)]
        inputs: Vec<f64>,
        /// List the fired rules and their strengths
        #[arg(short, long)]
        explain: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Show membership degrees for each input
    Fuzzify {
        #[command(flatten)]
        system: SystemArgs,
        /// Crisp inputs in variable order
        #[arg(required = true, allow_negative_numbers = true)]
        inputs: Vec<f64>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// List the rule base in enumeration order
    Rules {
        #[command(flatten)]
        system: SystemArgs,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Score reference rows (inputs followed by the expected value)
    Verify {
        #[command(flatten)]
        system: SystemArgs,
        /// JSON file with an array of rows; the indicator presets default to their training set
        #[arg(short, long)]
        dataset: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Which system to run
#[derive(Args, Debug, Clone)]
pub struct SystemArgs {
    /// Built-in deployment
    #[arg(short, long, value_enum, default_value = "production")]
    pub preset: Preset,

    /// TOML system description (overrides --preset)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Consequent artifact (.json or .npy) for the `indicators` preset
    #[arg(short, long)]
    pub lookup: Option<PathBuf>,
}

/// Built-in deployments
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Demand and stock -> production quantity (9 rules)
    Production,
    /// Five indicators over precomputed consequents (243 rules); the bundled
    /// table is an uncalibrated placeholder, pass --lookup for a real one
    Indicators,
    /// Five indicators with the weighted-threshold heuristic (243 rules)
    IndicatorsWeighted,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl SystemArgs {
    /// Build the selected system; every configuration error is fatal here
    pub fn build(&self) -> Result<SugenoSystem> {
        if let Some(path) = &self.config {
            if self.lookup.is_some() {
                anyhow::bail!(
                    "--lookup cannot be combined with --config; set the lookup path in the config file"
                );
            }
            info!("Loading system from {}", path.display());
            let config = SystemConfig::load(path)
                .with_context(|| format!("Failed to load configuration '{}'", path.display()))?;
            return config
                .into_system()
                .with_context(|| format!("Invalid system configuration '{}'", path.display()));
        }

        debug!("Using built-in preset {:?}", self.preset);
        let system = match (self.preset, &self.lookup) {
            (Preset::Production, None) => presets::production_planning()?,
            (Preset::Indicators, None) => IndicatorScorer::bundled()?.system().clone(),
            (Preset::Indicators, Some(path)) => {
                let table = LookupTable::load(path).with_context(|| {
                    format!("Failed to load lookup artifact '{}'", path.display())
                })?;
                presets::indicator_scoring(table)?
            }
            (Preset::IndicatorsWeighted, None) => presets::indicator_scoring_weighted()?,
            (preset, Some(_)) => {
                anyhow::bail!("--lookup only applies to the indicators preset, not {preset:?}")
            }
        };
        Ok(system)
    }

    /// Built-in reference rows for the selected preset, if it has any
    pub fn reference_rows(&self) -> Option<Vec<Vec<f64>>> {
        match (self.config.is_some(), self.preset) {
            (false, Preset::Indicators | Preset::IndicatorsWeighted) => {
                Some(INDICATOR_TRAINING.iter().map(|row| row.to_vec()).collect())
            }
            _ => None,
        }
    }
}

/// Initialize the tracing subscriber from the global flags
///
/// `RUST_LOG` wins over `--log-level`; `--verbose` and `--quiet` win over both.
pub fn init_logging(cli: &Cli) {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level))
    };

    // Logs go to stderr so JSON on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the CLI application, writing results to stdout
pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_output(cli, &mut out)
}

/// Run the CLI application, writing results to `out`
pub fn run_with_output(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Infer {
            system,
            inputs,
            explain,
            format,
        } => commands::infer::run(&system.build()?, &inputs, explain, format, out),
        Commands::Fuzzify {
            system,
            inputs,
            format,
        } => commands::fuzzify::run(&system.build()?, &inputs, format, out),
        Commands::Rules { system, format } => commands::rules::run(&system.build()?, format, out),
        Commands::Verify {
            system,
            dataset,
            format,
        } => {
            let reference = system.reference_rows();
            commands::verify::run(&system.build()?, dataset.as_deref(), reference, format, out)
        }
    }
}
