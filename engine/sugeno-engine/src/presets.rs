//! Deployed configurations
//!
//! Two systems are shipped ready to use:
//!
//! - **Production planning** (two inputs): bread demand and stock, nine
//!   hand-listed rules over the output constants 1996 / 2275 / 2579 packs.
//! - **Indicator scoring** (five inputs `tlr`, `rpp`, `go`, `oi`, `pr` on a
//!   0–100 scale): 243 rules whose consequents come either from a precomputed
//!   lookup table or from the `[3, 3, 2, 1, 1]` weighted-threshold heuristic.
//!
//! Each deployment uses exactly one membership-parameter set and one output
//! policy; the constants below are those parameters.

use crate::error::Result;
use crate::inference::{Fallback, Inference, SugenoSystem};
use crate::lookup::LookupTable;
use crate::membership::{LinguisticVariable, MembershipFunction};
use crate::rule_base::{CategoryTable, OutputPolicy, WeightedThreshold};
use std::path::Path;

/// Output constant for "produce few"
pub const Z_SEDIKIT: f64 = 1996.0;
/// Output constant for "produce a moderate amount"
pub const Z_SEDANG: f64 = 2275.0;
/// Output constant for "produce many"
pub const Z_BANYAK: f64 = 2579.0;

/// Nominal demand range (packs)
pub const DEMAND_DOMAIN: (f64, f64) = (1030.0, 1589.0);
/// Nominal stock range (packs)
pub const SUPPLY_DOMAIN: (f64, f64) = (607.0, 894.0);

/// Demand variable: kecil / sedang / besar
pub fn demand_variable() -> LinguisticVariable {
    LinguisticVariable::new("demand", DEMAND_DOMAIN.0, DEMAND_DOMAIN.1)
        .with_term("kecil", MembershipFunction::trapezoidal(778.0, 975.0, 1030.0, 1310.0))
        .with_term("sedang", MembershipFunction::triangular(1030.0, 1310.0, 1589.0))
        .with_term("besar", MembershipFunction::trapezoidal(1310.0, 1589.0, 1695.0, 1796.0))
}

/// Stock variable: sedikit / sedang / banyak
pub fn supply_variable() -> LinguisticVariable {
    LinguisticVariable::new("supply", SUPPLY_DOMAIN.0, SUPPLY_DOMAIN.1)
        .with_term("sedikit", MembershipFunction::trapezoidal(492.0, 588.0, 607.0, 750.0))
        .with_term("sedang", MembershipFunction::triangular(607.0, 750.0, 894.0))
        .with_term("banyak", MembershipFunction::trapezoidal(750.0, 894.0, 912.0, 1008.0))
}

/// The nine production rules
pub fn production_rule_table() -> CategoryTable {
    CategoryTable::new()
        .with_output("sedikit", Z_SEDIKIT)
        .with_output("sedang", Z_SEDANG)
        .with_output("banyak", Z_BANYAK)
        .with_rule(&["kecil", "sedikit"], "sedikit")
        .with_rule(&["kecil", "sedang"], "sedikit")
        .with_rule(&["kecil", "banyak"], "sedikit")
        .with_rule(&["sedang", "sedikit"], "sedikit")
        .with_rule(&["sedang", "sedang"], "sedang")
        .with_rule(&["sedang", "banyak"], "sedang")
        .with_rule(&["besar", "sedikit"], "sedikit")
        .with_rule(&["besar", "sedang"], "sedang")
        .with_rule(&["besar", "banyak"], "banyak")
}

/// Two-input production planning system
pub fn production_planning() -> Result<SugenoSystem> {
    SugenoSystem::builder("production-planning")
        .with_variable(demand_variable())
        .with_variable(supply_variable())
        .with_policy(OutputPolicy::CategoryTable(production_rule_table()))
        .with_fallback(Fallback::InputMean)
        .build()
}

/// Typed front end for [`production_planning`]
#[derive(Debug, Clone)]
pub struct ProductionPlanner {
    system: SugenoSystem,
}

impl ProductionPlanner {
    /// Build the planner
    pub fn new() -> Result<Self> {
        Ok(Self {
            system: production_planning()?,
        })
    }

    /// Recommended production quantity
    pub fn recommend(&self, demand: f64, supply: f64) -> Result<f64> {
        self.system.score(&[demand, supply])
    }

    /// Recommendation with degrees and fired rules
    pub fn explain(&self, demand: f64, supply: f64) -> Result<Inference> {
        self.system.infer(&[demand, supply])
    }

    /// Underlying system
    pub fn system(&self) -> &SugenoSystem {
        &self.system
    }
}

/// Indicator names in rule-enumeration order
pub const INDICATORS: [&str; 5] = ["tlr", "rpp", "go", "oi", "pr"];

/// Weights of the weighted-threshold heuristic, one per indicator
pub const INDICATOR_WEIGHTS: [f64; 5] = [3.0, 3.0, 2.0, 1.0, 1.0];

/// Inclusive upper cutoffs of the low and medium bands
///
/// With integer level sums this is "≤ 12 low, ≥ 21 high, otherwise medium".
/// The values were calibrated against reference data that is not part of this
/// repository.
pub const INDICATOR_THRESHOLDS: [f64; 2] = [12.0, 20.0];

/// Output levels of the weighted-threshold heuristic (low, medium, high)
pub const INDICATOR_LEVELS: [f64; 3] = [1.0, 2.0, 3.0];

/// Placeholder consequent table shipped with the crate (243 values, 0–100)
///
/// The values are `(Σ level·w − 10)·5` over [`INDICATOR_WEIGHTS`], a monotone
/// stand-in for a calibrated artifact. They are not fitted to
/// [`INDICATOR_TRAINING`]; load the real table with
/// [`IndicatorScorer::from_path`] when one is available.
pub const BUNDLED_CONSEQUENTS: &str = include_str!("../data/indicator_consequents.json");

/// One indicator on the 0–100 scale: low / medium / high
pub fn indicator_variable(name: &str) -> LinguisticVariable {
    LinguisticVariable::new(name, 0.0, 100.0)
        .with_term("low", MembershipFunction::triangular(0.0, 0.0, 50.0))
        .with_term("medium", MembershipFunction::triangular(25.0, 50.0, 75.0))
        .with_term("high", MembershipFunction::triangular(50.0, 100.0, 100.0))
}

/// All five indicators in enumeration order
pub fn indicator_variables() -> Vec<LinguisticVariable> {
    INDICATORS.iter().map(|name| indicator_variable(name)).collect()
}

/// Parse the bundled placeholder consequent table (uncalibrated)
pub fn bundled_consequents() -> Result<LookupTable> {
    LookupTable::from_json_str(BUNDLED_CONSEQUENTS)
}

/// Five-input system using precomputed consequents
pub fn indicator_scoring(consequents: LookupTable) -> Result<SugenoSystem> {
    SugenoSystem::new(
        "indicator-scoring",
        indicator_variables(),
        &OutputPolicy::Lookup(consequents),
        Fallback::InputMean,
    )
}

/// Five-input system using the weighted-threshold heuristic
pub fn indicator_scoring_weighted() -> Result<SugenoSystem> {
    SugenoSystem::new(
        "indicator-scoring-weighted",
        indicator_variables(),
        &OutputPolicy::WeightedThreshold(WeightedThreshold::new(
            INDICATOR_WEIGHTS.to_vec(),
            INDICATOR_THRESHOLDS.to_vec(),
            INDICATOR_LEVELS.to_vec(),
        )),
        Fallback::InputMean,
    )
}

/// Typed front end for the five-indicator systems
#[derive(Debug, Clone)]
pub struct IndicatorScorer {
    system: SugenoSystem,
}

impl IndicatorScorer {
    /// Scorer over a precomputed consequent table
    pub fn new(consequents: LookupTable) -> Result<Self> {
        Ok(Self {
            system: indicator_scoring(consequents)?,
        })
    }

    /// Scorer over the bundled placeholder table (uncalibrated)
    pub fn bundled() -> Result<Self> {
        Self::new(bundled_consequents()?)
    }

    /// Scorer over a consequent artifact on disk (`.json` or `.npy`)
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(LookupTable::load(path)?)
    }

    /// Scorer using the weighted-threshold heuristic instead of a table
    pub fn weighted() -> Result<Self> {
        Ok(Self {
            system: indicator_scoring_weighted()?,
        })
    }

    /// Crisp score
    pub fn score(&self, tlr: f64, rpp: f64, go: f64, oi: f64, pr: f64) -> Result<f64> {
        self.system.score(&[tlr, rpp, go, oi, pr])
    }

    /// Score with degrees and fired rules
    pub fn explain(&self, tlr: f64, rpp: f64, go: f64, oi: f64, pr: f64) -> Result<Inference> {
        self.system.infer(&[tlr, rpp, go, oi, pr])
    }

    /// Underlying system
    pub fn system(&self) -> &SugenoSystem {
        &self.system
    }
}

/// Reference rows `[tlr, rpp, go, oi, pr, expected]`
pub const INDICATOR_TRAINING: [[f64; 6]; 20] = [
    [84.57, 83.54, 87.13, 66.08, 94.14, 97.2],
    [83.16, 89.24, 78.56, 50.69, 86.92, 94.4],
    [78.3, 82.98, 79.13, 58.58, 86.14, 86.2],
    [76.95, 84.37, 82.32, 50.69, 86.92, 88.7],
    [67.35, 76.65, 86.17, 60.63, 78.11, 82.7],
    [71.96, 69.61, 69.96, 50.39, 75.68, 62.6],
    [76.75, 41.85, 99.87, 75.87, 55.27, 89.6],
    [67.32, 65.08, 87.14, 61.64, 43.66, 63.2],
    [76.8, 56.58, 73.87, 60.63, 46.34, 63.5],
    [69.72, 46.48, 96.37, 57.02, 47.28, 66.2],
    [74.81, 43.77, 83.65, 58.77, 36.71, 67.3],
    [62.26, 47.1, 91.54, 60.14, 37.39, 53.6],
    [54.39, 54.89, 90.28, 44.95, 51.83, 50.0],
    [56.39, 54.09, 78.07, 53.16, 62.72, 52.7],
    [73.02, 43.77, 70.28, 70.23, 31.01, 61.7],
    [77.9, 38.32, 69.71, 66.78, 30.21, 60.7],
    [69.25, 44.42, 86.04, 54.33, 16.55, 52.9],
    [76.69, 35.38, 85.66, 57.57, 18.46, 55.7],
    [73.75, 32.04, 88.53, 71.97, 14.26, 59.2],
    [47.86, 53.8, 87.18, 55.41, 41.11, 50.0],
];
