//! # sugeno-engine
//!
//! Zero-order Takagi–Sugeno fuzzy inference over small, exhaustively
//! enumerated rule bases.
//!
//! A handful of crisp inputs is fuzzified with triangular or trapezoidal
//! membership functions, every combination of input categories is fired with
//! the min t-norm, and the constant rule outputs are combined by a weighted
//! average. When no rule fires at all the result is a deterministic fallback
//! (the mean of the inputs by default), never NaN.
//!
//! ## Modules
//!
//! - [`membership`]: membership functions and linguistic variables
//! - [`rule_base`]: Cartesian rule enumeration and output policies
//! - [`lookup`]: precomputed consequent tables (JSON and NPY)
//! - [`inference`]: the [`SugenoSystem`] and its results
//! - [`config`]: TOML system descriptions
//! - [`presets`]: the production-planning and indicator-scoring deployments
//! - [`verification`]: scoring a system against reference rows
//!
//! ## Quick Start
//!
//! ```rust
//! use sugeno_engine::presets::ProductionPlanner;
//!
//! let planner = ProductionPlanner::new()?;
//! let packs = planner.recommend(1310.0, 750.0)?;
//! assert_eq!(packs, 2275.0);
//! # Ok::<(), sugeno_engine::SugenoError>(())
//! ```
//!
//! Every configuration problem (bad breakpoints, unknown category names,
//! incomplete rule tables, mis-sized lookup artifacts) is reported while the
//! system is built; a built [`SugenoSystem`] is immutable and can be shared
//! between threads freely.

pub mod config;
pub mod error;
pub mod inference;
pub mod lookup;
pub mod membership;
pub mod presets;
pub mod rule_base;
pub mod verification;

pub use config::SystemConfig;
pub use error::{Result, SugenoError};
pub use inference::{Fallback, FiredRule, Inference, SugenoSystem, SugenoSystemBuilder};
pub use lookup::LookupTable;
pub use membership::{DegreeVector, FuzzyTerm, LinguisticVariable, MembershipFunction};
pub use rule_base::{CategoryTable, OutputPolicy, Rule, RuleBase, WeightedThreshold};
pub use verification::{verify, VerificationReport};
