//! Error types for building and running Sugeno systems
//!
//! Every configuration problem surfaces as a [`SugenoError`] while a system is
//! being built. Once a [`SugenoSystem`](crate::SugenoSystem) exists, the only
//! per-call failures are caller contract violations (wrong input count or a
//! non-finite input); numeric edge cases such as out-of-domain values are
//! handled by the fallback policy instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, SugenoError>;

/// Errors raised by the fuzzy inference engine
#[derive(Debug, Error)]
pub enum SugenoError {
    /// Membership function breakpoints are not finite or not non-decreasing
    #[error("invalid membership function for '{variable}.{term}': {reason}")]
    InvalidMembership {
        variable: String,
        term: String,
        reason: String,
    },

    /// A linguistic variable is malformed (bad domain, no terms, duplicate names)
    #[error("invalid variable '{variable}': {reason}")]
    InvalidVariable { variable: String, reason: String },

    /// A rule references a category name the variable does not define
    #[error("rule references unknown category '{category}' of variable '{variable}'")]
    UnknownCategory { variable: String, category: String },

    /// A rule references an output level that was never declared
    #[error("rule references unknown output level '{level}'")]
    UnknownOutput { level: String },

    /// The rule table does not cover the Cartesian product exactly once
    #[error("incomplete rule table: {reason}")]
    IncompleteRuleTable { reason: String },

    /// Weighted-threshold policy constants are inconsistent
    #[error("invalid weighted-threshold policy: {reason}")]
    InvalidPolicy { reason: String },

    /// Lookup array length differs from the rule base cardinality
    #[error("lookup table has {actual} consequents but the rule base has {expected} rules")]
    LookupLengthMismatch { expected: usize, actual: usize },

    /// Lookup artifact could not be read
    #[error("failed to read lookup artifact '{}': {source}", path.display())]
    LookupIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Lookup artifact content is malformed
    #[error("malformed lookup artifact: {reason}")]
    LookupFormat { reason: String },

    /// Configuration file could not be read
    #[error("failed to read configuration '{}': {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Wrong number of crisp inputs for this system
    #[error("system '{system}' expects {expected} inputs, got {actual}")]
    InputArity {
        system: String,
        expected: usize,
        actual: usize,
    },

    /// A crisp input is NaN or infinite
    #[error("input for '{variable}' is not a finite number: {value}")]
    NonFiniteInput { variable: String, value: f64 },
}

impl SugenoError {
    /// Shorthand for [`SugenoError::InvalidPolicy`]
    pub fn policy(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            reason: reason.into(),
        }
    }

    /// Shorthand for [`SugenoError::LookupFormat`]
    pub fn lookup_format(reason: impl Into<String>) -> Self {
        Self::LookupFormat {
            reason: reason.into(),
        }
    }

    /// Whether this error can only happen while building a system
    pub fn is_configuration_error(&self) -> bool {
        !matches!(
            self,
            SugenoError::InputArity { .. } | SugenoError::NonFiniteInput { .. }
        )
    }
}
