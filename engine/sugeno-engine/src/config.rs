//! TOML system descriptions
//!
//! A configuration file describes one deployed system: its variables, the
//! single output policy and the fallback. It is parsed with `serde`/`toml`
//! and validated once, when [`SystemConfig::into_system`] builds the
//! [`SugenoSystem`].
//!
//! ```toml
//! name = "production-planning"
//! fallback = "input-mean"
//!
//! [[variables]]
//! name = "demand"
//! domain = [1030.0, 1589.0]
//! terms = [
//!     { name = "kecil", shape = "trapezoidal", points = [778.0, 975.0, 1030.0, 1310.0] },
//!     { name = "sedang", shape = "triangular", points = [1030.0, 1310.0, 1589.0] },
//! ]
//!
//! [policy]
//! kind = "table"
//! outputs = [{ name = "sedikit", value = 1996.0 }]
//! rules = [{ when = ["kecil"], then = "sedikit" }]
//! ```
//!
//! Lookup policies name an artifact with `path`; relative paths are resolved
//! against the directory of the configuration file.

use crate::error::{Result, SugenoError};
use crate::inference::{Fallback, SugenoSystem};
use crate::lookup::LookupTable;
use crate::membership::{FuzzyTerm, LinguisticVariable, MembershipFunction};
use crate::rule_base::{CategoryTable, OutputPolicy, WeightedThreshold};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Membership shape family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Triangular,
    Trapezoidal,
}

/// One category of a variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermConfig {
    pub name: String,
    pub shape: ShapeKind,
    pub points: Vec<f64>,
}

/// One input variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableConfig {
    pub name: String,
    /// Nominal domain `[min, max]`
    pub domain: [f64; 2],
    pub terms: Vec<TermConfig>,
}

/// Named output constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub name: String,
    pub value: f64,
}

/// Category-table row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub when: Vec<String>,
    pub then: String,
}

/// Output policy section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PolicyConfig {
    /// Named rules over named output constants
    Table {
        outputs: Vec<OutputConfig>,
        rules: Vec<RuleConfig>,
    },
    /// Weighted sum of levels against thresholds
    Weighted {
        weights: Vec<f64>,
        thresholds: Vec<f64>,
        outputs: Vec<f64>,
    },
    /// Precomputed consequents read from a JSON or NPY artifact
    Lookup { path: PathBuf },
}

/// Complete description of one inference system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub name: String,
    #[serde(default)]
    pub fallback: Fallback,
    pub variables: Vec<VariableConfig>,
    pub policy: PolicyConfig,
    /// Directory used to resolve relative lookup paths
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl SystemConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SugenoError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        debug!("Loaded system configuration '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Resolve a lookup path against `base_dir`
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Convert the variable sections into linguistic variables
    pub fn linguistic_variables(&self) -> Result<Vec<LinguisticVariable>> {
        self.variables.iter().map(VariableConfig::to_variable).collect()
    }

    /// Build the output policy, loading the lookup artifact if there is one
    pub fn output_policy(&self) -> Result<OutputPolicy> {
        Ok(match &self.policy {
            PolicyConfig::Table { outputs, rules } => {
                let mut table = CategoryTable::new();
                for output in outputs {
                    table.add_output(output.name.clone(), output.value);
                }
                for rule in rules {
                    table.add_rule(rule.when.clone(), rule.then.clone());
                }
                OutputPolicy::CategoryTable(table)
            }
            PolicyConfig::Weighted {
                weights,
                thresholds,
                outputs,
            } => OutputPolicy::WeightedThreshold(WeightedThreshold::new(
                weights.clone(),
                thresholds.clone(),
                outputs.clone(),
            )),
            PolicyConfig::Lookup { path } => {
                OutputPolicy::Lookup(LookupTable::load(self.resolve_path(path))?)
            }
        })
    }

    /// Validate everything and build the system
    pub fn into_system(&self) -> Result<SugenoSystem> {
        SugenoSystem::new(
            self.name.clone(),
            self.linguistic_variables()?,
            &self.output_policy()?,
            self.fallback,
        )
    }
}

impl VariableConfig {
    fn to_variable(&self) -> Result<LinguisticVariable> {
        let [min, max] = self.domain;
        let mut variable = LinguisticVariable::new(self.name.clone(), min, max);
        for term in &self.terms {
            let expected = match term.shape {
                ShapeKind::Triangular => 3,
                ShapeKind::Trapezoidal => 4,
            };
            let function = MembershipFunction::from_points(&term.points)
                .filter(|_| term.points.len() == expected)
                .ok_or_else(|| SugenoError::InvalidMembership {
                    variable: self.name.clone(),
                    term: term.name.clone(),
                    reason: format!(
                        "{:?} shape needs {} points, got {}",
                        term.shape,
                        expected,
                        term.points.len()
                    ),
                })?;
            variable.add_term(FuzzyTerm::new(term.name.clone(), function));
        }
        Ok(variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const WEIGHTED: &str = r#"
        name = "two-indicators"
        fallback = "zero"

        [[variables]]
        name = "a"
        domain = [0.0, 100.0]
        terms = [
            { name = "low", shape = "triangular", points = [0.0, 0.0, 50.0] },
            { name = "high", shape = "triangular", points = [50.0, 100.0, 100.0] },
        ]

        [[variables]]
        name = "b"
        domain = [0.0, 100.0]
        terms = [
            { name = "low", shape = "trapezoidal", points = [0.0, 0.0, 20.0, 60.0] },
            { name = "high", shape = "trapezoidal", points = [20.0, 60.0, 100.0, 100.0] },
        ]

        [policy]
        kind = "weighted"
        weights = [2.0, 1.0]
        thresholds = [4.0]
        outputs = [10.0, 90.0]
    "#;

    #[test]
    fn test_parse_weighted_config() {
        let config = SystemConfig::from_toml_str(WEIGHTED).unwrap();
        assert_eq!(config.fallback, Fallback::Zero);
        assert_eq!(config.variables.len(), 2);
        assert_eq!(config.variables[1].terms[0].shape, ShapeKind::Trapezoidal);

        let system = config.into_system().unwrap();
        assert_eq!(system.rule_base().len(), 4);
        // (low, low): 2 + 1 = 3 -> band 0
        assert_eq!(system.rule_base().get(0).unwrap().consequent, 10.0);
        // (high, low): 4 + 1 = 5 -> band 1
        assert_eq!(system.rule_base().get(2).unwrap().consequent, 90.0);
        assert_eq!(system.score(&[200.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_default_fallback_is_input_mean() {
        let content = WEIGHTED.replace("fallback = \"zero\"", "");
        let config = SystemConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.fallback, Fallback::InputMean);
    }

    #[test]
    fn test_point_count_must_match_shape() {
        let content = WEIGHTED.replace(
            "points = [0.0, 0.0, 50.0]",
            "points = [0.0, 0.0, 25.0, 50.0]",
        );
        let config = SystemConfig::from_toml_str(&content).unwrap();
        assert!(matches!(
            config.into_system(),
            Err(SugenoError::InvalidMembership { .. })
        ));
    }

    #[test]
    fn test_unknown_policy_kind_is_a_parse_error() {
        let content = WEIGHTED.replace("kind = \"weighted\"", "kind = \"neural\"");
        assert!(matches!(
            SystemConfig::from_toml_str(&content),
            Err(SugenoError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_table_config_with_unknown_category() {
        let content = r#"
            name = "single"
            [[variables]]
            name = "x"
            domain = [0.0, 1.0]
            terms = [{ name = "only", shape = "triangular", points = [0.0, 0.5, 1.0] }]

            [policy]
            kind = "table"
            outputs = [{ name = "z", value = 1.0 }]
            rules = [{ when = ["other"], then = "z" }]
        "#;
        let config = SystemConfig::from_toml_str(content).unwrap();
        assert!(matches!(
            config.into_system(),
            Err(SugenoError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_lookup_path_resolved_relative_to_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("z.json"), "[1.0, 2.0, 3.0, 4.0]").unwrap();

        let content = WEIGHTED.split("[policy]").next().unwrap().to_string()
            + "[policy]\nkind = \"lookup\"\npath = \"z.json\"\n";
        let config_path = dir.path().join("system.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();

        let config = SystemConfig::load(&config_path).unwrap();
        assert_eq!(config.resolve_path(Path::new("z.json")), dir.path().join("z.json"));
        let system = config.into_system().unwrap();
        assert_eq!(system.rule_base().get(3).unwrap().consequent, 4.0);
    }

    #[test]
    fn test_missing_lookup_artifact_is_fatal() {
        let content = WEIGHTED.split("[policy]").next().unwrap().to_string()
            + "[policy]\nkind = \"lookup\"\npath = \"/nowhere/z.npy\"\n";
        let config = SystemConfig::from_toml_str(&content).unwrap();
        assert!(matches!(
            config.into_system(),
            Err(SugenoError::LookupIo { .. })
        ));
    }

    #[test]
    fn test_missing_config_file() {
        assert!(matches!(
            SystemConfig::load("/nowhere/system.toml"),
            Err(SugenoError::ConfigIo { .. })
        ));
    }
}
