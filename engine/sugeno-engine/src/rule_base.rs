//! # Exhaustive rule bases
//!
//! A rule base is the Cartesian product of every variable's categories,
//! generated programmatically and frozen into an ordered sequence. The order is
//! lexicographic over category indices with the first variable varying
//! slowest, so rule `i` of a 5 × 3-category system has antecedent equal to the
//! base-3 digits of `i`. Lookup tables rely on this order.
//!
//! Consequents come from exactly one [`OutputPolicy`]:
//!
//! - **Category table**: named rules mapping an antecedent tuple to an output
//!   level such as `sedikit = 1996`
//! - **Weighted threshold**: the output band is derived from
//!   `Σ level_i × weight_i` against ascending thresholds
//! - **Lookup**: consequents read from a precomputed array
//!
//! ## Example
//!
//! ```rust
//! use sugeno_engine::membership::{LinguisticVariable, MembershipFunction};
//! use sugeno_engine::rule_base::{OutputPolicy, RuleBase, WeightedThreshold};
//!
//! let level = |name: &str| {
//!     LinguisticVariable::new(name, 0.0, 100.0)
//!         .with_term("low", MembershipFunction::triangular(0.0, 0.0, 50.0))
//!         .with_term("medium", MembershipFunction::triangular(25.0, 50.0, 75.0))
//!         .with_term("high", MembershipFunction::triangular(50.0, 100.0, 100.0))
//! };
//! let variables = vec![level("a"), level("b")];
//! let policy = OutputPolicy::WeightedThreshold(WeightedThreshold::new(
//!     vec![1.0, 1.0],
//!     vec![3.0, 4.0],
//!     vec![10.0, 20.0, 30.0],
//! ));
//!
//! let rules = RuleBase::build(&variables, &policy)?;
//! assert_eq!(rules.len(), 9);
//! assert_eq!(rules.get(0).unwrap().consequent, 10.0);
//! assert_eq!(rules.get(8).unwrap().consequent, 30.0);
//! # Ok::<(), sugeno_engine::SugenoError>(())
//! ```

use crate::error::{Result, SugenoError};
use crate::lookup::LookupTable;
use crate::membership::LinguisticVariable;
use std::collections::HashMap;
use tracing::debug;

/// A single zero-order rule: one category per variable and a constant output
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Position in the canonical enumeration
    pub index: usize,
    /// Category index per variable (0-based)
    pub antecedent: Vec<usize>,
    /// Constant consequent
    pub consequent: f64,
}

impl Rule {
    /// 1-based category levels, as used by the weighted-threshold policy
    pub fn levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.antecedent.iter().map(|i| i + 1)
    }
}

/// Named output constant of a category table
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLevel {
    pub name: String,
    pub value: f64,
}

/// One row of a category table, keyed by category names
#[derive(Debug, Clone, PartialEq)]
pub struct TableRule {
    /// Category name per variable, in variable order
    pub when: Vec<String>,
    /// Output level name
    pub then: String,
}

/// Rule table keyed by antecedent category names
///
/// Every combination must be listed exactly once; gaps, duplicates and
/// unknown names are rejected when the rule base is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTable {
    outputs: Vec<OutputLevel>,
    rules: Vec<TableRule>,
}

impl CategoryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an output level (builder style)
    pub fn with_output(mut self, name: impl Into<String>, value: f64) -> Self {
        self.add_output(name, value);
        self
    }

    /// Add a rule (builder style)
    pub fn with_rule(mut self, when: &[&str], then: &str) -> Self {
        self.add_rule(
            when.iter().map(|s| s.to_string()).collect(),
            then.to_string(),
        );
        self
    }

    /// Declare an output level
    pub fn add_output(&mut self, name: impl Into<String>, value: f64) {
        self.outputs.push(OutputLevel {
            name: name.into(),
            value,
        });
    }

    /// Add a rule
    pub fn add_rule(&mut self, when: Vec<String>, then: String) {
        self.rules.push(TableRule { when, then });
    }

    /// Declared output levels
    pub fn outputs(&self) -> &[OutputLevel] {
        &self.outputs
    }

    /// Table rows in declaration order
    pub fn rules(&self) -> &[TableRule] {
        &self.rules
    }

    /// Resolve the table into consequents in canonical enumeration order
    fn consequents(&self, variables: &[LinguisticVariable]) -> Result<Vec<f64>> {
        let mut outputs = HashMap::new();
        for level in &self.outputs {
            if !level.value.is_finite() {
                return Err(SugenoError::policy(format!(
                    "output level '{}' is not finite",
                    level.name
                )));
            }
            if outputs.insert(level.name.as_str(), level.value).is_some() {
                return Err(SugenoError::policy(format!(
                    "output level '{}' declared twice",
                    level.name
                )));
            }
        }

        let cardinalities: Vec<usize> = variables.iter().map(|v| v.cardinality()).collect();
        let mut slots: Vec<Option<f64>> = vec![None; cardinalities.iter().product()];

        for row in &self.rules {
            if row.when.len() != variables.len() {
                return Err(SugenoError::IncompleteRuleTable {
                    reason: format!(
                        "rule {:?} names {} categories but there are {} variables",
                        row.when,
                        row.when.len(),
                        variables.len()
                    ),
                });
            }

            let antecedent = variables
                .iter()
                .zip(&row.when)
                .map(|(var, category)| {
                    var.position(category)
                        .ok_or_else(|| SugenoError::UnknownCategory {
                            variable: var.name.clone(),
                            category: category.clone(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            let value = *outputs
                .get(row.then.as_str())
                .ok_or_else(|| SugenoError::UnknownOutput {
                    level: row.then.clone(),
                })?;

            let slot = &mut slots[rule_index(&cardinalities, &antecedent)];
            if slot.is_some() {
                return Err(SugenoError::IncompleteRuleTable {
                    reason: format!("duplicate rule for {:?}", row.when),
                });
            }
            *slot = Some(value);
        }

        slots
            .into_iter()
            .zip(antecedents(&cardinalities))
            .map(|(slot, antecedent)| {
                slot.ok_or_else(|| SugenoError::IncompleteRuleTable {
                    reason: format!(
                        "no rule for {:?}",
                        category_names(variables, &antecedent)
                    ),
                })
            })
            .collect()
    }
}

/// Output derived from a weighted sum of 1-based antecedent levels
///
/// `band = #{ t in thresholds : sum > t }`, so a sum exactly on a threshold
/// stays in the lower band. The consequent is `outputs[band]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedThreshold {
    /// One weight per variable
    pub weights: Vec<f64>,
    /// Strictly ascending band cutoffs (inclusive upper bounds)
    pub thresholds: Vec<f64>,
    /// One constant per band; `thresholds.len() + 1` entries
    pub outputs: Vec<f64>,
}

impl WeightedThreshold {
    /// Create a policy from raw constants
    pub fn new(weights: Vec<f64>, thresholds: Vec<f64>, outputs: Vec<f64>) -> Self {
        Self {
            weights,
            thresholds,
            outputs,
        }
    }

    /// Check the constants against a system with `variables` inputs
    pub fn validate(&self, variables: usize) -> Result<()> {
        if self.weights.len() != variables {
            return Err(SugenoError::policy(format!(
                "{} weights for {} variables",
                self.weights.len(),
                variables
            )));
        }
        if self.outputs.len() != self.thresholds.len() + 1 {
            return Err(SugenoError::policy(format!(
                "{} thresholds need {} outputs, got {}",
                self.thresholds.len(),
                self.thresholds.len() + 1,
                self.outputs.len()
            )));
        }
        let mut constants = self.weights.iter().chain(&self.thresholds).chain(&self.outputs);
        if constants.any(|v| !v.is_finite()) {
            return Err(SugenoError::policy("weights, thresholds and outputs must be finite"));
        }
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SugenoError::policy(format!(
                "thresholds {:?} are not strictly ascending",
                self.thresholds
            )));
        }
        Ok(())
    }

    /// `Σ level_i × weight_i` with 1-based levels
    pub fn weighted_sum(&self, antecedent: &[usize]) -> f64 {
        antecedent
            .iter()
            .zip(&self.weights)
            .map(|(index, weight)| (index + 1) as f64 * weight)
            .sum()
    }

    /// Output band (0-based) for a weighted sum
    pub fn band(&self, sum: f64) -> usize {
        self.thresholds.iter().filter(|t| sum > **t).count()
    }

    /// Consequent for an antecedent
    pub fn consequent(&self, antecedent: &[usize]) -> f64 {
        self.outputs[self.band(self.weighted_sum(antecedent))]
    }
}

/// How rule consequents are produced
#[derive(Debug, Clone, PartialEq)]
pub enum OutputPolicy {
    /// Named rules mapped to output constants
    CategoryTable(CategoryTable),
    /// Output band derived from weighted antecedent levels
    WeightedThreshold(WeightedThreshold),
    /// Precomputed consequents in enumeration order
    Lookup(LookupTable),
}

impl OutputPolicy {
    /// Short policy name for logs and listings
    pub fn kind(&self) -> &'static str {
        match self {
            OutputPolicy::CategoryTable(_) => "table",
            OutputPolicy::WeightedThreshold(_) => "weighted",
            OutputPolicy::Lookup(_) => "lookup",
        }
    }
}

/// Immutable, fully enumerated rule base
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    cardinalities: Vec<usize>,
    rules: Vec<Rule>,
}

impl RuleBase {
    /// Enumerate every category combination and attach consequents
    ///
    /// Deterministic: the same variables and policy always produce the same
    /// rule sequence.
    pub fn build(variables: &[LinguisticVariable], policy: &OutputPolicy) -> Result<Self> {
        if variables.is_empty() {
            return Err(SugenoError::IncompleteRuleTable {
                reason: "a rule base needs at least one variable".to_string(),
            });
        }
        let cardinalities: Vec<usize> = variables.iter().map(|v| v.cardinality()).collect();
        if cardinalities.contains(&0) {
            return Err(SugenoError::IncompleteRuleTable {
                reason: "every variable needs at least one category".to_string(),
            });
        }
        let size: usize = cardinalities.iter().product();

        let consequents: Vec<f64> = match policy {
            OutputPolicy::CategoryTable(table) => table.consequents(variables)?,
            OutputPolicy::WeightedThreshold(weighted) => {
                weighted.validate(variables.len())?;
                antecedents(&cardinalities)
                    .map(|a| weighted.consequent(&a))
                    .collect()
            }
            OutputPolicy::Lookup(table) => {
                table.check_len(size)?;
                table.as_slice().to_vec()
            }
        };

        let rules: Vec<Rule> = antecedents(&cardinalities)
            .zip(consequents)
            .enumerate()
            .map(|(index, (antecedent, consequent))| Rule {
                index,
                antecedent,
                consequent,
            })
            .collect();

        debug!(
            "Built rule base with {} rules ({} policy, categories {:?})",
            rules.len(),
            policy.kind(),
            cardinalities
        );

        Ok(Self {
            cardinalities,
            rules,
        })
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false for a built rule base
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Category count per variable
    pub fn cardinalities(&self) -> &[usize] {
        &self.cardinalities
    }

    /// Rule at an enumeration index
    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }

    /// Rule with a given antecedent
    pub fn find(&self, antecedent: &[usize]) -> Option<&Rule> {
        if antecedent.len() != self.cardinalities.len()
            || antecedent
                .iter()
                .zip(&self.cardinalities)
                .any(|(a, k)| a >= k)
        {
            return None;
        }
        self.rules.get(rule_index(&self.cardinalities, antecedent))
    }

    /// Iterate rules in enumeration order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Smallest and largest consequent
    pub fn consequent_range(&self) -> (f64, f64) {
        self.rules.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.consequent), hi.max(r.consequent))
        })
    }

    /// Human-readable form, e.g. `IF demand IS sedang AND supply IS banyak THEN 2275`
    pub fn describe(&self, rule: &Rule, variables: &[LinguisticVariable]) -> String {
        let conditions: Vec<String> = variables
            .iter()
            .zip(&rule.antecedent)
            .map(|(var, index)| {
                format!("{} IS {}", var.name, var.term_name(*index).unwrap_or("?"))
            })
            .collect();
        format!("IF {} THEN {}", conditions.join(" AND "), rule.consequent)
    }
}

impl<'a> IntoIterator for &'a RuleBase {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// All antecedent tuples in canonical order (first position varies slowest)
pub fn antecedents(cardinalities: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    let total: usize = cardinalities.iter().product();
    let mut current = vec![0usize; cardinalities.len()];
    (0..total).map(move |i| {
        if i > 0 {
            // odometer increment, last position fastest
            for pos in (0..current.len()).rev() {
                current[pos] += 1;
                if current[pos] < cardinalities[pos] {
                    break;
                }
                current[pos] = 0;
            }
        }
        current.clone()
    })
}

/// Enumeration index of an antecedent (mixed-radix number, first digit most significant)
pub fn rule_index(cardinalities: &[usize], antecedent: &[usize]) -> usize {
    antecedent
        .iter()
        .zip(cardinalities)
        .fold(0, |acc, (digit, radix)| acc * radix + digit)
}

fn category_names<'a>(variables: &'a [LinguisticVariable], antecedent: &[usize]) -> Vec<&'a str> {
    variables
        .iter()
        .zip(antecedent)
        .map(|(v, i)| v.term_name(*i).unwrap_or("?"))
        .collect()
}
