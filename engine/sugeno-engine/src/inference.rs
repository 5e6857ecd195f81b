//! # Sugeno inference
//!
//! [`SugenoSystem`] owns the linguistic variables and the immutable rule base
//! and turns crisp inputs into one crisp score:
//!
//! 1. fuzzify every input with its variable
//! 2. fire every rule with the min t-norm over its antecedent degrees
//! 3. aggregate `Σ w·z / Σ w` over rules with `w > 0`
//! 4. if no rule fires, return the configured [`Fallback`]
//!
//! A built system holds no mutable state, so it can be shared across threads
//! by reference and every call with the same inputs returns the same bits.
//!
//! ## Example
//!
//! ```rust
//! use sugeno_engine::membership::{LinguisticVariable, MembershipFunction};
//! use sugeno_engine::rule_base::{CategoryTable, OutputPolicy};
//! use sugeno_engine::SugenoSystem;
//!
//! let temperature = LinguisticVariable::new("temperature", 0.0, 40.0)
//!     .with_term("cold", MembershipFunction::triangular(0.0, 0.0, 20.0))
//!     .with_term("hot", MembershipFunction::triangular(20.0, 40.0, 40.0));
//! let table = CategoryTable::new()
//!     .with_output("off", 0.0)
//!     .with_output("full", 100.0)
//!     .with_rule(&["cold"], "off")
//!     .with_rule(&["hot"], "full");
//!
//! let system = SugenoSystem::builder("fan")
//!     .with_variable(temperature)
//!     .with_policy(OutputPolicy::CategoryTable(table))
//!     .build()?;
//!
//! assert_eq!(system.score(&[30.0])?, 100.0);
//! assert_eq!(system.score(&[10.0])?, 0.0);
//! # Ok::<(), sugeno_engine::SugenoError>(())
//! ```

use crate::error::{Result, SugenoError};
use crate::membership::{DegreeVector, LinguisticVariable};
use crate::rule_base::{OutputPolicy, Rule, RuleBase};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Result used when no rule fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fallback {
    /// Arithmetic mean of the raw inputs
    #[default]
    InputMean,
    /// Constant zero
    Zero,
}

impl Fallback {
    /// Fallback value for a set of raw inputs
    pub fn value(&self, inputs: &[f64]) -> f64 {
        match self {
            Fallback::InputMean if !inputs.is_empty() => {
                inputs.iter().sum::<f64>() / inputs.len() as f64
            }
            _ => 0.0,
        }
    }
}

/// A rule that contributed to a result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiredRule {
    /// Position in the rule base
    pub index: usize,
    /// Category index per variable
    pub antecedent: Vec<usize>,
    /// Firing strength (min of antecedent degrees), always > 0
    pub strength: f64,
    /// Constant consequent
    pub consequent: f64,
}

/// Full outcome of one inference call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inference {
    /// Crisp output
    pub score: f64,
    /// Degree vector per variable
    pub degrees: Vec<DegreeVector>,
    /// Rules with nonzero firing strength, in enumeration order
    pub fired: Vec<FiredRule>,
    /// Sum of firing strengths
    pub total_strength: f64,
    /// Whether the score came from the fallback policy
    pub fallback_used: bool,
}

impl Inference {
    /// Smallest and largest consequent among fired rules
    pub fn fired_range(&self) -> Option<(f64, f64)> {
        self.fired.iter().map(|r| r.consequent).fold(None, |acc, z| {
            Some(match acc {
                None => (z, z),
                Some((lo, hi)) => (f64::min(lo, z), f64::max(hi, z)),
            })
        })
    }
}

/// Zero-order Takagi-Sugeno inference system
#[derive(Debug, Clone, PartialEq)]
pub struct SugenoSystem {
    name: String,
    variables: Vec<LinguisticVariable>,
    rules: RuleBase,
    fallback: Fallback,
}

impl SugenoSystem {
    /// Start building a system
    pub fn builder(name: impl Into<String>) -> SugenoSystemBuilder {
        SugenoSystemBuilder::new(name)
    }

    /// Validate the variables and build the rule base
    pub fn new(
        name: impl Into<String>,
        variables: Vec<LinguisticVariable>,
        policy: &OutputPolicy,
        fallback: Fallback,
    ) -> Result<Self> {
        let name = name.into();
        for variable in &variables {
            variable.validate()?;
        }
        if let Some(dup) = variables
            .iter()
            .enumerate()
            .find(|(i, v)| variables[..*i].iter().any(|o| o.name == v.name))
            .map(|(_, v)| v)
        {
            return Err(SugenoError::InvalidVariable {
                variable: dup.name.clone(),
                reason: "variable declared twice".to_string(),
            });
        }

        let rules = RuleBase::build(&variables, policy)?;
        info!(
            "Built Sugeno system '{}' with {} variables and {} rules",
            name,
            variables.len(),
            rules.len()
        );

        Ok(Self {
            name,
            variables,
            rules,
            fallback,
        })
    }

    /// System name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Input variables in declaration order
    pub fn variables(&self) -> &[LinguisticVariable] {
        &self.variables
    }

    /// Variable by name
    pub fn variable(&self, name: &str) -> Option<&LinguisticVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// The immutable rule base
    pub fn rule_base(&self) -> &RuleBase {
        &self.rules
    }

    /// Fallback policy
    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// Number of crisp inputs expected per call
    pub fn arity(&self) -> usize {
        self.variables.len()
    }

    /// Fuzzify every input with its variable
    pub fn fuzzify(&self, inputs: &[f64]) -> Result<Vec<DegreeVector>> {
        self.check_inputs(inputs)?;
        Ok(self
            .variables
            .iter()
            .zip(inputs)
            .map(|(var, x)| var.fuzzify(*x))
            .collect())
    }

    /// Crisp score only
    pub fn score(&self, inputs: &[f64]) -> Result<f64> {
        let degrees = self.fuzzify(inputs)?;
        let (numerator, denominator) = self.aggregate(&degrees, |_, _| {});
        Ok(self.defuzzify(inputs, numerator, denominator))
    }

    /// Crisp score together with degrees and the fired rules
    pub fn infer(&self, inputs: &[f64]) -> Result<Inference> {
        let degrees = self.fuzzify(inputs)?;
        let mut fired = Vec::new();
        let (numerator, denominator) = self.aggregate(&degrees, |rule, strength| {
            fired.push(FiredRule {
                index: rule.index,
                antecedent: rule.antecedent.clone(),
                strength,
                consequent: rule.consequent,
            })
        });

        Ok(Inference {
            score: self.defuzzify(inputs, numerator, denominator),
            degrees,
            fired,
            total_strength: denominator,
            fallback_used: denominator <= 0.0,
        })
    }

    /// Firing strength of a rule: min over its antecedent degrees
    pub fn firing_strength(rule: &Rule, degrees: &[DegreeVector]) -> f64 {
        rule.antecedent
            .iter()
            .zip(degrees)
            .map(|(category, d)| d.get(*category))
            .fold(1.0, f64::min)
    }

    fn check_inputs(&self, inputs: &[f64]) -> Result<()> {
        if inputs.len() != self.variables.len() {
            return Err(SugenoError::InputArity {
                system: self.name.clone(),
                expected: self.variables.len(),
                actual: inputs.len(),
            });
        }
        for (var, value) in self.variables.iter().zip(inputs) {
            if !value.is_finite() {
                return Err(SugenoError::NonFiniteInput {
                    variable: var.name.clone(),
                    value: *value,
                });
            }
        }
        Ok(())
    }

    /// Accumulate `(Σ w·z, Σ w)` over rules with positive strength
    fn aggregate<F>(&self, degrees: &[DegreeVector], mut on_fire: F) -> (f64, f64)
    where
        F: FnMut(&Rule, f64),
    {
        let mut numerator = 0.0;
        let mut denominator = 0.0;

        for rule in &self.rules {
            let strength = Self::firing_strength(rule, degrees);
            if strength <= 0.0 {
                continue;
            }
            trace!(
                "Rule #{} {:?} fired with strength {} -> {}",
                rule.index,
                rule.antecedent,
                strength,
                rule.consequent
            );
            numerator += strength * rule.consequent;
            denominator += strength;
            on_fire(rule, strength);
        }

        (numerator, denominator)
    }

    fn defuzzify(&self, inputs: &[f64], numerator: f64, denominator: f64) -> f64 {
        if denominator > 0.0 {
            numerator / denominator
        } else {
            let value = self.fallback.value(inputs);
            debug!(
                "No rule fired in '{}' for {:?}; using {:?} fallback = {}",
                self.name, inputs, self.fallback, value
            );
            value
        }
    }
}

/// Step-by-step construction of a [`SugenoSystem`]
#[derive(Debug, Clone)]
pub struct SugenoSystemBuilder {
    name: String,
    variables: Vec<LinguisticVariable>,
    policy: Option<OutputPolicy>,
    fallback: Fallback,
}

impl SugenoSystemBuilder {
    /// Create a builder with the default fallback
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            policy: None,
            fallback: Fallback::default(),
        }
    }

    /// Append an input variable
    pub fn with_variable(mut self, variable: LinguisticVariable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Set the output policy
    pub fn with_policy(mut self, policy: OutputPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Set the fallback used when no rule fires
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Validate everything and build the system
    pub fn build(self) -> Result<SugenoSystem> {
        let policy = self
            .policy
            .ok_or_else(|| SugenoError::policy("no output policy configured"))?;
        SugenoSystem::new(self.name, self.variables, &policy, self.fallback)
    }
}
