//! # Membership evaluation
//!
//! Piecewise-linear membership functions and the linguistic variables built
//! from them.
//!
//! Only two shape families are supported: triangular and trapezoidal. Both
//! accept degenerate edges (`a == b` or `c == d`) which turn the ramp into an
//! immediate step to 1, so shoulder sets such as `low = (0, 0, 50)` need no
//! special casing and never divide by zero.
//!
//! ## Example
//!
//! ```rust
//! use sugeno_engine::membership::{LinguisticVariable, MembershipFunction};
//!
//! let demand = LinguisticVariable::new("demand", 1030.0, 1589.0)
//!     .with_term("kecil", MembershipFunction::trapezoidal(778.0, 975.0, 1030.0, 1310.0))
//!     .with_term("sedang", MembershipFunction::triangular(1030.0, 1310.0, 1589.0))
//!     .with_term("besar", MembershipFunction::trapezoidal(1310.0, 1589.0, 1695.0, 1796.0));
//!
//! let degrees = demand.fuzzify(1170.0);
//! assert_eq!(degrees.get(1), 0.5);
//! ```

use crate::error::{Result, SugenoError};
use serde::Serialize;
use std::collections::HashSet;

/// Membership function shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MembershipFunction {
    /// Triangular membership function: 0 outside [a, c], 1 at b
    Triangular { a: f64, b: f64, c: f64 },
    /// Trapezoidal membership function: 0 outside [a, d], 1 on [b, c]
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl MembershipFunction {
    /// Triangular shape with breakpoints `a <= b <= c`
    pub fn triangular(a: f64, b: f64, c: f64) -> Self {
        MembershipFunction::Triangular { a, b, c }
    }

    /// Trapezoidal shape with breakpoints `a <= b <= c <= d`
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> Self {
        MembershipFunction::Trapezoidal { a, b, c, d }
    }

    /// Build a shape from its breakpoint list (3 points = triangle, 4 = trapezoid)
    pub fn from_points(points: &[f64]) -> Option<Self> {
        match *points {
            [a, b, c] => Some(Self::triangular(a, b, c)),
            [a, b, c, d] => Some(Self::trapezoidal(a, b, c, d)),
            _ => None,
        }
    }

    /// Compute membership degree for a given value
    ///
    /// The result is always in `[0, 1]`; NaN maps to 0.
    pub fn membership(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        match *self {
            MembershipFunction::Triangular { a, b, c } => {
                if x < a || x > c {
                    0.0
                } else if x == b {
                    1.0
                } else if x < b {
                    // a <= x < b, so b > a
                    (x - a) / (b - a)
                } else {
                    // b < x <= c, so c > b
                    (c - x) / (c - b)
                }
            }
            MembershipFunction::Trapezoidal { a, b, c, d } => {
                if x < a || x > d {
                    0.0
                } else if x >= b && x <= c {
                    1.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
        }
    }

    /// Breakpoints in declaration order
    pub fn points(&self) -> Vec<f64> {
        match *self {
            MembershipFunction::Triangular { a, b, c } => vec![a, b, c],
            MembershipFunction::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
        }
    }

    /// Support interval (membership may be > 0 only inside it)
    pub fn support(&self) -> (f64, f64) {
        match *self {
            MembershipFunction::Triangular { a, c, .. } => (a, c),
            MembershipFunction::Trapezoidal { a, d, .. } => (a, d),
        }
    }

    /// Core interval (membership is exactly 1 inside it)
    pub fn core(&self) -> (f64, f64) {
        match *self {
            MembershipFunction::Triangular { b, .. } => (b, b),
            MembershipFunction::Trapezoidal { b, c, .. } => (b, c),
        }
    }

    /// Short shape name used in configuration files and rule listings
    pub fn shape_name(&self) -> &'static str {
        match self {
            MembershipFunction::Triangular { .. } => "triangular",
            MembershipFunction::Trapezoidal { .. } => "trapezoidal",
        }
    }

    /// Check that all breakpoints are finite and non-decreasing
    pub fn check(&self) -> std::result::Result<(), String> {
        let points = self.points();
        if let Some(p) = points.iter().find(|p| !p.is_finite()) {
            return Err(format!("breakpoint {p} is not finite"));
        }
        if points.windows(2).any(|w| w[0] > w[1]) {
            return Err(format!("breakpoints {points:?} are not non-decreasing"));
        }
        Ok(())
    }
}

/// Named category of a linguistic variable
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyTerm {
    /// Category name, e.g. `low` or `sedang`
    pub name: String,
    /// Membership function
    pub function: MembershipFunction,
}

impl FuzzyTerm {
    /// Create a new term
    pub fn new(name: impl Into<String>, function: MembershipFunction) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    /// Get membership degree for a value
    pub fn membership(&self, x: f64) -> f64 {
        self.function.membership(x)
    }
}

/// Input dimension with a nominal domain and an ordered set of categories
///
/// Category order matters: it defines the level (`index + 1`) used by rule
/// enumeration and the weighted-threshold policy.
#[derive(Debug, Clone, PartialEq)]
pub struct LinguisticVariable {
    /// Variable name
    pub name: String,
    /// Lower bound of the nominal domain
    pub min: f64,
    /// Upper bound of the nominal domain
    pub max: f64,
    /// Ordered categories
    pub terms: Vec<FuzzyTerm>,
}

impl LinguisticVariable {
    /// Create a variable with no categories yet
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            terms: Vec::new(),
        }
    }

    /// Append a category (builder style)
    pub fn with_term(mut self, name: impl Into<String>, function: MembershipFunction) -> Self {
        self.add_term(FuzzyTerm::new(name, function));
        self
    }

    /// Append a category
    pub fn add_term(&mut self, term: FuzzyTerm) {
        self.terms.push(term);
    }

    /// Number of categories
    pub fn cardinality(&self) -> usize {
        self.terms.len()
    }

    /// Position of a category by name
    pub fn position(&self, term: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == term)
    }

    /// Name of the category at `index`
    pub fn term_name(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(|t| t.name.as_str())
    }

    /// Whether a value lies inside the nominal domain
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Validate domain, term names and every membership function
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| SugenoError::InvalidVariable {
            variable: self.name.clone(),
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("variable name is empty".to_string()));
        }
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(invalid(format!(
                "domain [{}, {}] is not a finite, ordered interval",
                self.min, self.max
            )));
        }
        if self.terms.is_empty() {
            return Err(invalid("no categories defined".to_string()));
        }

        let mut seen = HashSet::new();
        for term in &self.terms {
            if !seen.insert(term.name.as_str()) {
                return Err(invalid(format!("duplicate category '{}'", term.name)));
            }
            term.function
                .check()
                .map_err(|reason| SugenoError::InvalidMembership {
                    variable: self.name.clone(),
                    term: term.name.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    /// Fuzzify a crisp value into one degree per category
    ///
    /// Categories are evaluated independently; degrees are not normalised.
    /// Values outside `[min, max]` (and non-finite values) give an all-zero
    /// vector.
    pub fn fuzzify(&self, value: f64) -> DegreeVector {
        if !value.is_finite() || !self.contains(value) {
            return DegreeVector::zeros(self.terms.len());
        }
        DegreeVector {
            degrees: self.terms.iter().map(|t| t.membership(value)).collect(),
        }
    }

    /// Fuzzify and pair every degree with its category name
    pub fn fuzzify_named(&self, value: f64) -> Vec<(&str, f64)> {
        self.terms
            .iter()
            .map(|t| t.name.as_str())
            .zip(self.fuzzify(value).degrees)
            .collect()
    }
}

/// Membership degrees of one crisp value, one entry per category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DegreeVector {
    degrees: Vec<f64>,
}

impl DegreeVector {
    fn zeros(len: usize) -> Self {
        Self {
            degrees: vec![0.0; len],
        }
    }

    /// Degree of the category at `index` (0 when out of range)
    pub fn get(&self, index: usize) -> f64 {
        self.degrees.get(index).copied().unwrap_or(0.0)
    }

    /// All degrees in category order
    pub fn as_slice(&self) -> &[f64] {
        &self.degrees
    }

    /// Whether every degree is zero
    pub fn is_zero(&self) -> bool {
        self.degrees.iter().all(|d| *d == 0.0)
    }

    /// Indices of categories with a nonzero degree
    pub fn active(&self) -> impl Iterator<Item = usize> + '_ {
        self.degrees
            .iter()
            .enumerate()
            .filter(|(_, d)| **d > 0.0)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supply() -> LinguisticVariable {
        LinguisticVariable::new("supply", 607.0, 894.0)
            .with_term("sedikit", MembershipFunction::trapezoidal(492.0, 588.0, 607.0, 750.0))
            .with_term("sedang", MembershipFunction::triangular(607.0, 750.0, 894.0))
            .with_term("banyak", MembershipFunction::trapezoidal(750.0, 894.0, 912.0, 1008.0))
    }

    #[test]
    fn test_triangular_membership() {
        let mf = MembershipFunction::triangular(0.0, 5.0, 10.0);

        assert_eq!(mf.membership(-1.0), 0.0);
        assert_eq!(mf.membership(0.0), 0.0);
        assert_eq!(mf.membership(2.5), 0.5);
        assert_eq!(mf.membership(5.0), 1.0);
        assert_eq!(mf.membership(7.5), 0.5);
        assert_eq!(mf.membership(10.0), 0.0);
        assert_eq!(mf.membership(11.0), 0.0);
    }

    #[test]
    fn test_degenerate_triangles() {
        let left_shoulder = MembershipFunction::triangular(0.0, 0.0, 50.0);
        assert_eq!(left_shoulder.membership(0.0), 1.0);
        assert_eq!(left_shoulder.membership(25.0), 0.5);
        assert_eq!(left_shoulder.membership(-0.1), 0.0);

        let right_shoulder = MembershipFunction::triangular(50.0, 100.0, 100.0);
        assert_eq!(right_shoulder.membership(100.0), 1.0);
        assert_eq!(right_shoulder.membership(75.0), 0.5);
        assert_eq!(right_shoulder.membership(100.1), 0.0);

        let spike = MembershipFunction::triangular(3.0, 3.0, 3.0);
        assert_eq!(spike.membership(3.0), 1.0);
        assert_eq!(spike.membership(3.0001), 0.0);
    }

    #[test]
    fn test_trapezoidal_membership() {
        let mf = MembershipFunction::trapezoidal(0.0, 2.0, 8.0, 10.0);

        assert_eq!(mf.membership(-1.0), 0.0);
        assert_eq!(mf.membership(0.0), 0.0);
        assert_eq!(mf.membership(1.0), 0.5);
        assert_eq!(mf.membership(2.0), 1.0);
        assert_eq!(mf.membership(5.0), 1.0);
        assert_eq!(mf.membership(8.0), 1.0);
        assert_eq!(mf.membership(9.0), 0.5);
        assert_eq!(mf.membership(10.0), 0.0);
        assert_eq!(mf.membership(11.0), 0.0);
    }

    #[test]
    fn test_degenerate_trapezoid_edges() {
        let mf = MembershipFunction::trapezoidal(5.0, 5.0, 8.0, 8.0);
        assert_eq!(mf.membership(5.0), 1.0);
        assert_eq!(mf.membership(8.0), 1.0);
        assert_eq!(mf.membership(4.999), 0.0);
        assert_eq!(mf.membership(8.001), 0.0);
        assert_eq!(mf.membership(f64::NAN), 0.0);
    }

    #[test]
    fn test_from_points_and_intervals() {
        let tri = MembershipFunction::from_points(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(tri.support(), (1.0, 3.0));
        assert_eq!(tri.core(), (2.0, 2.0));
        assert_eq!(tri.shape_name(), "triangular");

        let trap = MembershipFunction::from_points(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(trap.core(), (2.0, 3.0));
        assert!(MembershipFunction::from_points(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_check_rejects_bad_breakpoints() {
        assert!(MembershipFunction::triangular(0.0, 5.0, 10.0).check().is_ok());
        assert!(MembershipFunction::triangular(5.0, 0.0, 10.0).check().is_err());
        assert!(MembershipFunction::trapezoidal(0.0, 1.0, f64::INFINITY, 3.0)
            .check()
            .is_err());
    }

    #[test]
    fn test_fuzzify_overlap_and_peaks() {
        let var = supply();
        let at_peak = var.fuzzify(750.0);
        assert_eq!(at_peak.as_slice(), &[0.0, 1.0, 0.0]);

        let overlap = var.fuzzify(678.5);
        assert_eq!(overlap.active().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(overlap.get(0), 0.5);
        assert_eq!(overlap.get(1), 0.5);
    }

    #[test]
    fn test_fuzzify_outside_domain_is_zero() {
        let var = supply();
        assert!(var.fuzzify(600.0).is_zero());
        assert!(var.fuzzify(900.0).is_zero());
        assert!(var.fuzzify(f64::NAN).is_zero());
        assert!(!var.fuzzify(607.0).is_zero());
        assert!(!var.fuzzify(894.0).is_zero());
    }

    #[test]
    fn test_fuzzify_named() {
        let var = supply();
        let named = var.fuzzify_named(894.0);
        assert_eq!(named, vec![("sedikit", 0.0), ("sedang", 0.0), ("banyak", 1.0)]);
    }

    #[test]
    fn test_variable_validation() {
        assert!(supply().validate().is_ok());

        let empty = LinguisticVariable::new("x", 0.0, 1.0);
        assert!(matches!(
            empty.validate(),
            Err(SugenoError::InvalidVariable { .. })
        ));

        let reversed = supply();
        let reversed = LinguisticVariable {
            min: 900.0,
            ..reversed
        };
        assert!(reversed.validate().is_err());

        let duplicate = supply().with_term("sedang", MembershipFunction::triangular(0.0, 1.0, 2.0));
        assert!(duplicate.validate().is_err());

        let bad_shape = LinguisticVariable::new("x", 0.0, 10.0)
            .with_term("low", MembershipFunction::triangular(5.0, 1.0, 10.0));
        assert!(matches!(
            bad_shape.validate(),
            Err(SugenoError::InvalidMembership { .. })
        ));
    }
}
