//! Scoring a system against reference rows
//!
//! Each row holds the crisp inputs followed by the expected score. The report
//! keeps every prediction together with the usual error summaries so a
//! calibrated table or heuristic can be compared against its reference data.

use crate::error::{Result, SugenoError};
use crate::inference::SugenoSystem;
use serde::Serialize;
use tracing::info;

/// One scored reference row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedRow {
    pub inputs: Vec<f64>,
    pub expected: f64,
    pub predicted: f64,
}

impl VerifiedRow {
    /// `predicted - expected`
    pub fn error(&self) -> f64 {
        self.predicted - self.expected
    }
}

/// Predictions and error summaries for a reference set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub rows: Vec<VerifiedRow>,
    /// Mean absolute error
    pub mae: f64,
    /// Root mean square error
    pub rmse: f64,
    /// Largest absolute error
    pub max_abs_error: f64,
}

/// Score every row; the last column of each row is the expected value
pub fn verify<R>(system: &SugenoSystem, rows: &[R]) -> Result<VerificationReport>
where
    R: AsRef<[f64]>,
{
    let arity = system.arity();
    let mut verified = Vec::with_capacity(rows.len());

    for row in rows {
        let row = row.as_ref();
        if row.len() != arity + 1 {
            return Err(SugenoError::InputArity {
                system: system.name().to_string(),
                expected: arity + 1,
                actual: row.len(),
            });
        }
        let (inputs, expected) = row.split_at(arity);
        verified.push(VerifiedRow {
            inputs: inputs.to_vec(),
            expected: expected[0],
            predicted: system.score(inputs)?,
        });
    }

    let n = verified.len().max(1) as f64;
    let mae = verified.iter().map(|r| r.error().abs()).sum::<f64>() / n;
    let rmse = (verified.iter().map(|r| r.error().powi(2)).sum::<f64>() / n).sqrt();
    let max_abs_error = verified
        .iter()
        .map(|r| r.error().abs())
        .fold(0.0, f64::max);

    info!(
        "Verified '{}' on {} rows: MAE {:.4}, RMSE {:.4}",
        system.name(),
        verified.len(),
        mae,
        rmse
    );

    Ok(VerificationReport {
        rows: verified,
        mae,
        rmse,
        max_abs_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::{indicator_scoring_weighted, production_planning, INDICATOR_TRAINING};

    #[test]
    fn test_exact_rows_have_zero_error() {
        let system = production_planning().unwrap();
        let rows = [[1310.0, 750.0, 2275.0], [1589.0, 894.0, 2579.0]];
        let report = verify(&system, &rows).unwrap();
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.mae, 0.0);
        assert_eq!(report.rmse, 0.0);
    }

    #[test]
    fn test_error_summaries() {
        let system = production_planning().unwrap();
        let rows = vec![vec![1310.0, 750.0, 2270.0], vec![1310.0, 750.0, 2285.0]];
        let report = verify(&system, &rows).unwrap();
        assert_eq!(report.rows[0].error(), 5.0);
        assert_eq!(report.mae, 7.5);
        assert_eq!(report.max_abs_error, 10.0);
        assert!((report.rmse - (62.5f64).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_training_rows_score() {
        let system = indicator_scoring_weighted().unwrap();
        let report = verify(&system, &INDICATOR_TRAINING).unwrap();
        assert_eq!(report.rows.len(), 20);
        assert!(report
            .rows
            .iter()
            .all(|r| (1.0..=3.0).contains(&r.predicted)));
    }

    #[test]
    fn test_row_width_is_checked() {
        let system = production_planning().unwrap();
        assert!(verify(&system, &[[1310.0, 750.0]]).is_err());
    }
}
