//! End-to-end scenarios for the shipped configurations

use std::collections::BTreeSet;
use std::path::PathBuf;
use sugeno_engine::presets::{
    self, IndicatorScorer, ProductionPlanner, INDICATOR_TRAINING, Z_BANYAK, Z_SEDANG, Z_SEDIKIT,
};
use sugeno_engine::{rule_base, LookupTable, SugenoError, SugenoSystem, SystemConfig};

fn configs_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../configs")
}

/// Every rule whose categories are all active, computed from the degree vectors alone
fn expected_fired(system: &SugenoSystem, inputs: &[f64]) -> BTreeSet<usize> {
    let degrees = system.fuzzify(inputs).unwrap();
    let cardinalities = system.rule_base().cardinalities();
    rule_base::antecedents(cardinalities)
        .filter(|a| a.iter().zip(&degrees).all(|(c, d)| d.get(*c) > 0.0))
        .map(|a| rule_base::rule_index(cardinalities, &a))
        .collect()
}

#[test]
fn test_production_shared_peak() {
    let planner = ProductionPlanner::new().unwrap();
    let system = planner.system();
    let result = planner.explain(1310.0, 750.0).unwrap();

    // 1310 and 750 are the medium peaks and the edges of both neighbours
    assert_eq!(result.degrees[0].as_slice(), &[0.0, 1.0, 0.0]);
    assert_eq!(result.degrees[1].as_slice(), &[0.0, 1.0, 0.0]);

    let fired: BTreeSet<usize> = result.fired.iter().map(|r| r.index).collect();
    assert_eq!(fired, expected_fired(system, &[1310.0, 750.0]));
    assert_eq!(fired, BTreeSet::from([4]));
    assert_eq!(result.fired[0].strength, 1.0);
    assert_eq!(result.score, Z_SEDANG);
}

#[test]
fn test_production_overlap_hand_computed() {
    let planner = ProductionPlanner::new().unwrap();
    // demand 1170: kecil 0.5, sedang 0.5; supply 678.5: sedikit 0.5, sedang 0.5
    let result = planner.explain(1170.0, 678.5).unwrap();

    let fired: Vec<(usize, f64, f64)> = result
        .fired
        .iter()
        .map(|r| (r.index, r.strength, r.consequent))
        .collect();
    assert_eq!(
        fired,
        vec![
            (0, 0.5, Z_SEDIKIT),
            (1, 0.5, Z_SEDIKIT),
            (3, 0.5, Z_SEDIKIT),
            (4, 0.5, Z_SEDANG),
        ]
    );

    let expected = (0.5 * Z_SEDIKIT * 3.0 + 0.5 * Z_SEDANG) / 2.0;
    assert_eq!(result.score, expected);
    assert_eq!(result.score, 2065.75);
}

#[test]
fn test_production_upper_corner() {
    let planner = ProductionPlanner::new().unwrap();
    assert_eq!(planner.recommend(1589.0, 894.0).unwrap(), Z_BANYAK);
}

#[test]
fn test_domain_minimum_is_not_an_error() {
    let planner = ProductionPlanner::new().unwrap();
    let result = planner.explain(1030.0, 607.0).unwrap();
    assert!(!result.degrees[0].is_zero());
    assert!(!result.degrees[1].is_zero());
    assert!(!result.fallback_used);
    assert_eq!(result.score, Z_SEDIKIT);
}

#[test]
fn test_out_of_domain_falls_back_to_input_mean() {
    let planner = ProductionPlanner::new().unwrap();
    let result = planner.explain(2000.0, 700.0).unwrap();
    assert!(result.fallback_used);
    assert!(result.degrees[0].is_zero());
    assert_eq!(result.score, 1350.0);
}

#[test]
fn test_indicator_regression_fixture() {
    let scorer = IndicatorScorer::bundled().unwrap();
    let inputs = [84.57, 83.54, 87.13, 66.08, 94.14];
    let score = scorer
        .score(inputs[0], inputs[1], inputs[2], inputs[3], inputs[4])
        .unwrap();

    // Brute force over all 243 rules, independent of the aggregation code
    let system = scorer.system();
    let degrees = system.fuzzify(&inputs).unwrap();
    let table = presets::bundled_consequents().unwrap();
    let (mut num, mut den) = (0.0, 0.0);
    for i in 0..243usize {
        let digits = [i / 81, (i / 27) % 3, (i / 9) % 3, (i / 3) % 3, i % 3];
        let w = digits
            .iter()
            .zip(&degrees)
            .map(|(c, d)| d.get(*c))
            .fold(1.0, f64::min);
        if w > 0.0 {
            num += w * table.get(i).unwrap();
            den += w;
        }
    }

    assert_eq!(score.to_bits(), (num / den).to_bits());
    assert!((score - 97.37028301886794).abs() < 1e-9);
}

#[test]
fn test_indicator_second_fixture() {
    let scorer = IndicatorScorer::bundled().unwrap();
    let score = scorer.score(47.86, 53.8, 87.18, 55.41, 41.11).unwrap();
    assert!((score - 60.975667655786374).abs() < 1e-9);
}

#[test]
fn test_indicator_fallback_outside_scale() {
    let scorer = IndicatorScorer::bundled().unwrap();
    let result = scorer.explain(120.0, 50.0, 50.0, 50.0, 50.0).unwrap();
    assert!(result.fallback_used);
    assert_eq!(result.score, 64.0);
}

#[test]
fn test_mis_sized_lookup_is_fatal() {
    let short = LookupTable::new(vec![50.0; 242]).unwrap();
    assert!(matches!(
        IndicatorScorer::new(short),
        Err(SugenoError::LookupLengthMismatch {
            expected: 243,
            actual: 242
        })
    ));
    assert!(IndicatorScorer::from_path("/nowhere/z_rule.npy").is_err());
}

#[test]
fn test_npy_artifact_matches_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("z_rule.npy");
    let table = presets::bundled_consequents().unwrap();
    std::fs::write(&path, table.to_npy_bytes()).unwrap();

    let from_npy = IndicatorScorer::from_path(&path).unwrap();
    let bundled = IndicatorScorer::bundled().unwrap();
    for row in INDICATOR_TRAINING {
        let a = from_npy.score(row[0], row[1], row[2], row[3], row[4]).unwrap();
        let b = bundled.score(row[0], row[1], row[2], row[3], row[4]).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }
}

#[test]
fn test_config_files_match_presets() {
    let production = SystemConfig::load(configs_dir().join("production.toml"))
        .unwrap()
        .into_system()
        .unwrap();
    let preset = presets::production_planning().unwrap();
    assert_eq!(production.variables(), preset.variables());
    assert_eq!(production.rule_base(), preset.rule_base());

    let indicators = SystemConfig::load(configs_dir().join("indicators.toml"))
        .unwrap()
        .into_system()
        .unwrap();
    let preset = IndicatorScorer::bundled().unwrap();
    assert_eq!(indicators.rule_base(), preset.system().rule_base());

    let weighted = SystemConfig::load(configs_dir().join("indicators-weighted.toml"))
        .unwrap()
        .into_system()
        .unwrap();
    let preset = presets::indicator_scoring_weighted().unwrap();
    assert_eq!(weighted.rule_base(), preset.rule_base());
    assert_eq!(weighted, preset);
}

#[test]
fn test_verification_report_on_training_rows() {
    let scorer = IndicatorScorer::bundled().unwrap();
    let report = sugeno_engine::verify(scorer.system(), &INDICATOR_TRAINING).unwrap();
    assert_eq!(report.rows.len(), 20);
    assert!(report.mae.is_finite());
    assert!(report.rmse >= report.mae);
    assert!(report.max_abs_error >= report.rmse);
}
