//! Asset Assembly Scenario Tests
//!
//! End-to-end runs of the assembler over small hand-built batches: the rate
//! and classification scenario, the single-sample edge case, idempotence, the
//! explained narrative path and vocabulary selection.

use chrono::{DateTime, Duration, TimeZone, Utc};

use fleetsight::config::UnitsConfig;
use fleetsight::types::{ActionTier, AssetStatus};
use fleetsight::{
    assemble_asset, assemble_fleet, parse_batch, AssemblyInput, AssetKind, AssetMeta,
    EngineConfig, Explanation, RiskBand, RiskLevel, TelemetrySample,
};

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 6, 0, 0).unwrap() + Duration::days(n)
}

fn sample(n: i64, mbar: f64, band: RiskBand, probability: f64) -> TelemetrySample {
    TelemetrySample {
        risk_band: band,
        prob_breach7d: Some(probability),
        ..TelemetrySample::new(day(n), mbar)
    }
}

/// Config that reads raw values straight through as display pressure.
fn identity_units() -> EngineConfig {
    EngineConfig {
        units: UnitsConfig {
            psi_per_mbar: 1.0,
            pressure_offset: 0.0,
            ..UnitsConfig::default()
        },
        ..EngineConfig::default()
    }
}

// ============================================================================
// Rate and classification
// ============================================================================

#[test]
fn rising_pressure_projects_from_observed_rate() {
    let config = identity_units();
    let samples = vec![
        sample(0, 10.0, RiskBand::Medium, 0.5),
        sample(1, 15.0, RiskBand::Medium, 0.5),
        sample(2, 20.0, RiskBand::Medium, 0.5),
    ];
    let asset = assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &samples), &config)
        .expect("non-empty batch");

    assert_eq!(asset.current.differential_pressure, 20.0);
    assert_eq!(asset.service.rate_of_change, 5.0, "10 -> 20 over two periods");
    assert_eq!(asset.predictions.fouling_rate, 5.0, "above the floor, used as is");
    assert_eq!(asset.predictions.periods_until_critical, 2);
    assert_eq!(asset.predictions.tier, ActionTier::Emergency);

    assert_eq!(asset.status, AssetStatus::Warning);
    assert_eq!(asset.risk.impact, RiskLevel::Medium, "medium band, 20 psi");
    assert_eq!(asset.risk.probability, RiskLevel::Medium, "0.5 breach probability");
    assert!(
        (15..=90).contains(&asset.risk.score),
        "score {} out of range",
        asset.risk.score
    );

    assert!(!asset.explained);
    assert_eq!(
        asset.alert_message,
        "Condition: Elevated Pressure Differential - Monitoring Required"
    );
    assert!(asset.trends.flow.is_some(), "three samples give a flow opinion");
    assert_eq!(asset.history.len(), 30);
    assert_eq!(asset.signal.points, 3);
    assert_eq!(asset.signal.band_counts.medium, 3);
}

#[test]
fn hourly_periods_relabel_rates_and_horizons() {
    let mut config = identity_units();
    config.projection.period_hours = 1.0;
    let samples = vec![
        sample(0, 10.0, RiskBand::Medium, 0.5),
        sample(1, 15.0, RiskBand::Medium, 0.5),
        sample(2, 20.0, RiskBand::Medium, 0.5),
    ];
    let asset = assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &samples), &config)
        .expect("non-empty batch");

    assert_eq!(asset.service.rate_of_change, 0.208, "10 psi over 48 hourly periods");
    assert_eq!(asset.predictions.periods_until_critical, 48);
    assert_eq!(asset.predictions.time_remaining, "48 hours");
    assert_eq!(asset.trends.rate_of_change.suffix.as_deref(), Some("psi/hour"));
}

#[test]
fn out_of_order_samples_are_sorted_before_derivation() {
    let config = identity_units();
    let ordered = vec![
        sample(0, 10.0, RiskBand::Medium, 0.5),
        sample(1, 15.0, RiskBand::Medium, 0.5),
        sample(2, 20.0, RiskBand::Medium, 0.5),
    ];
    let shuffled = vec![ordered[2].clone(), ordered[0].clone(), ordered[1].clone()];

    let a = assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &ordered), &config);
    let b = assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &shuffled), &config);
    assert_eq!(a, b);
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn single_sample_has_no_flow_trend() {
    let config = EngineConfig::default();
    let samples = vec![sample(0, 1000.0, RiskBand::High, 0.7)];
    let asset = assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &samples), &config)
        .expect("one sample is enough");

    assert!(asset.trends.flow.is_none(), "no history, no flow trend");
    assert!(asset.current.efficiency < 85.0);
    assert_eq!(asset.trends.efficiency.label, "Down - Declining");
    assert_eq!(asset.service.rate_of_change, 0.0);
    assert_eq!(
        asset.predictions.fouling_rate, config.projection.fallback_rate,
        "flat signal falls back to the conservative rate"
    );
    assert!(asset.predictions.periods_until_critical >= 1);
    assert_eq!(asset.history.len(), 30, "padded to the full window");
    assert_eq!(asset.causality.five_whys.len(), 5);
}

#[test]
fn empty_batch_yields_no_asset() {
    let config = EngineConfig::default();
    let batch = parse_batch("[]").expect("empty batch parses");
    assert!(assemble_asset(&AssemblyInput::from_batch(&batch, AssetKind::Strainer), &config).is_none());
}

#[test]
fn missing_pressure_uses_default_reading() {
    let config = EngineConfig::default();
    let mut s = sample(0, 0.0, RiskBand::Low, 0.1);
    s.dp_excess_mbar = None;
    let asset = assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &[s]), &config)
        .expect("non-empty batch");
    assert!(asset.current.differential_pressure.is_finite());
    assert!(asset.current.differential_pressure > 0.0);
}

#[test]
fn assembly_is_idempotent() {
    let config = EngineConfig::default();
    let samples: Vec<_> = (0..12)
        .map(|n| sample(n, 300.0 + n as f64 * 25.0, RiskBand::Medium, 0.45))
        .collect();
    let input = AssemblyInput::new(AssetKind::Strainer, &samples);
    let first = assemble_asset(&input, &config);
    let second = assemble_asset(&input, &config);
    assert!(first.is_some());
    assert_eq!(first, second, "same batch, same asset");
}

// ============================================================================
// Narrative paths
// ============================================================================

#[test]
fn explanation_drives_narrative_and_mitigation() {
    let config = EngineConfig::default();
    let samples = vec![
        sample(0, 900.0, RiskBand::High, 0.9),
        sample(1, 1100.0, RiskBand::High, 0.9),
    ];
    let explanation = Explanation {
        reasons: vec!["**Sediment** spike from tank T-12".to_string()],
        actions: vec!["Switch to standby strainer".to_string()],
    };
    let input = AssemblyInput::new(AssetKind::Strainer, &samples).with_explanation(&explanation);
    let asset = assemble_asset(&input, &config).expect("non-empty batch");

    assert!(asset.explained);
    assert_eq!(asset.status, AssetStatus::Alert);
    assert_eq!(asset.alert_message, "Live feed indicates DP above safe band");
    assert_eq!(
        asset.causality.five_whys[0].explanation,
        "Sediment spike from tank T-12"
    );
    assert_eq!(
        asset.risk.mitigation_actions,
        vec!["Switch to standby strainer".to_string()]
    );
    assert!(asset.root_cause.contains("- Switch to standby strainer"));
}

#[test]
fn empty_explanation_falls_back_to_templates() {
    let config = EngineConfig::default();
    let samples = vec![sample(0, 100.0, RiskBand::Low, 0.05)];
    let explanation = Explanation::default();
    let input = AssemblyInput::new(AssetKind::Strainer, &samples).with_explanation(&explanation);
    let asset = assemble_asset(&input, &config).expect("non-empty batch");

    assert!(!asset.explained);
    assert_eq!(asset.alert_message, "Status: Normal Operation");
    assert_eq!(asset.risk.mitigation_actions[0], "Continue routine monitoring");
}

#[test]
fn compressor_speaks_its_own_vocabulary() {
    let config = identity_units();
    let samples = vec![
        sample(0, 20.0, RiskBand::High, 0.9),
        sample(1, 24.0, RiskBand::High, 0.9),
        sample(2, 28.0, RiskBand::High, 0.9),
    ];
    let asset = assemble_asset(&AssemblyInput::new(AssetKind::Compressor, &samples), &config)
        .expect("non-empty batch");

    assert_eq!(asset.id, "COMP-REAL");
    assert_eq!(asset.kind, AssetKind::Compressor);
    assert_eq!(asset.location.unit, "Residue Compression");
    assert_eq!(asset.predictions.tier, ActionTier::Emergency);
    assert_eq!(asset.predictions.recommendation, "Schedule emergency service");
    assert!(
        !asset.root_cause.to_lowercase().contains("strainer"),
        "compressor narrative leaked strainer wording: {}",
        asset.root_cause
    );
}

// ============================================================================
// Metadata and fleets
// ============================================================================

#[test]
fn meta_sets_identity_and_service_age() {
    let config = EngineConfig::default();
    let samples = vec![sample(0, 500.0, RiskBand::Medium, 0.5)];
    let meta = AssetMeta {
        id: Some("STR-204".to_string()),
        last_clean_date: Some(day(-9)),
        location: None,
    };
    let input = AssemblyInput::new(AssetKind::Strainer, &samples).with_meta(&meta);
    let asset = assemble_asset(&input, &config).expect("non-empty batch");

    assert_eq!(asset.id, "STR-204");
    assert_eq!(asset.service.days_since_service, 9.0);
    assert_eq!(
        asset.service.next_service_due,
        (day(-9) + Duration::days(35)).date_naive()
    );
    assert_eq!(asset.maintenance_log[0].date, day(-9).date_naive());
}

#[test]
fn fleet_assembly_keeps_order_and_drops_empty_batches() {
    let config = EngineConfig::default();
    let a = vec![sample(0, 500.0, RiskBand::Medium, 0.5)];
    let b: Vec<TelemetrySample> = Vec::new();
    let c = vec![sample(0, 200.0, RiskBand::Low, 0.1)];
    let meta_a = AssetMeta {
        id: Some("A".to_string()),
        ..AssetMeta::default()
    };
    let meta_c = AssetMeta {
        id: Some("C".to_string()),
        ..AssetMeta::default()
    };

    let inputs = vec![
        AssemblyInput::new(AssetKind::Strainer, &a).with_meta(&meta_a),
        AssemblyInput::new(AssetKind::Strainer, &b),
        AssemblyInput::new(AssetKind::Strainer, &c).with_meta(&meta_c),
    ];
    let fleet = assemble_fleet(&inputs, &config);
    let ids: Vec<&str> = fleet.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "C"]);
}

#[test]
fn parsed_envelope_assembles_end_to_end() {
    let json = r#"{
        "kpis": [
            {"ts": "2025-04-01T00:00:00Z", "dp_excess_mbar": 600, "prob_breach7d": 0.3, "risk_band": "medium"},
            {"ts": "2025-04-02T00:00:00Z", "dp_excess_mbar": "650", "prob_breach7d": 0.35, "risk_band": "medium", "id": "STR-310"}
        ],
        "meta": {"last_clean_date": "2025-03-20"}
    }"#;
    let batch = parse_batch(json).expect("valid envelope");
    let asset = assemble_asset(
        &AssemblyInput::from_batch(&batch, AssetKind::Strainer),
        &EngineConfig::default(),
    )
    .expect("non-empty batch");

    assert_eq!(asset.id, "STR-310");
    assert_eq!(asset.service.days_since_service, 13.0);
    assert_eq!(asset.risk.probability, RiskLevel::Low);
    assert!(asset.service.rate_of_change > 0.0);
}
