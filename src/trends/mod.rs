//! Trend Derivation Engine
//!
//! Renders each tracked metric's change into a [`TrendDescriptor`]. Every
//! metric has its own function taking only what it needs, so any one of them
//! can be recomputed alone and the bundle is independent of evaluation order.
//!
//! Dead-bands (`TrendConfig` epsilons) snap small changes to exactly zero, so
//! noise around a baseline never flips a direction indicator.

pub mod tone;

use crate::config::TrendConfig;
use crate::narrative::AssetVocabulary;
use crate::types::{CurrentMetrics, HistoryPoint, ServiceContext, TrendBundle, TrendDescriptor};
use crate::units::round_to;

pub use tone::{evaluate, TrendDirection, TrendState, TrendTone};

const ON_BASELINE: &str = "On baseline";
const STABLE: &str = "Stable";
const ON_SCHEDULE: &str = "On schedule";

fn up_down(delta: f64) -> &'static str {
    if delta > 0.0 {
        "Up"
    } else {
        "Down"
    }
}

/// Current pressure against the asset's baseline. An increase is never good.
pub fn pressure_trend(
    current: f64,
    baseline: f64,
    cfg: &TrendConfig,
    vocab: &AssetVocabulary,
) -> TrendDescriptor {
    let raw = current - baseline;
    let delta = if raw.abs() < cfg.pressure_epsilon || !raw.is_finite() {
        0.0
    } else {
        round_to(raw, 2)
    };
    let label = if delta == 0.0 {
        ON_BASELINE.to_string()
    } else {
        format!(
            "{} {:.2} {} vs baseline",
            up_down(delta),
            raw.abs(),
            vocab.pressure_unit
        )
    };
    TrendDescriptor {
        delta,
        increase_is_positive: false,
        label,
        precision: Some(2),
        suffix: Some(vocab.pressure_unit.to_string()),
        no_change_label: ON_BASELINE.to_string(),
    }
}

/// Current flow against the previous history point.
///
/// `None` without a previous point: there is no opinion to give.
pub fn flow_trend(
    current: f64,
    previous: Option<&HistoryPoint>,
    cfg: &TrendConfig,
    vocab: &AssetVocabulary,
) -> Option<TrendDescriptor> {
    let previous = previous?;
    let prev = if previous.flow_rate.is_finite() {
        previous.flow_rate
    } else {
        current
    };
    let diff = current - prev;
    if diff.abs() < cfg.flow_epsilon || !diff.is_finite() {
        return Some(TrendDescriptor::unchanged(true, STABLE));
    }
    Some(TrendDescriptor {
        delta: diff,
        increase_is_positive: true,
        label: format!("{} {:.0} {}", up_down(diff), diff.abs(), vocab.flow_unit),
        precision: Some(0),
        suffix: Some(vocab.flow_unit.to_string()),
        no_change_label: STABLE.to_string(),
    })
}

/// Current efficiency against the previous history point.
///
/// Without history this still answers: an efficiency under the configured
/// floor is reported as declining.
pub fn efficiency_trend(
    current: f64,
    previous: Option<&HistoryPoint>,
    cfg: &TrendConfig,
) -> TrendDescriptor {
    let Some(previous) = previous else {
        if current < cfg.efficiency_floor_percent {
            return TrendDescriptor {
                delta: -1.0,
                increase_is_positive: true,
                label: "Down - Declining".to_string(),
                precision: None,
                suffix: None,
                no_change_label: STABLE.to_string(),
            };
        }
        return TrendDescriptor::unchanged(true, STABLE);
    };

    let prev = if previous.efficiency.is_finite() {
        previous.efficiency
    } else {
        current
    };
    let diff = current - prev;
    if diff.abs() < cfg.efficiency_epsilon || !diff.is_finite() {
        return TrendDescriptor::unchanged(true, STABLE);
    }
    TrendDescriptor {
        delta: diff,
        increase_is_positive: true,
        label: if diff > 0.0 {
            "Up - Improving".to_string()
        } else {
            "Down - Declining".to_string()
        },
        precision: Some(1),
        suffix: Some("%".to_string()),
        no_change_label: STABLE.to_string(),
    }
}

/// Days since last service against the target interval. Overdue is never good.
pub fn service_age_trend(days_since_service: f64, cfg: &TrendConfig) -> TrendDescriptor {
    let raw = days_since_service - cfg.service_target_days;
    let delta = if raw.abs() < cfg.service_epsilon_days || !raw.is_finite() {
        0.0
    } else {
        raw
    };
    let label = if delta == 0.0 {
        ON_SCHEDULE.to_string()
    } else if delta > 0.0 {
        format!("{:.0} days overdue", raw.abs())
    } else {
        format!("{:.0} days ahead", raw.abs())
    };
    TrendDescriptor {
        delta,
        increase_is_positive: false,
        label,
        precision: Some(0),
        suffix: Some("days".to_string()),
        no_change_label: ON_SCHEDULE.to_string(),
    }
}

/// Pressure rate of change against the baseline rate. Faster is never good.
///
/// `period` labels the rate's time unit, e.g. "day".
pub fn rate_trend(
    rate: f64,
    cfg: &TrendConfig,
    vocab: &AssetVocabulary,
    period: &str,
) -> TrendDescriptor {
    let raw = rate - cfg.baseline_rate;
    let delta = if raw.abs() < cfg.rate_epsilon || !raw.is_finite() {
        0.0
    } else {
        round_to(raw, 2)
    };
    let unit = vocab.rate_unit(period);
    let label = if delta == 0.0 {
        ON_BASELINE.to_string()
    } else {
        format!("{} {:.2} {} vs baseline", up_down(delta), raw.abs(), unit)
    };
    TrendDescriptor {
        delta,
        increase_is_positive: false,
        label,
        precision: Some(2),
        suffix: Some(unit),
        no_change_label: ON_BASELINE.to_string(),
    }
}

/// All five descriptors for one asset.
///
/// `observed` is the history built from real samples only, oldest first; the
/// previous point is the second newest entry. `period` labels the rate unit.
pub fn derive_trends(
    current: &CurrentMetrics,
    service: &ServiceContext,
    observed: &[HistoryPoint],
    cfg: &TrendConfig,
    vocab: &AssetVocabulary,
    period: &str,
) -> TrendBundle {
    let previous = observed.len().checked_sub(2).and_then(|i| observed.get(i));

    TrendBundle {
        pressure: pressure_trend(
            current.differential_pressure,
            service.baseline_pressure,
            cfg,
            vocab,
        ),
        flow: flow_trend(current.flow_rate, previous, cfg, vocab),
        efficiency: efficiency_trend(current.efficiency, previous, cfg),
        service_age: service_age_trend(service.days_since_service, cfg),
        rate_of_change: rate_trend(service.rate_of_change, cfg, vocab, period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::vocabulary::{COMPRESSOR, STRAINER};
    use chrono::NaiveDate;

    fn point(flow: f64, eff: f64) -> HistoryPoint {
        HistoryPoint {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            pressure: 15.0,
            flow_rate: flow,
            efficiency: eff,
        }
    }

    #[test]
    fn test_pressure_dead_band_snaps_to_zero() {
        let cfg = TrendConfig::default();
        let t = pressure_trend(10.02, 10.0, &cfg, &STRAINER);
        assert_eq!(t.delta, 0.0, "0.02 psi is inside the dead-band");
        assert_eq!(t.label, "On baseline");
        assert!(!t.increase_is_positive);
        assert_eq!(t.precision, Some(2));
    }

    #[test]
    fn test_pressure_above_baseline() {
        let cfg = TrendConfig::default();
        let t = pressure_trend(12.5, 10.0, &cfg, &STRAINER);
        assert_eq!(t.delta, 2.5);
        assert_eq!(t.label, "Up 2.50 psi vs baseline");

        let t = pressure_trend(9.0, 10.0, &cfg, &STRAINER);
        assert_eq!(t.delta, -1.0);
        assert_eq!(t.label, "Down 1.00 psi vs baseline");
    }

    #[test]
    fn test_flow_needs_previous_point() {
        let cfg = TrendConfig::default();
        assert!(flow_trend(900.0, None, &cfg, &STRAINER).is_none());
    }

    #[test]
    fn test_flow_stable_and_moving() {
        let cfg = TrendConfig::default();
        let prev = point(900.0, 90.0);
        let t = flow_trend(900.3, Some(&prev), &cfg, &STRAINER).expect("has previous");
        assert_eq!(t.delta, 0.0);
        assert_eq!(t.label, "Stable");
        assert_eq!(t.precision, None);

        let t = flow_trend(880.0, Some(&prev), &cfg, &COMPRESSOR).expect("has previous");
        assert_eq!(t.delta, -20.0);
        assert_eq!(t.label, "Down 20 MMSCFD");
        assert!(t.increase_is_positive);
    }

    #[test]
    fn test_efficiency_without_history_is_conservative() {
        let cfg = TrendConfig::default();
        let low = efficiency_trend(80.0, None, &cfg);
        assert_eq!(low.delta, -1.0);
        assert_eq!(low.label, "Down - Declining");
        assert_eq!(low.no_change_label, "Stable");

        let healthy = efficiency_trend(92.0, None, &cfg);
        assert_eq!(healthy.delta, 0.0);
        assert_eq!(healthy.label, "Stable");
    }

    #[test]
    fn test_efficiency_with_history() {
        let cfg = TrendConfig::default();
        let prev = point(900.0, 90.0);
        assert_eq!(efficiency_trend(90.05, Some(&prev), &cfg).label, "Stable");
        let up = efficiency_trend(91.0, Some(&prev), &cfg);
        assert_eq!(up.label, "Up - Improving");
        assert_eq!(up.suffix.as_deref(), Some("%"));
        assert_eq!(efficiency_trend(88.0, Some(&prev), &cfg).label, "Down - Declining");
    }

    #[test]
    fn test_service_age_labels() {
        let cfg = TrendConfig::default();
        assert_eq!(service_age_trend(21.3, &cfg).label, "On schedule");
        assert_eq!(service_age_trend(30.0, &cfg).label, "9 days overdue");
        assert_eq!(service_age_trend(14.0, &cfg).label, "7 days ahead");
        assert_eq!(service_age_trend(14.0, &cfg).delta, -7.0);
    }

    #[test]
    fn test_rate_against_baseline() {
        let cfg = TrendConfig::default();
        let t = rate_trend(0.46, &cfg, &STRAINER, "day");
        assert_eq!(t.delta, 0.0);
        assert_eq!(t.label, "On baseline");
        let t = rate_trend(1.45, &cfg, &STRAINER, "day");
        assert_eq!(t.delta, 1.0);
        assert_eq!(t.label, "Up 1.00 psi/day vs baseline");
        assert_eq!(t.suffix.as_deref(), Some("psi/day"));
        let t = rate_trend(1.45, &cfg, &STRAINER, "hour");
        assert_eq!(t.label, "Up 1.00 psi/hour vs baseline");
    }

    #[test]
    fn test_bundle_matches_individual_calls() {
        let cfg = TrendConfig::default();
        let current = CurrentMetrics {
            differential_pressure: 20.0,
            flow_rate: 720.0,
            efficiency: 73.5,
            design_flow_rate: 980.0,
        };
        let service = ServiceContext {
            days_since_service: 14.0,
            next_service_due: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap_or_default(),
            baseline_pressure: 10.0,
            rate_of_change: 5.0,
        };
        let history = vec![point(860.0, 87.8), point(800.0, 81.6), point(740.0, 75.5)];
        let bundle = derive_trends(&current, &service, &history, &cfg, &STRAINER, "day");

        assert_eq!(bundle.pressure, pressure_trend(20.0, 10.0, &cfg, &STRAINER));
        assert_eq!(bundle.flow, flow_trend(720.0, Some(&history[1]), &cfg, &STRAINER));
        assert_eq!(bundle.efficiency, efficiency_trend(73.5, Some(&history[1]), &cfg));
        assert_eq!(bundle.service_age, service_age_trend(14.0, &cfg));
        assert_eq!(bundle.rate_of_change, rate_trend(5.0, &cfg, &STRAINER, "day"));
    }
}
