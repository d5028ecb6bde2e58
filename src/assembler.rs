//! Asset Assembler
//!
//! The composition root: turns one telemetry batch into one [`Asset`]. Every
//! field is recomputed from the batch and the config on each call; nothing is
//! carried over between calls, so assembling the same batch twice yields equal
//! records.
//!
//! The newest sample's timestamp is the reference time for every date derived
//! here (days since service, projected breach, lifecycle), which keeps the
//! output independent of the wall clock.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rayon::prelude::*;
use tracing::debug;

use crate::config::{AssemblyConfig, EngineConfig};
use crate::ingest::TelemetryBatch;
use crate::narrative::{self, NarrativeContext};
use crate::types::{
    Asset, AssetKind, AssetMeta, AssetStatus, CurrentMetrics, DebrisShare, DebrisType,
    Explanation, HistoryPoint, LifecycleDates, MaintenanceEvent, ServiceContext, TelemetrySample,
};
use crate::units::{clamp, round_to, to_display_pressure};
use crate::{projection, risk, signal, trends};

const DEBRIS_ROTATION: [DebrisType; 3] = [
    DebrisType::SandSilt,
    DebrisType::CorrosionProducts,
    DebrisType::Scale,
];

static NO_META: AssetMeta = AssetMeta {
    id: None,
    last_clean_date: None,
    location: None,
};

/// Everything one assembly reads. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyInput<'a> {
    pub kind: AssetKind,
    pub samples: &'a [TelemetrySample],
    pub explanation: Option<&'a Explanation>,
    pub meta: &'a AssetMeta,
}

impl<'a> AssemblyInput<'a> {
    /// Samples only: no explanation, no metadata.
    pub fn new(kind: AssetKind, samples: &'a [TelemetrySample]) -> Self {
        Self {
            kind,
            samples,
            explanation: None,
            meta: &NO_META,
        }
    }

    pub fn from_batch(batch: &'a TelemetryBatch, kind: AssetKind) -> Self {
        Self {
            kind,
            samples: &batch.samples,
            explanation: batch.explanation.as_ref(),
            meta: &batch.meta,
        }
    }

    pub fn with_explanation(mut self, explanation: &'a Explanation) -> Self {
        self.explanation = Some(explanation);
        self
    }

    pub fn with_meta(mut self, meta: &'a AssetMeta) -> Self {
        self.meta = meta;
        self
    }
}

fn shift(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|d| date.checked_add_signed(d))
        .unwrap_or(date)
}

fn current_metrics(pressure: f64, a: &AssemblyConfig) -> CurrentMetrics {
    let design = a.design_flow;
    let flow = clamp(
        design - pressure * a.current_flow_slope,
        design * a.min_flow_fraction,
        design * a.max_flow_fraction,
    );
    CurrentMetrics {
        differential_pressure: round_to(pressure, 2),
        flow_rate: round_to(flow, 0),
        efficiency: round_to(efficiency_of(flow, a), 1),
        design_flow_rate: design,
    }
}

fn efficiency_of(flow: f64, a: &AssemblyConfig) -> f64 {
    let percent = if a.design_flow > 0.0 {
        flow / a.design_flow * 100.0
    } else {
        a.min_efficiency_percent
    };
    clamp(percent, a.min_efficiency_percent, a.max_efficiency_percent)
}

fn service_context(
    points: &[(DateTime<Utc>, f64)],
    raw_rate: f64,
    last_service: Option<DateTime<Utc>>,
    reference: DateTime<Utc>,
    a: &AssemblyConfig,
) -> ServiceContext {
    let (days_since_service, next_service_due) = match last_service {
        Some(last) => {
            let days = (reference - last).num_seconds() as f64 / 86_400.0;
            (
                days.round().max(1.0),
                shift(last.date_naive(), a.service_interval_days),
            )
        }
        // No record: assume the default age and the same lead time to the next
        None => (
            a.default_days_since_service,
            shift(
                reference.date_naive(),
                a.default_days_since_service.round() as i64,
            ),
        ),
    };

    let first = points.first().map_or(a.min_baseline_pressure, |p| p.1);
    ServiceContext {
        days_since_service,
        next_service_due,
        baseline_pressure: round_to(first.max(a.min_baseline_pressure), 2),
        rate_of_change: raw_rate,
    }
}

fn history_point(date: NaiveDate, pressure: f64, a: &AssemblyConfig) -> HistoryPoint {
    let design = a.design_flow;
    let flow = clamp(
        design - pressure * a.history_flow_slope,
        design * a.min_flow_fraction,
        design,
    );
    HistoryPoint {
        date,
        pressure: round_to(pressure, 2),
        flow_rate: round_to(flow, 0),
        efficiency: round_to(efficiency_of(flow, a), 1),
    }
}

/// One history point per sample, oldest first.
fn observed_history(points: &[(DateTime<Utc>, f64)], a: &AssemblyConfig) -> Vec<HistoryPoint> {
    points
        .iter()
        .map(|&(ts, p)| history_point(ts.date_naive(), p, a))
        .collect()
}

/// Pad at the front, one period back at a time, to `history_len`; keep only the
/// newest `history_len` points when there are more.
fn fixed_history(observed: &[HistoryPoint], a: &AssemblyConfig) -> Vec<HistoryPoint> {
    let len = a.history_len;
    if observed.len() >= len {
        return observed[observed.len() - len..].to_vec();
    }

    let mut padding = Vec::with_capacity(len - observed.len());
    let mut oldest = observed.first().cloned();
    while padding.len() + observed.len() < len {
        let Some(first) = oldest.as_ref() else {
            break;
        };
        let pressure = clamp(
            first.pressure - a.padding_step,
            a.padding_min_pressure,
            a.padding_max_pressure,
        );
        let point = history_point(shift(first.date, -1), pressure, a);
        padding.push(point.clone());
        oldest = Some(point);
    }
    padding.reverse();
    padding.extend_from_slice(observed);
    padding
}

fn maintenance_log(
    pressure: f64,
    days_since_service: f64,
    reference: DateTime<Utc>,
    a: &AssemblyConfig,
) -> Vec<MaintenanceEvent> {
    let today = reference.date_naive();
    (0..a.maintenance_events)
        .map(|idx| {
            let step = idx as f64;
            let days_ago = days_since_service.round() as i64 + idx as i64 * a.maintenance_spacing_days;
            MaintenanceEvent {
                date: shift(today, -days_ago),
                pressure_before: round_to(
                    (pressure - step * a.maintenance_before_step).max(a.maintenance_before_floor),
                    1,
                ),
                pressure_after: round_to(
                    (pressure - a.maintenance_after_drop - step * a.maintenance_after_step)
                        .max(a.maintenance_after_floor),
                    1,
                ),
                downtime_hours: round_to(a.downtime_base_hours + step * a.downtime_step_hours, 1),
                debris: DEBRIS_ROTATION[idx % DEBRIS_ROTATION.len()],
            }
        })
        .collect()
}

/// Share of each debris category over the log, in first-seen order.
fn debris_mix(log: &[MaintenanceEvent]) -> Vec<DebrisShare> {
    let mut counts: Vec<(DebrisType, usize)> = Vec::new();
    for event in log {
        match counts.iter_mut().find(|(d, _)| *d == event.debris) {
            Some((_, n)) => *n += 1,
            None => counts.push((event.debris, 1)),
        }
    }
    let total = log.len().max(1) as f64;
    counts
        .into_iter()
        .map(|(debris, n)| DebrisShare {
            debris,
            percent: round_to(n as f64 / total * 100.0, 1),
        })
        .collect()
}

fn lifecycle(reference: DateTime<Utc>, a: &AssemblyConfig) -> LifecycleDates {
    let today = reference.date_naive();
    LifecycleDates {
        installed: shift(today, -a.install_age_days),
        last_overhaul: shift(today, -a.overhaul_age_days),
        end_of_life: shift(today, a.remaining_life_days),
    }
}

/// Assemble one asset. `None` for an empty batch.
pub fn assemble_asset(input: &AssemblyInput<'_>, cfg: &EngineConfig) -> Option<Asset> {
    let mut samples = input.samples.to_vec();
    samples.sort_by_key(|s| s.ts);
    let latest = samples.last()?;

    let vocab = input.kind.vocabulary();
    let a = &cfg.assembly;
    let reference = latest.ts;

    let points: Vec<(DateTime<Utc>, f64)> = samples
        .iter()
        .map(|s| (s.ts, to_display_pressure(s.dp_excess_mbar, &cfg.units)))
        .collect();
    let pressure = to_display_pressure(latest.dp_excess_mbar, &cfg.units);
    let raw_rate = projection::estimate_rate(&points, &cfg.projection);

    let current = current_metrics(pressure, a);
    let service = service_context(&points, raw_rate, input.meta.last_clean_date, reference, a);
    let observed = observed_history(&points, a);
    let period = cfg.projection.period_unit();
    let trend_bundle =
        trends::derive_trends(&current, &service, &observed, &cfg.trends, vocab, period);
    let predictions = projection::project(
        raw_rate,
        current.differential_pressure,
        reference,
        &cfg.projection,
        vocab,
    );

    let status = AssetStatus::from(latest.risk_band);
    let risk = risk::analyze(
        latest.breach_probability(cfg.risk.default_probability),
        latest.risk_band,
        current.differential_pressure,
        input.explanation,
        &cfg.risk,
        vocab,
    );

    let maintenance_log = maintenance_log(pressure, service.days_since_service, reference, a);
    let id = input.meta.id.clone().unwrap_or_else(|| vocab.default_id());

    let ctx = NarrativeContext {
        id: &id,
        vocab,
        status,
        regime: latest.regime,
        pressure: current.differential_pressure,
        flow_rate: current.flow_rate,
        design_flow: current.design_flow_rate,
        efficiency: current.efficiency,
        days_since_service: service.days_since_service,
        days_to_next_service: (service.next_service_due - reference.date_naive()).num_days(),
        next_service_due: service.next_service_due,
        rate: service.rate_of_change,
        period,
        periods_until_critical: predictions.periods_until_critical,
        projected_breach_date: predictions.projected_breach_date,
        primary_debris: maintenance_log
            .first()
            .map_or(DEBRIS_ROTATION[0], |e| e.debris),
    };
    let narrative = narrative::compose(&ctx, input.explanation, &cfg.narrative);

    let signal = signal::summarize_signal(&samples, &cfg.tuning, cfg.risk.default_probability)?;

    debug!(
        asset = %id,
        status = %status,
        periods_until_critical = predictions.periods_until_critical,
        explained = narrative.explained,
        "Assembled asset"
    );

    Some(Asset {
        kind: input.kind,
        location: input
            .meta
            .location
            .clone()
            .unwrap_or_else(|| vocab.default_location()),
        status,
        severity: status.severity(),
        explained: narrative.explained,
        history: fixed_history(&observed, a),
        debris_mix: debris_mix(&maintenance_log),
        lifecycle: lifecycle(reference, a),
        alert_message: narrative.alert_message,
        root_cause: narrative.root_cause,
        causality: narrative.causality,
        id,
        current,
        service,
        trends: trend_bundle,
        maintenance_log,
        risk,
        predictions,
        signal,
    })
}

/// Assemble many independent batches in parallel. Empty batches are dropped;
/// output order follows input order.
pub fn assemble_fleet(inputs: &[AssemblyInput<'_>], cfg: &EngineConfig) -> Vec<Asset> {
    inputs
        .par_iter()
        .filter_map(|input| assemble_asset(input, cfg))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn test_current_metrics_clamps_flow() {
        let a = AssemblyConfig::default();
        let m = current_metrics(20.0, &a);
        assert_eq!(m.flow_rate, 720.0);
        assert_eq!(m.efficiency, 73.5);

        let m = current_metrics(0.0, &a);
        assert_eq!(m.flow_rate, 960.0, "capped at 98% of design");
        assert_eq!(m.efficiency, 98.0);

        let m = current_metrics(60.0, &a);
        assert_eq!(m.flow_rate, 392.0, "floored at 40% of design");
        assert_eq!(m.efficiency, 40.0);
    }

    #[test]
    fn test_fixed_history_pads_backwards() {
        let a = AssemblyConfig::default();
        let observed = observed_history(&[(at(0), 20.0), (at(1), 21.0)], &a);
        let history = fixed_history(&observed, &a);
        assert_eq!(history.len(), 30);
        assert_eq!(history[28], observed[0]);
        assert_eq!(history[29], observed[1]);
        assert_eq!(history[27].pressure, 19.75);
        assert_eq!(history[27].date, at(-1).date_naive());
        assert_eq!(history[0].date, at(-28).date_naive());
        // Padding pressure never drops below the floor
        assert!(history.iter().all(|p| p.pressure >= 10.0));
    }

    #[test]
    fn test_fixed_history_truncates_to_newest() {
        let a = AssemblyConfig::default();
        let points: Vec<_> = (0..40).map(|d| (at(d), 15.0)).collect();
        let history = fixed_history(&observed_history(&points, &a), &a);
        assert_eq!(history.len(), 30);
        assert_eq!(history[29].date, at(39).date_naive());
        assert_eq!(history[0].date, at(10).date_naive());
    }

    #[test]
    fn test_service_context_with_and_without_record() {
        let a = AssemblyConfig::default();
        let points = vec![(at(0), 8.0), (at(1), 9.0)];
        let s = service_context(&points, 1.0, Some(at(-10)), at(1), &a);
        assert_eq!(s.days_since_service, 11.0);
        assert_eq!(s.next_service_due, at(25).date_naive());
        assert_eq!(s.baseline_pressure, 10.0, "baseline floored");

        let s = service_context(&points, 1.0, None, at(1), &a);
        assert_eq!(s.days_since_service, 14.0);
        assert_eq!(s.next_service_due, at(15).date_naive());
    }

    #[test]
    fn test_maintenance_log_and_debris_mix() {
        let a = AssemblyConfig::default();
        let log = maintenance_log(20.0, 14.0, at(0), &a);
        assert_eq!(log.len(), 3);
        assert_eq!(log[0].date, at(-14).date_naive());
        assert_eq!(log[1].date, at(-46).date_naive());
        assert_eq!(log[1].pressure_before, 19.4);
        assert_eq!(log[2].pressure_after, 13.4);
        assert_eq!(log[2].downtime_hours, 3.4);
        assert_eq!(log[2].debris, DebrisType::Scale);

        let mix = debris_mix(&log);
        assert_eq!(mix.len(), 3);
        assert!(mix.iter().all(|d| d.percent == 33.3));
    }

    #[test]
    fn test_maintenance_log_follows_config() {
        let a = AssemblyConfig {
            maintenance_before_floor: 19.5,
            maintenance_after_drop: 2.0,
            downtime_base_hours: 4.0,
            ..AssemblyConfig::default()
        };
        let log = maintenance_log(20.0, 14.0, at(0), &a);
        assert_eq!(log[0].pressure_after, 18.0);
        assert_eq!(log[1].pressure_before, 19.5, "floor wins over the stepped reading");
        assert_eq!(log[0].downtime_hours, 4.0);
        assert_eq!(log[2].downtime_hours, 4.8);
    }

    #[test]
    fn test_empty_batch_is_no_asset() {
        let cfg = EngineConfig::default();
        assert!(assemble_asset(&AssemblyInput::new(AssetKind::Strainer, &[]), &cfg).is_none());
    }
}
