//! Failure Projection
//!
//! Linear extrapolation of the pressure rise to the critical threshold. The
//! rate is always floored before it is divided by, so a flat or falling signal
//! projects a long but finite horizon rather than infinity.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::config::defaults::HOURS_PER_WEEK;
use crate::config::ProjectionConfig;
use crate::narrative::AssetVocabulary;
use crate::types::{ActionTier, Predictions};
use crate::units::round_to;

/// Raw pressure rate of change per period, unfloored.
///
/// `points` are (timestamp, display pressure) pairs, oldest first. The rate
/// runs from the point `reference_lookback` samples before the newest (or the
/// oldest, if there are fewer) to the newest, over at least one period. Fewer
/// than two points give 0.
pub fn estimate_rate(points: &[(DateTime<Utc>, f64)], cfg: &ProjectionConfig) -> f64 {
    let Some(&(newest_ts, newest_p)) = points.last() else {
        return 0.0;
    };
    let ref_idx = points
        .len()
        .saturating_sub(1)
        .saturating_sub(cfg.reference_lookback);
    let (ref_ts, ref_p) = points[ref_idx];

    let span_hours = (newest_ts - ref_ts).num_seconds() as f64 / 3600.0;
    let window = (span_hours / cfg.period_hours).round().max(1.0);
    let rate = (newest_p - ref_p) / window;
    if rate.is_finite() {
        round_to(rate, 3)
    } else {
        0.0
    }
}

/// Rate used for projection: the raw rate if it clears `min_rate`, else the
/// conservative `fallback_rate`.
pub fn effective_rate(raw: f64, cfg: &ProjectionConfig) -> f64 {
    if raw.is_finite() && raw > cfg.min_rate {
        raw
    } else {
        cfg.fallback_rate
    }
}

/// Whole periods until `current` reaches the critical pressure. Always >= 1.
pub fn periods_until_critical(current: f64, rate: f64, cfg: &ProjectionConfig) -> u32 {
    let rate = effective_rate(rate, cfg);
    let periods = ((cfg.critical_pressure - current) / rate).round();
    if !periods.is_finite() || periods < 1.0 {
        return 1;
    }
    periods.min(f64::from(u32::MAX)) as u32
}

/// Response tier for a time-to-critical. Lower bounds are exclusive.
pub fn recommend(periods: u32, cfg: &ProjectionConfig) -> ActionTier {
    if periods < cfg.emergency_below_periods {
        ActionTier::Emergency
    } else if periods < cfg.advance_below_periods {
        ActionTier::AdvanceSchedule
    } else {
        ActionTier::ContinueMonitoring
    }
}

/// Tier wording for an asset kind.
pub fn recommendation_text(tier: ActionTier, vocab: &AssetVocabulary) -> String {
    match tier {
        ActionTier::Emergency => format!("Schedule emergency {}", vocab.service_verb),
        ActionTier::AdvanceSchedule => format!("Advance {} window", vocab.service_noun),
        ActionTier::ContinueMonitoring => "Continue monitoring".to_string(),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{count} {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

/// Human time-remaining label for a number of periods.
///
/// Weeks from `weeks_from_periods` up (once that spans at least a week),
/// whole periods from one period up, hours below that. Every unit has a
/// minimum of 1. Non-finite input renders `-`.
pub fn humanize(periods: f64, cfg: &ProjectionConfig) -> String {
    if !periods.is_finite() {
        return "-".to_string();
    }
    let hours = periods * cfg.period_hours;
    if periods >= cfg.weeks_from_periods && hours >= HOURS_PER_WEEK {
        let weeks = (hours / HOURS_PER_WEEK).round().max(1.0) as i64;
        return plural(weeks, "week");
    }
    if periods >= 1.0 {
        return plural(periods.round().max(1.0) as i64, cfg.period_unit());
    }
    plural(hours.round().max(1.0) as i64, "hour")
}

/// Date `periods` periods after `reference`.
pub fn date_after(reference: DateTime<Utc>, periods: f64, cfg: &ProjectionConfig) -> NaiveDate {
    let minutes = (periods * cfg.period_hours * 60.0).round();
    let offset = Duration::try_minutes(minutes as i64).unwrap_or_else(Duration::zero);
    reference
        .checked_add_signed(offset)
        .unwrap_or(reference)
        .date_naive()
}

/// Full projection from a raw rate and the current pressure.
pub fn project(
    raw_rate: f64,
    current_pressure: f64,
    reference: DateTime<Utc>,
    cfg: &ProjectionConfig,
    vocab: &AssetVocabulary,
) -> Predictions {
    let rate = effective_rate(raw_rate, cfg);
    let periods = periods_until_critical(current_pressure, rate, cfg);
    let time_remaining = humanize(f64::from(periods), cfg);
    let tier = recommend(periods, cfg);

    Predictions {
        fouling_rate: round_to(rate, 2),
        periods_until_critical: periods,
        projected_breach_date: date_after(reference, f64::from(periods), cfg),
        timeline_label: format!("Breach in {time_remaining}"),
        time_remaining,
        tier,
        recommendation: recommendation_text(tier, vocab),
    }
}
