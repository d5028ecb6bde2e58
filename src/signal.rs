//! Live breach-probability signal against the tuned alert threshold
//!
//! An alert fires when the probability has sat at or above the effective
//! threshold for `persistence_k` consecutive samples and at least
//! `cooldown_hours` have passed since the previous alert. The streak keeps
//! running after an alert, so a sustained breach re-fires once per cooldown.

use chrono::{DateTime, Duration, Utc};

use crate::config::TuningConfig;
use crate::types::{BandCounts, RiskBand, SignalSummary, TelemetrySample};
use crate::units::clamp;

/// Threshold in force for one sample: its own `threshold_eff` when present,
/// else the base threshold scaled by the regime multiplier. Always in [0, 1].
pub fn effective_threshold(sample: &TelemetrySample, tuning: &TuningConfig) -> f64 {
    let threshold = match sample.threshold_eff.filter(|t| t.is_finite()) {
        Some(t) => t,
        None => tuning.base_threshold() * tuning.multiplier(sample.regime),
    };
    clamp(threshold, 0.0, 1.0)
}

/// Count alerts raised over a chronologically sorted batch.
pub fn count_alerts(samples: &[TelemetrySample], tuning: &TuningConfig, fallback: f64) -> usize {
    let k = tuning.persistence_k();
    let cooldown = Duration::hours(i64::from(tuning.cooldown_hours()));
    let mut streak = 0u32;
    let mut last_alert: Option<DateTime<Utc>> = None;
    let mut fired = 0;

    for sample in samples {
        if sample.breach_probability(fallback) >= effective_threshold(sample, tuning) {
            streak = streak.saturating_add(1);
        } else {
            streak = 0;
        }
        let cooled = last_alert.map_or(true, |t| sample.ts - t >= cooldown);
        if streak >= k && cooled {
            fired += 1;
            last_alert = Some(sample.ts);
        }
    }
    fired
}

/// Signal summary over a chronologically sorted batch. `None` when empty.
pub fn summarize_signal(
    samples: &[TelemetrySample],
    tuning: &TuningConfig,
    fallback: f64,
) -> Option<SignalSummary> {
    let latest = samples.last()?;
    let latest_probability = latest.breach_probability(fallback);
    let threshold = effective_threshold(latest, tuning);

    let mut band_counts = BandCounts::default();
    for sample in samples {
        match sample.risk_band {
            RiskBand::Low => band_counts.low += 1,
            RiskBand::Medium => band_counts.medium += 1,
            RiskBand::High => band_counts.high += 1,
        }
    }

    Some(SignalSummary {
        points: samples.len(),
        latest_probability,
        effective_threshold: threshold,
        above_threshold: latest_probability >= threshold,
        band_counts,
        alerts_fired: count_alerts(samples, tuning, fallback),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegimeMultipliers;
    use crate::types::Regime;
    use chrono::TimeZone;

    fn sample(hour: i64, p: f64) -> TelemetrySample {
        let t0 = Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap();
        TelemetrySample {
            prob_breach7d: Some(p),
            ..TelemetrySample::new(t0 + Duration::hours(hour), 400.0)
        }
    }

    fn tuning(k: u32, cooldown: u32) -> TuningConfig {
        TuningConfig {
            base_threshold: 0.5,
            persistence_k: k,
            cooldown_hours: cooldown,
            regime_multipliers: RegimeMultipliers::default(),
        }
    }

    #[test]
    fn test_effective_threshold_prefers_sample_value() {
        let t = tuning(3, 24);
        let mut s = sample(0, 0.4);
        assert_eq!(effective_threshold(&s, &t), 0.5);
        s.threshold_eff = Some(0.3);
        assert_eq!(effective_threshold(&s, &t), 0.3);
        s.threshold_eff = Some(7.0);
        assert_eq!(effective_threshold(&s, &t), 1.0, "clamped to a probability");
    }

    #[test]
    fn test_regime_multiplier_scales_threshold() {
        let mut t = tuning(3, 24);
        t.regime_multipliers.post_startup = 1.5;
        let mut s = sample(0, 0.4);
        s.regime = Regime::PostStartup;
        assert_eq!(effective_threshold(&s, &t), 0.75);
    }

    #[test]
    fn test_alert_requires_persistence() {
        let t = tuning(3, 1);
        let samples = vec![sample(0, 0.9), sample(1, 0.9), sample(2, 0.1), sample(3, 0.9)];
        assert_eq!(count_alerts(&samples, &t, 0.0), 0, "streak broken before k");

        let samples = vec![sample(0, 0.9), sample(1, 0.9), sample(2, 0.9)];
        assert_eq!(count_alerts(&samples, &t, 0.0), 1);
    }

    #[test]
    fn test_cooldown_suppresses_refire() {
        let t = tuning(1, 24);
        let samples: Vec<_> = (0..30).map(|h| sample(h, 0.9)).collect();
        // Fires at hour 0 and again at hour 24
        assert_eq!(count_alerts(&samples, &t, 0.0), 2);
    }

    #[test]
    fn test_summary_counts_bands() {
        let t = tuning(1, 1);
        let mut samples = vec![sample(0, 0.2), sample(1, 0.6)];
        samples[0].risk_band = RiskBand::Low;
        samples[1].risk_band = RiskBand::High;
        let summary = summarize_signal(&samples, &t, 0.52).expect("non-empty batch");
        assert_eq!(summary.points, 2);
        assert_eq!(summary.band_counts.low, 1);
        assert_eq!(summary.band_counts.high, 1);
        assert!(summary.above_threshold);
        assert_eq!(summary.alerts_fired, 1);
        assert!(summarize_signal(&[], &t, 0.52).is_none());
    }
}
