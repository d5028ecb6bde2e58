//! Display state of a trend: tone, direction and the label to show

use serde::{Deserialize, Serialize};

use crate::types::TrendDescriptor;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendTone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendState {
    pub has_trend: bool,
    pub tone: TrendTone,
    pub direction: TrendDirection,
    pub label: String,
}

/// Evaluate how a descriptor should be presented.
///
/// A missing descriptor is neutral and flat with an empty label. A zero delta
/// is neutral. Otherwise the tone is positive when the sign of the change
/// matches the descriptor's polarity.
pub fn evaluate(trend: Option<&TrendDescriptor>) -> TrendState {
    let Some(trend) = trend else {
        return TrendState {
            has_trend: false,
            tone: TrendTone::Neutral,
            direction: TrendDirection::Flat,
            label: String::new(),
        };
    };

    let delta = if trend.delta.is_finite() { trend.delta } else { 0.0 };
    let is_zero = delta == 0.0;

    let (tone, direction) = if is_zero {
        (TrendTone::Neutral, TrendDirection::Flat)
    } else {
        let rising = delta > 0.0;
        let good = rising == trend.increase_is_positive;
        (
            if good { TrendTone::Positive } else { TrendTone::Negative },
            if rising { TrendDirection::Up } else { TrendDirection::Down },
        )
    };

    let label = if !trend.label.trim().is_empty() {
        trend.label.clone()
    } else if is_zero {
        if trend.no_change_label.is_empty() {
            "No change".to_string()
        } else {
            trend.no_change_label.clone()
        }
    } else {
        let value = match trend.precision {
            Some(p) => format!("{:.*}", p, delta.abs()),
            None => delta.abs().to_string(),
        };
        match trend.suffix.as_deref() {
            Some(suffix) if !suffix.is_empty() => format!("{value} {suffix}"),
            _ => value,
        }
    };

    TrendState {
        has_trend: true,
        tone,
        direction,
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(delta: f64, increase_is_positive: bool, label: &str) -> TrendDescriptor {
        TrendDescriptor {
            delta,
            increase_is_positive,
            label: label.to_string(),
            precision: Some(1),
            suffix: Some("psi".to_string()),
            no_change_label: "On baseline".to_string(),
        }
    }

    #[test]
    fn test_missing_trend_is_neutral() {
        let state = evaluate(None);
        assert!(!state.has_trend);
        assert_eq!(state.tone, TrendTone::Neutral);
        assert_eq!(state.direction, TrendDirection::Flat);
        assert!(state.label.is_empty());
    }

    #[test]
    fn test_rising_pressure_is_negative() {
        let state = evaluate(Some(&descriptor(2.0, false, "Up 2.00 psi vs baseline")));
        assert_eq!(state.tone, TrendTone::Negative);
        assert_eq!(state.direction, TrendDirection::Up);
        assert_eq!(state.label, "Up 2.00 psi vs baseline");
    }

    #[test]
    fn test_falling_pressure_is_positive() {
        let state = evaluate(Some(&descriptor(-2.0, false, "")));
        assert_eq!(state.tone, TrendTone::Positive);
        assert_eq!(state.direction, TrendDirection::Down);
        assert_eq!(state.label, "2.0 psi", "label falls back to formatted magnitude");
    }

    #[test]
    fn test_zero_delta_uses_no_change_label() {
        let state = evaluate(Some(&descriptor(0.0, true, " ")));
        assert_eq!(state.tone, TrendTone::Neutral);
        assert_eq!(state.direction, TrendDirection::Flat);
        assert_eq!(state.label, "On baseline");
    }
}
