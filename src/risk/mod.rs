//! Risk Classifier
//!
//! Maps a continuous breach probability and the discrete band/pressure signal
//! onto the five-point scale, and scores a (probability, impact) pair.
//!
//! Impact is a nested decision: the band picks the branch and pressure only
//! refines within it. A high band can never yield less than `High`, whatever
//! the pressure.

use crate::config::{LevelScores, RiskConfig};
use crate::narrative::AssetVocabulary;
use crate::types::{AssetStatus, Explanation, RiskAnalysis, RiskBand, RiskHeat, RiskLevel};
use crate::units::clamp;

/// Five-bucket step function over [0, 1].
///
/// A value exactly on a breakpoint takes the higher bucket. Non-finite input
/// falls through to `VeryLow`.
pub fn probability_level(p: f64, cfg: &RiskConfig) -> RiskLevel {
    if p >= cfg.probability_very_high {
        RiskLevel::VeryHigh
    } else if p >= cfg.probability_high {
        RiskLevel::High
    } else if p >= cfg.probability_medium {
        RiskLevel::Medium
    } else if p >= cfg.probability_low {
        RiskLevel::Low
    } else {
        RiskLevel::VeryLow
    }
}

/// Impact from the risk band, refined by display pressure within the band.
pub fn impact_level(band: RiskBand, pressure: f64, cfg: &RiskConfig) -> RiskLevel {
    match band {
        RiskBand::High => {
            if pressure >= cfg.high_band_very_high {
                RiskLevel::VeryHigh
            } else {
                RiskLevel::High
            }
        }
        RiskBand::Medium => {
            if pressure >= cfg.medium_band_high {
                RiskLevel::High
            } else if pressure >= cfg.medium_band_medium {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            }
        }
        RiskBand::Low => {
            if pressure <= cfg.low_band_very_low {
                RiskLevel::VeryLow
            } else if pressure <= cfg.low_band_low {
                RiskLevel::Low
            } else {
                RiskLevel::Medium
            }
        }
    }
}

fn level_score(level: Option<RiskLevel>, scores: &LevelScores) -> f64 {
    match level {
        Some(RiskLevel::VeryLow) => scores.very_low,
        Some(RiskLevel::Low) => scores.low,
        Some(RiskLevel::Medium) => scores.medium,
        Some(RiskLevel::High) => scores.high,
        Some(RiskLevel::VeryHigh) => scores.very_high,
        None => scores.unknown,
    }
}

fn mean_score(p: Option<RiskLevel>, i: Option<RiskLevel>, scores: &LevelScores) -> u8 {
    let mean = (level_score(p, scores) + level_score(i, scores)) / 2.0;
    clamp(mean.round(), 0.0, 100.0) as u8
}

/// Rounded mean of the two level scores. Symmetric in its arguments.
pub fn risk_score(probability: RiskLevel, impact: RiskLevel, cfg: &RiskConfig) -> u8 {
    mean_score(Some(probability), Some(impact), &cfg.scores)
}

/// Score two free-form level labels; an unrecognised label scores as unknown.
pub fn risk_score_for_labels(probability: &str, impact: &str, cfg: &RiskConfig) -> u8 {
    mean_score(
        RiskLevel::parse(probability),
        RiskLevel::parse(impact),
        &cfg.scores,
    )
}

/// Normalise any case or separator variant of a level name, `Medium` when
/// nothing matches.
pub fn to_title_level(value: &str) -> RiskLevel {
    RiskLevel::parse(value).unwrap_or(RiskLevel::Medium)
}

/// Collapse to three grades: the two extremes merge into their neighbours.
fn three_grade(level: RiskLevel) -> RiskLevel {
    match level {
        RiskLevel::VeryHigh | RiskLevel::High => RiskLevel::High,
        RiskLevel::Medium => RiskLevel::Medium,
        RiskLevel::Low | RiskLevel::VeryLow => RiskLevel::Low,
    }
}

/// Heat grade used to shade an (impact, probability) cell.
pub fn heat(impact: RiskLevel, probability: RiskLevel) -> RiskHeat {
    use RiskLevel::{High, Low, Medium};
    match (three_grade(impact), three_grade(probability)) {
        (High, High) => RiskHeat::Severe,
        (High, Medium) | (Medium, High) => RiskHeat::High,
        (Medium, Medium) | (Low, High) | (High, Low) => RiskHeat::Elevated,
        (Low, Medium) | (Medium, Low) => RiskHeat::Moderate,
        _ => RiskHeat::Low,
    }
}

/// `heat` for free-form labels; unrecognised labels count as `Medium`.
pub fn heat_for_labels(impact: &str, probability: &str) -> RiskHeat {
    heat(to_title_level(impact), to_title_level(probability))
}

/// Fixed mitigation list per status, used when no model actions were supplied.
pub fn mitigation_fallback(status: AssetStatus, vocab: &AssetVocabulary) -> Vec<String> {
    match status {
        AssetStatus::Alert => vec![
            format!("Initiate immediate bypass and {}", vocab.service_noun),
            format!("Inspect for {} damage", vocab.element),
            "Analyze upstream crude slate for contaminants".to_string(),
        ],
        AssetStatus::Warning => vec![
            "Increase monitoring frequency to 4-hourly".to_string(),
            format!("Schedule {} in next 72 hours", vocab.service_noun),
            "Prepare spare parts for replacement".to_string(),
        ],
        AssetStatus::Normal => vec![
            "Continue routine monitoring".to_string(),
            "Follow standard maintenance plan".to_string(),
        ],
    }
}

/// Full risk analysis for one asset.
///
/// Mitigation actions are the explanation's actions when it has any, else the
/// per-status fallback.
pub fn analyze(
    probability: f64,
    band: RiskBand,
    pressure: f64,
    explanation: Option<&Explanation>,
    cfg: &RiskConfig,
    vocab: &AssetVocabulary,
) -> RiskAnalysis {
    let probability = probability_level(probability, cfg);
    let impact = impact_level(band, pressure, cfg);
    let mitigation_actions = match explanation {
        Some(e) if !e.actions.is_empty() => e.actions.clone(),
        _ => mitigation_fallback(AssetStatus::from(band), vocab),
    };
    RiskAnalysis {
        probability,
        impact,
        score: risk_score(probability, impact, cfg),
        mitigation_actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::narrative::vocabulary::{PIPELINE_SEGMENT, STRAINER};

    #[test]
    fn test_probability_breakpoints_take_higher_bucket() {
        let cfg = RiskConfig::default();
        assert_eq!(probability_level(0.85, &cfg), RiskLevel::VeryHigh);
        assert_eq!(probability_level(0.849, &cfg), RiskLevel::High);
        assert_eq!(probability_level(0.65, &cfg), RiskLevel::High);
        assert_eq!(probability_level(0.40, &cfg), RiskLevel::Medium);
        assert_eq!(probability_level(0.20, &cfg), RiskLevel::Low);
        assert_eq!(probability_level(0.19, &cfg), RiskLevel::VeryLow);
        assert_eq!(probability_level(f64::NAN, &cfg), RiskLevel::VeryLow);
    }

    #[test]
    fn test_impact_band_dominates_pressure() {
        let cfg = RiskConfig::default();
        assert_eq!(impact_level(RiskBand::High, 5.0, &cfg), RiskLevel::High);
        assert_eq!(impact_level(RiskBand::High, 28.0, &cfg), RiskLevel::VeryHigh);
        assert_eq!(impact_level(RiskBand::Medium, 24.0, &cfg), RiskLevel::High);
        assert_eq!(impact_level(RiskBand::Medium, 20.0, &cfg), RiskLevel::Medium);
        assert_eq!(impact_level(RiskBand::Medium, 19.9, &cfg), RiskLevel::Low);
        assert_eq!(impact_level(RiskBand::Low, 12.0, &cfg), RiskLevel::VeryLow);
        assert_eq!(impact_level(RiskBand::Low, 16.0, &cfg), RiskLevel::Low);
        assert_eq!(impact_level(RiskBand::Low, 40.0, &cfg), RiskLevel::Medium);
    }

    #[test]
    fn test_risk_score_symmetric_and_bounded() {
        let cfg = RiskConfig::default();
        for a in RiskLevel::ALL {
            for b in RiskLevel::ALL {
                let s = risk_score(a, b, &cfg);
                assert_eq!(s, risk_score(b, a, &cfg), "score({a}, {b}) must be symmetric");
                assert!((15..=90).contains(&s), "score({a}, {b}) = {s} out of range");
            }
        }
        assert_eq!(risk_score(RiskLevel::VeryLow, RiskLevel::Low, &cfg), 23);
        assert_eq!(risk_score(RiskLevel::VeryHigh, RiskLevel::VeryHigh, &cfg), 90);
    }

    #[test]
    fn test_label_scoring_uses_unknown_default() {
        let cfg = RiskConfig::default();
        assert_eq!(risk_score_for_labels("nonsense", "gibberish", &cfg), 45);
        assert_eq!(risk_score_for_labels("VERY_HIGH", "bogus", &cfg), 68);
    }

    #[test]
    fn test_to_title_level_fallback() {
        assert_eq!(to_title_level("very_high"), RiskLevel::VeryHigh);
        assert_eq!(to_title_level("LOW"), RiskLevel::Low);
        assert_eq!(to_title_level("???"), RiskLevel::Medium);
    }

    #[test]
    fn test_heat_grades() {
        assert_eq!(heat(RiskLevel::VeryHigh, RiskLevel::High), RiskHeat::Severe);
        assert_eq!(heat(RiskLevel::Medium, RiskLevel::High), RiskHeat::High);
        assert_eq!(heat(RiskLevel::Low, RiskLevel::VeryHigh), RiskHeat::Elevated);
        assert_eq!(heat(RiskLevel::Medium, RiskLevel::Medium), RiskHeat::Elevated);
        assert_eq!(heat(RiskLevel::VeryLow, RiskLevel::Medium), RiskHeat::Moderate);
        assert_eq!(heat(RiskLevel::Low, RiskLevel::VeryLow), RiskHeat::Low);
        assert_eq!(heat_for_labels("unknown", "unknown"), RiskHeat::Elevated);
    }

    #[test]
    fn test_analyze_prefers_explanation_actions() {
        let cfg = RiskConfig::default();
        let explanation = Explanation {
            reasons: vec![],
            actions: vec!["Swap to standby strainer".to_string()],
        };
        let a = analyze(0.7, RiskBand::High, 29.0, Some(&explanation), &cfg, &STRAINER);
        assert_eq!(a.probability, RiskLevel::High);
        assert_eq!(a.impact, RiskLevel::VeryHigh);
        assert_eq!(a.score, 83);
        assert_eq!(a.mitigation_actions, vec!["Swap to standby strainer".to_string()]);

        let a = analyze(0.1, RiskBand::High, 20.0, None, &cfg, &PIPELINE_SEGMENT);
        assert_eq!(a.mitigation_actions[0], "Initiate immediate bypass and pigging");
        assert_eq!(a.mitigation_actions[1], "Inspect for segment damage");
    }
}
