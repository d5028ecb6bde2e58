//! Engine Configuration - every derivation threshold as an operator-tunable TOML value
//!
//! Each struct implements `Default` with the values in `defaults.rs`, so an
//! empty or missing `fleetsight.toml` reproduces the stock behavior exactly.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults as d;
use crate::types::Regime;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FLEETSIGHT_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "fleetsight.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration passed explicitly into every engine component.
///
/// Load with `EngineConfig::load()` which searches:
/// 1. `$FLEETSIGHT_CONFIG` env var
/// 2. `./fleetsight.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub units: UnitsConfig,

    #[serde(default)]
    pub trends: TrendConfig,

    #[serde(default)]
    pub risk: RiskConfig,

    #[serde(default)]
    pub projection: ProjectionConfig,

    #[serde(default)]
    pub assembly: AssemblyConfig,

    #[serde(default)]
    pub narrative: NarrativeConfig,

    #[serde(default)]
    pub tuning: TuningConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order.
    ///
    /// Never fails: a broken file is logged and skipped.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from {CONFIG_ENV_VAR}");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {CONFIG_ENV_VAR}, falling back");
                    }
                }
            } else {
                warn!(path = %path, "{CONFIG_ENV_VAR} points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./{LOCAL_CONFIG_FILE}");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{LOCAL_CONFIG_FILE}, using defaults");
                }
            }
        }

        info!("No {LOCAL_CONFIG_FILE} found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        for w in super::validation::validate_unknown_keys(&contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all thresholds for internal consistency.
    ///
    /// Rules:
    /// - Every numeric value must be finite
    /// - Probability breakpoints must descend and lie in [0, 1]
    /// - Impact pressure tiers must be ordered within each band
    /// - Epsilons and rates must be positive
    /// - Recommendation tiers must be ordered (emergency < advance)
    /// - History length must be non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let r = &self.risk;
        Self::check_descending(
            &[
                r.probability_very_high,
                r.probability_high,
                r.probability_medium,
                r.probability_low,
            ],
            "risk.probability breakpoints",
            &mut errors,
        );
        for (name, v) in [
            ("risk.probability_very_high", r.probability_very_high),
            ("risk.probability_low", r.probability_low),
            ("risk.default_probability", r.default_probability),
        ] {
            if !(0.0..=1.0).contains(&v) {
                errors.push(format!("{name} ({v}) must lie in [0, 1]"));
            }
        }
        Self::check_escalation(
            r.medium_band_medium,
            r.medium_band_high,
            "risk.medium_band",
            &mut errors,
        );
        Self::check_escalation(
            r.low_band_very_low,
            r.low_band_low,
            "risk.low_band",
            &mut errors,
        );
        Self::check_finite(r.high_band_very_high, "risk.high_band_very_high", &mut errors);

        let s = &r.scores;
        Self::check_descending(
            &[s.very_high, s.high, s.medium, s.low, s.very_low],
            "risk.scores",
            &mut errors,
        );
        Self::check_finite(s.unknown, "risk.scores.unknown", &mut errors);

        let t = &self.trends;
        for (name, v) in [
            ("trends.pressure_epsilon", t.pressure_epsilon),
            ("trends.flow_epsilon", t.flow_epsilon),
            ("trends.efficiency_epsilon", t.efficiency_epsilon),
            ("trends.service_epsilon_days", t.service_epsilon_days),
            ("trends.rate_epsilon", t.rate_epsilon),
            ("projection.min_rate", self.projection.min_rate),
            ("projection.fallback_rate", self.projection.fallback_rate),
            ("projection.period_hours", self.projection.period_hours),
            ("units.psi_per_mbar", self.units.psi_per_mbar),
            ("assembly.design_flow", self.assembly.design_flow),
        ] {
            Self::check_positive(v, name, &mut errors);
        }
        for (name, v) in [
            ("trends.efficiency_floor_percent", t.efficiency_floor_percent),
            ("trends.service_target_days", t.service_target_days),
            ("trends.baseline_rate", t.baseline_rate),
            ("units.pressure_offset", self.units.pressure_offset),
            ("units.default_raw_pressure", self.units.default_raw_pressure),
            ("projection.critical_pressure", self.projection.critical_pressure),
        ] {
            Self::check_finite(v, name, &mut errors);
        }

        let p = &self.projection;
        if p.fallback_rate <= p.min_rate {
            errors.push(format!(
                "projection.fallback_rate ({:.3}) must be greater than min_rate ({:.3})",
                p.fallback_rate, p.min_rate
            ));
        }
        if p.emergency_below_periods >= p.advance_below_periods {
            errors.push(format!(
                "projection.emergency_below_periods ({}) must be less than advance_below_periods ({})",
                p.emergency_below_periods, p.advance_below_periods
            ));
        }

        let a = &self.assembly;
        if a.history_len == 0 {
            errors.push("assembly.history_len must be > 0".to_string());
        }
        Self::check_escalation(
            a.min_flow_fraction,
            a.max_flow_fraction,
            "assembly.flow_fraction",
            &mut errors,
        );
        Self::check_escalation(
            a.min_efficiency_percent,
            a.max_efficiency_percent,
            "assembly.efficiency_percent",
            &mut errors,
        );
        Self::check_escalation(
            a.padding_min_pressure,
            a.padding_max_pressure,
            "assembly.padding_pressure",
            &mut errors,
        );
        for (name, v) in [
            ("assembly.maintenance_before_step", a.maintenance_before_step),
            ("assembly.maintenance_before_floor", a.maintenance_before_floor),
            ("assembly.maintenance_after_drop", a.maintenance_after_drop),
            ("assembly.maintenance_after_step", a.maintenance_after_step),
            ("assembly.maintenance_after_floor", a.maintenance_after_floor),
            ("assembly.downtime_base_hours", a.downtime_base_hours),
            ("assembly.downtime_step_hours", a.downtime_step_hours),
        ] {
            Self::check_finite(v, name, &mut errors);
        }

        let m = &self.tuning.regime_multipliers;
        for regime in Regime::ALL {
            Self::check_positive(
                m.for_regime(regime),
                &format!("tuning.regime_multipliers.{}", regime.as_str()),
                &mut errors,
            );
        }
        Self::check_finite(self.tuning.base_threshold, "tuning.base_threshold", &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_finite(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() {
            errors.push(format!("{name}: value must be finite (got {value})"));
        }
    }

    fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
        if !value.is_finite() || value <= 0.0 {
            errors.push(format!("{name}: value must be finite and > 0 (got {value})"));
        }
    }

    fn check_escalation(lower: f64, upper: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass, catch them explicitly
        if !lower.is_finite() || !upper.is_finite() {
            errors.push(format!(
                "{name}: values must be finite (got lower={lower}, upper={upper})"
            ));
            return;
        }
        if upper < lower {
            errors.push(format!(
                "{name}: upper ({upper:.3}) must be >= lower ({lower:.3})"
            ));
        }
    }

    fn check_descending(values: &[f64], name: &str, errors: &mut Vec<String>) {
        if values.iter().any(|v| !v.is_finite()) {
            errors.push(format!("{name}: values must be finite (got {values:?})"));
            return;
        }
        if values.windows(2).any(|w| w[0] <= w[1]) {
            errors.push(format!("{name}: values must strictly descend (got {values:?})"));
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Units
// ============================================================================

/// Raw-to-display pressure conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitsConfig {
    /// Scale applied to the raw mbar reading.
    #[serde(default = "default_psi_per_mbar")]
    pub psi_per_mbar: f64,

    /// Offset added after scaling (psi).
    #[serde(default = "default_pressure_offset")]
    pub pressure_offset: f64,

    /// Raw reading substituted for an absent or non-finite value (mbar).
    #[serde(default = "default_raw_pressure")]
    pub default_raw_pressure: f64,
}

fn default_psi_per_mbar() -> f64 {
    d::PSI_PER_MBAR
}
fn default_pressure_offset() -> f64 {
    d::PRESSURE_OFFSET_PSI
}
fn default_raw_pressure() -> f64 {
    d::DEFAULT_RAW_PRESSURE_MBAR
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            psi_per_mbar: default_psi_per_mbar(),
            pressure_offset: default_pressure_offset(),
            default_raw_pressure: default_raw_pressure(),
        }
    }
}

// ============================================================================
// Trends
// ============================================================================

/// Dead-bands and targets for the per-metric trend descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendConfig {
    #[serde(default = "default_pressure_epsilon")]
    pub pressure_epsilon: f64,

    #[serde(default = "default_flow_epsilon")]
    pub flow_epsilon: f64,

    #[serde(default = "default_efficiency_epsilon")]
    pub efficiency_epsilon: f64,

    /// Efficiency below this with no history reads as declining (%).
    #[serde(default = "default_efficiency_floor")]
    pub efficiency_floor_percent: f64,

    #[serde(default = "default_service_target_days")]
    pub service_target_days: f64,

    #[serde(default = "default_service_epsilon_days")]
    pub service_epsilon_days: f64,

    /// Expected rate of change for a healthy asset (psi/day).
    #[serde(default = "default_baseline_rate")]
    pub baseline_rate: f64,

    #[serde(default = "default_rate_epsilon")]
    pub rate_epsilon: f64,
}

fn default_pressure_epsilon() -> f64 {
    d::PRESSURE_EPSILON
}
fn default_flow_epsilon() -> f64 {
    d::FLOW_EPSILON
}
fn default_efficiency_epsilon() -> f64 {
    d::EFFICIENCY_EPSILON
}
fn default_efficiency_floor() -> f64 {
    d::EFFICIENCY_FLOOR_PERCENT
}
fn default_service_target_days() -> f64 {
    d::SERVICE_TARGET_DAYS
}
fn default_service_epsilon_days() -> f64 {
    d::SERVICE_EPSILON_DAYS
}
fn default_baseline_rate() -> f64 {
    d::BASELINE_RATE
}
fn default_rate_epsilon() -> f64 {
    d::RATE_EPSILON
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            pressure_epsilon: default_pressure_epsilon(),
            flow_epsilon: default_flow_epsilon(),
            efficiency_epsilon: default_efficiency_epsilon(),
            efficiency_floor_percent: default_efficiency_floor(),
            service_target_days: default_service_target_days(),
            service_epsilon_days: default_service_epsilon_days(),
            baseline_rate: default_baseline_rate(),
            rate_epsilon: default_rate_epsilon(),
        }
    }
}

// ============================================================================
// Risk
// ============================================================================

/// Probability breakpoints, impact pressure tiers and the level score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_probability_very_high")]
    pub probability_very_high: f64,

    #[serde(default = "default_probability_high")]
    pub probability_high: f64,

    #[serde(default = "default_probability_medium")]
    pub probability_medium: f64,

    #[serde(default = "default_probability_low")]
    pub probability_low: f64,

    /// High band: pressure at or above this is Very High impact.
    #[serde(default = "default_high_band_very_high")]
    pub high_band_very_high: f64,

    /// Medium band: pressure at or above this is High impact.
    #[serde(default = "default_medium_band_high")]
    pub medium_band_high: f64,

    /// Medium band: pressure at or above this is Medium impact.
    #[serde(default = "default_medium_band_medium")]
    pub medium_band_medium: f64,

    /// Low band: pressure at or below this is Very Low impact.
    #[serde(default = "default_low_band_very_low")]
    pub low_band_very_low: f64,

    /// Low band: pressure at or below this is Low impact.
    #[serde(default = "default_low_band_low")]
    pub low_band_low: f64,

    /// Breach probability used when a sample carries neither variant.
    #[serde(default = "default_probability")]
    pub default_probability: f64,

    #[serde(default)]
    pub scores: LevelScores,
}

fn default_probability_very_high() -> f64 {
    d::PROBABILITY_VERY_HIGH
}
fn default_probability_high() -> f64 {
    d::PROBABILITY_HIGH
}
fn default_probability_medium() -> f64 {
    d::PROBABILITY_MEDIUM
}
fn default_probability_low() -> f64 {
    d::PROBABILITY_LOW
}
fn default_high_band_very_high() -> f64 {
    d::IMPACT_HIGH_BAND_VERY_HIGH
}
fn default_medium_band_high() -> f64 {
    d::IMPACT_MEDIUM_BAND_HIGH
}
fn default_medium_band_medium() -> f64 {
    d::IMPACT_MEDIUM_BAND_MEDIUM
}
fn default_low_band_very_low() -> f64 {
    d::IMPACT_LOW_BAND_VERY_LOW
}
fn default_low_band_low() -> f64 {
    d::IMPACT_LOW_BAND_LOW
}
fn default_probability() -> f64 {
    d::DEFAULT_BREACH_PROBABILITY
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            probability_very_high: default_probability_very_high(),
            probability_high: default_probability_high(),
            probability_medium: default_probability_medium(),
            probability_low: default_probability_low(),
            high_band_very_high: default_high_band_very_high(),
            medium_band_high: default_medium_band_high(),
            medium_band_medium: default_medium_band_medium(),
            low_band_very_low: default_low_band_very_low(),
            low_band_low: default_low_band_low(),
            default_probability: default_probability(),
            scores: LevelScores::default(),
        }
    }
}

/// Ordinal level to score lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelScores {
    #[serde(default = "default_score_very_low")]
    pub very_low: f64,
    #[serde(default = "default_score_low")]
    pub low: f64,
    #[serde(default = "default_score_medium")]
    pub medium: f64,
    #[serde(default = "default_score_high")]
    pub high: f64,
    #[serde(default = "default_score_very_high")]
    pub very_high: f64,
    /// Score for a label that is not in the table.
    #[serde(default = "default_score_unknown")]
    pub unknown: f64,
}

fn default_score_very_low() -> f64 {
    d::SCORE_VERY_LOW
}
fn default_score_low() -> f64 {
    d::SCORE_LOW
}
fn default_score_medium() -> f64 {
    d::SCORE_MEDIUM
}
fn default_score_high() -> f64 {
    d::SCORE_HIGH
}
fn default_score_very_high() -> f64 {
    d::SCORE_VERY_HIGH
}
fn default_score_unknown() -> f64 {
    d::SCORE_UNKNOWN_LEVEL
}

impl Default for LevelScores {
    fn default() -> Self {
        Self {
            very_low: default_score_very_low(),
            low: default_score_low(),
            medium: default_score_medium(),
            high: default_score_high(),
            very_high: default_score_very_high(),
            unknown: default_score_unknown(),
        }
    }
}

// ============================================================================
// Failure projection
// ============================================================================

/// Rate extrapolation, time-to-critical and recommendation tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Pressure at which the asset is considered breached (psi).
    #[serde(default = "default_critical_pressure")]
    pub critical_pressure: f64,

    /// Rates at or below this fall back to `fallback_rate`.
    #[serde(default = "default_min_rate")]
    pub min_rate: f64,

    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,

    #[serde(default = "default_emergency_below")]
    pub emergency_below_periods: u32,

    #[serde(default = "default_advance_below")]
    pub advance_below_periods: u32,

    /// Remaining time at or above this is expressed in weeks.
    #[serde(default = "default_weeks_from")]
    pub weeks_from_periods: f64,

    /// Samples back from the newest to take the rate reference from.
    #[serde(default = "default_reference_lookback")]
    pub reference_lookback: usize,

    /// Length of one period. Rates, time-to-critical and their labels are
    /// all expressed in periods.
    #[serde(default = "default_period_hours")]
    pub period_hours: f64,
}

fn default_critical_pressure() -> f64 {
    d::CRITICAL_PRESSURE_PSI
}
fn default_min_rate() -> f64 {
    d::MIN_FOULING_RATE
}
fn default_fallback_rate() -> f64 {
    d::FALLBACK_FOULING_RATE
}
fn default_emergency_below() -> u32 {
    d::EMERGENCY_BELOW_PERIODS
}
fn default_advance_below() -> u32 {
    d::ADVANCE_BELOW_PERIODS
}
fn default_weeks_from() -> f64 {
    d::WEEKS_FROM_PERIODS
}
fn default_reference_lookback() -> usize {
    d::RATE_REFERENCE_LOOKBACK
}
fn default_period_hours() -> f64 {
    d::PERIOD_HOURS
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            critical_pressure: default_critical_pressure(),
            min_rate: default_min_rate(),
            fallback_rate: default_fallback_rate(),
            emergency_below_periods: default_emergency_below(),
            advance_below_periods: default_advance_below(),
            weeks_from_periods: default_weeks_from(),
            reference_lookback: default_reference_lookback(),
            period_hours: default_period_hours(),
        }
    }
}

impl ProjectionConfig {
    /// Singular label for one period: "hour", "day" or "week" when the
    /// period matches one exactly, "period" otherwise.
    pub fn period_unit(&self) -> &'static str {
        let is = |hours: f64| (self.period_hours - hours).abs() < 1e-9;
        if is(1.0) {
            "hour"
        } else if is(d::HOURS_PER_DAY) {
            "day"
        } else if is(d::HOURS_PER_WEEK) {
            "week"
        } else {
            "period"
        }
    }
}

// ============================================================================
// Asset assembly
// ============================================================================

/// Constants used to derive current metrics, history and the maintenance log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyConfig {
    #[serde(default = "default_history_len")]
    pub history_len: usize,

    #[serde(default = "default_design_flow")]
    pub design_flow: f64,

    #[serde(default = "default_current_flow_slope")]
    pub current_flow_slope: f64,

    #[serde(default = "default_history_flow_slope")]
    pub history_flow_slope: f64,

    #[serde(default = "default_min_flow_fraction")]
    pub min_flow_fraction: f64,

    #[serde(default = "default_max_flow_fraction")]
    pub max_flow_fraction: f64,

    #[serde(default = "default_min_efficiency")]
    pub min_efficiency_percent: f64,

    #[serde(default = "default_max_efficiency")]
    pub max_efficiency_percent: f64,

    #[serde(default = "default_padding_step")]
    pub padding_step: f64,

    #[serde(default = "default_padding_min")]
    pub padding_min_pressure: f64,

    #[serde(default = "default_padding_max")]
    pub padding_max_pressure: f64,

    #[serde(default = "default_days_since_service")]
    pub default_days_since_service: f64,

    #[serde(default = "default_service_interval")]
    pub service_interval_days: i64,

    #[serde(default = "default_min_baseline")]
    pub min_baseline_pressure: f64,

    #[serde(default = "default_maintenance_events")]
    pub maintenance_events: usize,

    #[serde(default = "default_maintenance_spacing")]
    pub maintenance_spacing_days: i64,

    /// Log entry `n` (0 = newest) records `pressure - n * before_step` before
    /// service, never below `before_floor`.
    #[serde(default = "default_before_step")]
    pub maintenance_before_step: f64,

    #[serde(default = "default_before_floor")]
    pub maintenance_before_floor: f64,

    /// After service: `pressure - after_drop - n * after_step`, floored.
    #[serde(default = "default_after_drop")]
    pub maintenance_after_drop: f64,

    #[serde(default = "default_after_step")]
    pub maintenance_after_step: f64,

    #[serde(default = "default_after_floor")]
    pub maintenance_after_floor: f64,

    /// Downtime of entry `n` is `base + n * step` hours.
    #[serde(default = "default_downtime_base")]
    pub downtime_base_hours: f64,

    #[serde(default = "default_downtime_step")]
    pub downtime_step_hours: f64,

    #[serde(default = "default_install_age")]
    pub install_age_days: i64,

    #[serde(default = "default_overhaul_age")]
    pub overhaul_age_days: i64,

    #[serde(default = "default_remaining_life")]
    pub remaining_life_days: i64,
}

fn default_history_len() -> usize {
    d::HISTORY_LEN
}
fn default_design_flow() -> f64 {
    d::DESIGN_FLOW
}
fn default_current_flow_slope() -> f64 {
    d::CURRENT_FLOW_SLOPE
}
fn default_history_flow_slope() -> f64 {
    d::HISTORY_FLOW_SLOPE
}
fn default_min_flow_fraction() -> f64 {
    d::MIN_FLOW_FRACTION
}
fn default_max_flow_fraction() -> f64 {
    d::MAX_FLOW_FRACTION
}
fn default_min_efficiency() -> f64 {
    d::MIN_EFFICIENCY_PERCENT
}
fn default_max_efficiency() -> f64 {
    d::MAX_EFFICIENCY_PERCENT
}
fn default_padding_step() -> f64 {
    d::PADDING_STEP_PSI
}
fn default_padding_min() -> f64 {
    d::PADDING_MIN_PRESSURE_PSI
}
fn default_padding_max() -> f64 {
    d::PADDING_MAX_PRESSURE_PSI
}
fn default_days_since_service() -> f64 {
    d::DEFAULT_DAYS_SINCE_SERVICE
}
fn default_service_interval() -> i64 {
    d::SERVICE_INTERVAL_DAYS
}
fn default_min_baseline() -> f64 {
    d::MIN_BASELINE_PRESSURE_PSI
}
fn default_maintenance_events() -> usize {
    d::MAINTENANCE_EVENTS
}
fn default_maintenance_spacing() -> i64 {
    d::MAINTENANCE_SPACING_DAYS
}
fn default_before_step() -> f64 {
    d::MAINTENANCE_BEFORE_STEP_PSI
}
fn default_before_floor() -> f64 {
    d::MAINTENANCE_BEFORE_FLOOR_PSI
}
fn default_after_drop() -> f64 {
    d::MAINTENANCE_AFTER_DROP_PSI
}
fn default_after_step() -> f64 {
    d::MAINTENANCE_AFTER_STEP_PSI
}
fn default_after_floor() -> f64 {
    d::MAINTENANCE_AFTER_FLOOR_PSI
}
fn default_downtime_base() -> f64 {
    d::DOWNTIME_BASE_HOURS
}
fn default_downtime_step() -> f64 {
    d::DOWNTIME_STEP_HOURS
}
fn default_install_age() -> i64 {
    d::INSTALL_AGE_DAYS
}
fn default_overhaul_age() -> i64 {
    d::OVERHAUL_AGE_DAYS
}
fn default_remaining_life() -> i64 {
    d::REMAINING_LIFE_DAYS
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            history_len: default_history_len(),
            design_flow: default_design_flow(),
            current_flow_slope: default_current_flow_slope(),
            history_flow_slope: default_history_flow_slope(),
            min_flow_fraction: default_min_flow_fraction(),
            max_flow_fraction: default_max_flow_fraction(),
            min_efficiency_percent: default_min_efficiency(),
            max_efficiency_percent: default_max_efficiency(),
            padding_step: default_padding_step(),
            padding_min_pressure: default_padding_min(),
            padding_max_pressure: default_padding_max(),
            default_days_since_service: default_days_since_service(),
            service_interval_days: default_service_interval(),
            min_baseline_pressure: default_min_baseline(),
            maintenance_events: default_maintenance_events(),
            maintenance_spacing_days: default_maintenance_spacing(),
            maintenance_before_step: default_before_step(),
            maintenance_before_floor: default_before_floor(),
            maintenance_after_drop: default_after_drop(),
            maintenance_after_step: default_after_step(),
            maintenance_after_floor: default_after_floor(),
            downtime_base_hours: default_downtime_base(),
            downtime_step_hours: default_downtime_step(),
            install_age_days: default_install_age(),
            overhaul_age_days: default_overhaul_age(),
            remaining_life_days: default_remaining_life(),
        }
    }
}

// ============================================================================
// Narrative
// ============================================================================

/// Thresholds that pick and parameterise the canned narratives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeConfig {
    /// Alert assets above this pressure get the particulate-loading narrative.
    #[serde(default = "default_alert_pressure")]
    pub alert_pressure_threshold: f64,

    #[serde(default = "default_warning_rate")]
    pub warning_rate_threshold: f64,

    #[serde(default = "default_normal_warning_pressure")]
    pub normal_warning_pressure: f64,

    #[serde(default = "default_efficiency_critical")]
    pub efficiency_critical_percent: f64,
}

fn default_alert_pressure() -> f64 {
    d::ALERT_PRESSURE_THRESHOLD_PSI
}
fn default_warning_rate() -> f64 {
    d::WARNING_RATE_THRESHOLD
}
fn default_normal_warning_pressure() -> f64 {
    d::NORMAL_WARNING_PRESSURE_PSI
}
fn default_efficiency_critical() -> f64 {
    d::EFFICIENCY_CRITICAL_PERCENT
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            alert_pressure_threshold: default_alert_pressure(),
            warning_rate_threshold: default_warning_rate(),
            normal_warning_pressure: default_normal_warning_pressure(),
            efficiency_critical_percent: default_efficiency_critical(),
        }
    }
}

// ============================================================================
// Live tuning
// ============================================================================

/// Alerting parameters for live streams.
///
/// Out-of-range values are clamped when read through the accessor methods,
/// matching the bounds the operator console enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningConfig {
    #[serde(default = "default_base_threshold")]
    pub base_threshold: f64,

    /// Consecutive samples at or above threshold before an alert fires.
    #[serde(default = "default_persistence_k")]
    pub persistence_k: u32,

    /// Minimum hours between two alerts.
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: u32,

    #[serde(default)]
    pub regime_multipliers: RegimeMultipliers,
}

fn default_base_threshold() -> f64 {
    d::BASE_THRESHOLD
}
fn default_persistence_k() -> u32 {
    d::PERSISTENCE_K
}
fn default_cooldown_hours() -> u32 {
    d::COOLDOWN_HOURS
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            base_threshold: default_base_threshold(),
            persistence_k: default_persistence_k(),
            cooldown_hours: default_cooldown_hours(),
            regime_multipliers: RegimeMultipliers::default(),
        }
    }
}

impl TuningConfig {
    pub fn base_threshold(&self) -> f64 {
        let (lo, hi) = d::BASE_THRESHOLD_RANGE;
        crate::units::clamp(self.base_threshold, lo, hi)
    }

    pub fn persistence_k(&self) -> u32 {
        let (lo, hi) = d::PERSISTENCE_K_RANGE;
        self.persistence_k.clamp(lo, hi)
    }

    pub fn cooldown_hours(&self) -> u32 {
        let (lo, hi) = d::COOLDOWN_HOURS_RANGE;
        self.cooldown_hours.clamp(lo, hi)
    }

    pub fn multiplier(&self, regime: Regime) -> f64 {
        let (lo, hi) = d::REGIME_MULTIPLIER_RANGE;
        crate::units::clamp(self.regime_multipliers.for_regime(regime), lo, hi)
    }
}

/// Per-regime scaling of the base alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeMultipliers {
    #[serde(default = "default_multiplier")]
    pub normal: f64,
    #[serde(default = "default_multiplier")]
    pub post_startup: f64,
    #[serde(default = "default_multiplier")]
    pub low_load: f64,
    #[serde(default = "default_multiplier")]
    pub shutdown: f64,
}

fn default_multiplier() -> f64 {
    d::REGIME_MULTIPLIER
}

impl Default for RegimeMultipliers {
    fn default() -> Self {
        Self {
            normal: default_multiplier(),
            post_startup: default_multiplier(),
            low_load: default_multiplier(),
            shutdown: default_multiplier(),
        }
    }
}

impl RegimeMultipliers {
    pub fn for_regime(&self, regime: Regime) -> f64 {
        match regime {
            Regime::Normal => self.normal,
            Regime::PostStartup => self.post_startup,
            Regime::LowLoad => self.low_load,
            Regime::Shutdown => self.shutdown,
        }
    }
}
