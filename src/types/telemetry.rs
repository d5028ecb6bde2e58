//! Raw telemetry inputs: samples, operating regime, risk band, explanation payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

// ============================================================================
// Categorical signals
// ============================================================================

/// Discrete operating mode of the underlying process.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Regime {
    #[default]
    Normal,
    PostStartup,
    LowLoad,
    Shutdown,
}

impl Regime {
    pub const ALL: [Regime; 4] = [
        Regime::Normal,
        Regime::PostStartup,
        Regime::LowLoad,
        Regime::Shutdown,
    ];

    /// Wire name, as it appears in telemetry and config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Regime::Normal => "normal",
            Regime::PostStartup => "post_startup",
            Regime::LowLoad => "low_load",
            Regime::Shutdown => "shutdown",
        }
    }

    /// Lenient parse; anything unrecognised is `Normal`.
    pub fn parse_lenient(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Regime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().replace('_', " "))
    }
}

/// Coarse externally supplied risk tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskBand {
    pub const ALL: [RiskBand; 3] = [RiskBand::Low, RiskBand::Medium, RiskBand::High];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Medium => "medium",
            RiskBand::High => "high",
        }
    }

    /// Lenient parse; anything unrecognised is the neutral `Medium`.
    pub fn parse_lenient(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(value.trim()))
            .unwrap_or_default()
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Samples
// ============================================================================

/// One telemetry reading for an asset. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    pub ts: DateTime<Utc>,
    /// Pressure excess in mbar. Absent readings take the configured default.
    #[serde(default)]
    pub dp_excess_mbar: Option<f64>,
    /// Smoothed seven-day breach probability in [0, 1].
    #[serde(default)]
    pub prob_breach7d: Option<f64>,
    /// Unsmoothed breach probability.
    #[serde(default)]
    pub prob_breach7d_raw: Option<f64>,
    #[serde(default)]
    pub risk_band: RiskBand,
    #[serde(default)]
    pub regime: Regime,
    /// Effective alert threshold, only present on tuned live streams.
    #[serde(default)]
    pub threshold_eff: Option<f64>,
}

impl TelemetrySample {
    /// Minimal sample with only a timestamp and pressure, everything else default.
    pub fn new(ts: DateTime<Utc>, dp_excess_mbar: f64) -> Self {
        Self {
            ts,
            dp_excess_mbar: Some(dp_excess_mbar),
            prob_breach7d: None,
            prob_breach7d_raw: None,
            risk_band: RiskBand::default(),
            regime: Regime::default(),
            threshold_eff: None,
        }
    }

    /// Smoothed probability, else the raw variant, else `fallback`.
    pub fn breach_probability(&self, fallback: f64) -> f64 {
        self.prob_breach7d
            .filter(|p| p.is_finite())
            .or(self.prob_breach7d_raw.filter(|p| p.is_finite()))
            .unwrap_or(fallback)
    }
}

// ============================================================================
// Side inputs
// ============================================================================

/// Model explanation consumed verbatim by the narrative composer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Explanation {
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty() && self.actions.is_empty()
    }
}

/// Static per-asset metadata supplied alongside a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub last_clean_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<Location>,
}
