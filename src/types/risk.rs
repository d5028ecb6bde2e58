//! Five-point risk scale, per-asset risk analysis and fleet matrix summaries

use serde::{Deserialize, Serialize};

/// Ordinal level shared by the probability and impact axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    #[serde(rename = "Very Low")]
    VeryLow = 0,
    Low = 1,
    Medium = 2,
    High = 3,
    #[serde(rename = "Very High")]
    VeryHigh = 4,
}

impl RiskLevel {
    /// Ascending order.
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Parse any case or separator variant of a level name.
    ///
    /// `"VERY HIGH"`, `"very_high"` and `"Very-High"` all match exactly; failing
    /// that, the first level name contained in the input wins, checked in the
    /// order very high, very low, high, medium, low. Returns `None` when no
    /// level name appears at all.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if let Some(level) = Self::ALL
            .into_iter()
            .find(|l| l.label().to_lowercase() == normalized)
        {
            return Some(level);
        }

        [
            ("very high", RiskLevel::VeryHigh),
            ("very low", RiskLevel::VeryLow),
            ("high", RiskLevel::High),
            ("medium", RiskLevel::Medium),
            ("low", RiskLevel::Low),
        ]
        .into_iter()
        .find(|(needle, _)| normalized.contains(needle))
        .map(|(_, level)| level)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative and quantitative risk for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub probability: RiskLevel,
    pub impact: RiskLevel,
    /// Composite score in [0, 100].
    pub score: u8,
    pub mitigation_actions: Vec<String>,
}

/// Five-grade heat used to shade a (impact, probability) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskHeat {
    Low,
    Moderate,
    Elevated,
    High,
    Severe,
}

// ============================================================================
// Fleet matrix
// ============================================================================

/// One cell of the impact × probability matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MatrixCell {
    pub impact: RiskLevel,
    pub probability: RiskLevel,
}

impl std::fmt::Display for MatrixCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} impact / {} probability", self.impact, self.probability)
    }
}

/// Status tally across a fleet.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTally {
    pub alert: usize,
    pub warning: usize,
    pub normal: usize,
    pub other: usize,
}

/// Where the selected asset sits relative to the rest of the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRiskSummary {
    pub total: usize,
    pub status_counts: StatusTally,
    /// `None` when the selected asset's levels are unrecognised.
    pub selected_cell: Option<MatrixCell>,
    /// Other assets sharing the selected cell, the selected asset excluded.
    pub peers_in_cell: usize,
    /// `None` when no asset in the fleet had recognised levels.
    pub dominant_cell: Option<MatrixCell>,
    pub dominant_count: usize,
}

/// Selected asset's metrics against the fleet average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerComparison {
    /// Assets averaged; the selected asset is left out unless it is alone.
    pub pool_size: usize,
    pub avg_pressure: f64,
    pub avg_rate_of_change: f64,
    pub avg_efficiency: f64,
    pub pressure_delta: f64,
    pub rate_delta: f64,
    pub efficiency_delta: f64,
}
