//! The assembled asset record and its derived parts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{RiskAnalysis, RiskBand, TrendBundle};

// ============================================================================
// Identity
// ============================================================================

/// Kind of physical asset; selects the narrative vocabulary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    #[default]
    Strainer,
    Compressor,
    PipelineSegment,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Strainer => write!(f, "strainer"),
            AssetKind::Compressor => write!(f, "compressor"),
            AssetKind::PipelineSegment => write!(f, "pipeline segment"),
        }
    }
}

/// Where the asset sits in the plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub unit: String,
    pub equipment: String,
    pub position: String,
}

/// Operating status, derived 1:1 from the risk band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Alert,
    Warning,
    Normal,
}

impl AssetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetStatus::Alert => "alert",
            AssetStatus::Warning => "warning",
            AssetStatus::Normal => "normal",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            AssetStatus::Alert => Severity::Critical,
            AssetStatus::Warning => Severity::Warning,
            AssetStatus::Normal => Severity::Info,
        }
    }
}

impl From<RiskBand> for AssetStatus {
    fn from(band: RiskBand) -> Self {
        match band {
            RiskBand::High => AssetStatus::Alert,
            RiskBand::Medium => AssetStatus::Warning,
            RiskBand::Low => AssetStatus::Normal,
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

// ============================================================================
// Metrics and context
// ============================================================================

/// Latest derived operating figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    /// Display pressure (psi).
    pub differential_pressure: f64,
    pub flow_rate: f64,
    /// Percent of design flow.
    pub efficiency: f64,
    pub design_flow_rate: f64,
}

/// Maintenance timing and pressure baseline the trends are measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceContext {
    pub days_since_service: f64,
    pub next_service_due: NaiveDate,
    pub baseline_pressure: f64,
    /// Raw pressure rate of change (psi/day), unfloored.
    pub rate_of_change: f64,
}

/// One point of the fixed-length history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub pressure: f64,
    pub flow_rate: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DebrisType {
    #[serde(rename = "Sand/Silt")]
    SandSilt,
    #[serde(rename = "Corrosion Products")]
    CorrosionProducts,
    Scale,
    #[serde(rename = "Polymer Residue")]
    PolymerResidue,
}

impl std::fmt::Display for DebrisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DebrisType::SandSilt => write!(f, "Sand/Silt"),
            DebrisType::CorrosionProducts => write!(f, "Corrosion Products"),
            DebrisType::Scale => write!(f, "Scale"),
            DebrisType::PolymerResidue => write!(f, "Polymer Residue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceEvent {
    pub date: NaiveDate,
    pub pressure_before: f64,
    pub pressure_after: f64,
    pub downtime_hours: f64,
    pub debris: DebrisType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebrisShare {
    pub debris: DebrisType,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleDates {
    pub installed: NaiveDate,
    pub last_overhaul: NaiveDate,
    pub end_of_life: NaiveDate,
}

// ============================================================================
// Projection
// ============================================================================

/// Recommended response, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActionTier {
    Emergency,
    AdvanceSchedule,
    ContinueMonitoring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    /// Effective fouling rate (psi/day), never below the configured floor.
    pub fouling_rate: f64,
    /// Always >= 1.
    pub periods_until_critical: u32,
    pub projected_breach_date: NaiveDate,
    pub time_remaining: String,
    pub timeline_label: String,
    pub tier: ActionTier,
    /// Tier wording in the asset's vocabulary.
    pub recommendation: String,
}

// ============================================================================
// Causality
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhyStep {
    pub question: String,
    pub explanation: String,
}

/// Problem statement plus a chain of exactly five causes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalityAnalysis {
    pub problem_statement: String,
    pub five_whys: [WhyStep; 5],
}

// ============================================================================
// Live signal
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

/// Breach-probability signal of the latest sample against its alert threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub points: usize,
    pub latest_probability: f64,
    pub effective_threshold: f64,
    pub above_threshold: bool,
    pub band_counts: BandCounts,
    /// Alerts the persistence and cooldown rule would have raised over the batch.
    pub alerts_fired: usize,
}

// ============================================================================
// Aggregate root
// ============================================================================

/// Fully derived snapshot of one fleet member.
///
/// Rebuilt from scratch on every refresh; nothing here is patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub kind: AssetKind,
    pub location: Location,
    pub status: AssetStatus,
    pub severity: Severity,
    /// True when narratives came from a model explanation rather than templates.
    pub explained: bool,
    pub current: CurrentMetrics,
    pub service: ServiceContext,
    pub trends: TrendBundle,
    /// Oldest first, fixed length.
    pub history: Vec<HistoryPoint>,
    pub maintenance_log: Vec<MaintenanceEvent>,
    pub alert_message: String,
    pub root_cause: String,
    pub risk: RiskAnalysis,
    pub causality: CausalityAnalysis,
    pub predictions: Predictions,
    pub lifecycle: LifecycleDates,
    pub debris_mix: Vec<DebrisShare>,
    pub signal: SignalSummary,
}
