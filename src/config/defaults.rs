//! Engine-wide default constants.
//!
//! Every tuning constant used by the derivation engine lives here and feeds the
//! `Default` impls in `engine_config.rs`. Grouped by subsystem for easy discovery.
//! None of these have a documented physical derivation; they are product
//! defaults and are all overridable from `fleetsight.toml`.

// ============================================================================
// Units
// ============================================================================

/// Conversion factor from millibar to psi.
pub const PSI_PER_MBAR: f64 = 0.014_503_8;

/// Offset added after conversion so the display pressure sits in the
/// operator's familiar gauge range.
pub const PRESSURE_OFFSET_PSI: f64 = 12.0;

/// Raw pressure-excess reading assumed when a sample carries none (mbar).
pub const DEFAULT_RAW_PRESSURE_MBAR: f64 = 400.0;

// ============================================================================
// Trends
// ============================================================================

/// Pressure deltas below this magnitude are reported as "On baseline" (psi).
pub const PRESSURE_EPSILON: f64 = 0.05;

/// Flow deltas below this magnitude are reported as "Stable".
pub const FLOW_EPSILON: f64 = 0.5;

/// Efficiency deltas below this magnitude are reported as "Stable" (%).
pub const EFFICIENCY_EPSILON: f64 = 0.1;

/// Without history, efficiency below this floor is reported as declining (%).
pub const EFFICIENCY_FLOOR_PERCENT: f64 = 85.0;

/// Target interval between maintenance events (days).
pub const SERVICE_TARGET_DAYS: f64 = 21.0;

/// Service-age deltas below this magnitude are reported as "On schedule" (days).
pub const SERVICE_EPSILON_DAYS: f64 = 0.5;

/// Expected pressure rate of change for a healthy asset (psi/day).
pub const BASELINE_RATE: f64 = 0.45;

/// Rate deltas below this magnitude are reported as "On baseline" (psi/day).
pub const RATE_EPSILON: f64 = 0.02;

// ============================================================================
// Risk
// ============================================================================

/// Breach probability at or above which the level is Very High.
pub const PROBABILITY_VERY_HIGH: f64 = 0.85;
/// Breach probability at or above which the level is High.
pub const PROBABILITY_HIGH: f64 = 0.65;
/// Breach probability at or above which the level is Medium.
pub const PROBABILITY_MEDIUM: f64 = 0.40;
/// Breach probability at or above which the level is Low.
pub const PROBABILITY_LOW: f64 = 0.20;

/// High band: pressure at or above this is Very High impact (psi).
pub const IMPACT_HIGH_BAND_VERY_HIGH: f64 = 28.0;
/// Medium band: pressure at or above this is High impact (psi).
pub const IMPACT_MEDIUM_BAND_HIGH: f64 = 24.0;
/// Medium band: pressure at or above this is Medium impact (psi).
pub const IMPACT_MEDIUM_BAND_MEDIUM: f64 = 20.0;
/// Low band: pressure at or below this is Very Low impact (psi).
pub const IMPACT_LOW_BAND_VERY_LOW: f64 = 12.0;
/// Low band: pressure at or below this is Low impact (psi).
pub const IMPACT_LOW_BAND_LOW: f64 = 16.0;

pub const SCORE_VERY_LOW: f64 = 15.0;
pub const SCORE_LOW: f64 = 30.0;
pub const SCORE_MEDIUM: f64 = 55.0;
pub const SCORE_HIGH: f64 = 75.0;
pub const SCORE_VERY_HIGH: f64 = 90.0;

/// Score used for a level label that is not in the table.
pub const SCORE_UNKNOWN_LEVEL: f64 = 45.0;

/// Breach probability assumed when neither the smoothed nor the raw value is present.
pub const DEFAULT_BREACH_PROBABILITY: f64 = 0.52;

// ============================================================================
// Failure projection
// ============================================================================

/// Pressure at which the asset is considered breached (psi).
pub const CRITICAL_PRESSURE_PSI: f64 = 30.0;

/// Rates at or below this are not trusted for extrapolation (psi/day).
pub const MIN_FOULING_RATE: f64 = 0.01;

/// Conservative rate substituted for untrusted rates (psi/day).
pub const FALLBACK_FOULING_RATE: f64 = 0.12;

/// Fewer periods than this to critical calls for emergency maintenance.
pub const EMERGENCY_BELOW_PERIODS: u32 = 5;

/// Fewer periods than this to critical calls for an advanced maintenance window.
pub const ADVANCE_BELOW_PERIODS: u32 = 12;

/// Remaining time at or above this many periods is expressed in weeks.
pub const WEEKS_FROM_PERIODS: f64 = 14.0;

/// How many samples back from the newest the rate reference sample sits.
pub const RATE_REFERENCE_LOOKBACK: usize = 2;

/// Length of one projection period (hours).
pub const PERIOD_HOURS: f64 = HOURS_PER_DAY;

pub const HOURS_PER_DAY: f64 = 24.0;
pub const HOURS_PER_WEEK: f64 = 168.0;

// ============================================================================
// Asset assembly
// ============================================================================

/// Fixed length of the historical window (points).
pub const HISTORY_LEN: usize = 30;

/// Design flow rate for a live asset.
pub const DESIGN_FLOW: f64 = 980.0;

/// Flow lost per psi of differential pressure, current reading.
pub const CURRENT_FLOW_SLOPE: f64 = 13.0;

/// Flow lost per psi of differential pressure, historical points.
pub const HISTORY_FLOW_SLOPE: f64 = 12.0;

/// Lower flow clamp as a fraction of design flow.
pub const MIN_FLOW_FRACTION: f64 = 0.4;

/// Upper flow clamp for the current reading as a fraction of design flow.
pub const MAX_FLOW_FRACTION: f64 = 0.98;

pub const MIN_EFFICIENCY_PERCENT: f64 = 30.0;
pub const MAX_EFFICIENCY_PERCENT: f64 = 99.0;

/// Pressure step between synthetic padding points, going back in time (psi).
pub const PADDING_STEP_PSI: f64 = 0.25;
pub const PADDING_MIN_PRESSURE_PSI: f64 = 10.0;
pub const PADDING_MAX_PRESSURE_PSI: f64 = 28.0;

/// Days since service assumed when no last-maintenance date is known.
pub const DEFAULT_DAYS_SINCE_SERVICE: f64 = 14.0;

/// Planned interval between maintenance events (days).
pub const SERVICE_INTERVAL_DAYS: i64 = 35;

/// Floor applied to the baseline pressure (psi).
pub const MIN_BASELINE_PRESSURE_PSI: f64 = 10.0;

/// Number of entries in the derived maintenance log.
pub const MAINTENANCE_EVENTS: usize = 3;

/// Spacing between derived maintenance log entries (days).
pub const MAINTENANCE_SPACING_DAYS: i64 = 32;

/// Pre-service pressure falls by this much per older log entry (psi).
pub const MAINTENANCE_BEFORE_STEP_PSI: f64 = 0.6;
pub const MAINTENANCE_BEFORE_FLOOR_PSI: f64 = 16.0;

/// Post-service pressure sits this far below the pre-service reading (psi).
pub const MAINTENANCE_AFTER_DROP_PSI: f64 = 6.0;
pub const MAINTENANCE_AFTER_STEP_PSI: f64 = 0.3;
pub const MAINTENANCE_AFTER_FLOOR_PSI: f64 = 7.0;

/// Downtime of the newest log entry; each older entry adds the step (hours).
pub const DOWNTIME_BASE_HOURS: f64 = 2.6;
pub const DOWNTIME_STEP_HOURS: f64 = 0.4;

/// Lifecycle dates, as offsets from the reference time.
pub const INSTALL_AGE_DAYS: i64 = 3 * 365;
pub const OVERHAUL_AGE_DAYS: i64 = 14 * 30;
pub const REMAINING_LIFE_DAYS: i64 = 7 * 365;

// ============================================================================
// Narrative
// ============================================================================

/// Alert-status pressure above which the particulate-loading narrative applies (psi).
pub const ALERT_PRESSURE_THRESHOLD_PSI: f64 = 25.0;

/// Rate above which a warning asset is described as fouling faster than the fleet.
pub const WARNING_RATE_THRESHOLD: f64 = 0.6;

/// Pressure quoted as the warning threshold in the normal-operation narrative (psi).
pub const NORMAL_WARNING_PRESSURE_PSI: f64 = 18.0;

/// Efficiency quoted as the critical threshold in the efficiency-loss narrative (%).
pub const EFFICIENCY_CRITICAL_PERCENT: f64 = 70.0;

// ============================================================================
// Live tuning
// ============================================================================

pub const BASE_THRESHOLD: f64 = 0.5;
pub const PERSISTENCE_K: u32 = 3;
pub const COOLDOWN_HOURS: u32 = 24;
pub const REGIME_MULTIPLIER: f64 = 1.0;

pub const BASE_THRESHOLD_RANGE: (f64, f64) = (0.02, 1.0);
pub const PERSISTENCE_K_RANGE: (u32, u32) = (1, 48);
pub const COOLDOWN_HOURS_RANGE: (u32, u32) = (1, 168);
pub const REGIME_MULTIPLIER_RANGE: (f64, f64) = (0.5, 2.0);
