//! Trend descriptors rendered for each tracked metric

use serde::{Deserialize, Serialize};

/// Direction-aware, unit-aware description of one metric's change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendDescriptor {
    /// Signed change; exactly 0.0 inside the metric's dead-band.
    pub delta: f64,
    /// Whether an increase is good news for this metric.
    pub increase_is_positive: bool,
    pub label: String,
    /// Decimal places for rendering `delta`, when the descriptor carries a unit.
    pub precision: Option<usize>,
    pub suffix: Option<String>,
    pub no_change_label: String,
}

impl TrendDescriptor {
    /// Descriptor for a change inside the dead-band.
    pub fn unchanged(increase_is_positive: bool, label: &str) -> Self {
        Self {
            delta: 0.0,
            increase_is_positive,
            label: label.to_string(),
            precision: None,
            suffix: None,
            no_change_label: label.to_string(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.delta == 0.0
    }
}

/// One descriptor per tracked metric.
///
/// `flow` is `None` when there is not enough history to have an opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendBundle {
    pub pressure: TrendDescriptor,
    pub flow: Option<TrendDescriptor>,
    pub efficiency: TrendDescriptor,
    pub service_age: TrendDescriptor,
    pub rate_of_change: TrendDescriptor,
}
