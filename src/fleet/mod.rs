//! Fleet Risk Aggregator
//!
//! Places every classified asset on the impact × probability matrix and
//! summarises where a selected asset sits relative to the rest of the fleet.
//!
//! ## Rules
//!
//! - Assets whose level labels are not recognised are left off the matrix;
//!   they still count towards the status tally and the total
//! - The densest cell is the first cell to reach the running maximum, so ties
//!   go to whichever cell filled up first
//! - The selected asset is identified by position and never counted as its
//!   own peer; other assets sharing its id still are

pub mod peers;

use serde::{Deserialize, Serialize};

use crate::types::{Asset, FleetRiskSummary, MatrixCell, RiskLevel, StatusTally};

pub use peers::{peer_comparison, peer_comparison_at};

/// Minimal view of an asset for matrix placement.
///
/// Levels are kept as free-form labels so callers can feed classifications
/// from any source; unrecognised labels are tolerated, not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAsset {
    pub id: String,
    pub status: String,
    pub impact: String,
    pub probability: String,
}

impl ClassifiedAsset {
    /// The matrix cell, when both labels are recognised.
    pub fn cell(&self) -> Option<MatrixCell> {
        Some(MatrixCell {
            impact: RiskLevel::parse(&self.impact)?,
            probability: RiskLevel::parse(&self.probability)?,
        })
    }
}

impl From<&Asset> for ClassifiedAsset {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.clone(),
            status: asset.status.as_str().to_string(),
            impact: asset.risk.impact.label().to_string(),
            probability: asset.risk.probability.label().to_string(),
        }
    }
}

/// 5×5 occupancy counts, indexed by impact then probability ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMatrix {
    counts: [[usize; 5]; 5],
}

impl RiskMatrix {
    pub fn build(fleet: &[ClassifiedAsset]) -> Self {
        let mut matrix = Self::default();
        for cell in fleet.iter().filter_map(ClassifiedAsset::cell) {
            matrix.increment(cell);
        }
        matrix
    }

    fn increment(&mut self, cell: MatrixCell) -> usize {
        let slot = &mut self.counts[cell.impact.ordinal()][cell.probability.ordinal()];
        *slot += 1;
        *slot
    }

    pub fn get(&self, cell: MatrixCell) -> usize {
        self.counts[cell.impact.ordinal()][cell.probability.ordinal()]
    }

    /// Assets placed on the matrix.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Rows from `VeryHigh` impact down to `VeryLow`, columns in ascending
    /// probability: the usual on-screen layout.
    pub fn rows_top_down(&self) -> Vec<(RiskLevel, [usize; 5])> {
        RiskLevel::ALL
            .into_iter()
            .rev()
            .map(|impact| (impact, self.counts[impact.ordinal()]))
            .collect()
    }
}

fn tally(tally: &mut StatusTally, status: &str) {
    match status.trim().to_lowercase().as_str() {
        "alert" => tally.alert += 1,
        "warning" => tally.warning += 1,
        "normal" => tally.normal += 1,
        _ => tally.other += 1,
    }
}

/// Summarise the fleet around the asset at index `selected`.
///
/// `None` for an empty fleet or an index past its end. Exactly one entry,
/// the selected one, is left out of the peer count.
pub fn summarize_fleet(fleet: &[ClassifiedAsset], selected: usize) -> Option<FleetRiskSummary> {
    let selected_cell = fleet.get(selected)?.cell();
    let mut matrix = RiskMatrix::default();
    let mut status_counts = StatusTally::default();
    let mut dominant: Option<(MatrixCell, usize)> = None;
    let mut peers_in_cell = 0;

    for (index, asset) in fleet.iter().enumerate() {
        tally(&mut status_counts, &asset.status);

        let Some(cell) = asset.cell() else {
            continue;
        };
        let count = matrix.increment(cell);
        if dominant.map_or(true, |(_, best)| count > best) {
            dominant = Some((cell, count));
        }
        if Some(cell) == selected_cell && index != selected {
            peers_in_cell += 1;
        }
    }

    Some(FleetRiskSummary {
        total: fleet.len(),
        status_counts,
        selected_cell,
        peers_in_cell,
        dominant_cell: dominant.map(|(cell, _)| cell),
        dominant_count: dominant.map_or(0, |(_, count)| count),
    })
}

/// Index of the first asset with `id`.
pub fn position_of(fleet: &[Asset], id: &str) -> Option<usize> {
    fleet.iter().position(|a| a.id == id)
}

/// [`summarize_fleet`] over assembled assets, selecting the first asset with
/// `selected_id`.
///
/// `None` when no asset has `selected_id`.
pub fn summarize_assets(fleet: &[Asset], selected_id: &str) -> Option<FleetRiskSummary> {
    let selected = position_of(fleet, selected_id)?;
    let classified: Vec<ClassifiedAsset> = fleet.iter().map(ClassifiedAsset::from).collect();
    summarize_fleet(&classified, selected)
}

impl FleetRiskSummary {
    /// One-paragraph overview, e.g. for a CLI or a report.
    pub fn describe(&self, selected_id: &str) -> String {
        let plural = |n: usize, one: &str, many: &str| {
            format!("{n} {}", if n == 1 { one } else { many })
        };
        let mut text = match self.selected_cell {
            Some(cell) => format!(
                "{selected_id} sits in the {cell} cell alongside {} across the fleet.",
                plural(self.peers_in_cell, "peer", "peers")
            ),
            None => format!("{selected_id} has no recognised risk classification."),
        };
        if let Some(cell) = self.dominant_cell {
            text.push_str(&format!(
                " The densest cluster is {cell} with {}.",
                plural(self.dominant_count, "asset", "assets")
            ));
        }
        let s = &self.status_counts;
        text.push_str(&format!(
            " Status: {} alert, {} warning, {} normal",
            s.alert, s.warning, s.normal
        ));
        if s.other > 0 {
            text.push_str(&format!(", {} other", s.other));
        }
        text.push('.');
        text
    }
}
