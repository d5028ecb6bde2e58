//! Selected asset against the fleet average

use crate::types::{Asset, PeerComparison};

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Compare the asset at index `selected` with the average of every other
/// asset.
///
/// Exactly one entry is left out of the pool, so assets sharing an id with
/// the selected one are still averaged in. A fleet of one is compared with
/// itself. `None` when the index is past the end of the fleet.
pub fn peer_comparison_at(fleet: &[Asset], selected: usize) -> Option<PeerComparison> {
    let chosen = fleet.get(selected)?;
    let pool: Vec<&Asset> = if fleet.len() == 1 {
        fleet.iter().collect()
    } else {
        fleet
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != selected)
            .map(|(_, asset)| asset)
            .collect()
    };

    let avg_pressure = mean(pool.iter().map(|a| a.current.differential_pressure));
    let avg_rate_of_change = mean(pool.iter().map(|a| a.service.rate_of_change));
    let avg_efficiency = mean(pool.iter().map(|a| a.current.efficiency));

    Some(PeerComparison {
        pool_size: pool.len(),
        avg_pressure,
        avg_rate_of_change,
        avg_efficiency,
        pressure_delta: chosen.current.differential_pressure - avg_pressure,
        rate_delta: chosen.service.rate_of_change - avg_rate_of_change,
        efficiency_delta: chosen.current.efficiency - avg_efficiency,
    })
}

/// [`peer_comparison_at`] for the first asset with `selected_id`.
pub fn peer_comparison(fleet: &[Asset], selected_id: &str) -> Option<PeerComparison> {
    peer_comparison_at(fleet, super::position_of(fleet, selected_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_ignores_non_finite() {
        assert_eq!(mean([1.0, f64::NAN, 3.0].into_iter()), 2.0);
        assert_eq!(mean(std::iter::empty()), 0.0);
    }
}
