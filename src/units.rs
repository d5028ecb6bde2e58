//! Unit and scalar normalization
//!
//! Leaf helpers every other module leans on. None of these can fail: absent or
//! non-finite inputs are replaced with a documented fallback instead.

use crate::config::UnitsConfig;

/// Convert a raw pressure-excess reading (mbar) to display pressure (psi).
///
/// A missing or non-finite reading takes `units.default_raw_pressure` before
/// conversion. The result is rounded to 2 decimals.
pub fn to_display_pressure(raw_mbar: Option<f64>, units: &UnitsConfig) -> f64 {
    let raw = finite_or(raw_mbar, units.default_raw_pressure);
    round_to(raw * units.psi_per_mbar + units.pressure_offset, 2)
}

/// Clamp `value` into `[min, max]`.
///
/// Total: a non-finite `value` yields `min`, and when `min > max` the result is
/// `max` (the upper bound is applied last).
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    let v = if value.is_finite() { value } else { min };
    v.max(min).min(max)
}

/// The value when present and finite, else `fallback`.
pub fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pressure_conversion() {
        let units = UnitsConfig::default();
        // 400 * 0.0145038 + 12 = 17.80152
        assert_eq!(to_display_pressure(Some(400.0), &units), 17.8);
        assert_eq!(to_display_pressure(Some(0.0), &units), 12.0);
    }

    #[test]
    fn test_display_pressure_defaults_absent_and_nan() {
        let units = UnitsConfig::default();
        let expected = to_display_pressure(Some(units.default_raw_pressure), &units);
        assert_eq!(to_display_pressure(None, &units), expected);
        assert_eq!(to_display_pressure(Some(f64::NAN), &units), expected);
        assert_eq!(to_display_pressure(Some(f64::INFINITY), &units), expected);
    }

    #[test]
    fn test_clamp_is_total() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(f64::NAN, 2.0, 10.0), 2.0);
        // Inverted bounds resolve to max
        assert_eq!(clamp(5.0, 10.0, 0.0), 0.0);
        assert_eq!(clamp(-5.0, 10.0, 0.0), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.005_1, 2), 1.01);
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-0.126, 2), -0.13);
    }
}
