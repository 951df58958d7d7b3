//! Shared arithmetic for the sensor normalizers
//!
//! Pure functions, no state, no allocation. They are called once per poll per
//! channel, so they are kept trivially cheap.

use crate::errors::{SensorError, SensorResult};

/// Clamp `value` into `[low, high]`, checking the low bound first
///
/// Unlike `Ord::clamp` this never panics when `low > high`; the low bound
/// wins for values below it and the high bound for values above it.
pub fn clamp<T: PartialOrd>(value: T, low: T, high: T) -> T {
    if value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

/// Linearly map `x` from `[x_min, x_max]` onto 0..=100
///
/// `x` is clamped into the range first and the result truncated. Equal
/// bounds describe no range at all and map to 0.
pub fn map_range_to_percent(x: i32, x_min: i32, x_max: i32) -> u8 {
    if x_max == x_min {
        return 0;
    }
    let x = clamp(x, x_min, x_max);
    let percent = (x - x_min) * 100 / (x_max - x_min);
    clamp(percent, 0, 100) as u8
}

/// Check that a parsed reading lies within what the device can report
pub fn check_range(value: f32, min: f32, max: f32) -> SensorResult<f32> {
    if !value.is_finite() || value < min || value > max {
        Err(SensorError::OutOfRange { value, min, max })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-1, 0, 10), 0);
        assert_eq!(clamp(11, 0, 10), 10);
        assert_eq!(clamp(2.5, 0.0, 1.0), 1.0);
    }

    #[test]
    fn map_endpoints() {
        assert_eq!(map_range_to_percent(0, 0, 120), 0);
        assert_eq!(map_range_to_percent(120, 0, 120), 100);
        assert_eq!(map_range_to_percent(60, 0, 120), 50);
        // 1 * 100 / 120 = 0.83
        assert_eq!(map_range_to_percent(1, 0, 120), 0);
    }

    #[test]
    fn map_clamps_outside_range() {
        assert_eq!(map_range_to_percent(-50, 0, 120), 0);
        assert_eq!(map_range_to_percent(500, 0, 120), 100);
    }

    #[test]
    fn map_degenerate_range() {
        assert_eq!(map_range_to_percent(42, 7, 7), 0);
    }

    #[test]
    fn range_check() {
        assert!(check_range(22.0, -55.0, 125.0).is_ok());
        assert!(check_range(-60.0, -55.0, 125.0).is_err());
        assert!(check_range(f32::NAN, -55.0, 125.0).is_err());
    }
}
