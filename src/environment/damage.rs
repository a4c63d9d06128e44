//! Depth-damage curve
//!
//! Translates an inundation depth in metres into the fraction of the house
//! value lost. Logarithmic between 2.5 cm and 6 m, zero below, total above.

/// Depth below which a flood causes no damage (m)
const MIN_DAMAGING_DEPTH: f64 = 0.025;

/// Depth at or above which a house is a total loss (m)
const TOTAL_LOSS_DEPTH: f64 = 6.0;

const LOG_SLOPE: f64 = 0.1746;
const LOG_INTERCEPT: f64 = 0.6483;

/// Damage fraction in [0, 1] for a given depth
pub fn basic_flood_damage(depth: f64) -> f64 {
    if depth >= TOTAL_LOSS_DEPTH {
        1.0
    } else if depth < MIN_DAMAGING_DEPTH || depth.is_nan() {
        0.0
    } else {
        (LOG_SLOPE * depth.ln() + LOG_INTERCEPT).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_water_is_harmless() {
        assert_eq!(basic_flood_damage(0.0), 0.0);
        assert_eq!(basic_flood_damage(0.02), 0.0);
        assert_eq!(basic_flood_damage(-1.0), 0.0);
    }

    #[test]
    fn test_deep_water_is_total_loss() {
        assert_eq!(basic_flood_damage(6.0), 1.0);
        assert_eq!(basic_flood_damage(12.0), 1.0);
    }

    #[test]
    fn test_one_metre() {
        // ln(1) = 0 leaves the intercept
        assert!((basic_flood_damage(1.0) - 0.6483).abs() < 1e-9);
    }

    #[test]
    fn test_curve_is_monotonic() {
        let mut last = 0.0;
        for i in 0..=600 {
            let d = basic_flood_damage(i as f64 * 0.01);
            assert!(d >= last, "damage decreased at depth {}", i as f64 * 0.01);
            assert!((0.0..=1.0).contains(&d));
            last = d;
        }
    }
}
