//! Angle normalization helpers
//!
//! Polarization has an axis but no direction, so orientation angles live in
//! [0°, 180°). Geometric angles (component rotation, beam direction) live in
//! [0°, 360°). Inputs outside those ranges are wrapped, never rejected.

/// Wrap an angle in degrees into [0, 180)
pub fn normalize_180(angle_deg: f64) -> f64 {
    wrap(angle_deg, 180.0)
}

/// Wrap an angle in degrees into [0, 360)
pub fn normalize_360(angle_deg: f64) -> f64 {
    wrap(angle_deg, 360.0)
}

/// Smallest angle between two polarization axes, in [0, 90]
///
/// Axes are compared modulo 180°, so 10° and 170° are 20° apart.
pub fn axis_difference(a_deg: f64, b_deg: f64) -> f64 {
    let diff = normalize_180(a_deg - b_deg);
    diff.min(180.0 - diff)
}

fn wrap(angle_deg: f64, period: f64) -> f64 {
    if !angle_deg.is_finite() {
        return 0.0;
    }
    let wrapped = angle_deg.rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negative inputs
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_180() {
        assert_relative_eq!(normalize_180(0.0), 0.0);
        assert_relative_eq!(normalize_180(180.0), 0.0);
        assert_relative_eq!(normalize_180(190.0), 10.0);
        assert_relative_eq!(normalize_180(-30.0), 150.0);
        assert_relative_eq!(normalize_180(-1e-18), 0.0);
    }

    #[test]
    fn test_normalize_360() {
        assert_relative_eq!(normalize_360(370.0), 10.0);
        assert_relative_eq!(normalize_360(-90.0), 270.0);
        assert_relative_eq!(normalize_360(720.0), 0.0);
    }

    #[test]
    fn test_non_finite_wraps_to_zero() {
        assert_eq!(normalize_180(f64::NAN), 0.0);
        assert_eq!(normalize_360(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_axis_difference() {
        assert_relative_eq!(axis_difference(10.0, 170.0), 20.0);
        assert_relative_eq!(axis_difference(0.0, 90.0), 90.0);
        assert_relative_eq!(axis_difference(45.0, 225.0), 0.0);
        assert_relative_eq!(axis_difference(30.0, 0.0), 30.0);
    }
}
