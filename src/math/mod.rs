pub mod polygon_2d;
pub mod segment_2d;
pub mod snap;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global tolerance for comparing coordinates that have already been
/// rounded to two decimals.
pub const TOLERANCE: f64 = 1e-6;

/// Coordinates are kept at two-decimal precision.
pub const PRECISION: f64 = 100.0;

/// Rounds a value to two decimals.
#[must_use]
pub fn round2(value: f64) -> f64 {
    // Adding zero turns -0.0 into 0.0.
    (value * PRECISION).round() / PRECISION + 0.0
}

/// Rounds both components of a point to two decimals.
#[must_use]
pub fn round_point(p: Point2) -> Point2 {
    Point2::new(round2(p.x), round2(p.y))
}

/// Tolerant equality for scalar coordinates.
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TOLERANCE
}

/// Tolerant equality for points.
#[must_use]
pub fn points_eq(a: &Point2, b: &Point2) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_keeps_two_decimals() {
        assert!(approx_eq(round2(39.044_9), 39.04));
        assert!(approx_eq(round2(39.045_1), 39.05));
        assert!(approx_eq(round2(-0.001), 0.0));
        assert!(round2(-0.001).is_sign_positive());
    }

    #[test]
    fn points_eq_is_tolerant() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(1.0 + 1e-9, 2.0 - 1e-9);
        assert!(points_eq(&a, &b));
        assert!(!points_eq(&a, &Point2::new(1.01, 2.0)));
    }
}
