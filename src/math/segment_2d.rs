use super::{approx_eq, Point2};

/// Euclidean length of the segment `a`-`b`.
#[must_use]
pub fn segment_length(a: &Point2, b: &Point2) -> f64 {
    nalgebra::distance(a, b)
}

/// Length of the shared part of two intervals, or a negative value for the
/// distance separating them.
#[must_use]
pub fn span_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    let (a_lo, a_hi) = (a0.min(a1), a0.max(a1));
    let (b_lo, b_hi) = (b0.min(b1), b0.max(b1));
    a_hi.min(b_hi) - a_lo.max(b_lo)
}

/// Length of the collinear overlap between two axis-aligned segments.
///
/// Returns 0.0 when the segments are not on the same horizontal or vertical
/// line, or when they only share an endpoint.
#[must_use]
pub fn collinear_overlap(a: (&Point2, &Point2), b: (&Point2, &Point2)) -> f64 {
    let a_horizontal = approx_eq(a.0.y, a.1.y);
    let b_horizontal = approx_eq(b.0.y, b.1.y);
    let a_vertical = approx_eq(a.0.x, a.1.x);
    let b_vertical = approx_eq(b.0.x, b.1.x);

    let shared = if a_horizontal && b_horizontal && approx_eq(a.0.y, b.0.y) {
        span_overlap(a.0.x, a.1.x, b.0.x, b.1.x)
    } else if a_vertical && b_vertical && approx_eq(a.0.x, b.0.x) {
        span_overlap(a.0.y, a.1.y, b.0.y, b.1.y)
    } else {
        0.0
    };
    shared.max(0.0)
}
