use super::{Point2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Unsigned polygon area.
#[must_use]
pub fn area_2d(points: &[Point2]) -> f64 {
    signed_area_2d(points).abs()
}

/// Area centroid of a simple polygon.
///
/// Falls back to the vertex average when the polygon has no area.
#[must_use]
pub fn centroid_2d(points: &[Point2]) -> Point2 {
    let n = points.len();
    if n == 0 {
        return Point2::origin();
    }
    let a = signed_area_2d(points);
    if a.abs() < TOLERANCE {
        #[allow(clippy::cast_precision_loss)]
        let inv = 1.0 / n as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        return Point2::new(sx * inv, sy * inv);
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        let cross = points[i].x * points[j].y - points[j].x * points[i].y;
        cx += (points[i].x + points[j].x) * cross;
        cy += (points[i].y + points[j].y) * cross;
    }
    let k = 1.0 / (6.0 * a);
    Point2::new(cx * k, cy * k)
}

/// Even-odd ray casting test. Points exactly on the boundary may go either way.
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = &polygon[i];
        let b = &polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Area and extent of the region shared by two polygons.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    /// Total shared area.
    pub area: f64,
    /// Lower-left corner of the shared region's bounding box.
    pub min: Point2,
    /// Upper-right corner of the shared region's bounding box.
    pub max: Point2,
}

/// Intersects two rectilinear polygons.
///
/// Both polygons are cut along every x and y coordinate either of them uses;
/// each resulting cell is either fully inside or fully outside each polygon,
/// so testing the cell centre is exact. Returns `None` when the shared area
/// does not exceed [`TOLERANCE`].
#[must_use]
pub fn rectilinear_intersection(a: &[Point2], b: &[Point2]) -> Option<Intersection> {
    let xs = sorted_unique(a.iter().chain(b).map(|p| p.x));
    let ys = sorted_unique(a.iter().chain(b).map(|p| p.y));

    let mut area = 0.0;
    let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);

    for xw in xs.windows(2) {
        for yw in ys.windows(2) {
            let centre = Point2::new((xw[0] + xw[1]) * 0.5, (yw[0] + yw[1]) * 0.5);
            if point_in_polygon(&centre, a) && point_in_polygon(&centre, b) {
                area += (xw[1] - xw[0]) * (yw[1] - yw[0]);
                min.x = min.x.min(xw[0]);
                min.y = min.y.min(yw[0]);
                max.x = max.x.max(xw[1]);
                max.y = max.y.max(yw[1]);
            }
        }
    }

    (area > TOLERANCE).then_some(Intersection { area, min, max })
}

fn sorted_unique(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    v.dedup_by(|a, b| (*a - *b).abs() <= TOLERANCE);
    v
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y1),
            Point2::new(x1, y1),
            Point2::new(x1, y0),
            Point2::new(x0, y0),
        ]
    }

    #[test]
    fn signed_area_follows_winding() {
        let cw = rect(0.0, 0.0, 2.0, 3.0);
        assert_relative_eq!(signed_area_2d(&cw), -6.0);
        let ccw: Vec<_> = cw.iter().rev().copied().collect();
        assert_relative_eq!(signed_area_2d(&ccw), 6.0);
        assert_relative_eq!(area_2d(&cw), 6.0);
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area_2d(&[Point2::new(0.0, 0.0)]).abs() < TOLERANCE);
        assert!(signed_area_2d(&[]).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_l_shape() {
        // 2x2 square with the upper-right 1x1 quadrant removed.
        let l = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let c = centroid_2d(&l);
        assert_relative_eq!(c.x, 5.0 / 6.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 5.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn point_in_polygon_basic() {
        let r = rect(0.0, 0.0, 4.0, 4.0);
        assert!(point_in_polygon(&Point2::new(2.0, 2.0), &r));
        assert!(!point_in_polygon(&Point2::new(5.0, 2.0), &r));
        assert!(!point_in_polygon(&Point2::new(2.0, -0.01), &r));
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let a = rect(0.0, 0.0, 2.0, 2.0);
        let b = rect(2.0, 0.0, 4.0, 2.0);
        assert!(rectilinear_intersection(&a, &b).is_none());
    }

    #[test]
    fn overlapping_rectangles_report_extent() {
        let a = rect(0.0, 0.0, 4.0, 4.0);
        let b = rect(3.0, 1.0, 6.0, 2.0);
        let hit = rectilinear_intersection(&a, &b).unwrap();
        assert_relative_eq!(hit.area, 1.0);
        assert_relative_eq!(hit.min.x, 3.0);
        assert_relative_eq!(hit.max.x, 4.0);
        assert_relative_eq!(hit.min.y, 1.0);
        assert_relative_eq!(hit.max.y, 2.0);
    }
}
