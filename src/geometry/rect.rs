use super::{Axis, Direction};
use crate::math::{Point2, TOLERANCE};

/// An axis-aligned rectangle, used for room bounding boxes and swept regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Rect {
    #[must_use]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_y: min_y.min(max_y),
            max_x: min_x.max(max_x),
            max_y: min_y.max(max_y),
        }
    }

    /// Bounding box of a point set. Returns `None` for an empty set.
    #[must_use]
    pub fn bounding(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut r = Self::new(first.x, first.y, first.x, first.y);
        for p in iter {
            r.min_x = r.min_x.min(p.x);
            r.min_y = r.min_y.min(p.y);
            r.max_x = r.max_x.max(p.x);
            r.max_y = r.max_y.max(p.y);
        }
        Some(r)
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.width(),
            Axis::Y => self.height(),
        }
    }

    /// `(min, max)` along an axis.
    #[must_use]
    pub fn span(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.min_x, self.max_x),
            Axis::Y => (self.min_y, self.max_y),
        }
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        Point2::new((self.min_x + self.max_x) * 0.5, (self.min_y + self.max_y) * 0.5)
    }

    /// Corners clockwise from the top-left, matching the wall order of
    /// generated rooms.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        [
            Point2::new(self.min_x, self.max_y),
            Point2::new(self.max_x, self.max_y),
            Point2::new(self.max_x, self.min_y),
            Point2::new(self.min_x, self.min_y),
        ]
    }

    /// Coordinate of the side facing `dir` (e.g. `max_y` for North).
    #[must_use]
    pub fn side(&self, dir: Direction) -> f64 {
        match dir {
            Direction::North => self.max_y,
            Direction::South => self.min_y,
            Direction::East => self.max_x,
            Direction::West => self.min_x,
        }
    }

    /// The band of depth `depth` lying just beyond the side facing `dir`,
    /// spanning the full perpendicular extent.
    #[must_use]
    pub fn strip(&self, dir: Direction, depth: f64) -> Self {
        let s = self.side(dir);
        let far = s + dir.sign() * depth;
        match dir.axis() {
            Axis::X => Self::new(s, self.min_y, far, self.max_y),
            Axis::Y => Self::new(self.min_x, s, self.max_x, far),
        }
    }

    /// Shared region with positive extent on both axes.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        let max_x = self.max_x.min(other.max_x);
        let max_y = self.max_y.min(other.max_y);
        (max_x - min_x > TOLERANCE && max_y - min_y > TOLERANCE)
            .then_some(Self { min_x, min_y, max_x, max_y })
    }

    /// Returns `true` when the interiors intersect; touching is not enough.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.intersection(other).is_some()
    }

    /// Signed distance from this rectangle's `dir` side to `other`'s
    /// opposite side. Positive when `other` lies clear beyond that side,
    /// zero when they touch, negative when they overlap along the axis.
    #[must_use]
    pub fn separation(&self, other: &Self, dir: Direction) -> f64 {
        (other.side(dir.opposite()) - self.side(dir)) * dir.sign()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bounding_box_of_points() {
        let r = Rect::bounding([
            Point2::new(30.0, 30.0),
            Point2::new(39.04, 30.0),
            Point2::new(39.04, 17.61),
            Point2::new(30.0, 17.61),
        ])
        .unwrap();
        assert_relative_eq!(r.width(), 9.04, epsilon = 1e-9);
        assert_relative_eq!(r.height(), 12.39, epsilon = 1e-9);
        assert!(Rect::bounding(std::iter::empty()).is_none());
    }

    #[test]
    fn strips_lie_beyond_each_side() {
        let r = Rect::new(0.0, 0.0, 4.0, 2.0);
        assert_eq!(r.strip(Direction::East, 1.0), Rect::new(4.0, 0.0, 5.0, 2.0));
        assert_eq!(r.strip(Direction::South, 0.5), Rect::new(0.0, -0.5, 4.0, 0.0));
        assert!(!r.overlaps(&r.strip(Direction::North, 3.0)));
    }

    #[test]
    fn separation_is_signed() {
        let a = Rect::new(0.0, 0.0, 4.0, 2.0);
        let b = Rect::new(6.0, 0.0, 8.0, 2.0);
        assert_relative_eq!(a.separation(&b, Direction::East), 2.0);
        assert_relative_eq!(b.separation(&a, Direction::West), 2.0);
        let c = Rect::new(3.0, 0.0, 5.0, 2.0);
        assert_relative_eq!(a.separation(&c, Direction::East), -1.0);
    }
}
