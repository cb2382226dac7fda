use super::contacts::RoomShape;
use crate::error::Result;
use crate::geometry::{Axis, Direction, Orientation, Rect};
use crate::math::polygon_2d::rectilinear_intersection;
use crate::math::segment_2d::span_overlap;
use crate::math::{Point2, TOLERANCE};
use crate::topology::{LayoutStore, RoomId, WallId};

/// Empty space between two parallel walls that face each other.
#[derive(Debug, Clone, Copy)]
pub struct Gap {
    pub room: RoomId,
    pub wall: WallId,
    pub other_room: RoomId,
    pub other_wall: WallId,
    /// Direction from `room` toward `other_room`.
    pub direction: Direction,
    /// Perpendicular distance between the two walls.
    pub distance: f64,
    /// The empty region between the facing parts of the walls.
    pub region: Rect,
}

/// Finds gaps between facing walls of different rooms.
///
/// Two walls form a gap when they are parallel, face each other, overlap
/// in projection, are further apart than the threshold, and nothing lies in
/// the rectangle between them.
pub struct FindGaps {
    threshold: f64,
}

impl FindGaps {
    /// Creates a new `FindGaps` query.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Executes the query. Gaps are returned closest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<Vec<Gap>> {
        let shapes = RoomShape::collect_all(store)?;
        let mut gaps = Vec::new();

        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                for &(wa, a0, a1) in &a.walls {
                    let Some(dir) = a.outward_side(&a0, &a1) else {
                        continue;
                    };
                    for &(wb, b0, b1) in &b.walls {
                        if Orientation::of(&a0, &a1) != Orientation::of(&b0, &b1) {
                            continue;
                        }
                        if b.outward_side(&b0, &b1) != Some(dir.opposite()) {
                            continue;
                        }
                        let Some(region) = facing_region(dir, (a0, a1), (b0, b1)) else {
                            continue;
                        };
                        let distance = region.extent(dir.axis());
                        if distance <= self.threshold || !is_empty(&region, &shapes) {
                            continue;
                        }
                        gaps.push(Gap {
                            room: a.id,
                            wall: wa,
                            other_room: b.id,
                            other_wall: wb,
                            direction: dir,
                            distance,
                            region,
                        });
                    }
                }
            }
        }

        gaps.sort_by(|x, y| x.distance.total_cmp(&y.distance));
        Ok(gaps)
    }
}

/// Rectangle between wall `a` and a wall `b` lying beyond it in `dir`.
fn facing_region(dir: Direction, a: (Point2, Point2), b: (Point2, Point2)) -> Option<Rect> {
    let (a_line, b_line, along) = match dir.axis() {
        Axis::Y => (a.0.y, b.0.y, (a.0.x, a.1.x, b.0.x, b.1.x)),
        Axis::X => (a.0.x, b.0.x, (a.0.y, a.1.y, b.0.y, b.1.y)),
    };
    if (b_line - a_line) * dir.sign() <= TOLERANCE {
        return None;
    }
    if span_overlap(along.0, along.1, along.2, along.3) <= TOLERANCE {
        return None;
    }
    let lo = along.0.min(along.1).max(along.2.min(along.3));
    let hi = along.0.max(along.1).min(along.2.max(along.3));
    Some(match dir.axis() {
        Axis::Y => Rect::new(lo, a_line, hi, b_line),
        Axis::X => Rect::new(a_line, lo, b_line, hi),
    })
}

fn is_empty(region: &Rect, shapes: &[RoomShape]) -> bool {
    let corners = region.corners();
    shapes.iter().all(|s| {
        !s.bounds.overlaps(region) || rectilinear_intersection(&corners, &s.polygon).is_none()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::fixtures::reference_apartment;
    use crate::plan::{rectangle_walls, FloorPlan};
    use approx::assert_relative_eq;

    #[test]
    fn reference_has_no_gaps() {
        let store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        assert!(FindGaps::new(0.1).execute(&store).unwrap().is_empty());
    }

    #[test]
    fn facing_walls_leave_a_gap() {
        let mut plan = FloorPlan::new();
        plan.insert("Lower", rectangle_walls(0.0, 0.0, 6.0, 4.0));
        plan.insert("Upper", rectangle_walls(2.0, 5.5, 8.0, 9.0));
        let store = LayoutStore::from_plan(&plan).unwrap();
        let gaps = FindGaps::new(0.1).execute(&store).unwrap();
        assert_eq!(gaps.len(), 1);
        let g = gaps[0];
        assert_eq!(store.room_name(g.room).unwrap(), "Lower");
        assert_eq!(g.direction, Direction::North);
        assert_relative_eq!(g.distance, 1.5);
        assert_eq!(g.region, Rect::new(2.0, 4.0, 6.0, 5.5));
    }

    #[test]
    fn blocked_gap_is_ignored() {
        let mut plan = FloorPlan::new();
        plan.insert("Lower", rectangle_walls(0.0, 0.0, 6.0, 4.0));
        plan.insert("Upper", rectangle_walls(0.0, 8.0, 6.0, 10.0));
        plan.insert("Middle", rectangle_walls(0.0, 4.0, 6.0, 8.0));
        let store = LayoutStore::from_plan(&plan).unwrap();
        assert!(FindGaps::new(0.1).execute(&store).unwrap().is_empty());
    }

    #[test]
    fn partially_blocked_gap_is_ignored() {
        let mut plan = FloorPlan::new();
        plan.insert("Lower", rectangle_walls(0.0, 0.0, 6.0, 4.0));
        plan.insert("Upper", rectangle_walls(0.0, 8.0, 6.0, 10.0));
        plan.insert("Post", rectangle_walls(2.0, 5.0, 3.0, 6.0));
        let store = LayoutStore::from_plan(&plan).unwrap();
        let gaps = FindGaps::new(0.1).execute(&store).unwrap();
        // Lower and Upper are blocked by the post; the post itself faces both.
        assert!(gaps.iter().all(|g| {
            let names = [
                store.room_name(g.room).unwrap(),
                store.room_name(g.other_room).unwrap(),
            ];
            names.contains(&"Post")
        }));
        assert_eq!(gaps.len(), 2);
    }
}
