use crate::error::Result;
use crate::geometry::{Axis, Direction, Rect};
use crate::math::polygon_2d::centroid_2d;
use crate::math::TOLERANCE;
use crate::plan::FloorPlan;
use crate::topology::{LayoutStore, RoomId};

/// How one room moved since a snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftDescriptor {
    /// Dominant direction of the centroid's movement; `None` if it did not
    /// move.
    pub direction: Option<Direction>,
    /// Largest displacement of a bounding-box side along that direction's
    /// axis.
    pub magnitude: f64,
}

impl ShiftDescriptor {
    const STILL: Self = Self {
        direction: None,
        magnitude: 0.0,
    };

    #[must_use]
    pub fn is_still(&self) -> bool {
        self.direction.is_none() || self.magnitude <= TOLERANCE
    }
}

/// Roles of the two rooms of a broken pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairShift {
    /// The room that moved less.
    pub anchor: RoomId,
    /// The room that moved more.
    pub shifted: RoomId,
    /// Side of `anchor` on which `shifted` lies, along the axis of the move.
    pub side: Direction,
    pub magnitude: f64,
    /// Set when neither room moved and the roles come from their positions
    /// alone.
    pub overlapping: bool,
}

/// Compares rooms against their positions in an earlier plan.
pub struct AnalyzeShift<'a> {
    before: &'a FloorPlan,
}

impl<'a> AnalyzeShift<'a> {
    /// Creates a new `AnalyzeShift` query.
    #[must_use]
    pub fn new(before: &'a FloorPlan) -> Self {
        Self { before }
    }

    /// Describes how one room moved. A room absent from the earlier plan
    /// counts as not moved.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing.
    pub fn room(&self, store: &LayoutStore, id: RoomId) -> Result<ShiftDescriptor> {
        let Some(old) = self.before.polygon(store.room_name(id)?) else {
            return Ok(ShiftDescriptor::STILL);
        };
        let Some(old_bounds) = Rect::bounding(old.iter().copied()) else {
            return Ok(ShiftDescriptor::STILL);
        };
        let new_bounds = store.room_bounds(id)?;

        let moved = store.room_centroid(id)? - centroid_2d(&old);
        if moved.x.abs() <= TOLERANCE && moved.y.abs() <= TOLERANCE {
            return Ok(ShiftDescriptor::STILL);
        }
        let (axis, amount) = if moved.x.abs() >= moved.y.abs() {
            (Axis::X, moved.x)
        } else {
            (Axis::Y, moved.y)
        };
        let (old_lo, old_hi) = old_bounds.span(axis);
        let (new_lo, new_hi) = new_bounds.span(axis);
        Ok(ShiftDescriptor {
            direction: Some(Direction::along(axis, amount)),
            magnitude: (new_lo - old_lo).abs().max((new_hi - old_hi).abs()),
        })
    }

    /// Decides which room of a pair is the anchor and on which side of it
    /// the other one lies.
    ///
    /// # Errors
    ///
    /// Returns an error if either room is missing.
    pub fn pair(&self, store: &LayoutStore, a: RoomId, b: RoomId) -> Result<PairShift> {
        let (da, db) = (self.room(store, a)?, self.room(store, b)?);
        let (ba, bb) = (store.room_bounds(a)?, store.room_bounds(b)?);

        if da.is_still() && db.is_still() {
            let side = Direction::ALL
                .into_iter()
                .max_by(|&x, &y| ba.separation(&bb, x).total_cmp(&ba.separation(&bb, y)))
                .unwrap_or(Direction::East);
            return Ok(PairShift {
                anchor: a,
                shifted: b,
                side,
                magnitude: 0.0,
                overlapping: true,
            });
        }

        let (anchor, shifted, moved, anchor_bounds, shifted_bounds) =
            if db.is_still() || (!da.is_still() && da.magnitude > db.magnitude) {
                (b, a, da, bb, ba)
            } else {
                (a, b, db, ba, bb)
            };
        let axis = moved.direction.map_or(Axis::X, Direction::axis);
        let offset = midpoint(&shifted_bounds, axis) - midpoint(&anchor_bounds, axis);
        Ok(PairShift {
            anchor,
            shifted,
            side: Direction::along(axis, offset),
            magnitude: moved.magnitude,
            overlapping: false,
        })
    }
}

fn midpoint(bounds: &Rect, axis: Axis) -> f64 {
    let (lo, hi) = bounds.span(axis);
    (lo + hi) * 0.5
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::fixtures::reference_apartment;
    use approx::assert_relative_eq;

    #[test]
    fn unmoved_room_is_still() {
        let plan = reference_apartment();
        let store = LayoutStore::from_plan(&plan).unwrap();
        let kitchen = store.room_id("Kitchen").unwrap();
        assert!(AnalyzeShift::new(&plan).room(&store, kitchen).unwrap().is_still());
    }

    #[test]
    fn moved_room_reports_direction_and_distance() {
        let plan = reference_apartment();
        let mut store = LayoutStore::from_plan(&plan).unwrap();
        let living = store.room_id("Living Room").unwrap();
        store.shift_room(living, Direction::East, 6.0).unwrap();
        let d = AnalyzeShift::new(&plan).room(&store, living).unwrap();
        assert_eq!(d.direction, Some(Direction::East));
        assert_relative_eq!(d.magnitude, 6.0, epsilon = 1e-9);
    }

    #[test]
    fn growth_counts_as_a_shift() {
        let plan = reference_apartment();
        let mut store = LayoutStore::from_plan(&plan).unwrap();
        let kitchen = store.room_id("Kitchen").unwrap();
        store.extend_room(kitchen, Direction::South, 2.0).unwrap();
        let d = AnalyzeShift::new(&plan).room(&store, kitchen).unwrap();
        assert_eq!(d.direction, Some(Direction::South));
        assert_relative_eq!(d.magnitude, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn pair_roles() {
        let plan = reference_apartment();
        let mut store = LayoutStore::from_plan(&plan).unwrap();
        let kitchen = store.room_id("Kitchen").unwrap();
        let living = store.room_id("Living Room").unwrap();
        store.shift_room(living, Direction::East, 6.0).unwrap();
        let analyze = AnalyzeShift::new(&plan);

        for (a, b) in [(kitchen, living), (living, kitchen)] {
            let p = analyze.pair(&store, a, b).unwrap();
            assert_eq!(p.anchor, kitchen);
            assert_eq!(p.shifted, living);
            assert_eq!(p.side, Direction::East);
            assert!(!p.overlapping);
        }
    }

    #[test]
    fn still_pair_falls_back_to_positions() {
        let plan = reference_apartment();
        let store = LayoutStore::from_plan(&plan).unwrap();
        let kitchen = store.room_id("Kitchen").unwrap();
        let passage = store.room_id("Passage").unwrap();
        let p = AnalyzeShift::new(&plan).pair(&store, kitchen, passage).unwrap();
        assert_eq!(p.side, Direction::North);
        assert!(p.overlapping);
        assert_relative_eq!(p.magnitude, 0.0);
    }
}
