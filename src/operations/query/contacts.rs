use crate::error::Result;
use crate::geometry::{Direction, Orientation, Rect};
use crate::math::polygon_2d::point_in_polygon;
use crate::math::segment_2d::collinear_overlap;
use crate::math::{Point2, TOLERANCE};
use crate::topology::{LayoutStore, RoomId, WallId};

/// Offset used to sample which side of a shared wall a room occupies.
const PROBE: f64 = 0.005;

/// Resolved geometry of one room, gathered once per query.
#[derive(Debug, Clone)]
pub struct RoomShape {
    pub id: RoomId,
    pub name: String,
    pub polygon: Vec<Point2>,
    pub bounds: Rect,
    pub walls: Vec<(WallId, Point2, Point2)>,
}

impl RoomShape {
    /// Collects the shapes of every room in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn collect_all(store: &LayoutStore) -> Result<Vec<Self>> {
        store
            .room_ids()
            .iter()
            .map(|&id| Self::collect(store, id))
            .collect()
    }

    /// Collects the shape of one room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing.
    pub fn collect(store: &LayoutStore, id: RoomId) -> Result<Self> {
        let room = store.room(id)?;
        let walls = room
            .walls
            .iter()
            .map(|&w| store.wall_points(w).map(|(a, b)| (w, a, b)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let polygon = store.room_polygon(id)?;
        let bounds = store.room_bounds(id)?;
        Ok(Self {
            id,
            name: room.name.clone(),
            polygon,
            bounds,
            walls,
        })
    }

    /// Side of this room on which the region beyond a boundary segment lies.
    ///
    /// Probes just inside each side of the segment's midpoint; the side that is
    /// *not* inside the room is the outward one.
    #[must_use]
    pub fn outward_side(&self, a: &Point2, b: &Point2) -> Option<Direction> {
        let mid = Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
        let inside = |p: Point2| point_in_polygon(&p, &self.polygon);
        match Orientation::of(a, b) {
            Orientation::Horizontal => {
                if inside(Point2::new(mid.x, mid.y - PROBE)) {
                    Some(Direction::North)
                } else if inside(Point2::new(mid.x, mid.y + PROBE)) {
                    Some(Direction::South)
                } else {
                    None
                }
            }
            Orientation::Vertical => {
                if inside(Point2::new(mid.x - PROBE, mid.y)) {
                    Some(Direction::East)
                } else if inside(Point2::new(mid.x + PROBE, mid.y)) {
                    Some(Direction::West)
                } else {
                    None
                }
            }
            Orientation::Diagonal => None,
        }
    }
}

/// A pair of walls from two different rooms lying on the same line with an
/// overlapping extent. Sharing only an endpoint is not a contact.
#[derive(Debug, Clone)]
pub struct Contact {
    pub room: RoomId,
    pub wall: WallId,
    pub other_room: RoomId,
    pub other_wall: WallId,
    pub orientation: Orientation,
    /// Length of the shared part.
    pub length: f64,
    /// Side of `room` on which `other_room` lies.
    pub direction: Option<Direction>,
    /// Side of `other_room` on which `room` lies.
    pub other_direction: Option<Direction>,
}

/// Finds every wall contact in the layout.
pub struct FindContacts;

impl FindContacts {
    /// Creates a new `FindContacts` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query. Each wall pair is reported once, with `room`
    /// preceding `other_room` in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<Vec<Contact>> {
        Ok(Self::between(&RoomShape::collect_all(store)?))
    }

    /// Contacts among already-collected shapes.
    #[must_use]
    pub fn between(shapes: &[RoomShape]) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                for &(wa, a0, a1) in &a.walls {
                    for &(wb, b0, b1) in &b.walls {
                        let length = collinear_overlap((&a0, &a1), (&b0, &b1));
                        if length <= TOLERANCE {
                            continue;
                        }
                        // Probe on the shared part so L-shaped rooms classify correctly.
                        let (s0, s1) = shared_part(a0, a1, b0, b1);
                        contacts.push(Contact {
                            room: a.id,
                            wall: wa,
                            other_room: b.id,
                            other_wall: wb,
                            orientation: Orientation::of(&a0, &a1),
                            length,
                            direction: a.outward_side(&s0, &s1),
                            other_direction: b.outward_side(&s0, &s1),
                        });
                    }
                }
            }
        }
        contacts
    }
}

impl Default for FindContacts {
    fn default() -> Self {
        Self::new()
    }
}

/// The overlapping portion of two collinear axis-aligned segments.
fn shared_part(a0: Point2, a1: Point2, b0: Point2, b1: Point2) -> (Point2, Point2) {
    if Orientation::of(&a0, &a1) == Orientation::Horizontal {
        let lo = a0.x.min(a1.x).max(b0.x.min(b1.x));
        let hi = a0.x.max(a1.x).min(b0.x.max(b1.x));
        (Point2::new(lo, a0.y), Point2::new(hi, a0.y))
    } else {
        let lo = a0.y.min(a1.y).max(b0.y.min(b1.y));
        let hi = a0.y.max(a1.y).min(b0.y.max(b1.y));
        (Point2::new(a0.x, lo), Point2::new(a0.x, hi))
    }
}
