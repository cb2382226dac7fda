use std::collections::BTreeSet;

use super::contacts::{FindContacts, RoomShape};
use crate::diagnostics::Diagnostic;
use crate::error::{Result, TopologyError};
use crate::geometry::{Axis, Direction, Orientation, Rect};
use crate::math::polygon_2d::area_2d;
use crate::math::segment_2d::segment_length;
use crate::math::{approx_eq, Point2};
use crate::topology::{LayoutStore, RoomId, WallId};

/// Derived attributes of one wall.
#[derive(Debug, Clone)]
pub struct WallMetadata {
    pub id: WallId,
    /// Position of the wall in its room's boundary order.
    pub index: usize,
    pub start: Point2,
    pub end: Point2,
    pub length: f64,
    pub orientation: Orientation,
    /// Side of the room's bounding box the wall lies on; `None` for walls
    /// inside the box (notches of L-shaped rooms) and for diagonal walls.
    pub direction: Option<Direction>,
    /// Other walls of the same room with the same orientation.
    pub parallel: Vec<WallId>,
    /// `true` when no wall of another room touches this one.
    pub is_free: bool,
}

/// Derived attributes of one room.
#[derive(Debug, Clone)]
pub struct RoomMetadata {
    pub id: RoomId,
    pub name: String,
    pub bounds: Rect,
    pub area: f64,
    pub walls: Vec<WallMetadata>,
}

impl RoomMetadata {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    /// Width for `Axis::X`, height for `Axis::Y`.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        self.bounds.extent(axis)
    }

    /// Walls labelled with `dir`.
    pub fn walls_facing(&self, dir: Direction) -> impl Iterator<Item = &WallMetadata> {
        self.walls.iter().filter(move |w| w.direction == Some(dir))
    }

    /// A direction is free when the room has at least one wall labelled with
    /// it and all such walls are free.
    #[must_use]
    pub fn is_direction_free(&self, dir: Direction) -> bool {
        let mut facing = self.walls_facing(dir).peekable();
        facing.peek().is_some() && facing.all(|w| w.is_free)
    }
}

/// Per-room wall attributes for the whole layout.
///
/// This is a derived view; rebuild it after every structural change.
#[derive(Debug, Clone, Default)]
pub struct LayoutMetadata {
    rooms: Vec<RoomMetadata>,
}

impl LayoutMetadata {
    /// Looks a room up by name.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::RoomNotFound`] if the name is unknown.
    pub fn room(&self, name: &str) -> std::result::Result<&RoomMetadata, TopologyError> {
        self.rooms
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| TopologyError::RoomNotFound(name.to_owned()))
    }

    #[must_use]
    pub fn get(&self, id: RoomId) -> Option<&RoomMetadata> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomMetadata> {
        self.rooms.iter()
    }

    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.rooms.iter().map(|r| r.area).sum()
    }

    /// Diagonal or unclassifiable walls, one entry per wall.
    #[must_use]
    pub fn degenerate_walls(&self) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for room in &self.rooms {
            for wall in &room.walls {
                let reason = if wall.orientation == Orientation::Diagonal {
                    "diagonal wall"
                } else if wall.direction.is_none() {
                    "wall direction unknown"
                } else {
                    continue;
                };
                out.push(Diagnostic::DegenerateGeometry {
                    room: room.name.clone(),
                    wall: wall.index,
                    reason: reason.to_owned(),
                });
            }
        }
        out
    }
}

/// Builds [`LayoutMetadata`] from the current geometry.
pub struct BuildMetadata;

impl BuildMetadata {
    /// Creates a new `BuildMetadata` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<LayoutMetadata> {
        let shapes = RoomShape::collect_all(store)?;
        let touched: BTreeSet<WallId> = FindContacts::between(&shapes)
            .iter()
            .flat_map(|c| [c.wall, c.other_wall])
            .collect();

        let rooms = shapes
            .iter()
            .map(|shape| {
                let orientations: Vec<Orientation> = shape
                    .walls
                    .iter()
                    .map(|(_, a, b)| Orientation::of(a, b))
                    .collect();
                let walls = shape
                    .walls
                    .iter()
                    .enumerate()
                    .map(|(index, &(id, start, end))| {
                        let orientation = orientations[index];
                        let parallel = shape
                            .walls
                            .iter()
                            .zip(&orientations)
                            .filter(|((other, _, _), o)| *other != id && **o == orientation)
                            .map(|((other, _, _), _)| *other)
                            .collect();
                        WallMetadata {
                            id,
                            index,
                            start,
                            end,
                            length: segment_length(&start, &end),
                            orientation,
                            direction: wall_direction(&shape.bounds, &start, orientation),
                            parallel,
                            is_free: !touched.contains(&id),
                        }
                    })
                    .collect();
                RoomMetadata {
                    id: shape.id,
                    name: shape.name.clone(),
                    bounds: shape.bounds,
                    area: area_2d(&shape.polygon),
                    walls,
                }
            })
            .collect();

        Ok(LayoutMetadata { rooms })
    }
}

impl Default for BuildMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Labels a wall by the bounding-box side it lies on.
fn wall_direction(bounds: &Rect, start: &Point2, orientation: Orientation) -> Option<Direction> {
    match orientation {
        Orientation::Horizontal if approx_eq(start.y, bounds.max_y) => Some(Direction::North),
        Orientation::Horizontal if approx_eq(start.y, bounds.min_y) => Some(Direction::South),
        Orientation::Vertical if approx_eq(start.x, bounds.min_x) => Some(Direction::West),
        Orientation::Vertical if approx_eq(start.x, bounds.max_x) => Some(Direction::East),
        _ => None,
    }
}
