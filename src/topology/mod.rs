pub mod room;
pub mod vertex;
pub mod wall;

pub use room::{RoomData, RoomId};
pub use vertex::{VertexData, VertexId};
pub use wall::{WallData, WallId};

use slotmap::SlotMap;

use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{Axis, Direction, Rect};
use crate::math::polygon_2d::{area_2d, centroid_2d};
use crate::math::snap::ValueSnapper;
use crate::math::{approx_eq, points_eq, round2, round_point, Point2};
use crate::plan::{FloorPlan, Segment};

/// Central arena that owns every room, wall and corner of a layout.
///
/// Walls reference corners by [`VertexId`]; consecutive walls of a room share
/// their common corner, so moving a corner updates both walls at once. Rooms
/// never share corners with each other: contact between rooms is a purely
/// geometric relation derived on demand.
#[derive(Debug, Default, Clone)]
pub struct LayoutStore {
    vertices: SlotMap<VertexId, VertexData>,
    walls: SlotMap<WallId, WallData>,
    rooms: SlotMap<RoomId, RoomData>,
    order: Vec<RoomId>,
}

impl LayoutStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a floor plan, rounding every coordinate to two
    /// decimals.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if a room has fewer than three walls,
    /// contains a non-finite coordinate, or is not a closed loop.
    pub fn from_plan(plan: &FloorPlan) -> Result<Self> {
        let mut store = Self::new();
        for (name, walls) in plan.rooms() {
            store.add_room(name, walls)?;
        }
        Ok(store)
    }

    /// Converts the store back to its value form.
    #[must_use]
    pub fn to_plan(&self) -> FloorPlan {
        self.order
            .iter()
            .filter_map(|&id| {
                let room = self.rooms.get(id)?;
                let walls = room
                    .walls
                    .iter()
                    .filter_map(|&w| self.wall_points(w).ok())
                    .map(|(a, b)| [[a.x, a.y], [b.x, b.y]])
                    .collect();
                Some((room.name.clone(), walls))
            })
            .collect()
    }

    /// Adds a room from its ordered wall list.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`] if the walls do not form a closed loop.
    pub fn add_room(&mut self, name: &str, walls: &[Segment]) -> Result<RoomId> {
        if walls.len() < 3 {
            return Err(GeometryError::TooFewWalls {
                room: name.to_owned(),
                count: walls.len(),
            }
            .into());
        }
        if walls.iter().flatten().flatten().any(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite(name.to_owned()).into());
        }

        let n = walls.len();
        for i in 0..n {
            let end = round_point(Point2::new(walls[i][1][0], walls[i][1][1]));
            let next = walls[(i + 1) % n][0];
            let next_start = round_point(Point2::new(next[0], next[1]));
            if !points_eq(&end, &next_start) {
                return Err(GeometryError::OpenPolygon {
                    room: name.to_owned(),
                    index: i,
                }
                .into());
            }
        }

        let corners: Vec<VertexId> = walls
            .iter()
            .map(|w| {
                let p = round_point(Point2::new(w[0][0], w[0][1]));
                self.vertices.insert(VertexData::new(p))
            })
            .collect();

        let room = self.rooms.insert(RoomData {
            name: name.to_owned(),
            walls: Vec::with_capacity(n),
        });
        let wall_ids: Vec<WallId> = (0..n)
            .map(|i| {
                self.walls.insert(WallData {
                    start: corners[i],
                    end: corners[(i + 1) % n],
                    room,
                })
            })
            .collect();
        if let Some(data) = self.rooms.get_mut(room) {
            data.walls = wall_ids;
        }
        self.order.push(room);
        Ok(room)
    }

    // --- Lookups ---

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> std::result::Result<&VertexData, TopologyError> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))
    }

    /// Returns a reference to the wall data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn wall(&self, id: WallId) -> std::result::Result<&WallData, TopologyError> {
        self.walls
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("wall".into()))
    }

    /// Returns a reference to the room data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn room(&self, id: RoomId) -> std::result::Result<&RoomData, TopologyError> {
        self.rooms
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("room".into()))
    }

    /// Room ids in insertion order.
    #[must_use]
    pub fn room_ids(&self) -> &[RoomId] {
        &self.order
    }

    /// Looks a room up by name.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::RoomNotFound`] if no room has that name.
    pub fn room_id(&self, name: &str) -> std::result::Result<RoomId, TopologyError> {
        self.order
            .iter()
            .copied()
            .find(|&id| self.rooms.get(id).is_some_and(|r| r.name == name))
            .ok_or_else(|| TopologyError::RoomNotFound(name.to_owned()))
    }

    #[must_use]
    pub fn contains_room(&self, name: &str) -> bool {
        self.room_id(name).is_ok()
    }

    /// Name of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is not in the store.
    pub fn room_name(&self, id: RoomId) -> std::result::Result<&str, TopologyError> {
        self.room(id).map(|r| r.name.as_str())
    }

    /// Endpoints of a wall.
    ///
    /// # Errors
    ///
    /// Returns an error if the wall or one of its corners is missing.
    pub fn wall_points(&self, id: WallId) -> std::result::Result<(Point2, Point2), TopologyError> {
        let wall = self.wall(id)?;
        Ok((self.vertex(wall.start)?.point, self.vertex(wall.end)?.point))
    }

    /// Corners of a room in boundary order.
    ///
    /// # Errors
    ///
    /// Returns an error if the room or one of its walls is missing.
    pub fn room_vertices(&self, id: RoomId) -> std::result::Result<Vec<VertexId>, TopologyError> {
        self.room(id)?
            .walls
            .iter()
            .map(|&w| self.wall(w).map(|wall| wall.start))
            .collect()
    }

    /// Boundary polygon of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room or one of its corners is missing.
    pub fn room_polygon(&self, id: RoomId) -> std::result::Result<Vec<Point2>, TopologyError> {
        self.room_vertices(id)?
            .into_iter()
            .map(|v| self.vertex(v).map(|d| d.point))
            .collect()
    }

    /// Bounding box of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing or has no corners.
    pub fn room_bounds(&self, id: RoomId) -> std::result::Result<Rect, TopologyError> {
        Rect::bounding(self.room_polygon(id)?)
            .ok_or_else(|| TopologyError::EntityNotFound("room corners".into()))
    }

    /// Area of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing.
    pub fn room_area(&self, id: RoomId) -> std::result::Result<f64, TopologyError> {
        Ok(area_2d(&self.room_polygon(id)?))
    }

    /// Area centroid of a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing.
    pub fn room_centroid(&self, id: RoomId) -> std::result::Result<Point2, TopologyError> {
        Ok(centroid_2d(&self.room_polygon(id)?))
    }

    /// Sum of all room areas.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn total_area(&self) -> std::result::Result<f64, TopologyError> {
        self.order.iter().map(|&id| self.room_area(id)).sum()
    }

    // --- Edits ---

    /// Moves a set of corners by `delta` along `dir`, keeping two-decimal
    /// precision. Every wall touching a moved corner follows it.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex is missing.
    pub fn translate_vertices(
        &mut self,
        ids: &[VertexId],
        dir: Direction,
        delta: f64,
    ) -> std::result::Result<(), TopologyError> {
        let d = dir.sign() * delta;
        for &id in ids {
            let vertex = self
                .vertices
                .get_mut(id)
                .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))?;
            match dir.axis() {
                Axis::X => vertex.point.x = round2(vertex.point.x + d),
                Axis::Y => vertex.point.y = round2(vertex.point.y + d),
            }
        }
        Ok(())
    }

    /// Places a corner at `point`, rounded to two decimals.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing.
    pub fn move_vertex(
        &mut self,
        id: VertexId,
        point: Point2,
    ) -> std::result::Result<(), TopologyError> {
        let vertex = self
            .vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()))?;
        vertex.point = round_point(point);
        Ok(())
    }

    /// Moves the room's side facing `dir` outward by `delta` (inward when
    /// `delta` is negative). Every corner lying on that side moves.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing.
    pub fn extend_room(
        &mut self,
        id: RoomId,
        dir: Direction,
        delta: f64,
    ) -> std::result::Result<(), TopologyError> {
        let side = self.room_bounds(id)?.side(dir);
        let mut on_side = Vec::new();
        for v in self.room_vertices(id)? {
            let p = self.vertex(v)?.point;
            let coord = match dir.axis() {
                Axis::X => p.x,
                Axis::Y => p.y,
            };
            if approx_eq(coord, side) {
                on_side.push(v);
            }
        }
        self.translate_vertices(&on_side, dir, delta)
    }

    /// Moves a whole room by `delta` along `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing.
    pub fn shift_room(
        &mut self,
        id: RoomId,
        dir: Direction,
        delta: f64,
    ) -> std::result::Result<(), TopologyError> {
        let corners = self.room_vertices(id)?;
        self.translate_vertices(&corners, dir, delta)
    }

    /// Snaps every coordinate in the layout onto its group representative.
    ///
    /// X and Y values are grouped separately.
    pub fn snap(&mut self, tolerance: f64) {
        let xs = ValueSnapper::new(self.vertices.values().map(|v| v.point.x), tolerance);
        let ys = ValueSnapper::new(self.vertices.values().map(|v| v.point.y), tolerance);
        for v in self.vertices.values_mut() {
            v.point = Point2::new(xs.snap(v.point.x), ys.snap(v.point.y));
        }
    }
}
