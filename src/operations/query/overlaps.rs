use super::contacts::RoomShape;
use crate::error::Result;
use crate::geometry::Axis;
use crate::math::polygon_2d::rectilinear_intersection;
use crate::topology::{LayoutStore, RoomId};

/// Two rooms whose interiors intersect.
#[derive(Debug, Clone, Copy)]
pub struct Overlap {
    pub first: RoomId,
    pub second: RoomId,
    pub area: f64,
    /// Width of the shared region's bounding box.
    pub depth_x: f64,
    /// Height of the shared region's bounding box.
    pub depth_y: f64,
}

impl Overlap {
    /// Axis along which the overlap is shallowest, i.e. the cheapest axis
    /// to separate the two rooms along.
    #[must_use]
    pub fn axis(&self) -> Axis {
        if self.depth_x <= self.depth_y {
            Axis::X
        } else {
            Axis::Y
        }
    }

    /// Overlap depth along [`Self::axis`].
    #[must_use]
    pub fn depth(&self) -> f64 {
        self.depth_x.min(self.depth_y)
    }

    #[must_use]
    pub fn involves(&self, room: RoomId) -> bool {
        self.first == room || self.second == room
    }
}

/// Finds every pair of overlapping rooms.
pub struct FindOverlaps {
    threshold: f64,
}

impl FindOverlaps {
    /// Creates a new `FindOverlaps` query; intersections with an area at or
    /// below `threshold` are ignored.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<Vec<Overlap>> {
        let shapes = RoomShape::collect_all(store)?;
        let mut found = Vec::new();
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                if !a.bounds.overlaps(&b.bounds) {
                    continue;
                }
                let Some(hit) = rectilinear_intersection(&a.polygon, &b.polygon) else {
                    continue;
                };
                if hit.area > self.threshold {
                    found.push(Overlap {
                        first: a.id,
                        second: b.id,
                        area: hit.area,
                        depth_x: hit.max.x - hit.min.x,
                        depth_y: hit.max.y - hit.min.y,
                    });
                }
            }
        }
        Ok(found)
    }
}
