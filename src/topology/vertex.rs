use crate::math::Point2;

slotmap::new_key_type! {
    /// Unique identifier for a wall corner in the layout store.
    pub struct VertexId;
}

/// A wall corner. Consecutive walls of one room share the same vertex, so
/// moving it moves both walls.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 2D position of the vertex.
    pub point: Point2,
}

impl VertexData {
    /// Creates a new vertex at the given point.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }
}
