use super::room::RoomId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a wall in the layout store.
    pub struct WallId;
}

/// Data associated with a wall segment.
///
/// A wall belongs to exactly one room and runs from `start` to `end`.
#[derive(Debug, Clone)]
pub struct WallData {
    /// Start corner of the wall.
    pub start: VertexId,
    /// End corner of the wall; also the start of the next wall in the room.
    pub end: VertexId,
    /// Owning room.
    pub room: RoomId,
}
