use super::wall::WallId;

slotmap::new_key_type! {
    /// Unique identifier for a room in the layout store.
    pub struct RoomId;
}

/// A named room bounded by a closed loop of walls.
#[derive(Debug, Clone)]
pub struct RoomData {
    /// Unique room name, also used as the constraint type key.
    pub name: String,
    /// Walls in boundary order.
    pub walls: Vec<WallId>,
}
