mod adjacency;
mod common_walls;
mod contacts;
mod dimensions;
mod gaps;
mod metadata;
mod overlaps;

pub use adjacency::{neighbors_in, Adjacency, AdjacencyGraph, AdjacencyMap};
pub use common_walls::{
    orientations, room_pair, CommonWall, CommonWallMap, CommonWalls, RoomPair,
};
pub use contacts::{Contact, FindContacts, RoomShape};
pub use dimensions::ValidateDimensions;
pub use gaps::{FindGaps, Gap};
pub use metadata::{BuildMetadata, LayoutMetadata, RoomMetadata, WallMetadata};
pub use overlaps::{FindOverlaps, Overlap};
