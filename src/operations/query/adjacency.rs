use std::collections::BTreeMap;

use super::contacts::{Contact, FindContacts};
use crate::error::Result;
use crate::geometry::Direction;
use crate::topology::{LayoutStore, RoomId};

/// Neighbouring room names per direction.
pub type AdjacencyMap = BTreeMap<Direction, Vec<String>>;

/// Computes the neighbours of one room.
pub struct Adjacency {
    room: RoomId,
}

impl Adjacency {
    /// Creates a new `Adjacency` query.
    #[must_use]
    pub fn new(room: RoomId) -> Self {
        Self { room }
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<AdjacencyMap> {
        let contacts = FindContacts::new().execute(store)?;
        let mut map = AdjacencyMap::new();
        for (dir, other) in sides_of(self.room, &contacts) {
            let name = store.room_name(other)?.to_owned();
            let list = map.entry(dir).or_default();
            if !list.contains(&name) {
                list.push(name);
            }
        }
        Ok(map)
    }
}

/// Computes the neighbours of every room, keyed by room name.
pub struct AdjacencyGraph;

impl AdjacencyGraph {
    /// Creates a new `AdjacencyGraph` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<BTreeMap<String, AdjacencyMap>> {
        let mut graph = BTreeMap::new();
        for &id in store.room_ids() {
            graph.insert(
                store.room_name(id)?.to_owned(),
                Adjacency::new(id).execute(store)?,
            );
        }
        Ok(graph)
    }
}

impl Default for AdjacencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Rooms touching `room` on side `dir`, in store order.
///
/// # Errors
///
/// Returns an error if the store is inconsistent.
pub fn neighbors_in(store: &LayoutStore, room: RoomId, dir: Direction) -> Result<Vec<RoomId>> {
    let contacts = FindContacts::new().execute(store)?;
    let mut out: Vec<RoomId> = Vec::new();
    for (d, other) in sides_of(room, &contacts) {
        if d == dir && !out.contains(&other) {
            out.push(other);
        }
    }
    Ok(out)
}

/// `(direction, neighbour)` for every contact involving `room`.
/// Contacts whose direction cannot be classified are skipped.
fn sides_of(room: RoomId, contacts: &[Contact]) -> impl Iterator<Item = (Direction, RoomId)> + '_ {
    contacts.iter().filter_map(move |c| {
        if c.room == room {
            c.direction.map(|d| (d, c.other_room))
        } else if c.other_room == room {
            c.other_direction.map(|d| (d, c.room))
        } else {
            None
        }
    })
}
