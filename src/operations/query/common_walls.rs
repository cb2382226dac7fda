use std::collections::{BTreeMap, BTreeSet};

use super::contacts::FindContacts;
use crate::error::Result;
use crate::geometry::Orientation;
use crate::topology::LayoutStore;

/// Two room names, smaller first.
pub type RoomPair = (String, String);

/// Orders two names into a [`RoomPair`].
#[must_use]
pub fn room_pair(a: &str, b: &str) -> RoomPair {
    if a <= b {
        (a.to_owned(), b.to_owned())
    } else {
        (b.to_owned(), a.to_owned())
    }
}

/// One shared wall stretch between two rooms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommonWall {
    pub orientation: Orientation,
    pub length: f64,
}

/// Shared walls of every touching room pair.
pub type CommonWallMap = BTreeMap<RoomPair, Vec<CommonWall>>;

/// Collects the common walls of every room pair.
pub struct CommonWalls;

impl CommonWalls {
    /// Creates a new `CommonWalls` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<CommonWallMap> {
        let mut map = CommonWallMap::new();
        for c in FindContacts::new().execute(store)? {
            let key = room_pair(store.room_name(c.room)?, store.room_name(c.other_room)?);
            map.entry(key).or_default().push(CommonWall {
                orientation: c.orientation,
                length: c.length,
            });
        }
        Ok(map)
    }
}

impl Default for CommonWalls {
    fn default() -> Self {
        Self::new()
    }
}

/// Orientations present in a list of common walls.
#[must_use]
pub fn orientations(walls: &[CommonWall]) -> BTreeSet<Orientation> {
    walls.iter().map(|w| w.orientation).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::fixtures::reference_apartment;

    #[test]
    fn reference_pairs() {
        let store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let map = CommonWalls::new().execute(&store).unwrap();
        let kitchen_living = &map[&room_pair("Living Room", "Kitchen")];
        assert_eq!(kitchen_living.len(), 1);
        assert_eq!(kitchen_living[0].orientation, Orientation::Vertical);
        assert!((kitchen_living[0].length - 5.6).abs() < 1e-9);
        assert!(!map.contains_key(&room_pair("Kitchen", "Common Washroom")));
        // MB-ES, MB-Kitchen, MB-Passage, ES-Passage, ES-CW, Kitchen-Passage,
        // Kitchen-Living, CW-Passage, CW-Living, Passage-Living.
        assert_eq!(map.len(), 10);
    }

    #[test]
    fn pair_is_ordered() {
        assert_eq!(room_pair("b", "a"), ("a".to_owned(), "b".to_owned()));
        assert_eq!(room_pair("a", "b"), room_pair("b", "a"));
    }
}
