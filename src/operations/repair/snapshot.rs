use crate::error::Result;
use crate::operations::query::{orientations, CommonWallMap, CommonWalls, RoomPair};
use crate::plan::FloorPlan;
use crate::topology::LayoutStore;

/// Value copy of a layout and its shared walls, taken before an edit.
#[derive(Debug, Clone)]
pub struct LayoutSnapshot {
    plan: FloorPlan,
    common: CommonWallMap,
}

impl LayoutSnapshot {
    /// Captures the current state of `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn capture(store: &LayoutStore) -> Result<Self> {
        Ok(Self {
            plan: store.to_plan(),
            common: CommonWalls::new().execute(store)?,
        })
    }

    #[must_use]
    pub fn plan(&self) -> &FloorPlan {
        &self.plan
    }

    #[must_use]
    pub fn common_walls(&self) -> &CommonWallMap {
        &self.common
    }
}

/// Finds room pairs that shared a wall in a snapshot but no longer do, or
/// whose shared walls changed orientation. Pairs involving a room that no
/// longer exists are ignored.
pub struct FindBrokenConnections<'a> {
    before: &'a LayoutSnapshot,
}

impl<'a> FindBrokenConnections<'a> {
    /// Creates a new `FindBrokenConnections` query.
    #[must_use]
    pub fn new(before: &'a LayoutSnapshot) -> Self {
        Self { before }
    }

    /// Executes the query. Pairs are returned in name order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<Vec<RoomPair>> {
        let after = CommonWalls::new().execute(store)?;
        let broken = self
            .before
            .common
            .iter()
            .filter(|((a, b), _)| store.contains_room(a) && store.contains_room(b))
            .filter(|(pair, walls)| {
                !matches!(
                    after.get(*pair),
                    Some(now) if orientations(now) == orientations(walls)
                )
            })
            .map(|(pair, _)| pair.clone())
            .collect();
        Ok(broken)
    }
}
