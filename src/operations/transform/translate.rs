use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Direction, Rect};
use crate::math::polygon_2d::rectilinear_intersection;
use crate::policy::Policy;
use crate::topology::{LayoutStore, RoomId};

/// Rooms, other than those in `exclude`, whose interiors intersect `region`.
///
/// # Errors
///
/// Returns an error if the store is inconsistent.
pub fn occupants(store: &LayoutStore, region: &Rect, exclude: &[RoomId]) -> Result<Vec<RoomId>> {
    let corners = region.corners();
    let mut found = Vec::new();
    for &id in store.room_ids() {
        if exclude.contains(&id) || !store.room_bounds(id)?.overlaps(region) {
            continue;
        }
        if rectilinear_intersection(&corners, &store.room_polygon(id)?).is_some() {
            found.push(id);
        }
    }
    Ok(found)
}

/// Plans which rooms have to move together so that a set of seed rooms can
/// shift by `delta` along a direction.
///
/// The group starts as the seeds plus their related rooms. Every other room
/// standing in the band the group would sweep through joins it, together
/// with its own related rooms; this repeats at most `hops` times. The plan
/// is rejected when it still has blockers after the last hop or when a held
/// room stands in the way. Held rooms are never dragged in as relatives.
pub struct PlanPush<'a> {
    policy: &'a Policy,
    seeds: Vec<RoomId>,
    dir: Direction,
    delta: f64,
    held: Vec<RoomId>,
    hops: usize,
}

impl<'a> PlanPush<'a> {
    /// Creates a new `PlanPush` query with no held rooms and no extra hops.
    #[must_use]
    pub fn new(policy: &'a Policy, seeds: Vec<RoomId>, dir: Direction, delta: f64) -> Self {
        Self {
            policy,
            seeds,
            dir,
            delta,
            held: Vec::new(),
            hops: 0,
        }
    }

    /// Rooms that must stay where they are.
    #[must_use]
    pub fn holding(mut self, rooms: impl IntoIterator<Item = RoomId>) -> Self {
        self.held.extend(rooms);
        self
    }

    /// How many rings of blockers may be pulled into the group.
    #[must_use]
    pub fn hops(mut self, hops: usize) -> Self {
        self.hops = hops;
        self
    }

    /// Executes the query. Returns the rooms to shift, or `None` if no
    /// group within the hop bound can move freely.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<Option<Vec<RoomId>>> {
        let mut group = Vec::new();
        self.absorb(store, &mut group, &self.seeds)?;

        for hop in 0..=self.hops {
            if group.iter().any(|id| self.held.contains(id)) {
                trace!(hop, "push group reaches a held room");
                return Ok(None);
            }

            let mut blockers = Vec::new();
            for &id in &group {
                let band = store.room_bounds(id)?.strip(self.dir, self.delta);
                for other in occupants(store, &band, &group)? {
                    if !blockers.contains(&other) {
                        blockers.push(other);
                    }
                }
            }

            if blockers.is_empty() {
                trace!(hop, size = group.len(), direction = %self.dir, "push group found");
                return Ok(Some(group));
            }
            if hop == self.hops {
                break;
            }
            self.absorb(store, &mut group, &blockers)?;
        }
        Ok(None)
    }

    fn absorb(
        &self,
        store: &LayoutStore,
        group: &mut Vec<RoomId>,
        rooms: &[RoomId],
    ) -> Result<()> {
        for &id in rooms {
            if group.contains(&id) {
                continue;
            }
            group.push(id);
            for related in self.policy.related(store.room_name(id)?) {
                if let Ok(rid) = store.room_id(related) {
                    if !group.contains(&rid) && !self.held.contains(&rid) {
                        group.push(rid);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Moves a set of rooms as a block.
pub struct ShiftRooms<'a> {
    rooms: &'a [RoomId],
    dir: Direction,
    delta: f64,
}

impl<'a> ShiftRooms<'a> {
    /// Creates a new `ShiftRooms` operation.
    #[must_use]
    pub fn new(rooms: &'a [RoomId], dir: Direction, delta: f64) -> Self {
        Self { rooms, dir, delta }
    }

    /// Executes the shift, modifying the rooms in place.
    ///
    /// # Errors
    ///
    /// Returns an error if a room is missing.
    pub fn execute(&self, store: &mut LayoutStore) -> Result<()> {
        for &id in self.rooms {
            debug!(
                room = store.room_name(id)?,
                direction = %self.dir,
                delta = self.delta,
                "shifting room"
            );
            store.shift_room(id, self.dir, self.delta)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::fixtures::reference_apartment;
    use approx::assert_relative_eq;

    fn names(store: &LayoutStore, ids: &[RoomId]) -> Vec<String> {
        let mut v: Vec<String> = ids
            .iter()
            .map(|&id| store.room_name(id).unwrap().to_owned())
            .collect();
        v.sort();
        v
    }

    #[test]
    fn occupants_of_a_band() {
        let store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let kitchen = store.room_id("Kitchen").unwrap();
        let band = store.room_bounds(kitchen).unwrap().strip(Direction::North, 1.0);
        let found = occupants(&store, &band, &[kitchen]).unwrap();
        assert_eq!(names(&store, &found), ["Passage"]);

        let east = store
            .room_bounds(store.room_id("Living Room").unwrap())
            .unwrap()
            .strip(Direction::East, 5.0);
        assert!(occupants(&store, &east, &[]).unwrap().is_empty());
    }

    #[test]
    fn free_room_moves_alone() {
        let store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let policy = Policy::default();
        let living = store.room_id("Living Room").unwrap();
        let group = PlanPush::new(&policy, vec![living], Direction::East, 2.0)
            .execute(&store)
            .unwrap()
            .unwrap();
        assert_eq!(group, [living]);
    }

    #[test]
    fn blockers_need_a_hop() {
        let store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let policy = Policy::default();
        let kitchen = store.room_id("Kitchen").unwrap();
        let plan = PlanPush::new(&policy, vec![kitchen], Direction::East, 2.0);
        assert!(plan.execute(&store).unwrap().is_none());

        let group = PlanPush::new(&policy, vec![kitchen], Direction::East, 2.0)
            .hops(1)
            .execute(&store)
            .unwrap()
            .unwrap();
        assert_eq!(names(&store, &group), ["Kitchen", "Living Room"]);
    }

    #[test]
    fn related_rooms_join_unless_held() {
        let store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let policy = Policy::default();
        let passage = store.room_id("Passage").unwrap();
        let group = PlanPush::new(&policy, vec![passage], Direction::North, 1.0)
            .hops(2)
            .execute(&store)
            .unwrap()
            .unwrap();
        assert_eq!(
            names(&store, &group),
            ["Common Washroom", "En suite Washroom", "Master Bedroom", "Passage"]
        );

        let master = store.room_id("Master Bedroom").unwrap();
        let group = PlanPush::new(&policy, vec![passage], Direction::North, 1.0)
            .hops(2)
            .holding([master])
            .execute(&store)
            .unwrap()
            .unwrap();
        assert_eq!(
            names(&store, &group),
            ["Common Washroom", "En suite Washroom", "Passage"]
        );

        let washroom = store.room_id("Common Washroom").unwrap();
        let held = PlanPush::new(&policy, vec![passage], Direction::North, 1.0)
            .hops(2)
            .holding([washroom])
            .execute(&store)
            .unwrap();
        assert!(held.is_none());
    }

    #[test]
    fn shift_moves_the_block() {
        let mut store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let ids = [
            store.room_id("Kitchen").unwrap(),
            store.room_id("Living Room").unwrap(),
        ];
        ShiftRooms::new(&ids, Direction::South, 1.5)
            .execute(&mut store)
            .unwrap();
        assert_relative_eq!(store.room_bounds(ids[0]).unwrap().min_y, 15.18);
        assert_relative_eq!(store.room_bounds(ids[1]).unwrap().max_y, 33.02);
    }
}
