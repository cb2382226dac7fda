use std::collections::BTreeSet;

use tracing::debug;

use super::shift::{AnalyzeShift, PairShift};
use super::snapshot::LayoutSnapshot;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::geometry::Orientation;
use crate::math::TOLERANCE;
use crate::operations::query::{orientations, FindContacts, RoomPair, RoomShape};
use crate::operations::resize::ResizeRoom;
use crate::operations::LayoutContext;
use crate::topology::{LayoutStore, RoomId};

/// How a broken connection was repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitchMethod {
    /// The shifted room's side facing the anchor was pulled back out of the
    /// anchor.
    ShrinkShifted,
    /// The anchor grew toward the shifted room.
    GrowAnchor,
    /// The shifted room grew back toward the anchor.
    GrowShifted,
}

/// Reconnects room pairs that lost their shared wall.
///
/// For each pair the room that moved more is the shifted room, the other is
/// the anchor. When the shifted room now cuts into the anchor, its facing
/// side is pulled back by the overlap depth. When a gap opened, the anchor
/// grows across it if it can, otherwise the shifted room grows back. Each
/// strategy is tried on a copy of the layout and kept only if the two rooms
/// touch again. Held rooms are never resized. Pairs no strategy can repair
/// are reported as [`Diagnostic::UnstitchableConnection`].
pub struct StitchConnections<'a> {
    ctx: LayoutContext<'a>,
    before: &'a LayoutSnapshot,
    pairs: Vec<RoomPair>,
    held: BTreeSet<String>,
}

impl<'a> StitchConnections<'a> {
    /// Creates a new `StitchConnections` operation for `pairs`.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>, before: &'a LayoutSnapshot, pairs: Vec<RoomPair>) -> Self {
        Self {
            ctx,
            before,
            pairs,
            held: BTreeSet::new(),
        }
    }

    /// Rooms whose size must not change while stitching.
    #[must_use]
    pub fn holding<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.held.extend(rooms.into_iter().map(Into::into));
        self
    }

    /// Executes the stitching and returns the repaired pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(
        &self,
        store: &mut LayoutStore,
        diagnostics: &mut Diagnostics,
    ) -> Result<Vec<(RoomPair, StitchMethod)>> {
        let analyze = AnalyzeShift::new(self.before.plan());
        let mut repaired = Vec::new();

        for pair in &self.pairs {
            let (Ok(a), Ok(b)) = (store.room_id(&pair.0), store.room_id(&pair.1)) else {
                continue;
            };
            // An earlier repair may already have fixed this pair.
            if self.is_intact(store, pair, a, b)? {
                continue;
            }

            let shift = analyze.pair(store, a, b)?;
            match self.stitch(store, &shift)? {
                Some(method) => {
                    debug!(first = %pair.0, second = %pair.1, ?method, "stitched connection");
                    repaired.push((pair.clone(), method));
                }
                None => diagnostics.push(Diagnostic::UnstitchableConnection {
                    rooms: pair.clone(),
                    direction: Some(shift.side),
                }),
            }
        }
        Ok(repaired)
    }

    fn stitch(&self, store: &mut LayoutStore, shift: &PairShift) -> Result<Option<StitchMethod>> {
        let anchor_bounds = store.room_bounds(shift.anchor)?;
        let shifted_bounds = store.room_bounds(shift.shifted)?;
        let gap = anchor_bounds.separation(&shifted_bounds, shift.side);

        let methods: &[StitchMethod] = if gap < -TOLERANCE {
            &[StitchMethod::ShrinkShifted]
        } else if gap > TOLERANCE {
            &[StitchMethod::GrowAnchor, StitchMethod::GrowShifted]
        } else {
            &[]
        };

        for &method in methods {
            let resized = match method {
                StitchMethod::GrowAnchor => shift.anchor,
                StitchMethod::ShrinkShifted | StitchMethod::GrowShifted => shift.shifted,
            };
            if self.held.contains(store.room_name(resized)?) {
                continue;
            }
            let mut trial = store.clone();
            let applied = match method {
                StitchMethod::ShrinkShifted => {
                    if shifted_bounds.extent(shift.side.axis()) + gap <= TOLERANCE {
                        false
                    } else {
                        trial.extend_room(shift.shifted, shift.side.opposite(), gap)?;
                        true
                    }
                }
                StitchMethod::GrowAnchor => {
                    ResizeRoom::toward(self.ctx, shift.anchor, shift.side, gap)
                        .execute(&mut trial)?
                        .is_applied()
                }
                StitchMethod::GrowShifted => {
                    ResizeRoom::toward(self.ctx, shift.shifted, shift.side.opposite(), gap)
                        .execute(&mut trial)?
                        .is_applied()
                }
            };
            if applied && touching(&trial, shift.anchor, shift.shifted)? {
                *store = trial;
                return Ok(Some(method));
            }
        }
        Ok(None)
    }

    fn is_intact(
        &self,
        store: &LayoutStore,
        pair: &RoomPair,
        a: RoomId,
        b: RoomId,
    ) -> Result<bool> {
        let Some(before) = self.before.common_walls().get(pair) else {
            return Ok(true);
        };
        let shapes = [RoomShape::collect(store, a)?, RoomShape::collect(store, b)?];
        let now: BTreeSet<Orientation> = FindContacts::between(&shapes)
            .iter()
            .map(|c| c.orientation)
            .collect();
        Ok(!now.is_empty() && now == orientations(before))
    }
}

fn touching(store: &LayoutStore, a: RoomId, b: RoomId) -> Result<bool> {
    let shapes = [RoomShape::collect(store, a)?, RoomShape::collect(store, b)?];
    Ok(!FindContacts::between(&shapes).is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::geometry::Direction;
    use crate::operations::query::room_pair;
    use crate::operations::repair::FindBrokenConnections;
    use crate::plan::fixtures::reference_apartment;
    use crate::plan::{rectangle_walls, FloorPlan};
    use crate::policy::Policy;
    use approx::assert_relative_eq;

    fn stitch_all(
        store: &mut LayoutStore,
        before: &LayoutSnapshot,
    ) -> (Vec<(RoomPair, StitchMethod)>, Diagnostics) {
        let (policy, config) = (Policy::default(), SolverConfig::default());
        let broken = FindBrokenConnections::new(before).execute(store).unwrap();
        let mut diags = Diagnostics::new();
        let done = StitchConnections::new(LayoutContext::new(&policy, &config), before, broken)
            .execute(store, &mut diags)
            .unwrap();
        (done, diags)
    }

    #[test]
    fn anchor_grows_across_the_gap() {
        let mut store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let before = LayoutSnapshot::capture(&store).unwrap();
        let living = store.room_id("Living Room").unwrap();
        store.shift_room(living, Direction::East, 2.0).unwrap();

        let (done, diags) = stitch_all(&mut store, &before);
        assert!(done.contains(&(room_pair("Kitchen", "Living Room"), StitchMethod::GrowAnchor)));
        assert_eq!(done.len(), 3);
        assert!(diags.is_empty(), "{diags:?}");
        let kitchen = store.room_bounds(store.room_id("Kitchen").unwrap()).unwrap();
        assert_relative_eq!(kitchen.max_x, 47.9);
        assert!(FindBrokenConnections::new(&before).execute(&store).unwrap().is_empty());
    }

    #[test]
    fn shifted_room_is_pulled_back() {
        let mut plan = FloorPlan::new();
        plan.insert("A", rectangle_walls(0.0, 0.0, 4.0, 4.0));
        plan.insert("B", rectangle_walls(4.0, 0.0, 8.0, 4.0));
        let mut store = LayoutStore::from_plan(&plan).unwrap();
        let before = LayoutSnapshot::capture(&store).unwrap();
        let b = store.room_id("B").unwrap();
        store.shift_room(b, Direction::West, 1.0).unwrap();

        let (done, diags) = stitch_all(&mut store, &before);
        assert!(diags.is_empty());
        assert_eq!(done, [(room_pair("A", "B"), StitchMethod::ShrinkShifted)]);
        let bounds = store.room_bounds(b).unwrap();
        assert_relative_eq!(bounds.min_x, 4.0);
        assert_relative_eq!(bounds.max_x, 7.0);
    }

    #[test]
    fn held_room_is_not_regrown() {
        let mut plan = FloorPlan::new();
        plan.insert("A", rectangle_walls(0.0, 0.0, 4.0, 4.0));
        plan.insert("B", rectangle_walls(4.0, 0.0, 8.0, 6.0));
        plan.insert("C", rectangle_walls(0.0, 4.0, 4.0, 6.0));
        let mut store = LayoutStore::from_plan(&plan).unwrap();
        let before = LayoutSnapshot::capture(&store).unwrap();
        let a = store.room_id("A").unwrap();
        store.extend_room(a, Direction::East, -1.0).unwrap();

        let (policy, config) = (Policy::default(), SolverConfig::default());
        let broken = FindBrokenConnections::new(&before).execute(&store).unwrap();
        assert_eq!(broken, [room_pair("A", "B")]);
        let mut diags = Diagnostics::new();
        let done = StitchConnections::new(LayoutContext::new(&policy, &config), &before, broken)
            .holding(["A"])
            .execute(&mut store, &mut diags)
            .unwrap();
        assert!(done.is_empty());
        assert_eq!(diags.len(), 1);
        assert_relative_eq!(store.room_bounds(a).unwrap().max_x, 3.0);
    }

    #[test]
    fn blocked_pair_is_reported() {
        let mut plan = FloorPlan::new();
        plan.insert("A", rectangle_walls(0.0, 0.0, 4.0, 4.0));
        plan.insert("B", rectangle_walls(4.0, 0.0, 8.0, 4.0));
        let mut store = LayoutStore::from_plan(&plan).unwrap();
        let before = LayoutSnapshot::capture(&store).unwrap();
        let b = store.room_id("B").unwrap();
        store.shift_room(b, Direction::East, 1.0).unwrap();
        store.add_room("Post", &rectangle_walls(4.0, 1.0, 5.0, 2.0)).unwrap();

        let (done, diags) = stitch_all(&mut store, &before);
        assert!(done.is_empty());
        assert!(matches!(
            diags.iter().next(),
            Some(Diagnostic::UnstitchableConnection { direction: Some(Direction::East), .. })
        ));
    }
}
