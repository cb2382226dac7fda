use tracing::{debug, trace};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::geometry::{Axis, Direction};
use crate::math::round2;
use crate::operations::query::{room_pair, FindOverlaps, Overlap};
use crate::operations::transform::{PlanPush, ShiftRooms};
use crate::operations::LayoutContext;
use crate::topology::{LayoutStore, RoomId};

/// Pulls overlapping rooms apart by shifting one side of each conflict.
///
/// Each overlap is separated along its shallower axis by the overlap depth.
/// When a focus room is set (typically a room that was just placed) it
/// stays put and the other room moves away from it, taking along whatever
/// stands in its way. Without a focus both rooms are tried and the smaller
/// moving group wins. Overlaps left after the bounded number of passes are
/// reported as [`Diagnostic::UnresolvedOverlap`].
pub struct ResolveOverlaps<'a> {
    ctx: LayoutContext<'a>,
    focus: Option<RoomId>,
}

impl<'a> ResolveOverlaps<'a> {
    /// Creates a new `ResolveOverlaps` operation.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>) -> Self {
        Self { ctx, focus: None }
    }

    /// Keeps `room` in place and resolves its conflicts first.
    #[must_use]
    pub fn focus(mut self, room: RoomId) -> Self {
        self.focus = Some(room);
        self
    }

    /// Executes the pass and returns how many conflicts were separated.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &mut LayoutStore, diagnostics: &mut Diagnostics) -> Result<usize> {
        let query = FindOverlaps::new(self.ctx.config.overlap_area_threshold);
        let mut skipped: Vec<(RoomId, RoomId)> = Vec::new();
        let mut resolved = 0;

        for pass in 0..self.ctx.config.max_passes {
            let overlaps = query.execute(store)?;
            let pending: Vec<&Overlap> = overlaps
                .iter()
                .filter(|o| !skipped.contains(&(o.first, o.second)))
                .collect();
            let next = pending
                .iter()
                .find(|o| self.focus.is_some_and(|f| o.involves(f)))
                .or_else(|| pending.first());
            let Some(&&overlap) = next else {
                break;
            };

            if self.separate(store, &overlap)? {
                trace!(pass, area = overlap.area, "overlap separated");
                resolved += 1;
            } else {
                skipped.push((overlap.first, overlap.second));
            }
        }

        for o in query.execute(store)? {
            diagnostics.push(Diagnostic::UnresolvedOverlap {
                rooms: room_pair(store.room_name(o.first)?, store.room_name(o.second)?),
                area: o.area,
            });
        }
        Ok(resolved)
    }

    fn separate(&self, store: &mut LayoutStore, overlap: &Overlap) -> Result<bool> {
        let axis = overlap.axis();
        let depth = round2(overlap.depth());
        let options = match self.focus {
            Some(f) if overlap.involves(f) => {
                let other = if overlap.first == f { overlap.second } else { overlap.first };
                vec![(other, f)]
            }
            _ => vec![(overlap.second, overlap.first), (overlap.first, overlap.second)],
        };

        let mut best: Option<(Vec<RoomId>, Direction)> = None;
        for (mover, stay) in options {
            let dir = away_from(store, mover, stay, axis)?;
            let held: Vec<RoomId> = std::iter::once(stay).chain(self.focus).collect();
            let plan = PlanPush::new(self.ctx.policy, vec![mover], dir, depth)
                .holding(held)
                .hops(self.ctx.config.max_passes);
            if let Some(group) = plan.execute(store)? {
                let smaller = match &best {
                    Some((current, _)) => group.len() < current.len(),
                    None => true,
                };
                if smaller {
                    best = Some((group, dir));
                }
            }
        }

        let Some((group, dir)) = best else {
            debug!(
                first = store.room_name(overlap.first)?,
                second = store.room_name(overlap.second)?,
                "overlap cannot be separated"
            );
            return Ok(false);
        };
        ShiftRooms::new(&group, dir, depth).execute(store)?;
        Ok(true)
    }
}

/// Direction along `axis` pointing from `stay` toward `mover`.
fn away_from(store: &LayoutStore, mover: RoomId, stay: RoomId, axis: Axis) -> Result<Direction> {
    let m = store.room_bounds(mover)?.center();
    let s = store.room_bounds(stay)?.center();
    let offset = match axis {
        Axis::X => m.x - s.x,
        Axis::Y => m.y - s.y,
    };
    Ok(Direction::along(axis, offset))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::plan::{rectangle_walls, FloorPlan};
    use crate::policy::Policy;
    use approx::assert_relative_eq;

    fn resolve(plan: &FloorPlan, focus: Option<&str>) -> (LayoutStore, Diagnostics, usize) {
        let mut store = LayoutStore::from_plan(plan).unwrap();
        let (policy, config) = (Policy::default(), SolverConfig::default());
        let mut op = ResolveOverlaps::new(LayoutContext::new(&policy, &config));
        if let Some(name) = focus {
            op = op.focus(store.room_id(name).unwrap());
        }
        let mut diags = Diagnostics::new();
        let n = op.execute(&mut store, &mut diags).unwrap();
        (store, diags, n)
    }

    #[test]
    fn focus_room_stays_and_neighbour_moves() {
        let mut plan = FloorPlan::new();
        plan.insert("New", rectangle_walls(0.0, 0.0, 4.0, 4.0));
        plan.insert("Old", rectangle_walls(3.0, 0.0, 7.0, 4.0));
        plan.insert("Beyond", rectangle_walls(7.0, 0.0, 9.0, 4.0));
        let (store, diags, n) = resolve(&plan, Some("New"));
        assert_eq!(n, 1);
        assert!(diags.is_empty());
        let new = store.room_bounds(store.room_id("New").unwrap()).unwrap();
        let old = store.room_bounds(store.room_id("Old").unwrap()).unwrap();
        let beyond = store.room_bounds(store.room_id("Beyond").unwrap()).unwrap();
        assert_relative_eq!(new.max_x, 4.0);
        assert_relative_eq!(old.min_x, 4.0);
        assert_relative_eq!(beyond.min_x, 8.0);
    }

    #[test]
    fn without_focus_the_smaller_group_moves() {
        let mut plan = FloorPlan::new();
        plan.insert("A", rectangle_walls(0.0, 0.0, 4.0, 4.0));
        plan.insert("B", rectangle_walls(3.5, 0.0, 7.0, 4.0));
        plan.insert("Left", rectangle_walls(-3.0, 0.0, 0.0, 4.0));
        let (store, diags, _) = resolve(&plan, None);
        assert!(diags.is_empty());
        let a = store.room_bounds(store.room_id("A").unwrap()).unwrap();
        let b = store.room_bounds(store.room_id("B").unwrap()).unwrap();
        assert_relative_eq!(a.min_x, 0.0);
        assert_relative_eq!(b.min_x, 4.0);
    }

    #[test]
    fn trapped_overlap_is_reported() {
        let mut plan = FloorPlan::new();
        plan.insert("A", rectangle_walls(0.0, 0.0, 4.0, 4.0));
        plan.insert("B", rectangle_walls(1.0, 1.0, 3.0, 3.0));
        let (_, diags, n) = resolve(&plan, Some("A"));
        assert_eq!(n, 0);
        assert!(matches!(
            diags.iter().next(),
            Some(Diagnostic::UnresolvedOverlap { area, .. }) if (*area - 4.0).abs() < 1e-9
        ));
    }
}
