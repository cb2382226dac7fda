use tracing::{debug, trace};

use crate::error::Result;
use crate::geometry::{Axis, Direction};
use crate::math::approx_eq;
use crate::operations::query::FindGaps;
use crate::operations::resize::ResizeRoom;
use crate::operations::LayoutContext;
use crate::topology::{LayoutStore, RoomId, WallId};

/// Closes gaps between facing walls, nearest first.
///
/// One of the two rooms grows across the gap through a free side. The room
/// passed to [`CloseGaps::sparing`] is only grown when its counterpart
/// cannot be. Gaps neither room can close are left as they are.
pub struct CloseGaps<'a> {
    ctx: LayoutContext<'a>,
    spare: Option<RoomId>,
}

impl<'a> CloseGaps<'a> {
    /// Creates a new `CloseGaps` operation.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>) -> Self {
        Self { ctx, spare: None }
    }

    /// Prefers growing the other room of any gap involving `room`.
    #[must_use]
    pub fn sparing(mut self, room: RoomId) -> Self {
        self.spare = Some(room);
        self
    }

    /// Executes the pass and returns how many gaps were closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &mut LayoutStore) -> Result<usize> {
        let query = FindGaps::new(self.ctx.config.gap_threshold);
        let mut skipped: Vec<(WallId, WallId)> = Vec::new();
        let mut closed = 0;

        for _ in 0..self.ctx.config.max_passes {
            let Some(gap) = query
                .execute(store)?
                .into_iter()
                .find(|g| !skipped.contains(&(g.wall, g.other_wall)))
            else {
                break;
            };

            let mut candidates = [
                (gap.room, gap.wall, gap.direction),
                (gap.other_room, gap.other_wall, gap.direction.opposite()),
            ];
            if self.spare == Some(gap.room) {
                candidates.reverse();
            }

            let mut filled = false;
            for (room, wall, dir) in candidates {
                if !on_bounding_side(store, room, wall, dir)? {
                    continue;
                }
                let grow = ResizeRoom::toward(self.ctx, room, dir, gap.distance);
                if grow.execute(store)?.is_applied() {
                    debug!(
                        room = store.room_name(room)?,
                        direction = %dir,
                        distance = gap.distance,
                        "closed gap"
                    );
                    filled = true;
                    break;
                }
            }

            if filled {
                closed += 1;
            } else {
                trace!(distance = gap.distance, "gap left open");
                skipped.push((gap.wall, gap.other_wall));
            }
        }
        Ok(closed)
    }
}

/// Whether `wall` lies on the side of its room's bounding box facing `dir`;
/// only those walls move when the room grows that way.
fn on_bounding_side(
    store: &LayoutStore,
    room: RoomId,
    wall: WallId,
    dir: Direction,
) -> Result<bool> {
    let (a, _) = store.wall_points(wall)?;
    let side = store.room_bounds(room)?.side(dir);
    let coord = match dir.axis() {
        Axis::X => a.x,
        Axis::Y => a.y,
    };
    Ok(approx_eq(coord, side))
}
