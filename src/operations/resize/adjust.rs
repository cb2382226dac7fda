use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::{Axis, Direction};
use crate::math::TOLERANCE;
use crate::operations::query::{neighbors_in, BuildMetadata};
use crate::operations::transform::{occupants, PlanPush, ShiftRooms};
use crate::operations::LayoutContext;
use crate::topology::{LayoutStore, RoomId};

/// Result of a [`ResizeRoom`] operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The change was too small to apply.
    Unchanged,
    /// The side facing `direction` moved; `pushed` rooms were shifted with
    /// it, out of the way when growing or behind it when shrinking.
    Applied {
        direction: Direction,
        pushed: Vec<RoomId>,
    },
    /// No candidate direction could take the change, or it would break the
    /// room's maximum size.
    Blocked,
}

impl ResizeOutcome {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Changes a room's width or height by moving one of its sides.
///
/// Candidate directions are tried in order. A direction is taken directly
/// when all of the room's walls on that side are free and, for growth, the
/// band the side sweeps through is empty. Growth may otherwise push the rooms
/// in that band away as a block, bounded by the configured neighbour hops.
///
/// A room with no free side shrinks by moving a taken side inward and
/// pulling the rooms behind it along as a block. If no block within the hop
/// bound can follow, the side moves alone and the lost contacts are left for
/// stitching. Without pushing, shrinking only uses free sides.
pub struct ResizeRoom<'a> {
    ctx: LayoutContext<'a>,
    room: RoomId,
    axis: Axis,
    delta: f64,
    directions: Vec<Direction>,
    push: bool,
}

impl<'a> ResizeRoom<'a> {
    /// Creates a new `ResizeRoom` operation changing the extent along `axis`
    /// by `delta`, trying the policy's directions for that axis.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>, room: RoomId, axis: Axis, delta: f64) -> Self {
        Self {
            ctx,
            room,
            axis,
            delta,
            directions: ctx.policy.directions_for(axis).to_vec(),
            push: true,
        }
    }

    /// Creates a `ResizeRoom` that only moves the side facing `dir` and never
    /// pushes other rooms.
    #[must_use]
    pub fn toward(ctx: LayoutContext<'a>, room: RoomId, dir: Direction, delta: f64) -> Self {
        Self {
            ctx,
            room,
            axis: dir.axis(),
            delta,
            directions: vec![dir],
            push: false,
        }
    }

    /// Disables pushing neighbours.
    #[must_use]
    pub fn without_push(mut self) -> Self {
        self.push = false;
        self
    }

    /// Executes the resize, modifying the layout in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the room is missing or the store is inconsistent.
    pub fn execute(&self, store: &mut LayoutStore) -> Result<ResizeOutcome> {
        if self.delta.abs() <= TOLERANCE {
            return Ok(ResizeOutcome::Unchanged);
        }
        let meta = BuildMetadata::new().execute(store)?;
        let room = meta
            .get(self.room)
            .ok_or_else(|| TopologyError::EntityNotFound("room".into()))?;

        // Step 1: stay inside the room's own size bounds.
        let extent = room.extent(self.axis);
        if extent + self.delta <= TOLERANCE {
            return Ok(ResizeOutcome::Blocked);
        }
        if self.delta > 0.0 {
            if let Some(c) = self.ctx.policy.constraint(&room.name) {
                if extent + self.delta > c.max_along(self.axis) + TOLERANCE {
                    debug!(room = %room.name, extent, delta = self.delta, "growth exceeds maximum");
                    return Ok(ResizeOutcome::Blocked);
                }
            }
        }

        // Step 2: a free side with nothing in the way.
        for &dir in &self.directions {
            if !room.is_direction_free(dir) {
                continue;
            }
            if self.delta > 0.0 {
                let band = room.bounds.strip(dir, self.delta);
                if !occupants(store, &band, &[self.room])?.is_empty() {
                    continue;
                }
            }
            store.extend_room(self.room, dir, self.delta)?;
            debug!(room = %room.name, direction = %dir, delta = self.delta, "moved free side");
            return Ok(ResizeOutcome::Applied {
                direction: dir,
                pushed: Vec::new(),
            });
        }

        // Step 3: push whatever stands in the way.
        if self.push && self.delta > 0.0 {
            let hops = self.ctx.config.max_neighbor_hops.saturating_sub(1);
            for &dir in &self.directions {
                if room.walls_facing(dir).next().is_none() {
                    continue;
                }
                let band = room.bounds.strip(dir, self.delta);
                let blockers = occupants(store, &band, &[self.room])?;
                if blockers.is_empty() {
                    continue;
                }
                let plan = PlanPush::new(self.ctx.policy, blockers, dir, self.delta)
                    .holding([self.room])
                    .hops(hops);
                if let Some(group) = plan.execute(store)? {
                    ShiftRooms::new(&group, dir, self.delta).execute(store)?;
                    store.extend_room(self.room, dir, self.delta)?;
                    debug!(
                        room = %room.name,
                        direction = %dir,
                        delta = self.delta,
                        pushed = group.len(),
                        "pushed neighbours"
                    );
                    return Ok(ResizeOutcome::Applied {
                        direction: dir,
                        pushed: group,
                    });
                }
            }
        }

        // Step 4: shrink through a taken side.
        if self.push && self.delta < 0.0 {
            if let Some(outcome) = self.shrink_taken_side(store, &room.name)? {
                return Ok(outcome);
            }
        }

        debug!(room = %room.name, axis = ?self.axis, delta = self.delta, "resize blocked");
        Ok(ResizeOutcome::Blocked)
    }

    fn shrink_taken_side(
        &self,
        store: &mut LayoutStore,
        name: &str,
    ) -> Result<Option<ResizeOutcome>> {
        let depth = -self.delta;
        let hops = self.ctx.config.max_neighbor_hops.saturating_sub(1);
        let mut sides = Vec::new();
        for &dir in &self.directions {
            let neighbours = neighbors_in(store, self.room, dir)?;
            if !neighbours.is_empty() {
                sides.push((dir, neighbours));
            }
        }

        for (dir, neighbours) in &sides {
            let mut trial = store.clone();
            trial.extend_room(self.room, *dir, self.delta)?;
            let plan = PlanPush::new(self.ctx.policy, neighbours.clone(), dir.opposite(), depth)
                .holding([self.room])
                .hops(hops);
            if let Some(group) = plan.execute(&trial)? {
                ShiftRooms::new(&group, dir.opposite(), depth).execute(&mut trial)?;
                *store = trial;
                debug!(
                    room = name,
                    direction = %dir,
                    delta = self.delta,
                    pulled = group.len(),
                    "pulled neighbours"
                );
                return Ok(Some(ResizeOutcome::Applied {
                    direction: *dir,
                    pushed: group,
                }));
            }
        }

        let Some((dir, _)) = sides.first() else {
            return Ok(None);
        };
        store.extend_room(self.room, *dir, self.delta)?;
        debug!(room = name, direction = %dir, delta = self.delta, "moved taken side alone");
        Ok(Some(ResizeOutcome::Applied {
            direction: *dir,
            pushed: Vec::new(),
        }))
    }
}
