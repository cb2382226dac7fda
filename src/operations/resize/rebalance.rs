use std::collections::BTreeSet;

use tracing::{debug, info};

use super::adjust::ResizeRoom;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::geometry::Axis;
use crate::math::{round2, TOLERANCE};
use crate::operations::LayoutContext;
use crate::topology::{LayoutStore, RoomId};

/// Width and height change proposed for one flexible room.
#[derive(Debug, Clone, Copy)]
struct Proposal {
    room: RoomId,
    dw: f64,
    dh: f64,
}

/// Spreads the difference between the current and the target total area
/// over the flexible rooms.
///
/// Growth is shared in proportion to each room's width and height; shrinking
/// is taken from the highest priority rooms first, never below their
/// minimums. Changes only use free sides. Whatever a blocked side could not
/// absorb stays in the residual and is offered to the remaining rooms on the
/// next round.
pub struct RebalanceArea<'a> {
    ctx: LayoutContext<'a>,
    target: f64,
    held: BTreeSet<String>,
}

impl<'a> RebalanceArea<'a> {
    /// Creates a new `RebalanceArea` operation.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>, target: f64) -> Self {
        Self {
            ctx,
            target,
            held: BTreeSet::new(),
        }
    }

    /// Flexible rooms that must keep their size.
    #[must_use]
    pub fn holding<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.held.extend(rooms.into_iter().map(Into::into));
        self
    }

    /// Executes the pass and returns the final total area. A residual larger
    /// than the area tolerance is reported as [`Diagnostic::AreaMismatch`].
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &mut LayoutStore, diagnostics: &mut Diagnostics) -> Result<f64> {
        let tolerance = self.ctx.config.area_tolerance;
        let mut flexible: Vec<(usize, RoomId)> = Vec::new();
        for &id in store.room_ids() {
            let name = store.room_name(id)?;
            if self.held.contains(name) {
                continue;
            }
            if let Some(rank) = self.ctx.policy.flexible_rank(name) {
                flexible.push((rank, id));
            }
        }
        flexible.sort_by_key(|&(rank, _)| rank);

        let mut stuck: Vec<(RoomId, Axis)> = Vec::new();
        for pass in 0..self.ctx.config.max_passes {
            let diff = self.target - store.total_area()?;
            if diff.abs() <= tolerance {
                break;
            }
            let proposals = if diff > 0.0 {
                self.grow(store, &flexible, &stuck, diff)?
            } else {
                self.shrink(store, &flexible, &stuck, -diff)?
            };
            debug!(pass, diff, proposals = proposals.len(), "rebalancing area");

            let mut progressed = false;
            for p in proposals {
                for (axis, delta) in [(Axis::X, p.dw), (Axis::Y, p.dh)] {
                    let delta = round2(delta);
                    if delta.abs() <= TOLERANCE {
                        continue;
                    }
                    let outcome = ResizeRoom::new(self.ctx, p.room, axis, delta)
                        .without_push()
                        .execute(store)?;
                    if outcome.is_applied() {
                        progressed = true;
                    } else {
                        debug!(room = store.room_name(p.room)?, axis = ?axis, delta, "left in residual");
                        stuck.push((p.room, axis));
                    }
                }
            }
            if !progressed {
                break;
            }
        }

        let total = store.total_area()?;
        if (self.target - total).abs() > tolerance {
            diagnostics.push(Diagnostic::AreaMismatch {
                target: self.target,
                actual: total,
            });
        }
        info!(target = self.target, total, "area rebalanced");
        Ok(total)
    }

    fn grow(
        &self,
        store: &LayoutStore,
        rooms: &[(usize, RoomId)],
        stuck: &[(RoomId, Axis)],
        diff: f64,
    ) -> Result<Vec<Proposal>> {
        let mut proposals = Vec::new();
        let mut gained = 0.0;
        for &(_, id) in rooms {
            let b = store.room_bounds(id)?;
            let (w, h) = (b.width(), b.height());
            let c = self.ctx.policy.constraint(store.room_name(id)?);
            let room_max = |axis| c.map_or(f64::INFINITY, |c| c.max_along(axis));
            let open = |axis| !stuck.contains(&(id, axis));

            let mut dw = if open(Axis::X) { w / (w + h) * diff } else { 0.0 };
            let mut dh = if open(Axis::Y) { h / (w + h) * diff } else { 0.0 };
            dw = dw.min(room_max(Axis::X) - w).max(0.0);
            dh = dh.min(room_max(Axis::Y) - h).max(0.0);
            gained += dw * h + dh * w;
            proposals.push(Proposal { room: id, dw, dh });
        }
        if gained <= TOLERANCE {
            return Ok(Vec::new());
        }
        let factor = diff / gained;
        for p in &mut proposals {
            p.dw *= factor;
            p.dh *= factor;
        }
        Ok(proposals)
    }

    fn shrink(
        &self,
        store: &LayoutStore,
        rooms: &[(usize, RoomId)],
        stuck: &[(RoomId, Axis)],
        diff: f64,
    ) -> Result<Vec<Proposal>> {
        let mut remaining = diff;
        let mut proposals = Vec::new();
        for &(_, id) in rooms {
            if remaining <= TOLERANCE {
                break;
            }
            let b = store.room_bounds(id)?;
            let (w, h) = (b.width(), b.height());
            let c = self.ctx.policy.constraint(store.room_name(id)?);
            let room_min = |axis| c.map_or(0.0, |c| c.min_along(axis));

            let mut dw = 0.0;
            if !stuck.contains(&(id, Axis::X)) && h > TOLERANCE {
                dw = (remaining / h).min(w - room_min(Axis::X)).max(0.0);
                remaining -= dw * h;
            }
            let mut dh = 0.0;
            if !stuck.contains(&(id, Axis::Y)) && w - dw > TOLERANCE {
                dh = (remaining / (w - dw)).min(h - room_min(Axis::Y)).max(0.0);
                remaining -= dh * (w - dw);
            }
            if dw > 0.0 || dh > 0.0 {
                proposals.push(Proposal {
                    room: id,
                    dw: -dw,
                    dh: -dh,
                });
            }
        }
        Ok(proposals)
    }
}
