use std::collections::BTreeSet;

use tracing::debug;

use super::adjust::{ResizeOutcome, ResizeRoom};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::Result;
use crate::geometry::Axis;
use crate::math::{round2, TOLERANCE};
use crate::operations::LayoutContext;
use crate::topology::LayoutStore;

/// Brings every constrained room inside its size bounds.
///
/// Rooms below a minimum grow, pushing neighbours if they have to; rooms
/// above a maximum shrink through a free side. Excluded and held rooms are
/// skipped. A room that cannot be fixed keeps its size and is reported as
/// [`Diagnostic::UnsatisfiableConstraint`].
pub struct EnforceConstraints<'a> {
    ctx: LayoutContext<'a>,
    held: BTreeSet<String>,
}

impl<'a> EnforceConstraints<'a> {
    /// Creates a new `EnforceConstraints` operation.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>) -> Self {
        Self {
            ctx,
            held: BTreeSet::new(),
        }
    }

    /// Rooms whose size must not be touched.
    #[must_use]
    pub fn holding<I, S>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.held.extend(rooms.into_iter().map(Into::into));
        self
    }

    /// Executes the pass and returns how many resizes were applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &mut LayoutStore, diagnostics: &mut Diagnostics) -> Result<usize> {
        let mut applied = 0;
        let ids = store.room_ids().to_vec();
        for id in ids {
            let name = store.room_name(id)?.to_owned();
            if self.ctx.policy.is_excluded(&name) || self.held.contains(&name) {
                continue;
            }
            let Some(c) = self.ctx.policy.constraint(&name).copied() else {
                continue;
            };

            for axis in [Axis::X, Axis::Y] {
                let extent = store.room_bounds(id)?.extent(axis);
                let (min, max) = (c.min_along(axis), c.max_along(axis));
                let (delta, required) = if extent < min - TOLERANCE {
                    (round2(min - extent), min)
                } else if extent > max + TOLERANCE {
                    (-round2(extent - max), max)
                } else {
                    continue;
                };

                match ResizeRoom::new(self.ctx, id, axis, delta).execute(store)? {
                    ResizeOutcome::Applied { direction, pushed } => {
                        applied += 1;
                        debug!(
                            room = %name,
                            axis = ?axis,
                            delta,
                            direction = %direction,
                            pushed = pushed.len(),
                            "enforced size bound"
                        );
                    }
                    ResizeOutcome::Unchanged => {}
                    ResizeOutcome::Blocked => diagnostics.push(Diagnostic::UnsatisfiableConstraint {
                        room: name.clone(),
                        axis,
                        required,
                        actual: extent,
                    }),
                }
            }
        }
        Ok(applied)
    }
}
