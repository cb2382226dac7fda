use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{InputError, InsertionError, Result, TopologyError};
use crate::geometry::{Axis, Direction, Rect};
use crate::math::TOLERANCE;
use crate::operations::query::{
    neighbors_in, BuildMetadata, FindOverlaps, LayoutMetadata, RoomMetadata,
};
use crate::operations::repair::{
    CloseGaps, FindBrokenConnections, LayoutSnapshot, ResolveOverlaps, StitchConnections,
};
use crate::operations::transform::{PlanPush, ShiftRooms, SnapLayout};
use crate::operations::LayoutContext;
use crate::plan::rectangle_walls;
use crate::policy::Alignment;
use crate::topology::{LayoutStore, RoomId};

/// A room to be added to a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRoom {
    pub name: String,
    /// Extent along x.
    pub length: f64,
    /// Extent along y.
    pub width: f64,
}

impl NewRoom {
    #[must_use]
    pub fn new(name: impl Into<String>, length: f64, width: f64) -> Self {
        Self {
            name: name.into(),
            length,
            width,
        }
    }

    /// Extent along `axis`.
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.length,
            Axis::Y => self.width,
        }
    }
}

/// How room was made for the new rectangle.
#[derive(Debug)]
enum Clearance {
    /// The side was already open.
    Open,
    /// These rooms move by the new room's depth first.
    Shift(Vec<RoomId>, Direction),
}

/// Places a new rectangular room against one side of an existing room.
///
/// The anchor's side is used as is when it is free. Otherwise the anchor
/// is moved away through its opposite side, or the rooms on the target
/// side are pushed outward, or the anchor is moved together with its
/// neighbours along one of the perpendicular sides. The first of these that
/// fits wins. Afterwards overlaps are separated, broken connections are
/// stitched and facing gaps are closed. The new room only absorbs a gap its
/// neighbour cannot, and any size change that causes is reported as
/// [`Diagnostic::RoomResized`].
pub struct InsertRoom<'a> {
    ctx: LayoutContext<'a>,
    room: NewRoom,
    anchor: String,
    side: Direction,
}

impl<'a> InsertRoom<'a> {
    /// Creates a new `InsertRoom` operation.
    #[must_use]
    pub fn new(
        ctx: LayoutContext<'a>,
        room: NewRoom,
        anchor: impl Into<String>,
        side: Direction,
    ) -> Self {
        Self {
            ctx,
            room,
            anchor: anchor.into(),
            side,
        }
    }

    /// Checks the request against the layout without changing it.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the name is taken, a dimension is not a
    /// positive number, the new room is below its type's minimum, or an
    /// existing room already violates its own minimum. Returns
    /// [`TopologyError::RoomNotFound`] if the anchor does not exist.
    pub fn validate(&self, store: &LayoutStore) -> Result<()> {
        let name = &self.room.name;
        if store.contains_room(name) {
            return Err(InputError::DuplicateRoom(name.clone()).into());
        }
        store.room_id(&self.anchor)?;

        for value in [self.room.length, self.room.width] {
            if !value.is_finite() || value <= TOLERANCE {
                return Err(InputError::InvalidDimension {
                    room: name.clone(),
                    value,
                }
                .into());
            }
        }

        if let Some(c) = self.ctx.policy.constraint(name) {
            if self.room.length < c.min_width - TOLERANCE
                || self.room.width < c.min_height - TOLERANCE
            {
                return Err(InputError::BelowMinimumSize {
                    room: name.clone(),
                    width: self.room.length,
                    height: self.room.width,
                    min_width: c.min_width,
                    min_height: c.min_height,
                }
                .into());
            }
        }

        for &id in store.room_ids() {
            let existing = store.room_name(id)?;
            if self.ctx.policy.is_excluded(existing) {
                continue;
            }
            let Some(c) = self.ctx.policy.constraint(existing) else {
                continue;
            };
            let bounds = store.room_bounds(id)?;
            if bounds.width() < c.min_width - TOLERANCE || bounds.height() < c.min_height - TOLERANCE
            {
                return Err(InputError::ExistingRoomViolatesMinimum {
                    room: existing.to_owned(),
                    width: bounds.width(),
                    height: bounds.height(),
                    min_width: c.min_width,
                    min_height: c.min_height,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Executes the insertion and returns the id of the new room.
    ///
    /// The layout is left untouched when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::validate`], or
    /// [`InsertionError::Infeasible`] if no arrangement frees the side.
    pub fn execute(&self, store: &mut LayoutStore, diagnostics: &mut Diagnostics) -> Result<RoomId> {
        self.validate(store)?;
        let anchor = store.room_id(&self.anchor)?;
        let before = LayoutSnapshot::capture(store)?;

        // Step 1: make room on the requested side.
        let clearance = self.clear_side(store, anchor)?.ok_or_else(|| {
            InsertionError::Infeasible {
                room: self.room.name.clone(),
                anchor: self.anchor.clone(),
                side: self.side,
            }
        })?;
        let depth = self.room.extent(self.side.axis());
        if let Clearance::Shift(group, dir) = &clearance {
            ShiftRooms::new(group, *dir, depth).execute(store)?;
        }

        // Step 2: place the rectangle flush against the anchor.
        let rect = self.footprint(&store.room_bounds(anchor)?);
        let id = store.add_room(
            &self.room.name,
            &rectangle_walls(rect.min_x, rect.min_y, rect.max_x, rect.max_y),
        )?;
        info!(
            room = %self.room.name,
            anchor = %self.anchor,
            side = %self.side,
            ?clearance,
            "placed new room"
        );

        // Step 3: repair what the placement disturbed.
        let overlaps = FindOverlaps::new(self.ctx.config.overlap_area_threshold).execute(store)?;
        if !overlaps.is_empty() {
            ResolveOverlaps::new(self.ctx)
                .focus(id)
                .execute(store, diagnostics)?;
        }

        let around: Vec<RoomId> = Direction::ALL
            .into_iter()
            .map(|d| neighbors_in(store, id, d))
            .collect::<Result<Vec<_>>>()?
            .concat();
        let mut broken = Vec::new();
        for pair in FindBrokenConnections::new(&before).execute(store)? {
            let (a, b) = (store.room_id(&pair.0)?, store.room_id(&pair.1)?);
            if around.contains(&a) && around.contains(&b) {
                debug!(first = %pair.0, second = %pair.1, "pair now separated by the new room");
                continue;
            }
            broken.push(pair);
        }
        StitchConnections::new(self.ctx, &before, broken).execute(store, diagnostics)?;

        CloseGaps::new(self.ctx).sparing(id).execute(store)?;
        SnapLayout::new(self.ctx.config.repair_snap_tolerance).execute(store);

        // Step 4: report growth the new room took on from the gaps.
        let placed = store.room_bounds(id)?;
        for axis in [Axis::X, Axis::Y] {
            let (requested, actual) = (self.room.extent(axis), placed.extent(axis));
            if (actual - requested).abs() > self.ctx.config.repair_snap_tolerance {
                diagnostics.push(Diagnostic::RoomResized {
                    room: self.room.name.clone(),
                    axis,
                    requested,
                    actual,
                });
            }
        }
        Ok(id)
    }

    fn clear_side(&self, store: &LayoutStore, anchor: RoomId) -> Result<Option<Clearance>> {
        let meta = BuildMetadata::new().execute(store)?;
        let depth = self.room.extent(self.side.axis());
        let hops = self.ctx.config.max_neighbor_hops;

        if anchor_meta(&meta, anchor)?.is_direction_free(self.side) {
            return Ok(Some(Clearance::Open));
        }

        // The anchor backs off through its opposite side.
        let back = self.side.opposite();
        if anchor_meta(&meta, anchor)?.is_direction_free(back) {
            let plan = PlanPush::new(self.ctx.policy, vec![anchor], back, depth);
            if let Some(group) = plan.execute(store)? {
                return Ok(Some(Clearance::Shift(group, back)));
            }
        }

        // The rooms on the target side move outward.
        let ahead = neighbors_in(store, anchor, self.side)?;
        if !ahead.is_empty() {
            let plan = PlanPush::new(self.ctx.policy, ahead, self.side, depth)
                .holding([anchor])
                .hops(hops);
            if let Some(group) = plan.execute(store)? {
                return Ok(Some(Clearance::Shift(group, self.side)));
            }
        }

        // The anchor backs off together with a perpendicular row.
        for across in self.side.axis().perpendicular().directions() {
            let mut seeds = vec![anchor];
            seeds.extend(neighbors_in(store, anchor, across)?);
            if seeds.len() == 1 {
                continue;
            }
            let plan = PlanPush::new(self.ctx.policy, seeds, back, depth).hops(hops);
            if let Some(group) = plan.execute(store)? {
                return Ok(Some(Clearance::Shift(group, back)));
            }
        }

        debug!(room = %self.room.name, anchor = %self.anchor, side = %self.side, "no space found");
        Ok(None)
    }

    /// Rectangle of the new room against the anchor's side.
    fn footprint(&self, anchor: &Rect) -> Rect {
        let (length, width) = (self.room.length, self.room.width);
        let alignment = self.ctx.policy.alignment_for(self.side);
        match self.side {
            Direction::East | Direction::West => {
                let (min_x, max_x) = if self.side == Direction::East {
                    (anchor.max_x, anchor.max_x + length)
                } else {
                    (anchor.min_x - length, anchor.min_x)
                };
                let (min_y, max_y) = match alignment {
                    Alignment::Start => (anchor.min_y, anchor.min_y + width),
                    Alignment::End => (anchor.max_y - width, anchor.max_y),
                };
                Rect::new(min_x, min_y, max_x, max_y)
            }
            Direction::North | Direction::South => {
                let (min_y, max_y) = if self.side == Direction::North {
                    (anchor.max_y, anchor.max_y + width)
                } else {
                    (anchor.min_y - width, anchor.min_y)
                };
                let (min_x, max_x) = match alignment {
                    Alignment::Start => (anchor.min_x, anchor.min_x + length),
                    Alignment::End => (anchor.max_x - length, anchor.max_x),
                };
                Rect::new(min_x, min_y, max_x, max_y)
            }
        }
    }
}

fn anchor_meta(
    meta: &LayoutMetadata,
    anchor: RoomId,
) -> std::result::Result<&RoomMetadata, TopologyError> {
    meta.get(anchor)
        .ok_or_else(|| TopologyError::EntityNotFound("room".into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::error::PlanError;
    use crate::operations::query::room_pair;
    use crate::plan::fixtures::{assert_plans_close, reference_apartment};
    use crate::plan::FloorPlan;
    use crate::policy::Policy;
    use approx::assert_relative_eq;

    fn insert(
        plan: &FloorPlan,
        config: &SolverConfig,
        room: NewRoom,
        anchor: &str,
        side: Direction,
    ) -> (LayoutStore, Diagnostics, Result<RoomId>) {
        let policy = Policy::default();
        let mut store = LayoutStore::from_plan(plan).unwrap();
        let mut diags = Diagnostics::new();
        let result = InsertRoom::new(LayoutContext::new(&policy, config), room, anchor, side)
            .execute(&mut store, &mut diags);
        (store, diags, result)
    }

    fn bounds(store: &LayoutStore, name: &str) -> Rect {
        store.room_bounds(store.room_id(name).unwrap()).unwrap()
    }

    #[test]
    fn study_left_of_living_room() {
        let config = SolverConfig::default();
        let (store, diags, result) = insert(
            &reference_apartment(),
            &config,
            NewRoom::new("Study", 6.0, 6.0),
            "Living Room",
            Direction::West,
        );
        let study = result.unwrap();
        assert_eq!(store.room_ids().len(), 7);

        let living = bounds(&store, "Living Room");
        assert_relative_eq!(living.min_x, 51.9);
        assert_relative_eq!(living.max_x, 60.98);

        let s = store.room_bounds(study).unwrap();
        assert_relative_eq!(s.min_x, 45.9);
        assert_relative_eq!(s.max_x, living.min_x);
        assert_relative_eq!(s.min_y, 25.07);
        assert_relative_eq!(s.max_y, 34.52);
        assert_relative_eq!(bounds(&store, "Kitchen").max_x, 51.9);

        let east = neighbors_in(&store, study, Direction::East).unwrap();
        assert_eq!(east, [store.room_id("Living Room").unwrap()]);
        assert!(FindOverlaps::new(0.1).execute(&store).unwrap().is_empty());

        // The study filled the gap down to the kitchen and says so.
        assert_eq!(diags.len(), 1, "{diags:?}");
        let Some(Diagnostic::RoomResized { room, axis, requested, actual }) = diags.iter().next()
        else {
            panic!("expected the study to report its growth: {diags:?}");
        };
        assert_eq!((room.as_str(), *axis), ("Study", Axis::Y));
        assert_relative_eq!(*requested, 6.0);
        assert_relative_eq!(*actual, 9.45, epsilon = 1e-6);

        // Only the contacts the study now sits between are gone.
        let reference = LayoutSnapshot::capture(
            &LayoutStore::from_plan(&reference_apartment()).unwrap(),
        )
        .unwrap();
        let broken = FindBrokenConnections::new(&reference).execute(&store).unwrap();
        assert_eq!(
            broken,
            [
                room_pair("Common Washroom", "Living Room"),
                room_pair("Living Room", "Passage"),
            ]
        );
    }

    #[test]
    fn free_side_is_used_directly() {
        let config = SolverConfig::default();
        let (store, diags, result) = insert(
            &reference_apartment(),
            &config,
            NewRoom::new("Study", 6.0, 6.0),
            "Living Room",
            Direction::East,
        );
        let s = store.room_bounds(result.unwrap()).unwrap();
        assert!(diags.is_empty());
        assert_relative_eq!(s.min_x, 54.98);
        assert_relative_eq!(s.max_x, 60.98);
        assert_relative_eq!(s.min_y, 28.52);
        assert_relative_eq!(s.max_y, 34.52);
        assert_relative_eq!(bounds(&store, "Living Room").min_x, 45.9);
    }

    #[test]
    fn rooms_ahead_are_pushed_out() {
        let mut plan = FloorPlan::new();
        plan.insert("Store", rectangle_walls(-4.0, 0.0, 0.0, 6.0));
        plan.insert("Kitchen", rectangle_walls(0.0, 0.0, 6.0, 6.0));
        plan.insert("Hall", rectangle_walls(6.0, 0.0, 10.0, 6.0));
        let config = SolverConfig::default();
        let (store, diags, result) = insert(
            &plan,
            &config,
            NewRoom::new("Study", 5.0, 5.0),
            "Kitchen",
            Direction::East,
        );
        let s = store.room_bounds(result.unwrap()).unwrap();
        assert!(diags.is_empty(), "{diags:?}");
        assert_relative_eq!(s.min_x, 6.0);
        assert_relative_eq!(s.max_x, 11.0);
        assert_relative_eq!(s.min_y, 1.0);
        let hall = bounds(&store, "Hall");
        assert_relative_eq!(hall.min_x, 11.0);
        assert_relative_eq!(hall.max_x, 15.0);
        assert_relative_eq!(bounds(&store, "Kitchen").max_x, 6.0);
    }

    #[test]
    fn boxed_in_anchor_is_infeasible() {
        let mut plan = FloorPlan::new();
        plan.insert("A", rectangle_walls(0.0, 0.0, 4.0, 4.0));
        plan.insert("Core", rectangle_walls(4.0, 0.0, 8.0, 4.0));
        plan.insert("B", rectangle_walls(8.0, 0.0, 12.0, 4.0));
        plan.insert("B2", rectangle_walls(12.0, 0.0, 16.0, 4.0));
        plan.insert("C", rectangle_walls(4.0, 4.0, 8.0, 8.0));
        plan.insert("D", rectangle_walls(4.0, -4.0, 8.0, 0.0));
        let config = SolverConfig {
            max_neighbor_hops: 0,
            ..SolverConfig::default()
        };
        let (store, _, result) = insert(
            &plan,
            &config,
            NewRoom::new("Study", 5.0, 5.0),
            "Core",
            Direction::East,
        );
        assert!(matches!(
            result,
            Err(PlanError::Insertion(InsertionError::Infeasible { side: Direction::East, .. }))
        ));
        assert_plans_close(&store.to_plan(), &plan);
    }

    #[test]
    fn requests_are_validated() {
        let config = SolverConfig::default();
        let plan = reference_apartment();
        let attempt = |name: &str, length: f64, anchor: &str| {
            insert(&plan, &config, NewRoom::new(name, length, 6.0), anchor, Direction::East).2
        };

        assert!(matches!(
            attempt("Kitchen", 6.0, "Living Room"),
            Err(PlanError::Input(InputError::DuplicateRoom(_)))
        ));
        assert!(matches!(
            attempt("Study", 6.0, "Garage"),
            Err(PlanError::Topology(TopologyError::RoomNotFound(_)))
        ));
        assert!(matches!(
            attempt("Study", 4.0, "Living Room"),
            Err(PlanError::Input(InputError::BelowMinimumSize { .. }))
        ));
        assert!(matches!(
            attempt("Study", f64::NAN, "Living Room"),
            Err(PlanError::Input(InputError::InvalidDimension { .. }))
        ));
    }

    #[test]
    fn existing_violation_blocks_insertion() {
        let mut plan = reference_apartment();
        plan.insert("Kitchen", rectangle_walls(39.04, 20.07, 45.9, 25.07));
        let (store, _, result) = insert(
            &plan,
            &SolverConfig::default(),
            NewRoom::new("Study", 6.0, 6.0),
            "Living Room",
            Direction::East,
        );
        assert!(matches!(
            result,
            Err(PlanError::Input(InputError::ExistingRoomViolatesMinimum { ref room, .. })) if room == "Kitchen"
        ));
        assert!(!store.contains_room("Study"));
    }
}
