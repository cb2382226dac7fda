//! Request pipelines: generate a layout from a template, adjust room
//! dimensions, and add a room.
//!
//! Each pipeline takes a deserialized request, runs the layout passes in a
//! fixed order on a fresh [`LayoutStore`] and returns the edited layout with
//! everything recorded along the way. Transport and file access stay with
//! the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::error::{InputError, Result};
use crate::geometry::{Axis, Direction};
use crate::operations::insert::{InsertRoom, NewRoom};
use crate::operations::query::{BuildMetadata, ValidateDimensions};
use crate::operations::repair::{FindBrokenConnections, LayoutSnapshot, StitchConnections};
use crate::operations::resize::{EnforceConstraints, RebalanceArea, ResizeOutcome, ResizeRoom};
use crate::operations::transform::{ScaleToArea, SnapLayout};
use crate::operations::LayoutContext;
use crate::plan::FloorPlan;
use crate::topology::LayoutStore;
use crate::wire::{to_wall_segments, WallSegments};

/// Template layouts keyed by flat type, then by template number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateTable(BTreeMap<String, BTreeMap<String, FloorPlan>>);

impl TemplateTable {
    /// Parses the nested JSON table.
    ///
    /// # Errors
    ///
    /// Returns an input error if the JSON does not have the expected shape.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(InputError::from)?)
    }

    /// Adds or replaces one template.
    pub fn insert(
        &mut self,
        flat_type: impl Into<String>,
        template: impl Into<String>,
        plan: FloorPlan,
    ) {
        self.0
            .entry(flat_type.into())
            .or_default()
            .insert(template.into(), plan);
    }

    /// Looks up a `"<TypeKey>_<TemplateNumber>"` key.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::MalformedTemplateKey`] if the key does not have
    /// exactly two parts, or [`InputError::TemplateNotFound`] if either part
    /// is unknown.
    pub fn resolve(&self, key: &str) -> Result<&FloorPlan> {
        let (flat_type, template) = parse_template_key(key)?;
        let plan = self
            .0
            .get(flat_type)
            .and_then(|templates| templates.get(template))
            .ok_or_else(|| InputError::TemplateNotFound {
                flat_type: flat_type.to_owned(),
                template: template.to_owned(),
            })?;
        Ok(plan)
    }
}

fn parse_template_key(key: &str) -> std::result::Result<(&str, &str), InputError> {
    let mut parts = key.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(flat_type), Some(template), None) if !flat_type.is_empty() && !template.is_empty() => {
            Ok((flat_type, template))
        }
        _ => Err(InputError::MalformedTemplateKey(key.to_owned())),
    }
}

/// Request to build a layout from a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// `"<TypeKey>_<TemplateNumber>"`, e.g. `"1BHK_template5"`.
    pub template: String,
    pub flat_area: f64,
    #[serde(rename = "type")]
    pub flat_type: String,
}

/// Requested size of one room; `0` leaves that axis unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomDimension {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// Request to resize individual rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustRequest {
    pub room_dimensions: BTreeMap<String, RoomDimension>,
    #[serde(alias = "rooms")]
    pub data: FloorPlan,
    /// `"Yes"` restores the original total area afterwards.
    #[serde(default)]
    pub freeze: String,
}

impl AdjustRequest {
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.freeze.eq_ignore_ascii_case("yes")
    }
}

/// Request to place a new room next to an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRoomRequest {
    pub room_name: String,
    pub adjacent_room: String,
    /// `Top`, `Bottom`, `Left` or `Right`.
    pub direction: String,
    /// Extent along x.
    pub room_width: f64,
    /// Extent along y.
    pub room_height: f64,
    pub rooms: FloorPlan,
}

/// The edited layout in one of the two output forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Layout {
    Walls(WallSegments),
    Coordinates(FloorPlan),
}

/// Result of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub layout: Layout,
    pub total_area: f64,
    pub diagnostics: Diagnostics,
}

/// Snaps, then stitches every connection broken since `before` that has not
/// already been reported. `held` rooms keep their size.
fn settle(
    ctx: LayoutContext<'_>,
    store: &mut LayoutStore,
    before: &LayoutSnapshot,
    held: &[String],
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    SnapLayout::new(ctx.config.repair_snap_tolerance).execute(store);
    let broken: Vec<_> = FindBrokenConnections::new(before)
        .execute(store)?
        .into_iter()
        .filter(|pair| !diagnostics.is_unstitched(pair))
        .collect();
    if !broken.is_empty() {
        debug!(pairs = broken.len(), "stitching broken connections");
        StitchConnections::new(ctx, before, broken)
            .holding(held.iter().cloned())
            .execute(store, diagnostics)?;
    }
    Ok(())
}

/// Builds a layout from a template scaled to a flat area.
pub struct GenerateLayout<'a> {
    ctx: LayoutContext<'a>,
    templates: &'a TemplateTable,
}

impl<'a> GenerateLayout<'a> {
    /// Creates a new `GenerateLayout` pipeline.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>, templates: &'a TemplateTable) -> Self {
        Self { ctx, templates }
    }

    /// Executes the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] for an unknown flat type, an area below the
    /// type's minimum or a bad template key. No layout work is done in that
    /// case.
    pub fn execute(&self, request: &GenerateRequest) -> Result<LayoutResponse> {
        let (policy, config) = (self.ctx.policy, self.ctx.config);
        info!(template = %request.template, area = request.flat_area, "generating layout");

        // Step 1: reject requests before touching geometry.
        parse_template_key(&request.template)?;
        let minimum = policy.flat_minimum(&request.flat_type)?;
        if request.flat_area < minimum {
            return Err(InputError::InsufficientArea {
                flat_type: request.flat_type.clone(),
                area: request.flat_area,
                minimum,
            }
            .into());
        }
        let template = self.templates.resolve(&request.template)?;

        // Step 2: canonicalise, remember the template's contacts, then scale.
        let mut store = LayoutStore::from_plan(template)?;
        let mut diagnostics = Diagnostics::new();
        let snap = SnapLayout::new(config.snap_tolerance);
        snap.execute(&mut store);
        diagnostics.extend(BuildMetadata::new().execute(&store)?.degenerate_walls());
        let before = LayoutSnapshot::capture(&store)?;
        let factor = ScaleToArea::new(request.flat_area).execute(&mut store)?;
        snap.execute(&mut store);
        debug!(factor, "scaled template");

        // Step 3: room minimums, then reconnect what scaling or enforcement broke.
        EnforceConstraints::new(self.ctx).execute(&mut store, &mut diagnostics)?;
        settle(self.ctx, &mut store, &before, &[], &mut diagnostics)?;

        // Step 4: residual area, then catch contacts the rebalance broke.
        SnapLayout::new(config.repair_snap_tolerance).execute(&mut store);
        RebalanceArea::new(self.ctx, request.flat_area).execute(&mut store, &mut diagnostics)?;
        settle(self.ctx, &mut store, &before, &[], &mut diagnostics)?;

        diagnostics.extend(ValidateDimensions::new(policy).execute(&store)?);
        let total_area = store.total_area()?;
        info!(total_area, diagnostics = diagnostics.len(), "layout generated");
        Ok(LayoutResponse {
            layout: Layout::Walls(to_wall_segments(&store.to_plan(), config.wall_thickness)),
            total_area,
            diagnostics,
        })
    }
}

/// Resizes rooms to requested widths and heights.
pub struct AdjustDimensions<'a> {
    ctx: LayoutContext<'a>,
}

impl<'a> AdjustDimensions<'a> {
    /// Creates a new `AdjustDimensions` pipeline.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>) -> Self {
        Self { ctx }
    }

    /// Executes the pipeline.
    ///
    /// Every requested change is applied on its own and followed by a snap
    /// and a stitch. Requests that cannot be applied are reported as
    /// [`Diagnostic::UnsatisfiableConstraint`]. With freeze set, the other
    /// flexible rooms give back or take up area until the original total is
    /// restored and walls are returned; otherwise raw coordinates are.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout is malformed or a requested room does
    /// not exist.
    pub fn execute(&self, request: &AdjustRequest) -> Result<LayoutResponse> {
        let (policy, config) = (self.ctx.policy, self.ctx.config);
        let mut store = LayoutStore::from_plan(&request.data)?;
        let mut diagnostics = Diagnostics::new();
        let target = store.total_area()?;
        let held: Vec<String> = request.room_dimensions.keys().cloned().collect();
        info!(rooms = held.len(), target, "adjusting dimensions");

        for (name, dims) in &request.room_dimensions {
            let id = store.room_id(name)?;
            for (axis, wanted) in [(Axis::X, dims.width), (Axis::Y, dims.height)] {
                if wanted <= 0.0 {
                    continue;
                }
                let actual = store.room_bounds(id)?.extent(axis);
                let before = LayoutSnapshot::capture(&store)?;
                let outcome =
                    ResizeRoom::new(self.ctx, id, axis, wanted - actual).execute(&mut store)?;
                if outcome == ResizeOutcome::Blocked {
                    diagnostics.push(Diagnostic::UnsatisfiableConstraint {
                        room: name.clone(),
                        axis,
                        required: wanted,
                        actual,
                    });
                    continue;
                }
                settle(self.ctx, &mut store, &before, &held, &mut diagnostics)?;
            }
        }

        let before = LayoutSnapshot::capture(&store)?;
        EnforceConstraints::new(self.ctx)
            .holding(held.iter().cloned())
            .execute(&mut store, &mut diagnostics)?;
        settle(self.ctx, &mut store, &before, &held, &mut diagnostics)?;

        let layout = if request.is_frozen() {
            RebalanceArea::new(self.ctx, target)
                .holding(held.iter().cloned())
                .execute(&mut store, &mut diagnostics)?;
            SnapLayout::new(config.repair_snap_tolerance).execute(&mut store);
            diagnostics.extend(ValidateDimensions::new(policy).execute(&store)?);
            Layout::Walls(to_wall_segments(&store.to_plan(), config.wall_thickness))
        } else {
            diagnostics.extend(ValidateDimensions::new(policy).execute(&store)?);
            Layout::Coordinates(store.to_plan())
        };

        let total_area = store.total_area()?;
        info!(total_area, diagnostics = diagnostics.len(), "dimensions adjusted");
        Ok(LayoutResponse {
            layout,
            total_area,
            diagnostics,
        })
    }
}

/// Adds a room against a side of an existing room.
pub struct AddRoom<'a> {
    ctx: LayoutContext<'a>,
}

impl<'a> AddRoom<'a> {
    /// Creates a new `AddRoom` pipeline.
    #[must_use]
    pub fn new(ctx: LayoutContext<'a>) -> Self {
        Self { ctx }
    }

    /// Executes the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an input error for a bad side or size, or an insertion error
    /// if the room cannot be placed.
    pub fn execute(&self, request: &AddRoomRequest) -> Result<LayoutResponse> {
        let side = Direction::from_side(&request.direction)?;
        info!(
            room = %request.room_name,
            anchor = %request.adjacent_room,
            %side,
            "adding room"
        );
        let mut store = LayoutStore::from_plan(&request.rooms)?;
        let mut diagnostics = Diagnostics::new();
        let room = NewRoom::new(&request.room_name, request.room_width, request.room_height);
        InsertRoom::new(self.ctx, room, &request.adjacent_room, side)
            .execute(&mut store, &mut diagnostics)?;

        let total_area = store.total_area()?;
        info!(total_area, diagnostics = diagnostics.len(), "room added");
        Ok(LayoutResponse {
            layout: Layout::Walls(to_wall_segments(
                &store.to_plan(),
                self.ctx.config.wall_thickness,
            )),
            total_area,
            diagnostics,
        })
    }
}
