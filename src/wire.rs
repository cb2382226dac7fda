//! Thickness-annotated wall segments, the shape layouts are returned in.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::segment_2d::segment_length;
use crate::math::Point2;
use crate::plan::FloorPlan;

/// A point as `{ "x": .., "y": .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WirePoint {
    pub x: f64,
    pub y: f64,
}

impl From<[f64; 2]> for WirePoint {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

impl From<WirePoint> for [f64; 2] {
    fn from(p: WirePoint) -> Self {
        [p.x, p.y]
    }
}

/// One wall of a room with its drawing thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSegment {
    pub start: WirePoint,
    pub end: WirePoint,
    pub thickness: f64,
    /// Position before any client-side edit; equal to `start` on output.
    pub original_start: WirePoint,
    pub original_end: WirePoint,
    pub length: f64,
}

/// Room name to wall segments.
pub type WallSegments = BTreeMap<String, Vec<WallSegment>>;

/// Converts every wall of every room into a [`WallSegment`].
#[must_use]
pub fn to_wall_segments(plan: &FloorPlan, thickness: f64) -> WallSegments {
    plan.rooms()
        .map(|(name, walls)| {
            let segments = walls
                .iter()
                .map(|&[a, b]| {
                    let (start, end) = (WirePoint::from(a), WirePoint::from(b));
                    WallSegment {
                        start,
                        end,
                        thickness,
                        original_start: start,
                        original_end: end,
                        length: segment_length(&Point2::new(a[0], a[1]), &Point2::new(b[0], b[1])),
                    }
                })
                .collect();
            (name.to_owned(), segments)
        })
        .collect()
}

/// Rebuilds the floor plan from wall segments, using `start` and `end`.
#[must_use]
pub fn from_wall_segments(segments: &WallSegments) -> FloorPlan {
    segments
        .iter()
        .map(|(name, walls)| {
            let walls = walls.iter().map(|w| [w.start.into(), w.end.into()]).collect();
            (name.clone(), walls)
        })
        .collect()
}
