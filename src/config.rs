use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_snap_tolerance() -> f64 {
    0.2
}

fn default_repair_snap_tolerance() -> f64 {
    0.09
}

fn default_area_tolerance() -> f64 {
    10.0
}

fn default_gap_threshold() -> f64 {
    0.1
}

fn default_overlap_area_threshold() -> f64 {
    0.1
}

fn default_max_neighbor_hops() -> usize {
    2
}

fn default_max_passes() -> usize {
    16
}

fn default_wall_thickness() -> f64 {
    30.0
}

/// Numeric knobs for the layout passes.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverConfig {
    /// Grouping distance when canonicalising input and scaled coordinates.
    #[serde(default = "default_snap_tolerance")]
    pub snap_tolerance: f64,
    /// Grouping distance after constraint, stitching and rebalancing passes.
    #[serde(default = "default_repair_snap_tolerance")]
    pub repair_snap_tolerance: f64,
    /// Accepted difference between the total area and its target.
    #[serde(default = "default_area_tolerance")]
    pub area_tolerance: f64,
    /// Facing walls closer than this are treated as touching.
    #[serde(default = "default_gap_threshold")]
    pub gap_threshold: f64,
    /// Intersections smaller than this are not overlaps.
    #[serde(default = "default_overlap_area_threshold")]
    pub overlap_area_threshold: f64,
    /// How many rings of neighbours a push may cascade through.
    #[serde(default = "default_max_neighbor_hops")]
    pub max_neighbor_hops: usize,
    /// Upper bound on repeated overlap-resolution and gap-closure rounds.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
    /// Thickness attached to every emitted wall segment.
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: default_snap_tolerance(),
            repair_snap_tolerance: default_repair_snap_tolerance(),
            area_tolerance: default_area_tolerance(),
            gap_threshold: default_gap_threshold(),
            overlap_area_threshold: default_overlap_area_threshold(),
            max_neighbor_hops: default_max_neighbor_hops(),
            max_passes: default_max_passes(),
            wall_thickness: default_wall_thickness(),
        }
    }
}

impl SolverConfig {
    /// Parses a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an input error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(crate::error::InputError::from)?)
    }
}
