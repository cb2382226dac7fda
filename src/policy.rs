//! Named policy tables consulted by the layout passes.
//!
//! Everything here is data: swapping a table changes which rooms absorb an
//! edit without touching the algorithms themselves.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::InputError;
use crate::geometry::{Axis, Direction};

/// Size bounds for one room type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraint {
    pub min_width: f64,
    pub min_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

impl Constraint {
    /// Square minimum with no maximum.
    #[must_use]
    pub fn min(size: f64) -> Self {
        Self {
            min_width: size,
            min_height: size,
            max_width: None,
            max_height: None,
        }
    }

    /// Adds an upper bound.
    #[must_use]
    pub fn with_max(mut self, width: f64, height: f64) -> Self {
        self.max_width = Some(width);
        self.max_height = Some(height);
        self
    }

    /// Minimum extent along an axis (width is x, height is y).
    #[must_use]
    pub fn min_along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.min_width,
            Axis::Y => self.min_height,
        }
    }

    /// Maximum extent along an axis, `INFINITY` when unbounded.
    #[must_use]
    pub fn max_along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.max_width,
            Axis::Y => self.max_height,
        }
        .unwrap_or(f64::INFINITY)
    }
}

/// Where a new room sits along the side it is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    /// Flush with the low end (left or bottom) of the side.
    Start,
    /// Flush with the high end (right or top) of the side.
    End,
}

/// Policy tables for a layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Size bounds keyed by room name.
    pub constraints: BTreeMap<String, Constraint>,
    /// Rooms skipped by constraint enforcement.
    pub excluded: BTreeSet<String>,
    /// Rooms that absorb residual area, highest priority first.
    pub flexible_rooms: Vec<String>,
    /// Groups of rooms that always move together.
    pub relations: Vec<BTreeSet<String>>,
    /// Growth directions tried for a width change, in order.
    pub width_directions: [Direction; 2],
    /// Growth directions tried for a height change, in order.
    pub height_directions: [Direction; 2],
    /// Smallest accepted flat area per flat type.
    pub flat_minimums: BTreeMap<String, f64>,
    /// Placement along the side for rooms attached East or West.
    pub east_west_alignment: Alignment,
    /// Placement along the side for rooms attached North or South.
    pub north_south_alignment: Alignment,
}

impl Default for Policy {
    fn default() -> Self {
        let washroom = Constraint::min(3.3).with_max(8.0, 8.0);
        let bathroom = Constraint::min(3.3).with_max(8.0, 5.0);
        let constraints = [
            ("Master Bedroom", Constraint::min(6.89)),
            ("Kitchen", Constraint::min(5.91)),
            ("Living Room", Constraint::min(6.89)),
            ("Bedroom", Constraint::min(6.89)),
            ("Foyer", Constraint::min(3.3)),
            ("Dining Room", Constraint::min(5.0)),
            ("En suite Washroom", washroom),
            ("Common Washroom", washroom),
            ("Passage", Constraint::min(3.3)),
            ("Bathroom", bathroom),
            ("Washroom", bathroom),
            ("Study", Constraint::min(5.0)),
            ("MB Passage", Constraint::min(4.0)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();

        Self {
            constraints,
            excluded: BTreeSet::from(["MB Passage".to_owned()]),
            flexible_rooms: ["Living Room", "Dining Room", "Kitchen", "Bedroom", "Master Bedroom"]
                .map(str::to_owned)
                .to_vec(),
            relations: vec![BTreeSet::from([
                "Master Bedroom".to_owned(),
                "En suite Washroom".to_owned(),
                "MB Passage".to_owned(),
            ])],
            width_directions: [Direction::East, Direction::West],
            height_directions: [Direction::North, Direction::South],
            flat_minimums: BTreeMap::from([("1BHK".to_owned(), 300.0), ("2BHK".to_owned(), 525.0)]),
            east_west_alignment: Alignment::End,
            north_south_alignment: Alignment::Start,
        }
    }
}

impl Policy {
    /// Size bounds for a room, if its name is a known type.
    #[must_use]
    pub fn constraint(&self, room: &str) -> Option<&Constraint> {
        self.constraints.get(room)
    }

    #[must_use]
    pub fn is_excluded(&self, room: &str) -> bool {
        self.excluded.contains(room)
    }

    /// Directions tried, in order, when changing a room's extent along `axis`.
    #[must_use]
    pub fn directions_for(&self, axis: Axis) -> [Direction; 2] {
        match axis {
            Axis::X => self.width_directions,
            Axis::Y => self.height_directions,
        }
    }

    /// Rooms that must move whenever `room` moves, excluding `room` itself.
    pub fn related<'a>(&'a self, room: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.relations
            .iter()
            .filter(move |group| group.contains(room))
            .flat_map(|group| group.iter().map(String::as_str))
            .filter(move |&other| other != room)
    }

    /// Priority rank of a flexible room, or `None` if it does not absorb area.
    #[must_use]
    pub fn flexible_rank(&self, room: &str) -> Option<usize> {
        self.flexible_rooms.iter().position(|r| r == room)
    }

    /// Minimum flat area for a flat type.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::UnknownFlatType`] for an unlisted type.
    pub fn flat_minimum(&self, flat_type: &str) -> Result<f64, InputError> {
        self.flat_minimums
            .get(flat_type)
            .copied()
            .ok_or_else(|| InputError::UnknownFlatType(flat_type.to_owned()))
    }

    /// Alignment used when attaching a room on `side`.
    #[must_use]
    pub fn alignment_for(&self, side: Direction) -> Alignment {
        match side.axis() {
            Axis::X => self.east_west_alignment,
            Axis::Y => self.north_south_alignment,
        }
    }
}
