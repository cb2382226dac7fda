use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::polygon_2d::area_2d;
use crate::math::Point2;

/// A wall as it travels over the wire: `[[x0, y0], [x1, y1]]`.
pub type Segment = [[f64; 2]; 2];

/// Room name to ordered wall list.
///
/// This is the value form of a layout, used for request payloads and for
/// before/after snapshots. Editing happens on [`crate::topology::LayoutStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorPlan {
    rooms: BTreeMap<String, Vec<Segment>>,
}

impl FloorPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a room.
    pub fn insert(&mut self, name: impl Into<String>, walls: Vec<Segment>) {
        self.rooms.insert(name.into(), walls);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Segment]> {
        self.rooms.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rooms.contains_key(name)
    }

    /// Rooms in name order.
    pub fn rooms(&self) -> impl Iterator<Item = (&str, &[Segment])> {
        self.rooms.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Boundary polygon of a room: the start point of every wall.
    #[must_use]
    pub fn polygon(&self, name: &str) -> Option<Vec<Point2>> {
        self.get(name).map(segments_polygon)
    }

    /// Sum of all room areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.rooms.values().map(|walls| area_2d(&segments_polygon(walls))).sum()
    }
}

impl FromIterator<(String, Vec<Segment>)> for FloorPlan {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Segment>)>>(iter: T) -> Self {
        Self {
            rooms: iter.into_iter().collect(),
        }
    }
}

/// Polygon formed by the start points of a closed wall loop.
#[must_use]
pub fn segments_polygon(walls: &[Segment]) -> Vec<Point2> {
    walls.iter().map(|s| Point2::new(s[0][0], s[0][1])).collect()
}

/// Clockwise wall loop for an axis-aligned rectangle, starting at the
/// north-west corner.
#[must_use]
pub fn rectangle_walls(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<Segment> {
    vec![
        [[min_x, max_y], [max_x, max_y]],
        [[max_x, max_y], [max_x, min_y]],
        [[max_x, min_y], [min_x, min_y]],
        [[min_x, min_y], [min_x, max_y]],
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use super::{rectangle_walls, FloorPlan};

    /// Six-room reference apartment, roughly 400 units².
    pub fn reference_apartment() -> FloorPlan {
        let mut plan = FloorPlan::new();
        plan.insert("Master Bedroom", rectangle_walls(30.0, 17.61, 39.04, 30.0));
        plan.insert("En suite Washroom", rectangle_walls(34.97, 30.0, 39.26, 36.99));
        plan.insert("Kitchen", rectangle_walls(39.04, 16.68, 45.9, 25.07));
        plan.insert("Common Washroom", rectangle_walls(39.26, 30.0, 45.9, 34.52));
        plan.insert("Living Room", rectangle_walls(45.9, 19.47, 54.98, 34.52));
        plan.insert("Passage", rectangle_walls(39.04, 25.07, 45.9, 30.0));
        plan
    }

    /// Asserts that two plans have the same rooms and wall coordinates.
    pub fn assert_plans_close(a: &FloorPlan, b: &FloorPlan) {
        assert_eq!(a.names().collect::<Vec<_>>(), b.names().collect::<Vec<_>>());
        for (name, walls) in a.rooms() {
            let other = b.get(name).unwrap();
            assert_eq!(walls.len(), other.len(), "{name}");
            for (w, o) in walls.iter().zip(other) {
                for (p, q) in w.iter().zip(o) {
                    assert!(
                        (p[0] - q[0]).abs() < 1e-9 && (p[1] - q[1]).abs() < 1e-9,
                        "{name}: {w:?} vs {o:?}"
                    );
                }
            }
        }
    }

    /// The same apartment as a JSON payload.
    pub const REFERENCE_JSON: &str = r#"{
        "Master Bedroom": [[[30, 30], [39.04, 30]], [[39.04, 30], [39.04, 17.61]], [[39.04, 17.61], [30, 17.61]], [[30, 17.61], [30, 30]]],
        "En suite Washroom": [[[34.97, 36.99], [39.26, 36.99]], [[39.26, 36.99], [39.26, 30]], [[39.26, 30], [34.97, 30]], [[34.97, 30], [34.97, 36.99]]],
        "Kitchen": [[[39.04, 25.07], [45.9, 25.07]], [[45.9, 25.07], [45.9, 16.68]], [[45.9, 16.68], [39.04, 16.68]], [[39.04, 16.68], [39.04, 25.07]]],
        "Common Washroom": [[[39.26, 34.52], [45.9, 34.52]], [[45.9, 34.52], [45.9, 30]], [[45.9, 30], [39.26, 30]], [[39.26, 30], [39.26, 34.52]]],
        "Living Room": [[[45.9, 34.52], [54.98, 34.52]], [[54.98, 34.52], [54.98, 19.47]], [[54.98, 19.47], [45.9, 19.47]], [[45.9, 19.47], [45.9, 34.52]]],
        "Passage": [[[39.04, 30], [45.9, 30]], [[45.9, 30], [45.9, 25.07]], [[45.9, 25.07], [39.04, 25.07]], [[39.04, 25.07], [39.04, 30]]]
    }"#;
}
