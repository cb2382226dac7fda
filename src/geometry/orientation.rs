use serde::{Deserialize, Serialize};

use super::Axis;
use crate::math::{approx_eq, Point2};

/// Orientation of a wall segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
    /// Neither horizontal nor vertical; excluded from direction logic.
    Diagonal,
}

impl Orientation {
    /// Classifies the segment `start`-`end`.
    #[must_use]
    pub fn of(start: &Point2, end: &Point2) -> Self {
        if approx_eq(start.y, end.y) {
            Self::Horizontal
        } else if approx_eq(start.x, end.x) {
            Self::Vertical
        } else {
            Self::Diagonal
        }
    }

    /// Axis the segment runs along, if axis-aligned.
    #[must_use]
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::Horizontal => Some(Axis::X),
            Self::Vertical => Some(Axis::Y),
            Self::Diagonal => None,
        }
    }
}
