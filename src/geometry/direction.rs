use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The other axis.
    #[must_use]
    pub fn perpendicular(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// The two directions along this axis, positive first.
    #[must_use]
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Self::X => [Direction::East, Direction::West],
            Self::Y => [Direction::North, Direction::South],
        }
    }
}

/// Cardinal direction. North is +y, East is +x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }

    /// Axis along which this direction points.
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Y,
            Self::East | Self::West => Axis::X,
        }
    }

    /// `1.0` for North/East, `-1.0` for South/West.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            Self::North | Self::East => 1.0,
            Self::South | Self::West => -1.0,
        }
    }

    /// Direction along `axis` matching the sign of `delta`.
    #[must_use]
    pub fn along(axis: Axis, delta: f64) -> Self {
        match (axis, delta >= 0.0) {
            (Axis::X, true) => Self::East,
            (Axis::X, false) => Self::West,
            (Axis::Y, true) => Self::North,
            (Axis::Y, false) => Self::South,
        }
    }

    /// Parses a client placement side (`Top`/`Bottom`/`Left`/`Right`,
    /// case-insensitive). Cardinal names are accepted too.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidSide`] for anything else.
    pub fn from_side(side: &str) -> Result<Self, InputError> {
        match side.trim().to_ascii_lowercase().as_str() {
            "top" | "north" => Ok(Self::North),
            "bottom" | "south" => Ok(Self::South),
            "left" | "west" => Ok(Self::West),
            "right" | "east" => Ok(Self::East),
            _ => Err(InputError::InvalidSide(side.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        };
        f.write_str(name)
    }
}
