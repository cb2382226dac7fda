use thiserror::Error;

use crate::geometry::Direction;

/// Top-level error type for the floor-plan solver.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Insertion(#[from] InsertionError),
}

/// Errors caused by a request that cannot be processed as given.
///
/// These are raised before any layout work starts.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("unknown flat type: {0}")]
    UnknownFlatType(String),

    #[error("insufficient area for {flat_type}: {area} is below the minimum of {minimum}")]
    InsufficientArea {
        flat_type: String,
        area: f64,
        minimum: f64,
    },

    #[error("malformed template key: {0:?} (expected \"<TypeKey>_<TemplateNumber>\")")]
    MalformedTemplateKey(String),

    #[error("template {template} not found for flat type {flat_type}")]
    TemplateNotFound { flat_type: String, template: String },

    #[error("invalid placement side: {0:?}")]
    InvalidSide(String),

    #[error("room already exists: {0}")]
    DuplicateRoom(String),

    #[error("invalid dimension for {room}: {value}")]
    InvalidDimension { room: String, value: f64 },

    #[error("{room} must be at least {min_width}x{min_height}, got {width}x{height}")]
    BelowMinimumSize {
        room: String,
        width: f64,
        height: f64,
        min_width: f64,
        min_height: f64,
    },

    #[error(
        "existing room {room} violates its minimum dimensions: {width}x{height}, expected at least {min_width}x{min_height}"
    )]
    ExistingRoomViolatesMinimum {
        room: String,
        width: f64,
        height: f64,
        min_width: f64,
        min_height: f64,
    },

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to room boundary geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("room {room} has {count} walls, at least 3 are required")]
    TooFewWalls { room: String, count: usize },

    #[error("room {room} is not closed at wall {index}")]
    OpenPolygon { room: String, index: usize },

    #[error("room {0} contains a non-finite coordinate")]
    NonFinite(String),
}

/// Errors related to the shared-vertex layout store.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("room not found: {0}")]
    RoomNotFound(String),
}

/// Errors raised by new-room placement.
#[derive(Debug, Error)]
pub enum InsertionError {
    #[error("placing {room} on the {side} side of {anchor} is not possible")]
    Infeasible {
        room: String,
        anchor: String,
        side: Direction,
    },
}

/// Convenience type alias for results using [`PlanError`].
pub type Result<T> = std::result::Result<T, PlanError>;
