use serde::Serialize;
use tracing::warn;

use crate::geometry::{Axis, Direction};

/// A non-fatal outcome recorded while a pass keeps going.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Diagnostic {
    /// A room could not reach a size bound; it keeps its previous size.
    #[serde(rename_all = "camelCase")]
    UnsatisfiableConstraint {
        room: String,
        axis: Axis,
        required: f64,
        actual: f64,
    },
    /// A broken adjacency that no stitching strategy could repair.
    #[serde(rename_all = "camelCase")]
    UnstitchableConnection {
        rooms: (String, String),
        direction: Option<Direction>,
    },
    /// A wall that is diagonal or whose side cannot be classified.
    #[serde(rename_all = "camelCase")]
    DegenerateGeometry {
        room: String,
        wall: usize,
        reason: String,
    },
    /// Final total area is further from its target than the tolerance.
    #[serde(rename_all = "camelCase")]
    AreaMismatch { target: f64, actual: f64 },
    /// A room outside its size bounds in the final plan.
    #[serde(rename_all = "camelCase")]
    ConstraintViolation {
        room: String,
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Two rooms still overlap after the bounded resolution passes.
    #[serde(rename_all = "camelCase")]
    UnresolvedOverlap { rooms: (String, String), area: f64 },
    /// A new room grew past its requested size to close a gap.
    #[serde(rename_all = "camelCase")]
    RoomResized {
        room: String,
        axis: Axis,
        requested: f64,
        actual: f64,
    },
}

/// Ordered collection of diagnostics. Every entry is logged when recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!(?diagnostic, "layout diagnostic");
        self.0.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if any unsatisfiable-constraint entry names `room`.
    #[must_use]
    pub fn has_unsatisfiable(&self, room: &str) -> bool {
        self.0.iter().any(
            |d| matches!(d, Diagnostic::UnsatisfiableConstraint { room: r, .. } if r == room),
        )
    }

    /// Returns `true` if the pair was already reported as unstitchable.
    #[must_use]
    pub fn is_unstitched(&self, pair: &(String, String)) -> bool {
        self.0.iter().any(
            |d| matches!(d, Diagnostic::UnstitchableConnection { rooms, .. } if rooms == pair),
        )
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for d in iter {
            self.push(d);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let d = Diagnostic::AreaMismatch {
            target: 500.0,
            actual: 480.0,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "areaMismatch");
        assert_eq!(json["target"], 500.0);
    }

    #[test]
    fn unsatisfiable_lookup() {
        let mut diags = Diagnostics::new();
        diags.push(Diagnostic::UnsatisfiableConstraint {
            room: "Kitchen".into(),
            axis: Axis::X,
            required: 5.91,
            actual: 5.0,
        });
        assert!(diags.has_unsatisfiable("Kitchen"));
        assert!(!diags.has_unsatisfiable("Passage"));
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn unstitched_lookup() {
        let pair = ("En suite Washroom".to_owned(), "Passage".to_owned());
        let mut diags = Diagnostics::new();
        assert!(!diags.is_unstitched(&pair));
        diags.push(Diagnostic::UnstitchableConnection {
            rooms: pair.clone(),
            direction: None,
        });
        assert!(diags.is_unstitched(&pair));
        assert!(!diags.is_unstitched(&("Kitchen".to_owned(), "Passage".to_owned())));
    }
}
