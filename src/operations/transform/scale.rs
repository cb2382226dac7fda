use tracing::debug;

use crate::error::Result;
use crate::math::{round2, Point2, TOLERANCE};
use crate::topology::LayoutStore;

/// Scales a layout so that its total area approaches a target.
///
/// Every room is scaled about the layout's lower-left corner, by a per-axis
/// factor chosen so that the room's own width and height land on two-decimal
/// values. Walls shared by two rooms can then drift apart by a hundredth or
/// two; a snap pass afterwards closes them up again.
pub struct ScaleToArea {
    target: f64,
}

impl ScaleToArea {
    /// Creates a new `ScaleToArea` operation.
    #[must_use]
    pub fn new(target: f64) -> Self {
        Self { target }
    }

    /// Executes the scaling in place and returns the global factor
    /// `sqrt(target / current)`. An empty layout is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &mut LayoutStore) -> Result<f64> {
        let current = store.total_area()?;
        if current <= TOLERANCE || self.target <= 0.0 {
            return Ok(1.0);
        }
        let factor = (self.target / current).sqrt();

        let mut origin = Point2::new(f64::INFINITY, f64::INFINITY);
        for &id in store.room_ids() {
            let b = store.room_bounds(id)?;
            origin.x = origin.x.min(b.min_x);
            origin.y = origin.y.min(b.min_y);
        }

        let ids = store.room_ids().to_vec();
        for id in ids {
            let b = store.room_bounds(id)?;
            let sx = axis_scale(b.width(), factor);
            let sy = axis_scale(b.height(), factor);
            for v in store.room_vertices(id)? {
                let p = store.vertex(v)?.point;
                let scaled = Point2::new(
                    origin.x + (p.x - origin.x) * sx,
                    origin.y + (p.y - origin.y) * sy,
                );
                store.move_vertex(v, scaled)?;
            }
        }

        debug!(current, target = self.target, factor, "scaled layout");
        Ok(factor)
    }
}

/// Factor that takes `extent` to `round2(extent * factor)`.
fn axis_scale(extent: f64, factor: f64) -> f64 {
    if extent > TOLERANCE {
        round2(extent * factor) / extent
    } else {
        factor
    }
}
