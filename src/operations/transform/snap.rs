use tracing::trace;

use crate::topology::LayoutStore;

/// Merges coordinates that drifted apart by less than a tolerance.
pub struct SnapLayout {
    tolerance: f64,
}

impl SnapLayout {
    /// Creates a new `SnapLayout` operation.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Executes the snap in place.
    pub fn execute(&self, store: &mut LayoutStore) {
        trace!(tolerance = self.tolerance, "snapping layout");
        store.snap(self.tolerance);
    }
}
