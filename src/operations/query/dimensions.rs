use crate::diagnostics::Diagnostic;
use crate::error::Result;
use crate::geometry::Axis;
use crate::math::TOLERANCE;
use crate::policy::Policy;
use crate::topology::LayoutStore;

/// Lists every room whose width or height falls outside its bounds.
pub struct ValidateDimensions<'a> {
    policy: &'a Policy,
}

impl<'a> ValidateDimensions<'a> {
    /// Creates a new `ValidateDimensions` query.
    #[must_use]
    pub fn new(policy: &'a Policy) -> Self {
        Self { policy }
    }

    /// Executes the query. Rooms without a constraint are never reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is inconsistent.
    pub fn execute(&self, store: &LayoutStore) -> Result<Vec<Diagnostic>> {
        let mut out = Vec::new();
        for &id in store.room_ids() {
            let name = store.room_name(id)?;
            let Some(c) = self.policy.constraint(name) else {
                continue;
            };
            let bounds = store.room_bounds(id)?;
            for axis in [Axis::X, Axis::Y] {
                let value = bounds.extent(axis);
                let (min, max) = (c.min_along(axis), c.max_along(axis));
                if value < min - TOLERANCE || value > max + TOLERANCE {
                    out.push(Diagnostic::ConstraintViolation {
                        room: name.to_owned(),
                        axis,
                        value,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::plan::fixtures::reference_apartment;
    use crate::plan::rectangle_walls;

    #[test]
    fn reference_is_within_bounds() {
        let store = LayoutStore::from_plan(&reference_apartment()).unwrap();
        let policy = Policy::default();
        assert!(ValidateDimensions::new(&policy).execute(&store).unwrap().is_empty());
    }

    #[test]
    fn reports_both_minimum_and_maximum() {
        let mut plan = reference_apartment();
        plan.insert("Kitchen", rectangle_walls(39.04, 20.0, 45.9, 25.07));
        plan.insert("Bathroom", rectangle_walls(60.0, 0.0, 64.0, 6.0));
        let store = LayoutStore::from_plan(&plan).unwrap();
        let policy = Policy::default();
        let found = ValidateDimensions::new(&policy).execute(&store).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|d| matches!(
            d,
            Diagnostic::ConstraintViolation { room, axis: Axis::Y, .. } if room == "Kitchen"
        )));
        assert!(found.iter().any(|d| matches!(
            d,
            Diagnostic::ConstraintViolation { room, axis: Axis::Y, max, .. }
                if room == "Bathroom" && (*max - 5.0).abs() < 1e-9
        )));
    }
}
