pub mod insert;
pub mod query;
pub mod repair;
pub mod resize;
pub mod transform;

use crate::config::SolverConfig;
use crate::policy::Policy;

/// Policy tables and numeric knobs shared by every editing pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    pub policy: &'a Policy,
    pub config: &'a SolverConfig,
}

impl<'a> LayoutContext<'a> {
    #[must_use]
    pub fn new(policy: &'a Policy, config: &'a SolverConfig) -> Self {
        Self { policy, config }
    }
}
