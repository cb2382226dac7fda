mod adjust;
mod enforce;
mod rebalance;

pub use adjust::{ResizeOutcome, ResizeRoom};
pub use enforce::EnforceConstraints;
pub use rebalance::RebalanceArea;
