//! Passes that restore a consistent layout after an edit: reconnecting rooms
//! that lost a shared wall, pulling overlapping rooms apart and closing
//! small gaps.

mod gaps;
mod overlaps;
mod shift;
mod snapshot;
mod stitch;

pub use gaps::CloseGaps;
pub use overlaps::ResolveOverlaps;
pub use shift::{AnalyzeShift, PairShift, ShiftDescriptor};
pub use snapshot::{FindBrokenConnections, LayoutSnapshot};
pub use stitch::{StitchConnections, StitchMethod};
