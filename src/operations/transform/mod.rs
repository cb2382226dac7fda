mod scale;
mod snap;
mod translate;

pub use scale::ScaleToArea;
pub use snap::SnapLayout;
pub use translate::{occupants, PlanPush, ShiftRooms};
