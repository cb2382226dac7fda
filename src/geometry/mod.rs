pub mod direction;
pub mod orientation;
pub mod rect;

pub use direction::{Axis, Direction};
pub use orientation::Orientation;
pub use rect::Rect;
