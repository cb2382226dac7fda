mod place;

pub use place::{InsertRoom, NewRoom};
