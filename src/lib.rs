pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod plan;
pub mod policy;
pub mod topology;
pub mod wire;

pub use error::{PlanError, Result};
