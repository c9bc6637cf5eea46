//! # Steel Utils
//!
//! Small value types shared by the Steel crates.

pub mod direction;
pub mod math;
mod types;

pub use direction::{Axis, Direction};
pub use types::{BlockPos, BlockStateId};
