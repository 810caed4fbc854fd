//! Position and identity types shared across the crate

mod position;

pub use position::{BlockPos, PlayerId, WorldCoord, WorldId};
