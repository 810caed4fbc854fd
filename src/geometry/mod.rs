//! Axis-aligned bounding-box math for claim volumes

mod aabb;

pub use aabb::{Aabb, GeometryError, VerticalExtent};
