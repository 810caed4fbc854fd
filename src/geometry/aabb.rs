use crate::world::{WorldCoord, WorldId};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from box construction
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("box radius cannot be negative: {size}")]
    NegativeSize { size: i32 },
}

/// Vertical span convention for boxes built from a center and radius.
///
/// The horizontal span is always `center ± size` on X and Z; the vertical
/// axis is a deployment choice, so it is a parameter rather than a fixed
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalExtent {
    /// Y spans `center.y ± size`, same as the horizontal axes
    MatchRadius,
    /// Y spans the whole world column regardless of the radius
    FullColumn { min_y: f64, max_y: f64 },
}

impl Default for VerticalExtent {
    fn default() -> Self {
        VerticalExtent::MatchRadius
    }
}

/// Axis-aligned box in a named world.
///
/// Invariant: `min <= max` on every axis, established by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
    pub world: WorldId,
}

impl Aabb {
    /// Build a box spanning `center ± size` on X and Z, with the Y span
    /// governed by `vertical`. Fails only on a negative radius.
    pub fn from_center(
        center: &WorldCoord,
        size: i32,
        vertical: VerticalExtent,
    ) -> Result<Self, GeometryError> {
        if size < 0 {
            return Err(GeometryError::NegativeSize { size });
        }
        let r = size as f64;
        let (min_y, max_y) = match vertical {
            VerticalExtent::MatchRadius => (center.pos.y - r, center.pos.y + r),
            VerticalExtent::FullColumn { min_y, max_y } => {
                if min_y <= max_y {
                    (min_y, max_y)
                } else {
                    (max_y, min_y)
                }
            }
        };
        Ok(Self {
            min: DVec3::new(center.pos.x - r, min_y, center.pos.z - r),
            max: DVec3::new(center.pos.x + r, max_y, center.pos.z + r),
            world: center.world.clone(),
        })
    }

    /// Test if the box contains a point, inclusive on all bounds.
    /// A point in a different world is never contained.
    pub fn contains(&self, point: &WorldCoord) -> bool {
        if point.world != self.world {
            return false;
        }
        let p = point.pos;
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Test if two boxes overlap: on each axis, either box's minimum must
    /// fall inside the other's span, and all three axes must agree. Sharing
    /// a boundary plane counts, as does full containment. Symmetric.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if self.world != other.world {
            return false;
        }
        axis_overlap(self.min.x, self.max.x, other.min.x, other.max.x)
            && axis_overlap(self.min.y, self.max.y, other.min.y, other.max.y)
            && axis_overlap(self.min.z, self.max.z, other.min.z, other.max.z)
    }
}

fn axis_overlap(a_min: f64, a_max: f64, b_min: f64, b_max: f64) -> bool {
    (a_min >= b_min && a_min <= b_max) || (b_min >= a_min && b_min <= a_max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(x: f64, y: f64, z: f64) -> WorldCoord {
        WorldCoord::new(WorldId::new("overworld"), x, y, z)
    }

    #[test]
    fn test_from_center_spans_radius() {
        let aabb = Aabb::from_center(&coord(0.0, 0.0, 0.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert_eq!(aabb.min, glam::DVec3::new(-4.0, -4.0, -4.0));
        assert_eq!(aabb.max, glam::DVec3::new(4.0, 4.0, 4.0));
    }

    #[test]
    fn test_from_center_full_column() {
        let vertical = VerticalExtent::FullColumn {
            min_y: -64.0,
            max_y: 320.0,
        };
        let aabb = Aabb::from_center(&coord(10.0, 70.0, -5.0), 8, vertical)
            .expect("non-negative radius");
        assert_eq!(aabb.min.y, -64.0);
        assert_eq!(aabb.max.y, 320.0);
        assert_eq!(aabb.min.x, 2.0);
        assert_eq!(aabb.max.z, 3.0);
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let err = Aabb::from_center(&coord(0.0, 0.0, 0.0), -1, VerticalExtent::MatchRadius)
            .expect_err("negative radius must fail");
        assert_eq!(err, GeometryError::NegativeSize { size: -1 });
    }

    #[test]
    fn test_contains_is_inclusive_on_bounds() {
        let aabb = Aabb::from_center(&coord(0.0, 0.0, 0.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert!(aabb.contains(&coord(4.0, 4.0, 4.0)));
        assert!(aabb.contains(&coord(-4.0, 0.0, 2.0)));
        assert!(!aabb.contains(&coord(4.1, 0.0, 0.0)));
    }

    #[test]
    fn test_contains_rejects_other_worlds() {
        let aabb = Aabb::from_center(&coord(0.0, 0.0, 0.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        let elsewhere = WorldCoord::new(WorldId::new("nether"), 0.0, 0.0, 0.0);
        assert!(!aabb.contains(&elsewhere));
    }

    #[test]
    fn test_overlaps_on_all_three_axes() {
        // [(-4,-4,-4),(4,4,4)] vs [(0,0,0),(8,8,8)] overlap on all axes
        let a = Aabb::from_center(&coord(0.0, 0.0, 0.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        let b = Aabb::from_center(&coord(4.0, 4.0, 4.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert!(a.overlaps(&b));

        // [(10,10,10),(18,18,18)] is clear of [(-4,-4,-4),(4,4,4)]
        let c = Aabb::from_center(&coord(14.0, 14.0, 14.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_overlaps_is_symmetric() {
        let a = Aabb::from_center(&coord(0.0, 0.0, 0.0), 6, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        let b = Aabb::from_center(&coord(5.0, -2.0, 3.0), 3, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        let c = Aabb::from_center(&coord(40.0, 0.0, 0.0), 2, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
        assert_eq!(a.overlaps(&c), c.overlaps(&a));
    }

    #[test]
    fn test_overlaps_is_reflexive() {
        let a = Aabb::from_center(&coord(7.0, 1.0, -3.0), 5, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert!(a.overlaps(&a));
    }

    #[test]
    fn test_touching_boundary_plane_counts_as_overlap() {
        let a = Aabb::from_center(&coord(0.0, 0.0, 0.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        // b.min.x == a.max.x, spans share only the x = 4 plane
        let b = Aabb::from_center(&coord(8.0, 0.0, 0.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_containment_counts_as_overlap() {
        let outer = Aabb::from_center(&coord(0.0, 0.0, 0.0), 10, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        let inner = Aabb::from_center(&coord(1.0, 1.0, 1.0), 2, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_boxes_in_different_worlds_never_overlap() {
        let a = Aabb::from_center(&coord(0.0, 0.0, 0.0), 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        let other = WorldCoord::new(WorldId::new("nether"), 0.0, 0.0, 0.0);
        let b = Aabb::from_center(&other, 4, VerticalExtent::MatchRadius)
            .expect("non-negative radius");
        assert!(!a.overlaps(&b));
    }
}
