use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the world/dimension that scopes a coordinate or realm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldId(String);

impl WorldId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque user identifier supplied by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block-aligned position (world coordinates, floored to the grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Center point of the block this position names
    pub fn block_center(&self) -> DVec3 {
        DVec3::new(
            self.x as f64 + 0.5,
            self.y as f64 + 0.5,
            self.z as f64 + 0.5,
        )
    }

    /// Create a new block position offset by the given amounts
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// A point in a named world (continuous coordinates)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldCoord {
    pub world: WorldId,
    pub pos: DVec3,
}

impl WorldCoord {
    pub fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            pos: DVec3::new(x, y, z),
        }
    }

    pub fn from_vec(world: WorldId, pos: DVec3) -> Self {
        Self { world, pos }
    }

    /// Block this point falls in
    pub fn block_pos(&self) -> BlockPos {
        BlockPos::new(
            self.pos.x.floor() as i32,
            self.pos.y.floor() as i32,
            self.pos.z.floor() as i32,
        )
    }

    /// Same point snapped to the center of its block
    pub fn block_center(&self) -> WorldCoord {
        WorldCoord::from_vec(self.world.clone(), self.block_pos().block_center())
    }

    /// Create a new coordinate offset by the given amounts
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            world: self.world.clone(),
            pos: self.pos + DVec3::new(dx, dy, dz),
        }
    }

    pub fn same_world(&self, other: &WorldCoord) -> bool {
        self.world == other.world
    }

    /// Euclidean distance; only meaningful when both points share a world
    pub fn distance(&self, other: &WorldCoord) -> f64 {
        self.pos.distance(other.pos)
    }
}
