pub mod config;
pub mod geometry;
pub mod realm;
pub mod registry;
pub mod world;

pub use config::{ConfigError, RealmsConfig};
pub use geometry::{Aabb, GeometryError, VerticalExtent};
pub use realm::{
    ClaimError, Extension, PermissionKind, PermissionKindRegistry, Realm, RealmError, RealmKey,
    RealmResult,
};
pub use registry::{ClaimRequest, RealmRegistry};
pub use world::{BlockPos, PlayerId, WorldCoord, WorldId};
