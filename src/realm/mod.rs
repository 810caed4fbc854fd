//! Realm entity: claimed volumes plus permission overrides

mod error;
mod permission;
mod realm;

pub use error::{ClaimError, RealmError, RealmResult};
pub use permission::{
    resolve, PermissionKind, PermissionKindRegistry, PermissionMap, UserPermissionMap,
};
pub use realm::{Extension, Realm, RealmKey, MESSAGE_LIMIT, NAME_LIMIT};
