//! Realm subsystem error handling

use crate::geometry::GeometryError;
use crate::realm::realm::RealmKey;
use thiserror::Error;

/// Result type for realm mutations
pub type RealmResult<T> = Result<T, RealmError>;

/// Errors from realm construction and boundary-validated mutation
#[derive(Debug, Error, PartialEq)]
pub enum RealmError {
    #[error("{field} is {len} bytes, limit is {limit}")]
    FieldTooLong {
        field: &'static str,
        limit: usize,
        len: usize,
    },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Rejections from the claim path. These are expected outcomes the host
/// surfaces to the player, not faults.
#[derive(Debug, Error, PartialEq)]
pub enum ClaimError {
    #[error("candidate volume overlaps existing realm {key}")]
    Overlapping { key: RealmKey },

    #[error("invalid claim size: {size}")]
    InvalidSize { size: i32 },

    #[error("no realm registered under {key}")]
    UnknownRealm { key: RealmKey },

    #[error(transparent)]
    Realm(#[from] RealmError),
}

impl From<GeometryError> for ClaimError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::NegativeSize { size } => ClaimError::InvalidSize { size },
        }
    }
}
