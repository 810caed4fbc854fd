//! Permission keys and the three-tier resolver
//!
//! A realm carries two sparse override tables: realm-wide defaults
//! (`permissions`) and per-player overrides (`users`). The resolver walks
//! them in precedence order; which keys exist at all is the host's business,
//! described by `PermissionKind` records in a registry.

use crate::world::PlayerId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Realm-wide overrides: permission key -> value
pub type PermissionMap = FxHashMap<String, bool>;

/// Per-player overrides: player -> (permission key -> value)
pub type UserPermissionMap = FxHashMap<PlayerId, PermissionMap>;

/// Resolve the effective value of `key`. Precedence, first match wins:
///
/// 1. the acting player's own override, when one exists for this key
/// 2. the realm-wide override
/// 3. the caller-supplied `default`
///
/// Pure and side-effect-free; never fails.
pub fn resolve(
    permissions: &PermissionMap,
    users: &UserPermissionMap,
    key: &str,
    player: Option<&PlayerId>,
    default: bool,
) -> bool {
    if let Some(player) = player {
        if let Some(overrides) = users.get(player) {
            if let Some(&value) = overrides.get(key) {
                return value;
            }
        }
    }
    match permissions.get(key) {
        Some(&value) => value,
        None => default,
    }
}

/// A gated action the host can toggle per realm or per player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionKind {
    /// Key stored in the realm's override tables
    pub id: String,
    /// Fallback when neither override tier has the key
    pub default: bool,
    /// Kind appears among the realm-wide settings
    pub world_side: bool,
    /// Kind can be overridden for individual players
    pub player_side: bool,
}

impl PermissionKind {
    pub fn new(id: impl Into<String>, default: bool, world_side: bool, player_side: bool) -> Self {
        Self {
            id: id.into(),
            default,
            world_side,
            player_side,
        }
    }
}

/// Registry of known permission kinds
pub struct PermissionKindRegistry {
    kinds: FxHashMap<String, PermissionKind>,
}

impl PermissionKindRegistry {
    pub fn new() -> Self {
        Self {
            kinds: FxHashMap::default(),
        }
    }

    /// Registry pre-populated with the built-in gated actions
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PermissionKind::new("move", true, true, true));
        registry.register(PermissionKind::new("build", false, true, true));
        registry.register(PermissionKind::new("use", false, true, true));
        registry.register(PermissionKind::new("interact", false, true, true));
        registry.register(PermissionKind::new("teleport", true, true, true));
        registry
    }

    /// Register a permission kind, replacing any earlier kind with the same id
    pub fn register(&mut self, kind: PermissionKind) {
        self.kinds.insert(kind.id.clone(), kind);
    }

    pub fn get(&self, id: &str) -> Option<&PermissionKind> {
        self.kinds.get(id)
    }

    /// Fallback value for a key; unknown kinds default to denied
    pub fn default_for(&self, id: &str) -> bool {
        self.kinds.get(id).map(|kind| kind.default).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionKind> {
        self.kinds.values()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for PermissionKindRegistry {
    fn default() -> Self {
        Self::new()
    }
}
