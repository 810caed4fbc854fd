use crate::geometry::{Aabb, GeometryError, VerticalExtent};
use crate::realm::error::{RealmError, RealmResult};
use crate::realm::permission::{self, PermissionMap, UserPermissionMap};
use crate::world::{BlockPos, PlayerId, WorldCoord, WorldId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Maximum encoded length of a realm name, in bytes
pub const NAME_LIMIT: usize = 32;
/// Maximum encoded length of the join/leave messages, in bytes
pub const MESSAGE_LIMIT: usize = 64;

/// Fully-scoped realm identity: the node key plus the world it lives in.
/// Realms in different worlds may share block coordinates, so registries
/// key by this rather than by the node key alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealmKey {
    pub world: WorldId,
    pub node: String,
}

impl fmt::Display for RealmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.world, self.node)
    }
}

/// One detached cuboid attached to a realm, anchored elsewhere in the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub anchor: BlockPos,
    pub size: i32,
}

/// A claimed region: one primary cuboid around `center` plus any number of
/// detached extension cuboids, with per-realm and per-player permission
/// overrides.
///
/// The volume cache is rebuilt eagerly by every structural mutator, so
/// `inside` and `intersects` always see current geometry. After
/// deserialization the cache is empty; call [`Realm::recompute_volumes`]
/// before querying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realm {
    center: WorldCoord,
    owner: PlayerId,
    size: i32,
    name: String,
    join_message: String,
    leave_message: String,
    permissions: PermissionMap,
    users: UserPermissionMap,
    extensions: Vec<Extension>,
    teleport_location: WorldCoord,
    vertical: VerticalExtent,
    #[serde(skip)]
    volumes: Vec<Aabb>,
}

impl Realm {
    pub fn new(
        center: WorldCoord,
        owner: PlayerId,
        size: i32,
        name: impl Into<String>,
        vertical: VerticalExtent,
    ) -> RealmResult<Self> {
        let name = name.into();
        validate_len("name", &name, NAME_LIMIT)?;
        if size < 0 {
            return Err(GeometryError::NegativeSize { size }.into());
        }
        let join_message = format!("+ {} | welcome", name);
        let leave_message = format!("- {} | farewell", name);
        let teleport_location = center.offset(0.0, 1.0, 0.0);
        let mut realm = Self {
            center,
            owner,
            size,
            name,
            join_message,
            leave_message,
            permissions: PermissionMap::default(),
            users: UserPermissionMap::default(),
            extensions: Vec::new(),
            teleport_location,
            vertical,
            volumes: Vec::new(),
        };
        realm.recompute_volumes();
        Ok(realm)
    }

    /// Deterministic identity key derived from the block-aligned center.
    /// Equality and hashing follow this key alone.
    pub fn node_key(&self) -> String {
        let block = self.center.block_pos();
        format!("realm_{}_{}_{}", block.x, block.y, block.z)
    }

    /// World-scoped identity used by registries
    pub fn key(&self) -> RealmKey {
        RealmKey {
            world: self.center.world.clone(),
            node: self.node_key(),
        }
    }

    /// Rebuild the volume cache: the primary box around the block center of
    /// `center`, then one box per extension. Sizes are validated non-negative
    /// before they are stored, so construction cannot fail here; idempotent.
    pub fn recompute_volumes(&mut self) {
        self.volumes.clear();
        if let Ok(primary) = Aabb::from_center(&self.center.block_center(), self.size, self.vertical)
        {
            self.volumes.push(primary);
        }
        for extension in &self.extensions {
            let anchor = WorldCoord::from_vec(
                self.center.world.clone(),
                extension.anchor.block_center(),
            );
            if let Ok(aabb) = Aabb::from_center(&anchor, extension.size, self.vertical) {
                self.volumes.push(aabb);
            }
        }
    }

    /// True iff any cached volume contains the point. An empty cache
    /// contains nothing.
    pub fn inside(&self, point: &WorldCoord) -> bool {
        self.volumes.iter().any(|aabb| aabb.contains(point))
    }

    /// True iff any cached volume overlaps the candidate box
    pub fn intersects(&self, candidate: &Aabb) -> bool {
        self.volumes.iter().any(|aabb| aabb.overlaps(candidate))
    }

    /// Effective permission for `key`: the acting player's override beats
    /// the realm-wide override, which beats `default`.
    pub fn effective_permission(
        &self,
        key: &str,
        player: Option<&PlayerId>,
        default: bool,
    ) -> bool {
        permission::resolve(&self.permissions, &self.users, key, player, default)
    }

    // --- structural mutators, each recomputes the volume cache ---

    pub fn set_size(&mut self, size: i32) -> RealmResult<()> {
        if size < 0 {
            return Err(GeometryError::NegativeSize { size }.into());
        }
        self.size = size;
        self.recompute_volumes();
        Ok(())
    }

    /// Add or replace the extension anchored at `anchor`
    pub fn add_extension(&mut self, anchor: BlockPos, size: i32) -> RealmResult<()> {
        if size < 0 {
            return Err(GeometryError::NegativeSize { size }.into());
        }
        match self.extensions.iter_mut().find(|e| e.anchor == anchor) {
            Some(existing) => existing.size = size,
            None => self.extensions.push(Extension { anchor, size }),
        }
        self.recompute_volumes();
        Ok(())
    }

    /// Remove the extension anchored at `anchor`, returning its size
    pub fn remove_extension(&mut self, anchor: &BlockPos) -> Option<i32> {
        let index = self.extensions.iter().position(|e| e.anchor == *anchor)?;
        let removed = self.extensions.remove(index);
        self.recompute_volumes();
        Some(removed.size)
    }

    pub fn extension_size(&self, anchor: &BlockPos) -> Option<i32> {
        self.extensions
            .iter()
            .find(|e| e.anchor == *anchor)
            .map(|e| e.size)
    }

    // --- permission mutators ---

    pub fn set_permission(&mut self, key: impl Into<String>, value: bool) {
        self.permissions.insert(key.into(), value);
    }

    pub fn clear_permission(&mut self, key: &str) -> Option<bool> {
        self.permissions.remove(key)
    }

    pub fn set_user_permission(&mut self, player: PlayerId, key: impl Into<String>, value: bool) {
        self.users.entry(player).or_default().insert(key.into(), value);
    }

    pub fn clear_user_permission(&mut self, player: &PlayerId, key: &str) -> Option<bool> {
        let overrides = self.users.get_mut(player)?;
        let removed = overrides.remove(key);
        if overrides.is_empty() {
            self.users.remove(player);
        }
        removed
    }

    // --- display fields, validated at the boundary ---

    pub fn set_name(&mut self, name: impl Into<String>) -> RealmResult<()> {
        let name = name.into();
        validate_len("name", &name, NAME_LIMIT)?;
        self.name = name;
        Ok(())
    }

    pub fn set_join_message(&mut self, message: impl Into<String>) -> RealmResult<()> {
        let message = message.into();
        validate_len("join_message", &message, MESSAGE_LIMIT)?;
        self.join_message = message;
        Ok(())
    }

    pub fn set_leave_message(&mut self, message: impl Into<String>) -> RealmResult<()> {
        let message = message.into();
        validate_len("leave_message", &message, MESSAGE_LIMIT)?;
        self.leave_message = message;
        Ok(())
    }

    pub fn set_teleport_location(&mut self, location: WorldCoord) {
        self.teleport_location = location;
    }

    // --- accessors ---

    pub fn center(&self) -> &WorldCoord {
        &self.center
    }

    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn join_message(&self) -> &str {
        &self.join_message
    }

    pub fn leave_message(&self) -> &str {
        &self.leave_message
    }

    pub fn teleport_location(&self) -> &WorldCoord {
        &self.teleport_location
    }

    pub fn permissions(&self) -> &PermissionMap {
        &self.permissions
    }

    pub fn users(&self) -> &UserPermissionMap {
        &self.users
    }

    /// Extension cuboids in insertion order; the tether visualization draws
    /// a line from `center` to each anchor.
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Cached volume list: primary box first, then one per extension
    pub fn volumes(&self) -> &[Aabb] {
        &self.volumes
    }

    pub fn vertical_extent(&self) -> VerticalExtent {
        self.vertical
    }
}

impl PartialEq for Realm {
    fn eq(&self, other: &Self) -> bool {
        self.node_key() == other.node_key()
    }
}

impl Eq for Realm {}

impl Hash for Realm {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node_key().hash(state);
    }
}

fn validate_len(field: &'static str, value: &str, limit: usize) -> RealmResult<()> {
    if value.len() > limit {
        return Err(RealmError::FieldTooLong {
            field,
            limit,
            len: value.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::WorldId;

    fn test_realm() -> Realm {
        let center = WorldCoord::new(WorldId::new("overworld"), 0.0, 64.0, 0.0);
        Realm::new(
            center,
            PlayerId::new("owner"),
            8,
            "spawn",
            VerticalExtent::MatchRadius,
        )
        .expect("valid realm")
    }

    #[test]
    fn test_primary_box_contains_points_near_center() {
        let realm = test_realm();
        let world = WorldId::new("overworld");
        assert!(realm.inside(&WorldCoord::new(world.clone(), 3.0, 66.0, -5.0)));
        assert!(!realm.inside(&WorldCoord::new(world, 30.0, 64.0, 0.0)));
    }

    #[test]
    fn test_extension_adds_exactly_one_volume() {
        let mut realm = test_realm();
        assert_eq!(realm.volumes().len(), 1);

        realm
            .add_extension(BlockPos::new(100, 64, 0), 4)
            .expect("valid extension");
        assert_eq!(realm.volumes().len(), 2);

        let world = WorldId::new("overworld");
        assert!(realm.inside(&WorldCoord::new(world, 101.0, 65.0, 1.0)));
    }

    #[test]
    fn test_replacing_extension_keeps_volume_count() {
        let mut realm = test_realm();
        let anchor = BlockPos::new(100, 64, 0);
        realm.add_extension(anchor, 4).expect("valid extension");
        realm.add_extension(anchor, 6).expect("valid extension");
        assert_eq!(realm.volumes().len(), 2);
        assert_eq!(realm.extension_size(&anchor), Some(6));
    }

    #[test]
    fn test_remove_extension_shrinks_cache() {
        let mut realm = test_realm();
        let anchor = BlockPos::new(100, 64, 0);
        realm.add_extension(anchor, 4).expect("valid extension");
        assert_eq!(realm.remove_extension(&anchor), Some(4));
        assert_eq!(realm.volumes().len(), 1);
        assert_eq!(realm.remove_extension(&anchor), None);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut realm = test_realm();
        realm
            .add_extension(BlockPos::new(50, 64, 50), 3)
            .expect("valid extension");
        let first = realm.volumes().to_vec();
        realm.recompute_volumes();
        assert_eq!(realm.volumes(), first.as_slice());
    }

    #[test]
    fn test_negative_sizes_are_rejected() {
        let mut realm = test_realm();
        assert!(realm.set_size(-1).is_err());
        assert!(realm.add_extension(BlockPos::new(0, 0, 0), -3).is_err());
    }

    #[test]
    fn test_node_key_identity() {
        let world = WorldId::new("overworld");
        let a = Realm::new(
            WorldCoord::new(world.clone(), 10.2, 64.9, -3.5),
            PlayerId::new("alice"),
            4,
            "a",
            VerticalExtent::MatchRadius,
        )
        .expect("valid realm");
        // Same block, different fractional position and mutable fields
        let mut b = Realm::new(
            WorldCoord::new(world, 10.7, 64.1, -3.1),
            PlayerId::new("bob"),
            9,
            "b",
            VerticalExtent::MatchRadius,
        )
        .expect("valid realm");
        b.set_permission("move", false);

        assert_eq!(a.node_key(), "realm_10_64_-4");
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_field_limits() {
        let mut realm = test_realm();
        assert!(realm.set_name("x".repeat(32)).is_ok());
        let err = realm.set_name("x".repeat(33)).expect_err("over limit");
        assert_eq!(
            err,
            RealmError::FieldTooLong {
                field: "name",
                limit: 32,
                len: 33
            }
        );
        assert!(realm.set_join_message("y".repeat(64)).is_ok());
        assert!(realm.set_leave_message("y".repeat(65)).is_err());
    }

    #[test]
    fn test_teleport_location_defaults_above_center() {
        let realm = test_realm();
        assert_eq!(realm.teleport_location().pos.y, realm.center().pos.y + 1.0);
    }

    #[test]
    fn test_effective_permission_precedence() {
        let mut realm = test_realm();
        realm.set_permission("move", true);
        realm.set_user_permission(PlayerId::new("alice"), "move", false);

        let alice = PlayerId::new("alice");
        let bob = PlayerId::new("bob");
        assert!(!realm.effective_permission("move", Some(&alice), true));
        assert!(realm.effective_permission("move", Some(&bob), true));
        assert!(realm.effective_permission("move", None, false));
    }

    #[test]
    fn test_clear_user_permission_drops_empty_table() {
        let mut realm = test_realm();
        let alice = PlayerId::new("alice");
        realm.set_user_permission(alice.clone(), "build", true);
        assert_eq!(realm.clear_user_permission(&alice, "build"), Some(true));
        assert!(realm.users().is_empty());
    }
}
