//! In-memory registry owning every claimed realm
//!
//! The registry is injected, explicitly-owned state: the host creates one at
//! startup, repopulates it from its persistence layer, and hands references
//! to whichever event handlers need cross-realm queries. A claim must check
//! overlap against all existing realms and insert as one atomic step, so the
//! interior sits behind a single `RwLock` and `claim` holds the write lock
//! for the whole check-then-insert.

use crate::config::RealmsConfig;
use crate::geometry::Aabb;
use crate::realm::{ClaimError, Realm, RealmKey};
use crate::world::{BlockPos, PlayerId, WorldCoord};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Everything a claim attempt carries: the primary cuboid plus any
/// extensions being claimed in the same step.
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    pub center: WorldCoord,
    pub owner: PlayerId,
    pub size: i32,
    pub name: String,
    pub extensions: Vec<(BlockPos, i32)>,
}

impl ClaimRequest {
    pub fn new(center: WorldCoord, owner: PlayerId, size: i32, name: impl Into<String>) -> Self {
        Self {
            center,
            owner,
            size,
            name: name.into(),
            extensions: Vec::new(),
        }
    }

    pub fn with_extension(mut self, anchor: BlockPos, size: i32) -> Self {
        self.extensions.push((anchor, size));
        self
    }
}

/// Registry of all claimed realms, keyed by world-scoped realm key
pub struct RealmRegistry {
    config: RealmsConfig,
    realms: RwLock<HashMap<RealmKey, Realm>>,
}

impl RealmRegistry {
    pub fn new() -> Self {
        Self::with_config(RealmsConfig::default())
    }

    pub fn with_config(config: RealmsConfig) -> Self {
        Self {
            config,
            realms: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RealmsConfig {
        &self.config
    }

    /// Load path: insert a realm restored by the persistence layer, trusting
    /// its geometry. Rebuilds the volume cache, which serde does not carry.
    pub fn insert_loaded(&self, mut realm: Realm) {
        realm.recompute_volumes();
        let key = realm.key();
        let mut realms = self.realms.write();
        if realms.insert(key.clone(), realm).is_some() {
            log::warn!("[registry::insert_loaded] replaced duplicate realm {}", key);
        }
    }

    /// Attempt a claim. Builds the candidate boxes, scans every existing
    /// realm for overlap, and only then constructs and inserts the realm.
    /// The write lock spans the scan and the insert so no other claim or
    /// realm mutation can interleave.
    pub fn claim(&self, request: ClaimRequest) -> Result<RealmKey, ClaimError> {
        let vertical = self.config.vertical_extent;
        let mut candidates = Vec::with_capacity(1 + request.extensions.len());
        candidates.push(Aabb::from_center(
            &request.center.block_center(),
            request.size,
            vertical,
        )?);
        for (anchor, size) in &request.extensions {
            let anchor = WorldCoord::from_vec(request.center.world.clone(), anchor.block_center());
            candidates.push(Aabb::from_center(&anchor, *size, vertical)?);
        }

        let mut realms = self.realms.write();
        for existing in realms.values() {
            for candidate in &candidates {
                if existing.intersects(candidate) {
                    log::info!(
                        "[registry::claim] rejected '{}' for {}: overlaps {}",
                        request.name,
                        request.owner,
                        existing.key()
                    );
                    return Err(ClaimError::Overlapping {
                        key: existing.key(),
                    });
                }
            }
        }

        let mut realm = Realm::new(
            request.center,
            request.owner,
            request.size,
            request.name,
            vertical,
        )?;
        for (anchor, size) in request.extensions {
            realm.add_extension(anchor, size)?;
        }
        let key = realm.key();
        log::info!(
            "[registry::claim] {} claimed by {} with {} volume(s)",
            key,
            realm.owner(),
            realm.volumes().len()
        );
        realms.insert(key.clone(), realm);
        Ok(key)
    }

    /// Remove a realm, returning it so the host can drop its own caches
    pub fn unclaim(&self, key: &RealmKey) -> Option<Realm> {
        let removed = self.realms.write().remove(key);
        if removed.is_some() {
            log::info!("[registry::unclaim] removed {}", key);
        }
        removed
    }

    /// Add an extension to an existing realm. Extensions are claims too:
    /// the candidate box must clear every other realm's volumes first.
    pub fn extend_realm(
        &self,
        key: &RealmKey,
        anchor: BlockPos,
        size: i32,
    ) -> Result<(), ClaimError> {
        let vertical = self.config.vertical_extent;
        let mut realms = self.realms.write();

        if !realms.contains_key(key) {
            return Err(ClaimError::UnknownRealm { key: key.clone() });
        }
        let anchor_center = WorldCoord::from_vec(key.world.clone(), anchor.block_center());
        let candidate = Aabb::from_center(&anchor_center, size, vertical)?;
        for (other_key, other) in realms.iter() {
            if other_key != key && other.intersects(&candidate) {
                return Err(ClaimError::Overlapping {
                    key: other.key(),
                });
            }
        }

        match realms.get_mut(key) {
            Some(realm) => {
                realm.add_extension(anchor, size)?;
                log::info!("[registry::extend_realm] {} extended at {:?}", key, anchor);
                Ok(())
            }
            None => Err(ClaimError::UnknownRealm { key: key.clone() }),
        }
    }

    /// Key of the realm containing the point, if any. Linear scan with
    /// `inside`.
    pub fn find_containing(&self, point: &WorldCoord) -> Option<RealmKey> {
        self.realms
            .read()
            .values()
            .find(|realm| realm.inside(point))
            .map(|realm| realm.key())
    }

    /// Key of the first realm whose volumes overlap the candidate box
    pub fn overlaps_any(&self, candidate: &Aabb) -> Option<RealmKey> {
        self.realms
            .read()
            .values()
            .find(|realm| realm.intersects(candidate))
            .map(|realm| realm.key())
    }

    /// Effective permission at a point: `None` when no realm contains it.
    /// This is the per-event query path (movement, build attempts).
    pub fn permission_at(
        &self,
        point: &WorldCoord,
        key: &str,
        player: Option<&PlayerId>,
        default: bool,
    ) -> Option<bool> {
        self.realms
            .read()
            .values()
            .find(|realm| realm.inside(point))
            .map(|realm| realm.effective_permission(key, player, default))
    }

    /// Run a closure against a realm under the read lock
    pub fn with_realm<R>(&self, key: &RealmKey, f: impl FnOnce(&Realm) -> R) -> Option<R> {
        self.realms.read().get(key).map(f)
    }

    /// Run a mutating closure against a realm under the write lock
    pub fn update_realm<R>(
        &self,
        key: &RealmKey,
        f: impl FnOnce(&mut Realm) -> R,
    ) -> Result<R, ClaimError> {
        match self.realms.write().get_mut(key) {
            Some(realm) => Ok(f(realm)),
            None => Err(ClaimError::UnknownRealm { key: key.clone() }),
        }
    }

    /// Clone of every realm, for the persistence layer's save pass
    pub fn snapshot(&self) -> Vec<Realm> {
        self.realms.read().values().cloned().collect()
    }

    pub fn keys(&self) -> Vec<RealmKey> {
        self.realms.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.realms.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.realms.read().is_empty()
    }
}

impl Default for RealmRegistry {
    fn default() -> Self {
        Self::new()
    }
}
