//! Id-indexed entity cache and subgraph loader.
//!
//! Entities are fetched once through an [`EntityGraphClient`] and kept in an
//! arena indexed by id. Later lookups hit the arena; nothing is re-fetched
//! until the caller explicitly [invalidates](GraphLoader::invalidate) it
//! (typically the parent of a freshly created entity).

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use futures::future::join_all;

use crate::client::EntityGraphClient;
use crate::error::GraphError;
use crate::models::{Entity, EntityId};

/// A set of resolved entities, stored contiguously and indexed by id.
#[derive(Debug, Clone, Default)]
pub struct EntityGraph {
    arena: Vec<Entity>,
    index: HashMap<EntityId, usize>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any previous record with the same id.
    pub fn insert(&mut self, entity: Entity) {
        match self.index.get(&entity.id) {
            Some(&slot) => self.arena[slot] = entity,
            None => {
                self.index.insert(entity.id.clone(), self.arena.len());
                self.arena.push(entity);
            }
        }
    }

    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.index.get(id).map(|&slot| &self.arena[slot])
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.index.contains_key(id)
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Entity> {
        let slot = self.index.remove(id)?;
        let removed = self.arena.swap_remove(slot);
        if let Some(moved) = self.arena.get(slot) {
            self.index.insert(moved.id.clone(), slot);
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.arena.len()
    }
}

/// Loads entities through a client, caching each one by id.
pub struct GraphLoader<C> {
    client: C,
    cache: Mutex<EntityGraph>,
}

impl<C: EntityGraphClient> GraphLoader<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            cache: Mutex::new(EntityGraph::new()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Resolve one entity, from cache when possible.
    pub async fn entity(&self, id: &EntityId) -> Result<Entity, GraphError> {
        let cached = self
            .cache
            .lock()
            .expect("graph cache lock poisoned")
            .get(id)
            .cloned();
        if let Some(hit) = cached {
            tracing::debug!(entity = %id, "Entity cache hit");
            return Ok(hit);
        }

        tracing::debug!(entity = %id, "Fetching entity");
        let entity = self.client.resolve_entity(id).await?;
        self.cache
            .lock()
            .expect("graph cache lock poisoned")
            .insert(entity.clone());
        Ok(entity)
    }

    /// Resolve `root` and everything reachable through `child_ids`.
    ///
    /// Each sibling set is fetched concurrently. A child that fails to
    /// resolve is logged and left out of the snapshot, so only a failure on
    /// the root itself is an error. Every id is fetched at most once, which
    /// also bounds the walk on a graph that (wrongly) contains a cycle.
    pub async fn load_subtree(&self, root: &EntityId) -> Result<EntityGraph, GraphError> {
        let root = self.entity(root).await?;
        let mut frontier = root.child_ids.clone();
        let mut snapshot = EntityGraph::new();
        snapshot.insert(root);

        while !frontier.is_empty() {
            let mut seen = HashSet::new();
            let pending: Vec<EntityId> = frontier
                .into_iter()
                .filter(|id| !snapshot.contains(id) && seen.insert(id.clone()))
                .collect();

            let results = join_all(pending.iter().map(|id| self.entity(id))).await;

            let mut next = Vec::new();
            for (id, result) in pending.iter().zip(results) {
                match result {
                    Ok(entity) => {
                        next.extend(entity.child_ids.iter().cloned());
                        snapshot.insert(entity);
                    }
                    Err(err) => {
                        tracing::warn!(entity = %id, error = %err, "Omitting unresolvable branch");
                    }
                }
            }
            frontier = next;
        }

        Ok(snapshot)
    }

    /// Drop one cached entity so the next lookup re-fetches it.
    pub fn invalidate(&self, id: &EntityId) -> bool {
        let removed = self
            .cache
            .lock()
            .expect("graph cache lock poisoned")
            .remove(id)
            .is_some();
        if removed {
            tracing::debug!(entity = %id, "Invalidated cached entity");
        }
        removed
    }

    pub fn invalidate_all(&self) {
        self.cache.lock().expect("graph cache lock poisoned").clear();
    }

    /// Number of entities currently cached.
    pub fn cached(&self) -> usize {
        self.cache.lock().expect("graph cache lock poisoned").len()
    }
}
