//! The body view of a single entity.
//!
//! An [`EntityView`] owns the entity record being shown, the resolved names
//! of its parent and children, and the one [`ActivationTracker`] for its
//! items. Resolution happens in batches:
//!
//! 1. [`EntityView::begin_load`] issues a [`ViewLoad`] ticket.
//! 2. [`ViewLoad::resolve`] fetches the parent name and all children
//!    concurrently and waits for the whole batch.
//! 3. [`EntityView::apply`] installs the batch, unless the view was torn
//!    down or reloaded in the meantime, in which case the batch is dropped.

use futures::future::join_all;

use crate::activation::{ActivationState, ActivationTracker, ItemKey, PendingCommit};
use crate::client::EntityGraphClient;
use crate::error::GraphError;
use crate::merge;
use crate::models::*;

/// Names and summaries resolved for one load of a view.
#[derive(Debug, Clone)]
pub struct ResolvedBatch {
    generation: u64,
    /// Parent display name, or the raw parent id when it failed to resolve.
    pub parent_name: Option<String>,
    /// Children that resolved, ordered by creation time.
    pub children: Vec<EntitySummary>,
}

/// An in-flight resolution for a view.
#[derive(Debug, Clone)]
pub struct ViewLoad {
    generation: u64,
    parent_id: Option<EntityId>,
    child_ids: Vec<EntityId>,
}

impl ViewLoad {
    /// Resolve the parent name and every child jointly.
    ///
    /// A parent that fails to resolve is shown by its raw id; children that
    /// fail are dropped from the batch. Nothing here fails the batch.
    pub async fn resolve<C: EntityGraphClient + ?Sized>(self, client: &C) -> ResolvedBatch {
        let parent = async {
            let id = self.parent_id.as_ref()?;
            Some(match client.resolve_entity_name(id).await {
                Ok(name) => name.name,
                Err(err) => {
                    tracing::warn!(parent = %id, error = %err, "Showing raw id for parent");
                    id.to_string()
                }
            })
        };
        let children = join_all(self.child_ids.iter().map(|id| client.resolve_entity(id)));

        let (parent_name, resolved) = futures::join!(parent, children);

        let mut children: Vec<EntitySummary> = self
            .child_ids
            .iter()
            .zip(resolved)
            .filter_map(|(id, result)| match result {
                Ok(child) => Some(child.summary()),
                Err(err) => {
                    tracing::warn!(child = %id, error = %err, "Dropping unresolved child");
                    None
                }
            })
            .collect();
        children.sort_by_key(|c| c.representative_timestamp);

        ResolvedBatch {
            generation: self.generation,
            parent_name,
            children,
        }
    }
}

/// A rendered entity body with its activation state.
#[derive(Debug)]
pub struct EntityView {
    entity: Entity,
    generation: u64,
    parent_name: Option<String>,
    children: Option<Vec<EntitySummary>>,
    tracker: ActivationTracker,
}

impl EntityView {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            generation: 0,
            parent_name: None,
            children: None,
            tracker: ActivationTracker::new(),
        }
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Resolved children, or `None` while the first batch is outstanding.
    pub fn children(&self) -> Option<&[EntitySummary]> {
        self.children.as_deref()
    }

    /// Start a new resolution. Any batch from an earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> ViewLoad {
        self.generation += 1;
        ViewLoad {
            generation: self.generation,
            parent_id: self.entity.parent_id.clone(),
            child_ids: self.entity.child_ids.clone(),
        }
    }

    /// Install a resolved batch. Returns `false` if the batch was stale and
    /// has been discarded.
    pub fn apply(&mut self, batch: ResolvedBatch) -> bool {
        if batch.generation != self.generation {
            tracing::debug!(
                entity = %self.entity.id,
                batch = batch.generation,
                current = self.generation,
                "Discarding stale resolution"
            );
            return false;
        }
        self.parent_name = batch.parent_name;
        self.children = Some(batch.children);
        true
    }

    /// Convenience for `begin_load` + `resolve` + `apply`.
    pub async fn load<C: EntityGraphClient + ?Sized>(&mut self, client: &C) -> bool {
        let batch = self.begin_load().resolve(client).await;
        self.apply(batch)
    }

    /// The order the body renders in: merged once children are resolved,
    /// comments alone before that.
    pub fn render_order(&self) -> Vec<CompositeChild> {
        merge::timeline(&self.entity.ordered_comments(), self.children.as_deref())
    }

    pub fn state(&self, item: &ItemKey) -> ActivationState {
        self.tracker.state(item)
    }

    pub fn tracker(&self) -> &ActivationTracker {
        &self.tracker
    }

    pub async fn select<C: EntityGraphClient + ?Sized>(
        &mut self,
        item: ItemKey,
        client: &C,
    ) -> Result<Option<VersionAppended>, GraphError> {
        let commit = self.tracker.select(item);
        self.commit(commit, client).await
    }

    pub async fn activate<C: EntityGraphClient + ?Sized>(
        &mut self,
        item: ItemKey,
        client: &C,
    ) -> Result<Option<VersionAppended>, GraphError> {
        let commit = self.tracker.activate(item);
        self.commit(commit, client).await
    }

    pub fn edit(&mut self, text: impl Into<String>) -> bool {
        self.tracker.edit(text)
    }

    pub async fn deactivate<C: EntityGraphClient + ?Sized>(
        &mut self,
        client: &C,
    ) -> Result<Option<VersionAppended>, GraphError> {
        let commit = self.tracker.deactivate();
        self.commit(commit, client).await
    }

    /// A click or focus change outside the active item's region.
    pub async fn interact_outside<C: EntityGraphClient + ?Sized>(
        &mut self,
        client: &C,
    ) -> Result<Option<VersionAppended>, GraphError> {
        let commit = self.tracker.interact_outside();
        self.commit(commit, client).await
    }

    /// Tear the view down: every item goes `Inactive` and any batch still in
    /// flight will be discarded when it arrives. A pending edit is still
    /// committed.
    pub async fn teardown<C: EntityGraphClient + ?Sized>(
        &mut self,
        client: &C,
    ) -> Result<Option<VersionAppended>, GraphError> {
        self.generation += 1;
        self.parent_name = None;
        self.children = None;
        let commit = self.tracker.teardown();
        self.commit(commit, client).await
    }

    /// Send an edit through the client and mirror it into the local record.
    ///
    /// When the append fails the edit goes back to the tracker, leaving the
    /// block active with its text pending. A block that no longer exists
    /// has nowhere to take the edit, so it is dropped instead.
    async fn commit<C: EntityGraphClient + ?Sized>(
        &mut self,
        commit: Option<PendingCommit>,
        client: &C,
    ) -> Result<Option<VersionAppended>, GraphError> {
        let Some(commit) = commit else {
            return Ok(None);
        };

        match self.append(&commit, client).await {
            Ok(appended) => Ok(appended),
            Err(err @ GraphError::NotFound(_)) => {
                tracing::warn!(block = %commit.block_id, error = %err, "Dropping edit for missing block");
                Err(err)
            }
            Err(err) => {
                tracing::warn!(block = %commit.block_id, error = %err, "Append failed, keeping edit");
                self.tracker.restore(commit);
                Err(err)
            }
        }
    }

    async fn append<C: EntityGraphClient + ?Sized>(
        &mut self,
        commit: &PendingCommit,
        client: &C,
    ) -> Result<Option<VersionAppended>, GraphError> {
        // Compare against the stored history, which may have moved on since
        // this view loaded.
        let fresh = client.resolve_entity(&self.entity.id).await?;
        let mut stored = fresh
            .content_blocks
            .into_iter()
            .find(|b| b.id == commit.block_id)
            .ok_or_else(|| GraphError::not_found(&commit.block_id))?;

        let appended = if commit.is_unchanged(stored.current()) {
            tracing::debug!(block = %commit.block_id, "Skipping unchanged content");
            None
        } else {
            let appended = client
                .append_content_version(&commit.block_id, &commit.text)
                .await?;
            stored.versions.push(commit.text.clone());
            Some(appended)
        };

        match self
            .entity
            .content_blocks
            .iter_mut()
            .find(|b| b.id == commit.block_id)
        {
            Some(local) => *local = stored,
            None => self.entity.content_blocks.push(stored),
        }
        Ok(appended)
    }
}
