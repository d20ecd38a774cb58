//! In-memory workspace holding the entity hierarchy.
//!
//! The workspace is the in-process implementation of
//! [`EntityGraphClient`]: it keeps entities, comments, and content-block
//! metadata keyed by id, and delegates version history to a shared
//! [`ContentVersionStore`]. It is cheap to clone; clones share state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::client::EntityGraphClient;
use crate::error::{GraphError, WorkspaceError};
use crate::models::*;
use crate::versions::ContentVersionStore;

/// Entity as stored: content blocks are kept by id only and assembled on read.
#[derive(Debug, Clone)]
struct EntityRecord {
    entity: Entity,
    block_ids: Vec<ContentBlockId>,
}

#[derive(Debug, Clone)]
struct BlockRecord {
    entity_id: EntityId,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    entities: HashMap<EntityId, EntityRecord>,
    blocks: HashMap<ContentBlockId, BlockRecord>,
}

#[derive(Clone, Default)]
pub struct Workspace {
    state: Arc<RwLock<State>>,
    versions: Arc<ContentVersionStore>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared version store backing every content block.
    pub fn versions(&self) -> &Arc<ContentVersionStore> {
        &self.versions
    }

    // ============================================================
    // Entity operations
    // ============================================================

    /// Create an entity and link it under its parent.
    ///
    /// Enforces the Library → Notebook → Project → Step hierarchy and appends
    /// the new id to the parent's `child_ids`, so the parent/child references
    /// stay consistent in both directions.
    pub fn create_entity(
        &self,
        input: CreateEntityInput,
    ) -> Result<Entity, WorkspaceError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyName);
        }

        let mut state = self.state.write().expect("workspace lock poisoned");
        let id = input.id.unwrap_or_default();
        if state.entities.contains_key(&id) {
            return Err(WorkspaceError::DuplicateId(id.to_string()));
        }

        match (input.entity_type.parent_type(), &input.parent_id) {
            (None, Some(_)) => {
                return Err(WorkspaceError::UnexpectedParent(input.entity_type.as_str()))
            }
            (Some(_), None) => {
                return Err(WorkspaceError::MissingParent(input.entity_type.as_str()))
            }
            (Some(expected), Some(parent_id)) => {
                let parent = state
                    .entities
                    .get(parent_id)
                    .ok_or_else(|| GraphError::not_found(parent_id))?;
                if parent.entity.entity_type != expected {
                    return Err(WorkspaceError::invalid_hierarchy(
                        input.entity_type,
                        parent.entity.entity_type,
                    ));
                }
            }
            (None, None) => {}
        }

        let entity = Entity {
            id: id.clone(),
            entity_type: input.entity_type,
            name,
            user: input.user,
            parent_id: input.parent_id.clone(),
            child_ids: Vec::new(),
            comments: Vec::new(),
            content_blocks: Vec::new(),
            created_at: input.created_at.unwrap_or_else(Utc::now),
        };

        if let Some(parent_id) = &input.parent_id {
            if let Some(parent) = state.entities.get_mut(parent_id) {
                parent.entity.child_ids.push(id.clone());
            }
        }
        state.entities.insert(
            id.clone(),
            EntityRecord {
                entity: entity.clone(),
                block_ids: Vec::new(),
            },
        );

        tracing::info!(entity = %id, kind = entity.entity_type.as_str(), "Created entity");
        Ok(entity)
    }

    pub fn get_entity(&self, id: &EntityId) -> Option<Entity> {
        let state = self.state.read().expect("workspace lock poisoned");
        let record = state.entities.get(id)?;
        let mut entity = record.entity.clone();
        entity.content_blocks = record
            .block_ids
            .iter()
            .filter_map(|block_id| self.assemble_block(&state, block_id))
            .collect();
        Some(entity)
    }

    pub fn get_entity_name(&self, id: &EntityId) -> Option<EntityName> {
        let state = self.state.read().expect("workspace lock poisoned");
        state.entities.get(id).map(|record| EntityName {
            name: record.entity.name.clone(),
        })
    }

    /// All root entities, oldest first.
    pub fn get_libraries(&self) -> Vec<Entity> {
        let state = self.state.read().expect("workspace lock poisoned");
        let mut roots: Vec<Entity> = state
            .entities
            .values()
            .filter(|record| record.entity.is_root())
            .map(|record| record.entity.clone())
            .collect();
        roots.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        roots
    }

    // ============================================================
    // Comment operations
    // ============================================================

    pub fn add_comment(
        &self,
        entity_id: &EntityId,
        input: CreateCommentInput,
    ) -> Result<Comment, WorkspaceError> {
        let mut state = self.state.write().expect("workspace lock poisoned");
        let record = state
            .entities
            .get_mut(entity_id)
            .ok_or_else(|| GraphError::not_found(entity_id))?;

        let comment = Comment {
            id: CommentId::new(),
            entity_id: entity_id.clone(),
            comment_type: input.comment_type,
            content: input.content,
            created_at: input.created_at.unwrap_or_else(Utc::now),
        };
        record.entity.comments.push(comment.clone());

        tracing::debug!(entity = %entity_id, comment = %comment.id, "Added comment");
        Ok(comment)
    }

    // ============================================================
    // Content block operations
    // ============================================================

    pub fn add_content_block(
        &self,
        entity_id: &EntityId,
        input: CreateContentBlockInput,
    ) -> Result<ContentBlock, WorkspaceError> {
        let mut state = self.state.write().expect("workspace lock poisoned");
        let record = state
            .entities
            .get(entity_id)
            .ok_or_else(|| GraphError::not_found(entity_id))?;
        if record.entity.entity_type != EntityType::Step {
            return Err(WorkspaceError::NotAStep {
                id: entity_id.clone(),
                entity_type: record.entity.entity_type.as_str(),
            });
        }

        let id = input.id.unwrap_or_default();
        if !self.versions.register(id.clone(), input.content.clone()) {
            return Err(WorkspaceError::DuplicateId(id.to_string()));
        }

        let now = Utc::now();
        state.blocks.insert(
            id.clone(),
            BlockRecord {
                entity_id: entity_id.clone(),
                created_at: now,
            },
        );
        if let Some(record) = state.entities.get_mut(entity_id) {
            record.block_ids.push(id.clone());
        }

        tracing::debug!(entity = %entity_id, block = %id, "Added content block");
        Ok(ContentBlock {
            id,
            entity_id: entity_id.clone(),
            versions: vec![input.content],
            created_at: now,
        })
    }

    pub fn get_content_block(&self, id: &ContentBlockId) -> Option<ContentBlock> {
        let state = self.state.read().expect("workspace lock poisoned");
        self.assemble_block(&state, id)
    }

    fn assemble_block(&self, state: &State, id: &ContentBlockId) -> Option<ContentBlock> {
        let record = state.blocks.get(id)?;
        let versions = self.versions.history_strings(id).ok()?;
        Some(ContentBlock {
            id: id.clone(),
            entity_id: record.entity_id.clone(),
            versions,
            created_at: record.created_at,
        })
    }
}

#[async_trait]
impl EntityGraphClient for Workspace {
    async fn resolve_entity_name(&self, id: &EntityId) -> Result<EntityName, GraphError> {
        self.get_entity_name(id)
            .ok_or_else(|| GraphError::not_found(id))
    }

    async fn resolve_entity(&self, id: &EntityId) -> Result<Entity, GraphError> {
        self.get_entity(id).ok_or_else(|| GraphError::not_found(id))
    }

    async fn append_content_version(
        &self,
        block_id: &ContentBlockId,
        text: &str,
    ) -> Result<VersionAppended, GraphError> {
        let version_index = self.versions.append(block_id, text)?;
        Ok(VersionAppended { version_index })
    }
}
