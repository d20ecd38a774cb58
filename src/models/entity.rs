use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, ContentBlock, EntityId, EntitySummary};

/// A node in the knowledge hierarchy.
///
/// Entities form a tree via `parent_id`/`child_ids`: Libraries hold
/// Notebooks, Notebooks hold Projects, Projects hold Steps. Children are
/// referenced by id and fetched lazily, so ownership is logical rather than
/// physical containment.
///
/// # Invariants
/// - Each id in `child_ids` names an entity whose `parent_id` is this `id`.
/// - A Library never has a `parent_id`.
/// - `content_blocks` is only ever populated for Steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    /// Display name of the author, if recorded.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub child_ids: Vec<EntityId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_blocks: Vec<ContentBlock>,
    pub created_at: DateTime<Utc>,
}

impl Entity {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Project this entity onto the summary used for chronological placement.
    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            id: self.id.clone(),
            name: self.name.clone(),
            entity_type: self.entity_type,
            representative_timestamp: self.created_at,
        }
    }

    /// Comments ordered by `created_at`, ties broken by id ascending.
    pub fn ordered_comments(&self) -> Vec<Comment> {
        let mut comments = self.comments.clone();
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        comments
    }
}

/// The level of an entity in the hierarchy.
///
/// - `Library`: root container, never has a parent
/// - `Notebook`: lives under a Library
/// - `Project`: lives under a Notebook
/// - `Step`: lives under a Project and may carry content blocks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityType {
    Library,
    Notebook,
    Project,
    Step,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Library => "Library",
            Self::Notebook => "Notebook",
            Self::Project => "Project",
            Self::Step => "Step",
        }
    }

    /// The type a parent of this type must have. `None` for roots.
    pub fn parent_type(&self) -> Option<Self> {
        match self {
            Self::Library => None,
            Self::Notebook => Some(Self::Library),
            Self::Project => Some(Self::Notebook),
            Self::Step => Some(Self::Project),
        }
    }
}

/// Name-only projection of an entity, as returned by `?name_only=true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntityName {
    pub name: String,
}

/// Input for creating a new entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntityInput {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub name: String,
    /// Parent entity. Must be `None` for Libraries and set for everything else.
    #[serde(default)]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub user: Option<String>,
    /// Explicit id for the new entity. A fresh id is minted when absent.
    #[serde(default)]
    pub id: Option<EntityId>,
    /// Creation time for records imported from elsewhere. Defaults to now.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentId, CommentType};
    use chrono::TimeZone;

    fn comment(id: &str, minute: u32) -> Comment {
        Comment {
            id: CommentId::from(id),
            entity_id: EntityId::from("p-1"),
            comment_type: CommentType::Note,
            content: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, minute, 0).unwrap(),
        }
    }

    #[test]
    fn ordered_comments_breaks_ties_by_id() {
        let entity = Entity {
            id: EntityId::from("p-1"),
            entity_type: EntityType::Project,
            name: "Project".to_string(),
            user: None,
            parent_id: Some(EntityId::from("n-1")),
            child_ids: vec![],
            comments: vec![comment("c-b", 5), comment("c-z", 1), comment("c-a", 5)],
            content_blocks: vec![],
            created_at: Utc::now(),
        };

        let ids: Vec<_> = entity
            .ordered_comments()
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["c-z", "c-a", "c-b"]);
    }

    #[test]
    fn parent_types_follow_hierarchy() {
        assert_eq!(EntityType::Library.parent_type(), None);
        assert_eq!(EntityType::Step.parent_type(), Some(EntityType::Project));
    }
}
