use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, CommentId, CommentType, EntityId, EntityType};

/// The part of a sub-entity needed to place it in its parent's timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EntitySummary {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// The entity's own creation time.
    pub representative_timestamp: DateTime<Utc>,
}

/// One item of an entity's merged body: a comment or a sub-entity.
///
/// Only produced by [`merge`](crate::merge::merge); never persisted. On the
/// wire it is an internally tagged object:
///
/// ```json
/// {"kind": "comment", "id": "c-1", "timestamp": "2024-01-01T10:02:00Z",
///  "entity_id": "n-1", "comment_type": "note", "content": "..."}
/// {"kind": "entity", "id": "p-1", "timestamp": "2024-01-01T10:00:00Z",
///  "name": "Project A", "type": "Project"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CompositeChildWire", from = "CompositeChildWire")]
pub enum CompositeChild {
    Comment(Comment),
    Entity(EntitySummary),
}

impl CompositeChild {
    /// The instant this item is ordered by.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Comment(comment) => comment.created_at,
            Self::Entity(summary) => summary.representative_timestamp,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Comment(comment) => comment.id.as_str(),
            Self::Entity(summary) => summary.id.as_str(),
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum CompositeChildWire {
    Comment {
        id: CommentId,
        timestamp: DateTime<Utc>,
        entity_id: EntityId,
        comment_type: CommentType,
        content: String,
    },
    Entity {
        id: EntityId,
        timestamp: DateTime<Utc>,
        name: String,
        #[serde(rename = "type")]
        entity_type: EntityType,
    },
}

impl From<CompositeChild> for CompositeChildWire {
    fn from(child: CompositeChild) -> Self {
        match child {
            CompositeChild::Comment(c) => Self::Comment {
                id: c.id,
                timestamp: c.created_at,
                entity_id: c.entity_id,
                comment_type: c.comment_type,
                content: c.content,
            },
            CompositeChild::Entity(s) => Self::Entity {
                id: s.id,
                timestamp: s.representative_timestamp,
                name: s.name,
                entity_type: s.entity_type,
            },
        }
    }
}

impl From<CompositeChildWire> for CompositeChild {
    fn from(wire: CompositeChildWire) -> Self {
        match wire {
            CompositeChildWire::Comment {
                id,
                timestamp,
                entity_id,
                comment_type,
                content,
            } => Self::Comment(Comment {
                id,
                entity_id,
                comment_type,
                content,
                created_at: timestamp,
            }),
            CompositeChildWire::Entity {
                id,
                timestamp,
                name,
                entity_type,
            } => Self::Entity(EntitySummary {
                id,
                name,
                entity_type,
                representative_timestamp: timestamp,
            }),
        }
    }
}
