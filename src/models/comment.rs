use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CommentId, EntityId};

/// A timestamped annotation attached to one entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub entity_id: EntityId,
    pub comment_type: CommentType,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// What kind of annotation a comment is.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    #[default]
    Note,
    Question,
    Decision,
    Result,
}

impl CommentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Question => "question",
            Self::Decision => "decision",
            Self::Result => "result",
        }
    }
}

/// Input for adding a comment to an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentInput {
    #[serde(default)]
    pub comment_type: CommentType,
    pub content: String,
    /// Creation time for comments imported from elsewhere. Defaults to now.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
