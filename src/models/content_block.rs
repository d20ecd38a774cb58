use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContentBlockId, EntityId};

/// A snapshot of an editable text block on a Step.
///
/// `versions` is the block's full edit trail, oldest first. The current
/// content is always the last element; see
/// [`ContentVersionStore`](crate::versions::ContentVersionStore) for the
/// append-only log this is read from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentBlock {
    pub id: ContentBlockId,
    pub entity_id: EntityId,
    pub versions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ContentBlock {
    pub fn current(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }
}

/// Input for adding a content block to a Step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContentBlockInput {
    /// Initial text; becomes version 0.
    pub content: String,
    /// Explicit id for the new block. A fresh id is minted when absent.
    #[serde(default)]
    pub id: Option<ContentBlockId>,
}

/// Input for appending a new version to a content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppendVersionInput {
    pub content: String,
}

/// Result of a successful append.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionAppended {
    /// Zero-based position of the new version in the block's history.
    pub version_index: usize,
}
