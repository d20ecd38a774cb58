//! Exclusive selection and edit activation for annotation items.
//!
//! One [`ActivationTracker`] governs every comment and content block in a
//! viewport. Items never keep their own "active" flag; they ask the tracker.
//!
//! # States
//!
//! - `Inactive`: rendered normally
//! - `Selected`: highlighted after a single interaction, not editable
//! - `Active`: editable; at most one item per tracker
//!
//! Leaving `Active` for an edited content block yields a [`PendingCommit`]
//! that the owner appends to the block's version history.

use serde::{Deserialize, Serialize};

use crate::models::{CommentId, ContentBlockId};

/// Reference to one item under a tracker's authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ItemKey {
    Comment(CommentId),
    ContentBlock(ContentBlockId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationState {
    Inactive,
    Selected,
    Active,
}

/// Edited text waiting to be appended when its block leaves `Active`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCommit {
    pub block_id: ContentBlockId,
    pub text: String,
}

impl PendingCommit {
    /// True when the text is already the block's current version, so there
    /// is nothing to append.
    pub fn is_unchanged(&self, current: Option<&str>) -> bool {
        current == Some(self.text.as_str())
    }
}

/// Per-viewport activation state machine.
#[derive(Debug, Default)]
pub struct ActivationTracker {
    selected: Option<ItemKey>,
    active: Option<ItemKey>,
    pending: Option<String>,
}

impl ActivationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, item: &ItemKey) -> ActivationState {
        if self.active.as_ref() == Some(item) {
            ActivationState::Active
        } else if self.selected.as_ref() == Some(item) {
            ActivationState::Selected
        } else {
            ActivationState::Inactive
        }
    }

    pub fn active(&self) -> Option<&ItemKey> {
        self.active.as_ref()
    }

    pub fn selected(&self) -> Option<&ItemKey> {
        self.selected.as_ref()
    }

    /// Single interaction on `item`.
    ///
    /// Replaces any previous selection. Selecting anything other than the
    /// active item counts as an interaction outside it and deactivates it.
    pub fn select(&mut self, item: ItemKey) -> Option<PendingCommit> {
        if self.active.as_ref() == Some(&item) {
            return None;
        }
        let commit = self.deactivate();
        self.selected = Some(item);
        commit
    }

    /// Make `item` the single editable item, deactivating any other first.
    pub fn activate(&mut self, item: ItemKey) -> Option<PendingCommit> {
        if self.active.as_ref() == Some(&item) {
            return None;
        }
        let commit = self.deactivate();
        if self.selected.as_ref() == Some(&item) {
            self.selected = None;
        }
        tracing::debug!(item = ?item, "Activated item");
        self.active = Some(item);
        commit
    }

    /// Record the editor's latest text for the active content block.
    ///
    /// Returns `false` (and records nothing) when no content block is active.
    pub fn edit(&mut self, text: impl Into<String>) -> bool {
        match self.active {
            Some(ItemKey::ContentBlock(_)) => {
                self.pending = Some(text.into());
                true
            }
            _ => false,
        }
    }

    /// An interaction landed outside the active item's rendered region.
    pub fn interact_outside(&mut self) -> Option<PendingCommit> {
        self.deactivate()
    }

    /// Return the active item (if any) to `Inactive`.
    pub fn deactivate(&mut self) -> Option<PendingCommit> {
        let item = self.active.take()?;
        let text = self.pending.take();
        tracing::debug!(item = ?item, edited = text.is_some(), "Deactivated item");
        match (item, text) {
            (ItemKey::ContentBlock(block_id), Some(text)) => Some(PendingCommit { block_id, text }),
            _ => None,
        }
    }

    /// Hand back an edit whose append failed.
    ///
    /// The block becomes the active item again with its text pending, so the
    /// next deactivation retries the append. Whatever was active in the
    /// meantime goes back to `Inactive`.
    pub fn restore(&mut self, commit: PendingCommit) {
        let item = ItemKey::ContentBlock(commit.block_id);
        if self.selected.as_ref() == Some(&item) {
            self.selected = None;
        }
        tracing::debug!(item = ?item, "Restored pending edit");
        self.active = Some(item);
        self.pending = Some(commit.text);
    }

    /// Reset every item to `Inactive` when the view goes away.
    pub fn teardown(&mut self) -> Option<PendingCommit> {
        let commit = self.deactivate();
        self.selected = None;
        commit
    }
}
