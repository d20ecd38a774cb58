//! Append-only version history for content blocks.
//!
//! Every edit to a content block is kept as an immutable [`Version`]. The
//! "current" text is derived from the log (its last entry) and is never a
//! separately mutable field.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock, TryLockError};

use crate::error::GraphError;
use crate::models::ContentBlockId;

/// One immutable snapshot of a block's text.
///
/// Shared, so reading a history twice yields pointer-equal versions.
pub type Version = Arc<str>;

/// The edit trail of a single content block, oldest first.
///
/// A log always holds at least its initial version. Entries are only ever
/// pushed; nothing removes, edits or reorders them.
#[derive(Debug, Clone)]
pub struct VersionLog {
    versions: Vec<Version>,
}

impl VersionLog {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            versions: vec![Arc::from(initial.into())],
        }
    }

    /// Push a new version and return its index.
    pub fn append(&mut self, text: impl Into<String>) -> usize {
        self.versions.push(Arc::from(text.into()));
        self.versions.len() - 1
    }

    pub fn current(&self) -> &Version {
        // Non-empty by construction.
        &self.versions[self.versions.len() - 1]
    }

    pub fn history(&self) -> &[Version] {
        &self.versions
    }
}

/// Version logs for every known content block.
///
/// Appends are serialized per block by that block's own lock; appends to
/// different blocks never contend with each other.
#[derive(Debug, Default)]
pub struct ContentVersionStore {
    blocks: RwLock<HashMap<ContentBlockId, Arc<Mutex<VersionLog>>>>,
}

impl ContentVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a block with its initial text.
    ///
    /// Returns `false` and leaves the existing log untouched if the block is
    /// already registered.
    pub fn register(&self, id: ContentBlockId, initial: impl Into<String>) -> bool {
        let mut blocks = self.blocks.write().expect("version store lock poisoned");
        if blocks.contains_key(&id) {
            return false;
        }
        blocks.insert(id, Arc::new(Mutex::new(VersionLog::new(initial))));
        true
    }

    fn log(&self, id: &ContentBlockId) -> Result<Arc<Mutex<VersionLog>>, GraphError> {
        self.blocks
            .read()
            .expect("version store lock poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::not_found(id))
    }

    /// Append `text` as the block's newest version, waiting for any append
    /// already in flight on the same block.
    pub fn append(&self, id: &ContentBlockId, text: impl Into<String>) -> Result<usize, GraphError> {
        let log = self.log(id)?;
        let mut log = log.lock().expect("version log lock poisoned");
        let index = log.append(text);
        tracing::debug!(block = %id, index, "Appended content version");
        Ok(index)
    }

    /// Like [`append`](Self::append), but fails with
    /// [`GraphError::Conflict`] instead of waiting when another append holds
    /// the block.
    pub fn try_append(
        &self,
        id: &ContentBlockId,
        text: impl Into<String>,
    ) -> Result<usize, GraphError> {
        let log = self.log(id)?;
        let mut log = match log.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::WouldBlock) => {
                tracing::warn!(block = %id, "Rejected concurrent content append");
                return Err(GraphError::Conflict(id.to_string()));
            }
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
        };
        let index = log.append(text);
        tracing::debug!(block = %id, index, "Appended content version");
        Ok(index)
    }

    pub fn current(&self, id: &ContentBlockId) -> Result<Version, GraphError> {
        let log = self.log(id)?;
        let log = log.lock().expect("version log lock poisoned");
        Ok(Arc::clone(log.current()))
    }

    /// The block's full history, oldest first.
    pub fn history(&self, id: &ContentBlockId) -> Result<Vec<Version>, GraphError> {
        let log = self.log(id)?;
        let log = log.lock().expect("version log lock poisoned");
        Ok(log.history().to_vec())
    }

    /// History as owned strings, for building [`ContentBlock`](crate::models::ContentBlock)
    /// records.
    pub fn history_strings(&self, id: &ContentBlockId) -> Result<Vec<String>, GraphError> {
        Ok(self
            .history(id)?
            .iter()
            .map(|v| v.to_string())
            .collect())
    }
}
