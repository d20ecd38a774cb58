//! Error types shared by the graph client, the version store, and the
//! workspace.

use thiserror::Error;

use crate::models::{EntityId, EntityType};

/// Failures crossing the entity graph boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The referenced id does not exist (stale child id, deleted parent,
    /// unknown content block).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transient fetch failure. Callers may retry.
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// Another append is already in flight for this content block.
    #[error("Conflict: append already in flight for {0}")]
    Conflict(String),
}

impl GraphError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        Self::Resolution(err.to_string())
    }
}

/// Errors from the workspace's creation workflow.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("name must not be blank")]
    EmptyName,

    #[error("{child} cannot be created under {parent}")]
    InvalidHierarchy {
        child: &'static str,
        parent: &'static str,
    },

    #[error("{0} must be created without a parent")]
    UnexpectedParent(&'static str),

    #[error("{0} requires a parent")]
    MissingParent(&'static str),

    #[error("content blocks can only be added to steps, not {entity_type} {id}")]
    NotAStep { id: EntityId, entity_type: &'static str },

    #[error("id already in use: {0}")]
    DuplicateId(String),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl WorkspaceError {
    pub(crate) fn invalid_hierarchy(child: EntityType, parent: EntityType) -> Self {
        Self::InvalidHierarchy {
            child: child.as_str(),
            parent: parent.as_str(),
        }
    }
}
