//! Typed identifiers for entities, comments, and content blocks.
//!
//! Ids are opaque strings on the wire. Fresh ids are UUIDv4 text, but any
//! string minted by an upstream system (e.g. `"step-1"`) is accepted as-is.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an [`Entity`](super::Entity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

/// Identifier of a [`Comment`](super::Comment).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

/// Identifier of a [`ContentBlock`](super::ContentBlock).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentBlockId(String);

macro_rules! impl_string_id {
    ($T:ident) => {
        impl $T {
            /// Mint a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $T {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $T {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $T {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $T {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

impl_string_id!(EntityId);
impl_string_id!(CommentId);
impl_string_id!(ContentBlockId);
