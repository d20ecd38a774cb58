//! Domain models for dragon-scales.
//!
//! # Core Concepts
//!
//! ## Hierarchy
//!
//! - [`Entity`]: A node in the Library → Notebook → Project → Step hierarchy.
//!   Entities reference their parent and children by id; children are never
//!   embedded.
//! - [`Comment`]: A timestamped annotation owned by exactly one entity.
//! - [`ContentBlock`]: An editable text unit on a Step with an append-only
//!   version history.
//!
//! ## Ephemeral Views
//!
//! These are derived at read time and never stored:
//!
//! - [`CompositeChild`]: One item of an entity's merged, chronological body
//!   (either a comment or a sub-entity summary).
//! - [`TreeNode`]: One node of a navigable id/label skeleton.

mod comment;
mod composite;
mod content_block;
mod entity;
mod ids;
mod tree;

pub use comment::*;
pub use composite::*;
pub use content_block::*;
pub use entity::*;
pub use ids::*;
pub use tree::*;
