use serde::{Deserialize, Serialize};

use super::EntityId;

/// One node of a navigable hierarchy skeleton.
///
/// Serialized as `{"id", "label", "children": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeNode {
    pub id: EntityId,
    pub label: String,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(TreeNode::size).sum::<usize>()
    }
}
