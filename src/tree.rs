//! Reconstruct navigable id/label trees from the flat entity graph.

use crate::client::EntityGraphClient;
use crate::error::GraphError;
use crate::graph::{EntityGraph, GraphLoader};
use crate::models::{Entity, EntityId, TreeNode};

/// Build the descendant tree of `root` from an already-resolved snapshot.
///
/// The root itself is not part of the result; only its descendants are.
/// A child id missing from the snapshot (its fetch failed) is skipped along
/// with its whole branch. Recursion never goes deeper than the number of
/// entities in the snapshot, so the build terminates even on cyclic input.
pub fn build(root: &Entity, graph: &EntityGraph) -> Vec<TreeNode> {
    build_children(root, graph, 0, graph.len())
}

fn build_children(
    entity: &Entity,
    graph: &EntityGraph,
    depth: usize,
    max_depth: usize,
) -> Vec<TreeNode> {
    if depth >= max_depth {
        return Vec::new();
    }

    entity
        .child_ids
        .iter()
        .filter_map(|id| match graph.get(id) {
            Some(child) => Some(TreeNode {
                id: child.id.clone(),
                label: child.name.clone(),
                children: build_children(child, graph, depth + 1, max_depth),
            }),
            None => {
                tracing::warn!(parent = %entity.id, child = %id, "Skipping unresolved child");
                None
            }
        })
        .collect()
}

/// Fetch everything under `root_id` through `loader`, then build its tree.
///
/// Fails only when the root itself cannot be resolved.
pub async fn load<C: EntityGraphClient>(
    loader: &GraphLoader<C>,
    root_id: &EntityId,
) -> Result<Vec<TreeNode>, GraphError> {
    let snapshot = loader.load_subtree(root_id).await?;
    let root = snapshot
        .get(root_id)
        .ok_or_else(|| GraphError::not_found(root_id))?;
    Ok(build(root, &snapshot))
}
