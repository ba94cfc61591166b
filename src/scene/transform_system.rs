//! Transform System
//!
//! Propagates local matrices down the node hierarchy. Kept apart from
//! [`Scene`](crate::scene::Scene) so it only borrows the node arena.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every tree under `roots`.
///
/// Uses an explicit stack instead of recursion so deep skeletons cannot
/// overflow the call stack. World matrices are only recomputed where the
/// local matrix or an ancestor changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    drain_stack(nodes, &mut stack);
}

/// Updates the world matrices of `root` and its descendants.
///
/// The parent's cached world matrix is taken as-is, so the caller must make
/// sure ancestors are current.
pub fn update_subtree(nodes: &mut SlotMap<NodeHandle, Node>, root: NodeHandle) {
    let parent_world = nodes
        .get(root)
        .and_then(|n| n.parent)
        .and_then(|p| nodes.get(p))
        .map_or(Affine3A::IDENTITY, |p| p.transform.world_matrix);

    if let Some(node) = nodes.get_mut(root) {
        node.transform.mark_dirty();
    }

    let mut stack = vec![(root, parent_world, true)];
    drain_stack(nodes, &mut stack);
}

fn drain_stack(nodes: &mut SlotMap<NodeHandle, Node>, stack: &mut Vec<(NodeHandle, Affine3A, bool)>) {
    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}
