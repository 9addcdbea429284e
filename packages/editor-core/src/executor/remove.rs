//! Removal of provisions and dissolution of agglomerators.

use crate::error::{EditorError, Result};
use crate::hierarchy;
use crate::model::{NodeId, ProvisionKind, ProvisionTree};

use super::Outcome;

/// Remove a provision and its subtree.
///
/// An agglomerator hands its children over before leaving, and an amendment
/// container left without heads goes away with its last head.
pub(super) fn remove(tree: &mut ProvisionTree, id: NodeId) -> Result<Outcome> {
    let kind = tree.get(id)?.kind;
    if matches!(kind, ProvisionKind::Articulation | ProvisionKind::Caput) {
        return Err(EditorError::InvalidDocument(format!("{kind} {id} cannot be removed")));
    }
    let parent = tree
        .parent(id)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} is detached")))?;

    let projected = |sibling: &NodeId| hierarchy::is_projected(tree, *sibling);
    let focus = hierarchy::previous_sibling(tree, id)
        .filter(projected)
        .or_else(|| hierarchy::next_sibling(tree, id).filter(projected))
        .unwrap_or_else(|| hierarchy::visible_owner(tree, parent));

    if kind.is_agglomerator() {
        dissolve(tree, id, parent)?;
    }
    tree.remove(id)?;
    tracing::debug!(node = %id, kind = ?kind, "Removed provision");

    let emptied_container = parent != tree.root()
        && tree.kind(parent) == Some(ProvisionKind::Articulation)
        && tree.children(parent).is_empty();
    let focus = if emptied_container {
        let host = tree.parent(parent);
        tree.remove(parent)?;
        host.unwrap_or(focus)
    } else {
        focus
    };

    Ok(Outcome {
        focus: tree.contains(focus).then_some(focus),
        moved: Vec::new(),
    })
}

fn dissolve(tree: &mut ProvisionTree, id: NodeId, parent: NodeId) -> Result<()> {
    let target = hierarchy::absorbing_node(tree, id).unwrap_or(parent);
    let children = tree.children(id).to_vec();

    if target == parent {
        let position = tree.position(id).unwrap_or_default();
        for (offset, child) in children.into_iter().enumerate() {
            tree.move_to(child, parent, position + offset)?;
        }
    } else {
        for child in children {
            tree.move_to(child, target, usize::MAX)?;
        }
    }
    Ok(())
}
