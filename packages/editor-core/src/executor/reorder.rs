//! Moving provisions up and down among their same-kind neighbours.

use crate::error::{EditorError, Result};
use crate::hierarchy;
use crate::model::{NodeId, ProvisionTree};

use super::Outcome;

/// Swap a provision with the previous same-kind provision (or omissis).
///
/// Articles may cross agglomerator boundaries: the article lands in the
/// parent of the provision it overtakes.
pub(super) fn move_up(tree: &mut ProvisionTree, id: NodeId) -> Result<Outcome> {
    let target = hierarchy::previous_same_kind(tree, id, true)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} is already the first")))?;
    place(tree, id, target, 0)
}

pub(super) fn move_down(tree: &mut ProvisionTree, id: NodeId) -> Result<Outcome> {
    let target = hierarchy::next_same_kind(tree, id, true)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} is already the last")))?;
    place(tree, id, target, 1)
}

/// Move `id` next to `target`, before it (`offset` 0) or after it (`offset` 1).
fn place(tree: &mut ProvisionTree, id: NodeId, target: NodeId, offset: usize) -> Result<Outcome> {
    let parent = tree
        .parent(target)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {target} is detached")))?;
    tree.detach(id)?;
    let position = tree.position(target).unwrap_or_default() + offset;
    tree.attach(parent, position, id)?;
    tracing::debug!(node = %id, target = %target, position, "Moved provision");

    Ok(Outcome {
        focus: Some(id),
        moved: vec![id],
    })
}
