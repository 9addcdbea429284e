//! Conversions between provision kinds.
//!
//! A conversion creates the new provision at its destination, deep-copies
//! the old subtree into it through the factory (kinds shift along the item
//! ladder) and drops the old provision.

use crate::config::OMISSIS_TEXT;
use crate::error::{EditorError, Result};
use crate::hierarchy;
use crate::model::{NodeId, ProvisionFactory, ProvisionKind, ProvisionTree};
use crate::rules::ProvisionSlot;

use super::{settle, Outcome};

pub(super) fn transform(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    id: NodeId,
    from: ProvisionSlot,
    to: ProvisionSlot,
) -> Result<Outcome> {
    if ProvisionSlot::of(tree, id) != Some(from) {
        return Err(EditorError::InvalidDocument(format!(
            "provision {id} is not a {from}"
        )));
    }

    let created = if to == ProvisionSlot::Omissis {
        to_omissis(tree, factory, id)?
    } else {
        let (parent, index) = destination(tree, factory, id, from, to)?;
        replace(tree, factory, id, parent, index, to.kind())?
    };

    tracing::debug!(node = %id, created = %created, from = %from, to = %to, "Converted provision");
    Ok(Outcome::focus(created))
}

/// Parent and index the converted provision goes to (`None` appends).
fn destination(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    id: NodeId,
    from: ProvisionSlot,
    to: ProvisionSlot,
) -> Result<(NodeId, Option<usize>)> {
    use ProvisionSlot::*;

    let parent = tree
        .parent(id)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} is detached")))?;

    match (from, to) {
        // Becomes the last paragraph of the previous article.
        (Article, Paragraph) => {
            let previous = hierarchy::previous_same_kind(tree, id, false).ok_or_else(|| {
                EditorError::InvalidDocument(format!("article {id} has no previous article"))
            })?;
            Ok((previous, None))
        }
        // Becomes the last item of the caput.
        (Paragraph, CaputItem) => {
            let caput = tree.child_of_kind(parent, ProvisionKind::Caput).ok_or_else(|| {
                EditorError::InvalidDocument(format!("article {parent} has no caput"))
            })?;
            Ok((caput, None))
        }
        // Becomes the last item of the previous paragraph.
        (Paragraph, ParagraphItem) => {
            let previous = hierarchy::previous_same_kind(tree, id, false).ok_or_else(|| {
                EditorError::InvalidDocument(format!("paragraph {id} has no previous paragraph"))
            })?;
            Ok((previous, None))
        }
        // Becomes a new article right after its own.
        (Paragraph, Article) => after(tree, parent),
        // The last caput item opens the paragraphs.
        (CaputItem, Paragraph) => {
            let article = tree.parent(parent).ok_or_else(|| {
                EditorError::InvalidDocument(format!("caput {parent} is detached"))
            })?;
            Ok((article, Some(1)))
        }
        (ParagraphItem, Paragraph) | (SubItem, CaputItem | ParagraphItem) | (SubSubItem, SubItem) => {
            after(tree, parent)
        }
        (CaputItem | ParagraphItem, SubItem) | (SubItem, SubSubItem) => {
            let host = match hierarchy::previous_same_kind(tree, id, false) {
                Some(previous) => previous,
                None => omissis_host(tree, factory, id)?,
            };
            Ok((host, None))
        }
        _ => Err(EditorError::InvalidDocument(format!(
            "{from} cannot be converted to {to}"
        ))),
    }
}

/// Slot right after `anchor` in its parent.
fn after(tree: &ProvisionTree, anchor: NodeId) -> Result<(NodeId, Option<usize>)> {
    let parent = tree
        .parent(anchor)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {anchor} is detached")))?;
    let position = tree.position(anchor).unwrap_or_default();
    Ok((parent, Some(position + 1)))
}

/// The first provision of its kind, preceded by an omissis, is demoted below
/// a new provision standing in for the omissis.
fn omissis_host(tree: &mut ProvisionTree, factory: &impl ProvisionFactory, id: NodeId) -> Result<NodeId> {
    let omissis = hierarchy::previous_sibling(tree, id)
        .filter(|&sibling| tree.kind(sibling) == Some(ProvisionKind::Omissis))
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} has nothing to nest under")))?;
    let parent = tree
        .parent(omissis)
        .ok_or_else(|| EditorError::InvalidDocument(format!("omissis {omissis} is detached")))?;
    let kind = tree.get(id)?.kind;
    let position = tree.position(omissis).unwrap_or_default();

    let host = factory.create(tree, parent, kind, None, Some(position))?;
    tree.get_mut(host)?.text = OMISSIS_TEXT.to_string();
    tree.remove(omissis)?;
    settle(tree, host)?;
    Ok(host)
}

/// Create `kind` at the destination, carry the text and subtree over and
/// drop the original provision.
fn replace(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    id: NodeId,
    parent: NodeId,
    index: Option<usize>,
    kind: ProvisionKind,
) -> Result<NodeId> {
    let created = factory.create(tree, parent, kind, None, index)?;
    let original = tree.get(id)?;
    let content = original.text.clone();
    let situation = original.situation;
    {
        let node = tree.get_mut(created)?;
        node.text = content;
        node.situation = situation;
    }
    factory.copy_children(tree, id, created)?;
    tree.remove(id)?;
    settle(tree, created)?;
    Ok(created)
}

/// Replace a provision in place by an omissis line. A block head keeps its
/// amendment metadata.
fn to_omissis(tree: &mut ProvisionTree, factory: &impl ProvisionFactory, id: NodeId) -> Result<NodeId> {
    let parent = tree
        .parent(id)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} is detached")))?;
    let position = tree.position(id).unwrap_or_default();
    let amendment = tree.get(id)?.amendment.clone();

    let created = factory.create(tree, parent, ProvisionKind::Omissis, None, Some(position))?;
    tree.get_mut(created)?.amendment = amendment;
    tree.remove(id)?;
    Ok(created)
}
