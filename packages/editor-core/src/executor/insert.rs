//! New provisions: siblings, first children and the Enter key.

use crate::content::indicators::has_expansion_indicator;
use crate::error::{EditorError, Result};
use crate::model::{NodeId, ProvisionFactory, ProvisionKind, ProvisionTree};
use crate::rules::Action;

use super::{settle, Outcome};

/// Add a provision of the kind named by `action`: a sibling when the
/// provision already has that kind, otherwise its first child.
pub(super) fn add_kind(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    id: NodeId,
    action: Action,
) -> Result<Outcome> {
    let kind = match action {
        Action::AddArticle => ProvisionKind::Article,
        Action::AddParagraph => ProvisionKind::Paragraph,
        Action::AddItem => ProvisionKind::Item,
        Action::AddSubItem => ProvisionKind::SubItem,
        Action::AddSubSubItem => ProvisionKind::SubSubItem,
        _ => return Err(EditorError::ActionNotAvailable { action, node: id }),
    };

    let created = if tree.kind(id) == Some(kind) {
        insert_after(tree, factory, id, kind)?
    } else {
        insert_first_child(tree, factory, id, kind)?
    };
    Ok(Outcome::focus(created))
}

/// Enter key: open the first child when the text announces an expansion,
/// otherwise a sibling after the provision.
pub(super) fn add(tree: &mut ProvisionTree, factory: &impl ProvisionFactory, id: NodeId) -> Result<Outcome> {
    let node = tree.get(id)?;
    let kind = node.kind;

    let expansion = match kind {
        ProvisionKind::Article => Some(ProvisionKind::Item),
        other => other.enumeration_child(),
    };
    if let Some(child) = expansion {
        if has_expansion_indicator(kind, &node.text) {
            let created = insert_first_child(tree, factory, id, child)?;
            return Ok(Outcome::focus(created));
        }
    }

    let sibling = sibling_kind(tree, id)?;
    let created = insert_after(tree, factory, id, sibling)?;
    Ok(Outcome::focus(created))
}

/// Kind a new sibling of `id` takes. An omissis borrows the kind of its
/// neighbours.
fn sibling_kind(tree: &ProvisionTree, id: NodeId) -> Result<ProvisionKind> {
    let kind = tree.get(id)?.kind;
    match kind {
        ProvisionKind::Articulation | ProvisionKind::Caput => Err(EditorError::InvalidDocument(format!(
            "{kind} {id} cannot have siblings added"
        ))),
        ProvisionKind::Omissis => {
            let parent = tree
                .parent(id)
                .ok_or_else(|| EditorError::InvalidDocument(format!("omissis {id} is detached")))?;
            let neighbour = tree
                .children(parent)
                .iter()
                .filter_map(|&sibling| tree.kind(sibling))
                .find(|&sibling| sibling != ProvisionKind::Omissis);
            let parent_kind = tree.get(parent)?.kind;
            let fallback = if parent_kind.is_structural() {
                Some(ProvisionKind::Article)
            } else if parent_kind == ProvisionKind::Article {
                Some(ProvisionKind::Paragraph)
            } else {
                parent_kind.enumeration_child()
            };
            neighbour.or(fallback).ok_or_else(|| {
                EditorError::InvalidDocument(format!("no provision kind fits next to omissis {id}"))
            })
        }
        other => Ok(other),
    }
}

fn insert_after(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    id: NodeId,
    kind: ProvisionKind,
) -> Result<NodeId> {
    let parent = tree
        .parent(id)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} is detached")))?;
    let created = factory.create(tree, parent, kind, Some(id), None)?;
    settle(tree, created)?;
    Ok(created)
}

/// Insert `kind` as the first child of `owner`. Items of an article go to
/// its caput; paragraphs of an article follow the caput.
fn insert_first_child(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    owner: NodeId,
    kind: ProvisionKind,
) -> Result<NodeId> {
    let (parent, index) = match (tree.get(owner)?.kind, kind) {
        (ProvisionKind::Article, ProvisionKind::Paragraph) => (owner, 1),
        (ProvisionKind::Article, _) => {
            let caput = tree.child_of_kind(owner, ProvisionKind::Caput).ok_or_else(|| {
                EditorError::InvalidDocument(format!("article {owner} has no caput"))
            })?;
            (caput, 0)
        }
        _ => (owner, 0),
    };
    let created = factory.create(tree, parent, kind, None, Some(index))?;
    settle(tree, created)?;
    Ok(created)
}
