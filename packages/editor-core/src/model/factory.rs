//! Construction of linked provisions.
//!
//! The [`ProvisionFactory`] trait is the seam between the core and whatever
//! builds documents (an import parser, the outline loader, the executors).

use crate::config::OMISSIS_TEXT;
use crate::error::{EditorError, Result};

use super::kind::ProvisionKind;
use super::provision::{NodeId, Provision};
use super::tree::ProvisionTree;

/// Creates and clones provisions inside a tree.
pub trait ProvisionFactory {
    /// Create an empty provision of `kind` under `parent`.
    ///
    /// Placement: `index` wins when given; otherwise the new node goes right
    /// after `predecessor`; otherwise it is appended.
    fn create(
        &self,
        tree: &mut ProvisionTree,
        parent: NodeId,
        kind: ProvisionKind,
        predecessor: Option<NodeId>,
        index: Option<usize>,
    ) -> Result<NodeId>;

    /// Deep-copy the children of `source` to the end of `dest`, retargeting
    /// kinds that `dest` cannot hold.
    fn copy_children(&self, tree: &mut ProvisionTree, source: NodeId, dest: NodeId) -> Result<()>;
}

/// Default construction policy.
///
/// Articles get their caput on creation, omissis get the omissis line, and
/// trailing content of an article is kept before its amendment container.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFactory;

impl ProvisionFactory for DefaultFactory {
    fn create(
        &self,
        tree: &mut ProvisionTree,
        parent: NodeId,
        kind: ProvisionKind,
        predecessor: Option<NodeId>,
        index: Option<usize>,
    ) -> Result<NodeId> {
        let parent_kind = tree.get(parent)?.kind;
        if !parent_kind.can_contain(kind) {
            return Err(EditorError::InvalidContainment {
                parent: parent_kind,
                child: kind,
            });
        }

        let position = match (index, predecessor) {
            (Some(index), _) => index,
            (None, Some(predecessor)) => match tree.position(predecessor) {
                Some(position) if tree.parent(predecessor) == Some(parent) => position + 1,
                _ => {
                    return Err(EditorError::InvalidDocument(format!(
                        "predecessor {predecessor} is not a child of {parent}"
                    )))
                }
            },
            (None, None) => default_position(tree, parent, kind),
        };

        let mut provision = Provision::new(kind);
        if kind == ProvisionKind::Omissis {
            provision.text = OMISSIS_TEXT.to_string();
        }
        let id = tree.allocate(provision);
        tree.attach(parent, position, id)?;

        if kind == ProvisionKind::Article {
            let caput = tree.allocate(Provision::new(ProvisionKind::Caput));
            tree.attach(id, 0, caput)?;
        }

        tracing::debug!(node = %id, parent = %parent, kind = ?kind, position, "Created provision");
        Ok(id)
    }

    fn copy_children(&self, tree: &mut ProvisionTree, source: NodeId, dest: NodeId) -> Result<()> {
        let source_kind = tree.get(source)?.kind;
        let dest = effective_destination(tree, source_kind, dest)?;
        let children = tree.children(source).to_vec();
        for child in children {
            self.copy_node(tree, child, dest)?;
        }
        Ok(())
    }
}

impl DefaultFactory {
    fn copy_node(&self, tree: &mut ProvisionTree, source: NodeId, dest: NodeId) -> Result<()> {
        let original = tree.get(source)?.clone();
        let dest_kind = tree.get(dest)?.kind;

        // A caput merges into the destination's caput, or dissolves into a
        // destination that cannot have one.
        if original.kind == ProvisionKind::Caput {
            let target = match tree.child_of_kind(dest, ProvisionKind::Caput) {
                Some(caput) => caput,
                None if dest_kind.can_contain(ProvisionKind::Caput) => {
                    self.create(tree, dest, ProvisionKind::Caput, None, Some(0))?
                }
                None => dest,
            };
            for child in original.children() {
                self.copy_node(tree, *child, target)?;
            }
            return Ok(());
        }

        let kind = retarget_kind(dest_kind, original.kind).ok_or(EditorError::InvalidContainment {
            parent: dest_kind,
            child: original.kind,
        })?;

        let copy = self.create(tree, dest, kind, None, None)?;
        {
            let node = tree.get_mut(copy)?;
            node.text = original.text.clone();
            node.number = original.number;
            node.label = original.label.clone();
            node.situation = original.situation;
            node.amendment = original.amendment.clone();
            node.diagnostics = original.diagnostics.clone();
        }

        self.copy_children(tree, source, copy)
    }
}

/// Kind a copied child takes under a parent of kind `dest`.
///
/// Kinds the parent accepts are kept; provisions of the enumeration ladder
/// (and paragraphs) become the parent's enumeration child kind.
pub fn retarget_kind(dest: ProvisionKind, child: ProvisionKind) -> Option<ProvisionKind> {
    use ProvisionKind::*;

    if dest.can_contain(child) {
        return Some(child);
    }
    match child {
        Paragraph | Item | SubItem | SubSubItem => dest.enumeration_child(),
        _ => None,
    }
}

/// Check whether the subtree of `source` can be copied below a node of
/// kind `dest` without falling off the enumeration ladder.
pub fn children_fit(tree: &ProvisionTree, source: NodeId, dest: ProvisionKind) -> bool {
    let dest = if dest == ProvisionKind::Article && tree.kind(source) != Some(ProvisionKind::Article) {
        ProvisionKind::Caput
    } else {
        dest
    };

    tree.children(source).iter().all(|&child| {
        let Some(kind) = tree.kind(child) else {
            return false;
        };
        if kind == ProvisionKind::Caput {
            let target = if dest.can_contain(ProvisionKind::Caput) {
                ProvisionKind::Caput
            } else {
                dest
            };
            return children_fit(tree, child, target);
        }
        match retarget_kind(dest, kind) {
            Some(target) => children_fit(tree, child, target),
            None => false,
        }
    })
}

/// Items copied into an article from anything but an article belong to its caput.
fn effective_destination(
    tree: &ProvisionTree,
    source_kind: ProvisionKind,
    dest: NodeId,
) -> Result<NodeId> {
    if tree.get(dest)?.kind == ProvisionKind::Article && source_kind != ProvisionKind::Article {
        return tree
            .child_of_kind(dest, ProvisionKind::Caput)
            .ok_or_else(|| EditorError::InvalidDocument(format!("article {dest} has no caput")));
    }
    Ok(dest)
}

/// Appending to an article keeps the caput first and the amendment container last.
fn default_position(tree: &ProvisionTree, parent: NodeId, kind: ProvisionKind) -> usize {
    let children = tree.children(parent);
    if tree.kind(parent) == Some(ProvisionKind::Article) && kind != ProvisionKind::Articulation {
        if let Some(container) = children
            .iter()
            .position(|&child| tree.kind(child) == Some(ProvisionKind::Articulation))
        {
            return container;
        }
    }
    children.len()
}
