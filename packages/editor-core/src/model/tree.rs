//! Arena-backed provision tree.

use crate::error::{EditorError, Result};

use super::kind::ProvisionKind;
use super::provision::{NodeId, Provision};

/// The provision hierarchy of one document.
///
/// All nodes live in an append-only arena. Removing a subtree frees its
/// slots; ids are never handed out again.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionTree {
    nodes: Vec<Option<Provision>>,
    root: NodeId,
}

impl Default for ProvisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisionTree {
    /// Create a tree holding only the articulation root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Provision::new(ProvisionKind::Articulation))],
            root: NodeId::new(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live provisions, root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[self.root.index()]
            .as_ref()
            .is_none_or(|root| root.children.is_empty())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Look up a live provision.
    pub fn node(&self, id: NodeId) -> Option<&Provision> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get(&self, id: NodeId) -> Result<&Provision> {
        self.node(id).ok_or(EditorError::NodeNotFound(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Provision> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(EditorError::NodeNotFound(id))
    }

    pub fn kind(&self, id: NodeId) -> Option<ProvisionKind> {
        self.node(id).map(|node| node.kind)
    }

    /// Children of a node in reading order (empty for unknown ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Provision::children).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Provision::parent)
    }

    /// Index of a node among its parent's children.
    pub fn position(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Number of ancestors (the root has depth 0).
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// First child of the given kind.
    pub fn child_of_kind(&self, id: NodeId, kind: ProvisionKind) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == Some(kind))
    }

    /// Nearest enclosing amendment container (a nested articulation).
    pub fn enclosing_container(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).find(|&ancestor| {
            self.kind(ancestor) == Some(ProvisionKind::Articulation) && ancestor != self.root
        })
    }

    /// Descendants of a node in reading order, excluding the node itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        result
    }

    /// Every provision below the root in reading order.
    pub fn reading_order(&self) -> Vec<NodeId> {
        self.descendants(self.root)
    }

    /// Allocate an unlinked provision and return its id.
    pub(crate) fn allocate(&mut self, mut provision: Provision) -> NodeId {
        provision.parent = None;
        provision.children.clear();
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Some(provision));
        id
    }

    /// Link a detached node under `parent` at `index` (clamped to the end).
    ///
    /// Fails when the parent kind cannot contain the child kind.
    pub fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let parent_kind = self.get(parent)?.kind;
        let child_node = self.get(child)?;
        if !parent_kind.can_contain(child_node.kind) {
            return Err(EditorError::InvalidContainment {
                parent: parent_kind,
                child: child_node.kind,
            });
        }
        if child_node.parent.is_some() {
            self.detach(child)?;
        }

        let siblings = &mut self.get_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink a node from its parent; the subtree stays allocated.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.get(id)?.parent else {
            return Ok(());
        };
        self.get_mut(parent)?.children.retain(|&child| child != id);
        self.get_mut(id)?.parent = None;
        Ok(())
    }

    /// Move a node under `parent` at `index`.
    pub fn move_to(&mut self, id: NodeId, parent: NodeId, index: usize) -> Result<()> {
        self.detach(id)?;
        self.attach(parent, index, id)
    }

    /// Detach a node and free its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(EditorError::InvalidDocument(
                "the articulation root cannot be removed".to_string(),
            ));
        }
        self.detach(id)?;
        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            if let Some(slot) = self.nodes.get_mut(node.index()) {
                *slot = None;
            }
        }
        Ok(())
    }

    /// Explicit structural copy used by the undo history.
    ///
    /// The arena stores parent links as plain indices, so the copy shares
    /// nothing with the live tree.
    #[must_use]
    pub fn snapshot(&self) -> ProvisionTree {
        self.clone()
    }
}
