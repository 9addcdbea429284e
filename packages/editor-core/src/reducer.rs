//! Document state machine.
//!
//! [`EditorState`] owns the tree of one document. Every transition runs to
//! completion (mutation, renumbering, revalidation, event emission) before
//! the next one is accepted; a failed transition leaves the tree untouched.
//!
//! Events are derived by comparing the tree before and after the mutation,
//! so executors never have to report what they changed.

use std::collections::{BTreeSet, HashSet};

use crate::content::{affins, revalidate, validate_tree};
use crate::element::{project_all, project_ids, Element};
use crate::error::{EditorError, Result};
use crate::events::{EventBatch, StateEvent};
use crate::executor::{self, Outcome};
use crate::hierarchy;
use crate::history::{HistoryBuffer, HistoryEntry};
use crate::model::{renumber_all, DefaultFactory, NodeId, Provision, ProvisionFactory, ProvisionTree};
use crate::rules::{self, Action};

/// Editing state of one document.
#[derive(Debug)]
pub struct EditorState<F = DefaultFactory> {
    tree: ProvisionTree,
    factory: F,
    past: HistoryBuffer,
    future: HistoryBuffer,
    selected: Option<NodeId>,
}

impl EditorState<DefaultFactory> {
    /// Take ownership of a document: renumber, validate everything and
    /// report it with a single `DocumentLoaded` event.
    pub fn load(tree: ProvisionTree) -> (Self, EventBatch) {
        Self::load_with_factory(tree, DefaultFactory)
    }
}

impl<F: ProvisionFactory> EditorState<F> {
    pub fn load_with_factory(mut tree: ProvisionTree, factory: F) -> (Self, EventBatch) {
        renumber_all(&mut tree);
        validate_tree(&mut tree);
        tracing::debug!(provisions = tree.len(), "Loaded document");

        let mut batch = EventBatch::new();
        batch.push(StateEvent::DocumentLoaded {
            elements: project_all(&tree),
        });

        let state = Self {
            tree,
            factory,
            past: HistoryBuffer::default(),
            future: HistoryBuffer::default(),
            selected: None,
        };
        (state, batch)
    }

    /// Replace the history bound (both directions); existing entries are dropped.
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.past = HistoryBuffer::new(capacity);
        self.future = HistoryBuffer::new(capacity);
        self
    }

    pub fn tree(&self) -> &ProvisionTree {
        &self.tree
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn element(&self, id: NodeId) -> Option<Element> {
        Element::project(&self.tree, id)
    }

    pub fn elements(&self) -> Vec<Element> {
        project_all(&self.tree)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn possible_actions(&self, id: NodeId) -> Vec<Action> {
        rules::possible_actions(&self.tree, id)
    }

    pub fn tab_action(&self, id: NodeId) -> Option<Action> {
        rules::tab_action(&self.tree, id)
    }

    pub fn shift_tab_action(&self, id: NodeId) -> Option<Action> {
        rules::shift_tab_action(&self.tree, id)
    }

    /// Apply a catalog action.
    ///
    /// Fails with [`EditorError::ActionNotAvailable`] when the catalog does
    /// not offer the action for the provision; nothing is mutated then.
    pub fn apply(&mut self, action: Action, id: NodeId) -> Result<EventBatch> {
        self.tree.get(id)?;
        if action == Action::Renumber {
            return Err(EditorError::ActionRequiresInput(action));
        }
        self.require(action, id)?;
        tracing::debug!(node = %id, action = %action.name(), "Applying action");
        self.commit(|tree, factory| executor::execute(tree, factory, action, id))
    }

    /// Enter key on a provision.
    pub fn add(&mut self, id: NodeId) -> Result<EventBatch> {
        self.require_projected(Action::Add, id)?;
        self.commit(|tree, factory| executor::execute(tree, factory, Action::Add, id))
    }

    /// Replace the text of a provision.
    pub fn update_text(&mut self, id: NodeId, text: &str) -> Result<EventBatch> {
        self.require_projected(Action::Update, id)?;
        if self.tree.get(id)?.is_suppressed() {
            return Err(EditorError::ActionNotAvailable {
                action: Action::Update,
                node: id,
            });
        }
        self.commit(|tree, _| executor::update_text(tree, id, text))
    }

    /// Set the authored number of an amendment provision (`0`: sole).
    pub fn renumber(&mut self, id: NodeId, number: u32) -> Result<EventBatch> {
        self.tree.get(id)?;
        self.require(Action::Renumber, id)?;
        self.commit(|tree, _| executor::renumber(tree, id, number))
    }

    /// Record the norm amended by the block containing `id`.
    pub fn set_amendment_norm(&mut self, id: NodeId, urn: &str) -> Result<EventBatch> {
        self.tree.get(id)?;
        self.commit(|tree, _| executor::set_norm(tree, id, urn))
    }

    /// Move the selection; not recorded in the history.
    pub fn select(&mut self, id: NodeId) -> Result<EventBatch> {
        let element = Element::project(&self.tree, id).ok_or(EditorError::NodeNotFound(id))?;
        self.selected = Some(id);
        let mut batch = EventBatch::new();
        batch.push(StateEvent::ElementSelected {
            elements: vec![element],
        });
        Ok(batch)
    }

    /// Restore the tree as it was before the latest transition.
    pub fn undo(&mut self) -> Option<EventBatch> {
        let entry = self.past.pop()?;
        let current = std::mem::replace(&mut self.tree, entry.snapshot);
        let batch = self.restoration_batch(&current, &entry.moved);
        self.future.push(HistoryEntry {
            batch: entry.batch,
            snapshot: current,
            moved: entry.moved,
        });
        self.forget_stale_selection();
        tracing::debug!(past = self.past.len(), future = self.future.len(), "Undo");
        Some(batch)
    }

    /// Reapply the latest undone transition and re-emit its batch.
    pub fn redo(&mut self) -> Option<EventBatch> {
        let entry = self.future.pop()?;
        let previous = std::mem::replace(&mut self.tree, entry.snapshot);
        let batch = entry.batch.clone();
        self.past.push(HistoryEntry {
            batch: entry.batch,
            snapshot: previous,
            moved: entry.moved,
        });
        self.forget_stale_selection();
        tracing::debug!(past = self.past.len(), future = self.future.len(), "Redo");
        Some(batch)
    }

    /// Revalidate the whole document and report every element with findings.
    pub fn validate_all(&mut self) -> EventBatch {
        validate_tree(&mut self.tree);
        let elements: Vec<Element> = project_all(&self.tree)
            .into_iter()
            .filter(|element| !element.diagnostics.is_empty())
            .collect();
        let mut batch = EventBatch::new();
        batch.push(StateEvent::ElementValidated { elements });
        batch
    }

    fn require(&self, action: Action, id: NodeId) -> Result<()> {
        if action.is_internal() || !rules::is_available(&self.tree, id, action) {
            return Err(EditorError::ActionNotAvailable { action, node: id });
        }
        Ok(())
    }

    fn require_projected(&self, action: Action, id: NodeId) -> Result<()> {
        self.tree.get(id)?;
        if !hierarchy::is_projected(&self.tree, id) {
            return Err(EditorError::ActionNotAvailable { action, node: id });
        }
        Ok(())
    }

    /// Run a mutation atomically and record it in the history.
    fn commit(&mut self, mutate: impl FnOnce(&mut ProvisionTree, &F) -> Result<Outcome>) -> Result<EventBatch> {
        let before = self.tree.snapshot();
        let outcome = match mutate(&mut self.tree, &self.factory) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "Transition failed, tree restored");
                self.tree = before;
                return Err(err);
            }
        };
        if self.tree == before {
            return Ok(EventBatch::new());
        }

        let changes = Changes::between(&before, &self.tree, &outcome.moved);
        let affected = self.refresh_diagnostics(&before, &changes, &outcome.moved);
        let validated: Vec<NodeId> = affected
            .into_iter()
            .filter(|&id| had_or_has_findings(&before, &self.tree, id))
            .collect();
        let batch = changes.into_batch(&before, &self.tree, &validated);

        if let Some(focus) = outcome.focus.filter(|&focus| self.tree.contains(focus)) {
            self.selected = Some(focus);
        }
        self.forget_stale_selection();

        self.past.push(HistoryEntry {
            batch: batch.clone(),
            snapshot: before,
            moved: outcome.moved,
        });
        self.future.clear();
        Ok(batch)
    }

    /// Revalidate the affected set of everything a transition touched.
    fn refresh_diagnostics(&mut self, before: &ProvisionTree, changes: &Changes, moved: &[NodeId]) -> Vec<NodeId> {
        let mut touched: BTreeSet<NodeId> = BTreeSet::new();
        touched.extend(changes.inserted.iter().copied());
        touched.extend(changes.modified.iter().copied());
        touched.extend(changes.renumbered.iter().copied());
        touched.extend(moved.iter().copied());
        for &removed in &changes.removed {
            let survivors = before
                .ancestors(removed)
                .chain(hierarchy::positional_neighbours(before, removed))
                .filter(|&node| self.tree.contains(node));
            touched.extend(survivors);
        }
        for &id in moved {
            touched.extend(before.parent(id));
            touched.extend(hierarchy::positional_neighbours(before, id));
        }

        let affected: BTreeSet<NodeId> = touched
            .iter()
            .filter(|&&id| self.tree.contains(id))
            .flat_map(|&id| affins(&self.tree, id))
            .collect();
        let affected: Vec<NodeId> = affected.into_iter().collect();
        revalidate(&mut self.tree, &affected);
        in_reading_order(&self.tree, affected)
    }

    /// Batch for a jump from `current` to the restored `self.tree`.
    fn restoration_batch(&self, current: &ProvisionTree, moved: &[NodeId]) -> EventBatch {
        let changes = Changes::between(current, &self.tree, moved);
        let validated: Vec<NodeId> = self
            .tree
            .reading_order()
            .into_iter()
            .filter(|&id| hierarchy::is_projected(&self.tree, id))
            .filter(|&id| {
                let now = self.tree.node(id).map(|node| &node.diagnostics);
                match current.node(id) {
                    Some(previous) => Some(&previous.diagnostics) != now,
                    None => now.is_some_and(|diagnostics| !diagnostics.is_empty()),
                }
            })
            .collect();
        changes.into_batch(current, &self.tree, &validated)
    }

    fn forget_stale_selection(&mut self) {
        if self.selected.is_some_and(|id| !self.tree.contains(id)) {
            self.selected = None;
        }
    }
}

/// Projected provisions that differ between two trees.
#[derive(Debug, Default)]
struct Changes {
    removed: Vec<NodeId>,
    inserted: Vec<NodeId>,
    modified: Vec<NodeId>,
    renumbered: Vec<NodeId>,
}

impl Changes {
    /// Compare two trees. Moved provisions (and their subtrees) are reported
    /// as removed from their old place and inserted at the new one.
    fn between(before: &ProvisionTree, after: &ProvisionTree, moved: &[NodeId]) -> Self {
        let before_order = before.reading_order();
        let after_order = after.reading_order();
        let moved: HashSet<NodeId> = moved
            .iter()
            .flat_map(|&id| std::iter::once(id).chain(after.descendants(id)))
            .collect();

        let mut changes = Self::default();
        for &id in &before_order {
            if hierarchy::is_projected(before, id) && (!after.contains(id) || moved.contains(&id)) {
                changes.removed.push(id);
            }
        }
        for &id in &after_order {
            if !hierarchy::is_projected(after, id) {
                continue;
            }
            let (Some(old), Some(new)) = (before.node(id), after.node(id)) else {
                changes.inserted.push(id);
                continue;
            };
            if moved.contains(&id) {
                changes.inserted.push(id);
            } else if content_changed(old, new) {
                changes.modified.push(id);
            } else if old.number != new.number || old.label != new.label {
                changes.renumbered.push(id);
            }
        }
        changes
    }

    fn into_batch(self, before: &ProvisionTree, after: &ProvisionTree, validated: &[NodeId]) -> EventBatch {
        let mut batch = EventBatch::new();
        batch.push(StateEvent::ElementRemoved {
            elements: project_ids(before, &self.removed),
        });

        if let Some(&first) = self.inserted.first() {
            let projected: Vec<NodeId> = after
                .reading_order()
                .into_iter()
                .filter(|&id| hierarchy::is_projected(after, id))
                .collect();
            let position = projected.iter().position(|&id| id == first);
            let reference = position
                .and_then(|position| position.checked_sub(1))
                .map(|previous| projected[previous]);
            batch.push(StateEvent::ElementInserted {
                elements: project_ids(after, &self.inserted),
                reference,
                position,
            });
        }

        batch.push(StateEvent::ElementModified {
            elements: project_ids(after, &self.modified),
        });
        batch.push(StateEvent::ElementRenumbered {
            elements: project_ids(after, &self.renumbered),
        });
        batch.push(StateEvent::ElementValidated {
            elements: project_ids(after, validated),
        });
        batch
    }
}

fn content_changed(old: &Provision, new: &Provision) -> bool {
    old.kind != new.kind || old.text != new.text || old.situation != new.situation || old.amendment != new.amendment
}

fn had_or_has_findings(before: &ProvisionTree, after: &ProvisionTree, id: NodeId) -> bool {
    let has = |tree: &ProvisionTree| tree.node(id).is_some_and(|node| !node.diagnostics.is_empty());
    has(before) || has(after)
}

fn in_reading_order(tree: &ProvisionTree, ids: Vec<NodeId>) -> Vec<NodeId> {
    let wanted: HashSet<NodeId> = ids.into_iter().collect();
    tree.reading_order()
        .into_iter()
        .filter(|id| wanted.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{load_outline_str, ProvisionKind};
    use crate::rules::ProvisionSlot;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"
provisions:
  - kind: article
    text: "O programa compreende:"
    children:
      - kind: item
        text: "primeira ação;"
      - kind: item
        text: "segunda ação."
      - kind: paragraph
        text: "O programa será permanente."
      - kind: paragraph
        text: "O programa será avaliado."
  - kind: article
    text: "Esta Lei entra em vigor na data de sua publicação."
"#;

    fn load() -> EditorState {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        EditorState::load(tree).0
    }

    fn paragraphs(state: &EditorState) -> Vec<NodeId> {
        let tree = state.tree();
        let article = tree.children(tree.root())[0];
        tree.children(article)
            .iter()
            .copied()
            .filter(|&child| tree.kind(child) == Some(ProvisionKind::Paragraph))
            .collect()
    }

    #[test]
    fn test_load_emits_document_loaded() {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let (_, batch) = EditorState::load(tree);
        assert_eq!(batch.names(), vec!["DocumentLoaded"]);
        assert_eq!(batch.events()[0].elements().len(), 6);
    }

    #[test]
    fn test_apply_rejects_unoffered_action() {
        let mut state = load();
        let first_article = state.tree().children(state.tree().root())[0];
        let before = state.tree().clone();
        let err = state.apply(Action::MoveUp, first_article).unwrap_err();
        assert!(matches!(err, EditorError::ActionNotAvailable { .. }));
        assert_eq!(state.tree(), &before);
        assert!(!state.can_undo());
    }

    #[test]
    fn test_renumber_through_apply_requires_input() {
        let mut state = load();
        let first_article = state.tree().children(state.tree().root())[0];
        let err = state.apply(Action::Renumber, first_article).unwrap_err();
        assert!(matches!(err, EditorError::ActionRequiresInput(Action::Renumber)));
    }

    #[test]
    fn test_remove_makes_sibling_sole() {
        let mut state = load();
        let before = paragraphs(&state);
        let (first, second) = (before[0], before[1]);
        let batch = state.apply(Action::Remove, first).unwrap();

        let node = state.tree().get(second).unwrap();
        assert_eq!(node.number, None);
        assert_eq!(node.label, "Parágrafo único.");
        let renumbered = batch.find("ElementRenumbered").unwrap();
        assert_eq!(renumbered.elements()[0].id, second);
        assert_eq!(batch.find("ElementRemoved").unwrap().elements()[0].id, first);
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut state = load();
        let second = paragraphs(&state)[1];
        let before = state.tree().clone();

        state
            .apply(
                Action::Transform {
                    from: ProvisionSlot::Paragraph,
                    to: ProvisionSlot::Article,
                },
                second,
            )
            .unwrap();
        let after = state.tree().clone();
        assert_ne!(after, before);

        let undo = state.undo().unwrap();
        assert_eq!(state.tree(), &before);
        assert!(undo.find("ElementInserted").is_some());
        assert!(undo.find("ElementRemoved").is_some());

        state.redo().unwrap();
        assert_eq!(state.tree(), &after);
        assert_eq!(state.past_len(), 1);
        assert_eq!(state.future_len(), 0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut state = load().with_history_capacity(3);
        let article = state.tree().children(state.tree().root())[1];
        for round in 0..5 {
            state.update_text(article, &format!("Texto {round}.")).unwrap();
        }
        assert_eq!(state.past_len(), 3);
        for _ in 0..3 {
            state.undo().unwrap();
        }
        assert!(state.undo().is_none());
        assert_eq!(state.tree().get(article).unwrap().text, "Texto 1.");
    }

    #[test]
    fn test_new_action_clears_future() {
        let mut state = load();
        let article = state.tree().children(state.tree().root())[1];
        state.update_text(article, "Primeiro.").unwrap();
        state.undo().unwrap();
        assert!(state.can_redo());
        state.update_text(article, "Segundo.").unwrap();
        assert!(!state.can_redo());
    }

    #[test]
    fn test_unchanged_text_is_not_recorded() {
        let mut state = load();
        let article = state.tree().children(state.tree().root())[1];
        let text = state.tree().get(article).unwrap().text.clone();
        let batch = state.update_text(article, &text).unwrap();
        assert!(batch.is_empty());
        assert!(!state.can_undo());
    }

    #[test]
    fn test_update_reports_validation() {
        let mut state = load();
        let article = state.tree().children(state.tree().root())[1];
        let batch = state.update_text(article, "sem pontuação").unwrap();
        assert_eq!(batch.names(), vec!["ElementModified", "ElementValidated"]);
        let validated = batch.find("ElementValidated").unwrap();
        assert!(validated
            .elements()
            .iter()
            .any(|element| element.id == article && !element.diagnostics.is_empty()));
    }

    #[test]
    fn test_select_is_not_recorded() {
        let mut state = load();
        let article = state.tree().children(state.tree().root())[1];
        let batch = state.select(article).unwrap();
        assert_eq!(batch.names(), vec!["ElementSelected"]);
        assert_eq!(state.selected(), Some(article));
        assert!(!state.can_undo());
    }

    #[test]
    fn test_failed_transition_leaves_tree_untouched() {
        let mut state = load();
        let article = state.tree().children(state.tree().root())[1];
        let before = state.tree().clone();
        let err = state.set_amendment_norm(article, "urn:lex:br:federal:lei:1990-12-11;8112");
        assert!(err.is_err());
        assert_eq!(state.tree(), &before);
    }
}
