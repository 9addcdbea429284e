//! Catalog entries shared by every kind: moves, removal, omissis and the
//! amendment block actions.

use crate::hierarchy;
use crate::model::{NodeId, ProvisionKind, ProvisionTree};
use crate::text;

use super::action::{Action, ProvisionSlot};

/// Actions every projected provision in the article ladder shares: moving,
/// removal, the amendment block actions and the omissis conversion.
pub(super) fn shared_actions(tree: &ProvisionTree, id: NodeId) -> Vec<Action> {
    let mut actions = Vec::new();

    if hierarchy::next_same_kind(tree, id, true).is_some() {
        actions.push(Action::MoveDown);
    }
    if hierarchy::previous_same_kind(tree, id, true).is_some() {
        actions.push(Action::MoveUp);
    }

    if hierarchy::is_amendment_provision(tree, id) {
        if tree.kind(id).is_some_and(ProvisionKind::is_numbered) {
            actions.push(Action::Renumber);
        }
        if hierarchy::is_block_terminal(tree, id) {
            actions.push(Action::StartAmendmentBlock);
            if can_end_amendment_block(tree, id) {
                actions.push(Action::EndAmendmentBlock);
            }
        }
    }

    actions.push(Action::Remove);

    if can_convert_to_omissis(tree, id) {
        if let Some(action) = Action::transform(tree, id, ProvisionSlot::Omissis) {
            actions.push(action);
        }
    }

    actions
}

/// Later blocks can only leave the amendment when all of them are headed
/// by articles, which become ordinary articles after the host.
fn can_end_amendment_block(tree: &ProvisionTree, id: NodeId) -> bool {
    let later = hierarchy::subsequent_amendment_blocks(tree, id);
    !later.is_empty()
        && later
            .iter()
            .all(|&head| tree.kind(head) == Some(ProvisionKind::Article))
}

/// Check whether a provision can be replaced by an omissis line.
///
/// Only amendment provisions below a block head qualify, and only when
/// they carry nothing worth keeping: no children and no text other than
/// dots or the default placeholder. An omissis next to another omissis is
/// never offered.
pub fn can_convert_to_omissis(tree: &ProvisionTree, id: NodeId) -> bool {
    let Some(node) = tree.node(id) else {
        return false;
    };
    if node.kind == ProvisionKind::Omissis
        || !hierarchy::is_amendment_provision(tree, id)
        || hierarchy::amendment_block_head(tree, id) == Some(id)
        || hierarchy::has_children(tree, id)
    {
        return false;
    }

    let normalized = text::normalize(&node.text);
    let placeholder = normalized.is_empty()
        || text::is_dots_only(&node.text)
        || normalized == text::normalize(crate::config::DEFAULT_AMENDMENT_TEXT);
    if !placeholder {
        return false;
    }

    let is_omissis = |sibling: Option<NodeId>| {
        sibling.and_then(|sibling| tree.kind(sibling)) == Some(ProvisionKind::Omissis)
    };
    !is_omissis(hierarchy::previous_sibling(tree, id)) && !is_omissis(hierarchy::next_sibling(tree, id))
}

/// Check whether the text is empty once markup is stripped.
pub(super) fn is_blank(content: &str) -> bool {
    text::normalize(content).is_empty()
}

/// Check whether a conversion one step down the ladder is possible: the
/// provision is not the first of its kind, or an omissis precedes it.
pub(super) fn can_demote(tree: &ProvisionTree, id: NodeId) -> bool {
    !hierarchy::is_first_of_kind(tree, id)
        || hierarchy::previous_sibling(tree, id)
            .and_then(|sibling| tree.kind(sibling))
            == Some(ProvisionKind::Omissis)
}

/// Check whether a conversion one step up the ladder is possible.
pub(super) fn can_promote(tree: &ProvisionTree, id: NodeId) -> bool {
    hierarchy::is_sole_of_kind(tree, id) || hierarchy::is_last_of_kind(tree, id)
}

/// Deduplicate, drop internal actions and sort by description.
pub(super) fn finish(actions: Vec<Action>) -> Vec<Action> {
    let mut unique: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        if !action.is_internal() && !unique.contains(&action) {
            unique.push(action);
        }
    }
    unique.sort_by_cached_key(|action| action.description().to_lowercase());
    unique
}

/// Select a transformation out of the catalog computed by `catalog`.
pub(super) fn select_transform(
    tree: &ProvisionTree,
    id: NodeId,
    to: ProvisionSlot,
    catalog: fn(&ProvisionTree, NodeId) -> Vec<Action>,
) -> Option<Action> {
    let wanted = Action::transform(tree, id, to)?;
    catalog(tree, id).into_iter().find(|&action| action == wanted)
}
