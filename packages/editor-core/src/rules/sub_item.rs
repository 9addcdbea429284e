//! Actions offered on sub-items (alíneas).

use crate::content::indicators::{has_continuation_indicator, has_expansion_indicator};
use crate::model::factory::children_fit;
use crate::model::{NodeId, ProvisionKind, ProvisionTree};

use super::action::{Action, ProvisionSlot};
use super::common;
use super::RuleSet;

pub(super) const RULES: RuleSet = RuleSet {
    possible_actions,
    tab_action,
    shift_tab_action,
};

fn possible_actions(tree: &ProvisionTree, id: NodeId) -> Vec<Action> {
    let Some(node) = tree.node(id) else {
        return Vec::new();
    };
    let kind = ProvisionKind::SubItem;
    let blank = common::is_blank(&node.text);
    let mut actions = common::shared_actions(tree, id);

    if blank || has_continuation_indicator(kind, &node.text) {
        actions.push(Action::AddSubItem);
    }
    if blank || has_expansion_indicator(kind, &node.text) {
        actions.push(Action::AddSubSubItem);
    }

    let under_item = tree.parent(id).and_then(|parent| tree.kind(parent)) == Some(ProvisionKind::Item);
    if under_item {
        if common::can_promote(tree, id) {
            actions.push(Action::Transform {
                from: ProvisionSlot::SubItem,
                to: Action::item_scope_of_grandparent(tree, id),
            });
        }
        if common::can_demote(tree, id) && children_fit(tree, id, ProvisionKind::SubSubItem) {
            actions.push(Action::Transform {
                from: ProvisionSlot::SubItem,
                to: ProvisionSlot::SubSubItem,
            });
        }
    }

    common::finish(actions)
}

fn tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    common::select_transform(tree, id, ProvisionSlot::SubSubItem, possible_actions)
}

/// A sole or last sub-item outdents into an item of the same scope as its
/// parent item: paragraph-scoped below a paragraph, caput-scoped otherwise.
fn shift_tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    if !common::can_promote(tree, id) {
        return None;
    }
    let to = Action::item_scope_of_grandparent(tree, id);
    common::select_transform(tree, id, to, possible_actions)
}
