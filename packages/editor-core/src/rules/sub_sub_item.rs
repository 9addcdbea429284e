//! Actions offered on sub-sub-items (itens).

use crate::content::indicators::has_continuation_indicator;
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
    let mut actions = common::shared_actions(tree, id);

    if common::is_blank(&node.text) || has_continuation_indicator(ProvisionKind::SubSubItem, &node.text) {
        actions.push(Action::AddSubSubItem);
    }

    let under_sub_item = tree.parent(id).and_then(|parent| tree.kind(parent)) == Some(ProvisionKind::SubItem);
    if under_sub_item && common::can_promote(tree, id) {
        actions.push(Action::Transform {
            from: ProvisionSlot::SubSubItem,
            to: ProvisionSlot::SubItem,
        });
    }

    common::finish(actions)
}

/// Nothing lies below a sub-sub-item.
fn tab_action(_: &ProvisionTree, _: NodeId) -> Option<Action> {
    None
}

fn shift_tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    common::select_transform(tree, id, ProvisionSlot::SubItem, possible_actions)
}
