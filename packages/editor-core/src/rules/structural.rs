//! Agglomerators, omissis and generic provisions can only be moved or
//! removed; inside an amendment block omissis and generic provisions may
//! also close the block.

use crate::hierarchy;
use crate::model::{NodeId, ProvisionTree};

use super::action::Action;
use super::common;
use super::RuleSet;

pub(super) const RULES: RuleSet = RuleSet {
    possible_actions,
    tab_action: no_conversion,
    shift_tab_action: no_conversion,
};

fn possible_actions(tree: &ProvisionTree, id: NodeId) -> Vec<Action> {
    let Some(kind) = tree.kind(id) else {
        return Vec::new();
    };

    if !kind.is_agglomerator() {
        return common::finish(common::shared_actions(tree, id));
    }

    let mut actions = Vec::new();
    if hierarchy::next_same_kind(tree, id, true).is_some() {
        actions.push(Action::MoveDown);
    }
    if hierarchy::previous_same_kind(tree, id, true).is_some() {
        actions.push(Action::MoveUp);
    }
    if hierarchy::can_dissolve(tree, id) {
        actions.push(Action::Remove);
    }
    common::finish(actions)
}

fn no_conversion(_: &ProvisionTree, _: NodeId) -> Option<Action> {
    None
}
