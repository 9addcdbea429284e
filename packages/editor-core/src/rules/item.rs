//! Actions offered on items (incisos), under a caput or a paragraph.

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
    let kind = ProvisionKind::Item;
    let blank = common::is_blank(&node.text);
    let mut actions = common::shared_actions(tree, id);

    if blank || has_continuation_indicator(kind, &node.text) {
        actions.push(Action::AddItem);
    }
    if blank || has_expansion_indicator(kind, &node.text) {
        actions.push(Action::AddSubItem);
    }

    let scoped = matches!(
        tree.parent(id).and_then(|parent| tree.kind(parent)),
        Some(ProvisionKind::Caput | ProvisionKind::Paragraph)
    );
    if scoped {
        if common::can_promote(tree, id) {
            actions.extend(Action::transform(tree, id, ProvisionSlot::Paragraph));
        }
        if common::can_demote(tree, id) && children_fit(tree, id, ProvisionKind::SubItem) {
            actions.extend(Action::transform(tree, id, ProvisionSlot::SubItem));
        }
    }

    common::finish(actions)
}

fn tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    common::select_transform(tree, id, ProvisionSlot::SubItem, possible_actions)
}

/// The last item of a caput or paragraph outdents into a paragraph.
fn shift_tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    if !common::can_promote(tree, id) {
        return None;
    }
    common::select_transform(tree, id, ProvisionSlot::Paragraph, possible_actions)
}
