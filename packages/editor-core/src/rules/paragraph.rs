//! Actions offered on paragraphs (parágrafos).

use crate::content::indicators::{has_continuation_indicator, has_expansion_indicator};
use crate::hierarchy;
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
    let kind = ProvisionKind::Paragraph;
    let blank = common::is_blank(&node.text);
    let mut actions = common::shared_actions(tree, id);

    if blank || has_continuation_indicator(kind, &node.text) {
        actions.push(Action::AddParagraph);
    }
    if blank || has_expansion_indicator(kind, &node.text) {
        actions.push(Action::AddItem);
    }

    let in_article = tree.parent(id).and_then(|parent| tree.kind(parent)) == Some(ProvisionKind::Article);
    if in_article {
        let first = hierarchy::is_first_of_kind(tree, id);
        let fits_as_item = children_fit(tree, id, ProvisionKind::Item);

        if first && fits_as_item {
            actions.push(transform(ProvisionSlot::CaputItem));
        }
        if !first && fits_as_item {
            actions.push(transform(ProvisionSlot::ParagraphItem));
        }
        if common::can_promote(tree, id) {
            actions.push(transform(ProvisionSlot::Article));
        }
    }

    common::finish(actions)
}

fn transform(to: ProvisionSlot) -> Action {
    Action::Transform {
        from: ProvisionSlot::Paragraph,
        to,
    }
}

/// Indenting a paragraph makes it an item of the previous paragraph, or of
/// the caput when it is the first one.
fn tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    let to = if hierarchy::is_sole_of_kind(tree, id) || hierarchy::is_first_of_kind(tree, id) {
        ProvisionSlot::CaputItem
    } else {
        ProvisionSlot::ParagraphItem
    };
    common::select_transform(tree, id, to, possible_actions)
}

fn shift_tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    common::select_transform(tree, id, ProvisionSlot::Article, possible_actions)
}
