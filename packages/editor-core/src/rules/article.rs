//! Actions offered on articles.

use crate::content::indicators::{
    has_continuation_indicator, has_expansion_indicator, introduces_amendment,
};
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
    let kind = ProvisionKind::Article;
    let blank = common::is_blank(&node.text);
    let mut actions = common::shared_actions(tree, id);

    if blank || has_continuation_indicator(kind, &node.text) {
        actions.push(Action::AddArticle);
        actions.push(Action::AddParagraph);
    }
    if blank || has_expansion_indicator(kind, &node.text) {
        actions.push(Action::AddItem);
    }

    let container = hierarchy::owned_container(tree, id);
    if hierarchy::previous_same_kind(tree, id, false).is_some()
        && container.is_none()
        && children_fit(tree, id, ProvisionKind::Paragraph)
    {
        actions.push(Action::Transform {
            from: ProvisionSlot::Article,
            to: ProvisionSlot::Paragraph,
        });
    }

    if can_attach_amendment(tree, id, &node.text, container.is_some()) {
        actions.push(Action::AttachAmendment);
    }

    common::finish(actions)
}

fn can_attach_amendment(tree: &ProvisionTree, id: NodeId, content: &str, has_container: bool) -> bool {
    !has_container
        && !hierarchy::is_amendment_provision(tree, id)
        && !hierarchy::has_enumeration_children(tree, id)
        && (common::is_blank(content)
            || has_expansion_indicator(ProvisionKind::Article, content)
            || introduces_amendment(content))
}

fn tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    common::select_transform(tree, id, ProvisionSlot::Paragraph, possible_actions)
}

fn shift_tab_action(_: &ProvisionTree, _: NodeId) -> Option<Action> {
    None
}
