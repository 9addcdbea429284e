//! Action catalog.
//!
//! Each provision kind has its own [`RuleSet`]: a table of plain functions
//! deciding which actions the provision offers and which conversion the
//! indent/outdent keys map to. Rules are evaluated per kind rather than
//! shared, because eligibility differs materially from one kind to the next.

mod action;
mod article;
mod common;
mod item;
mod paragraph;
mod structural;
mod sub_item;
mod sub_sub_item;

pub use action::{Action, ProvisionSlot};
pub use common::can_convert_to_omissis;

use crate::model::{NodeId, ProvisionKind, ProvisionTree};

/// Catalog entry points for one provision kind.
#[derive(Clone, Copy)]
pub struct RuleSet {
    /// Deduplicated actions, sorted by description, never internal ones.
    pub possible_actions: fn(&ProvisionTree, NodeId) -> Vec<Action>,
    /// Conversion selected by the indent key.
    pub tab_action: fn(&ProvisionTree, NodeId) -> Option<Action>,
    /// Conversion selected by the outdent key.
    pub shift_tab_action: fn(&ProvisionTree, NodeId) -> Option<Action>,
}

const NO_RULES: RuleSet = RuleSet {
    possible_actions: no_actions,
    tab_action: no_conversion,
    shift_tab_action: no_conversion,
};

fn no_actions(_: &ProvisionTree, _: NodeId) -> Vec<Action> {
    Vec::new()
}

fn no_conversion(_: &ProvisionTree, _: NodeId) -> Option<Action> {
    None
}

/// Rule set for a provision kind.
pub fn rule_set(kind: ProvisionKind) -> RuleSet {
    use ProvisionKind::*;

    match kind {
        Article => article::RULES,
        Paragraph => paragraph::RULES,
        Item => item::RULES,
        SubItem => sub_item::RULES,
        SubSubItem => sub_sub_item::RULES,
        Book | Title | Chapter | Section | Subsection | Omissis | Generic => structural::RULES,
        Articulation | Caput => NO_RULES,
    }
}

/// Actions offered for a provision (empty for unknown ids).
pub fn possible_actions(tree: &ProvisionTree, id: NodeId) -> Vec<Action> {
    tree.kind(id)
        .map(|kind| (rule_set(kind).possible_actions)(tree, id))
        .unwrap_or_default()
}

pub fn tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    tree.kind(id)
        .and_then(|kind| (rule_set(kind).tab_action)(tree, id))
}

pub fn shift_tab_action(tree: &ProvisionTree, id: NodeId) -> Option<Action> {
    tree.kind(id)
        .and_then(|kind| (rule_set(kind).shift_tab_action)(tree, id))
}

/// Check whether the catalog offers `action` for a provision.
pub fn is_available(tree: &ProvisionTree, id: NodeId, action: Action) -> bool {
    possible_actions(tree, id).contains(&action)
}
