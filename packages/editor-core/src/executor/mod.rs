//! Tree surgery behind each action.
//!
//! Executors assume the caller has already checked the action against the
//! catalog. They mutate the tree in place and always finish with a full
//! renumbering pass; validation and event emission are left to the reducer.

mod amendment;
mod insert;
mod remove;
mod reorder;
mod transform;

use crate::config::{validate_norm_urn, validate_provision_number};
use crate::content::normalize_if_omissis;
use crate::error::{EditorError, Result};
use crate::hierarchy;
use crate::model::{renumber_all, AmendmentMetadata, NodeId, ProvisionFactory, ProvisionTree};
use crate::rules::Action;

/// What an executor did besides the structural changes visible in the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Provision that should receive the caret.
    pub focus: Option<NodeId>,
    /// Provisions that kept their id but changed place.
    pub moved: Vec<NodeId>,
}

impl Outcome {
    fn focus(id: NodeId) -> Self {
        Self {
            focus: Some(id),
            moved: Vec::new(),
        }
    }
}

/// Run the executor for `action` on provision `id`.
pub fn execute(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    action: Action,
    id: NodeId,
) -> Result<Outcome> {
    tree.get(id)?;
    tracing::debug!(node = %id, action = %action.name(), "Executing action");

    let outcome = match action {
        Action::MoveUp => reorder::move_up(tree, id)?,
        Action::MoveDown => reorder::move_down(tree, id)?,
        Action::Remove => remove::remove(tree, id)?,
        Action::AddArticle
        | Action::AddParagraph
        | Action::AddItem
        | Action::AddSubItem
        | Action::AddSubSubItem => insert::add_kind(tree, factory, id, action)?,
        Action::Add => insert::add(tree, factory, id)?,
        Action::Transform { from, to } => transform::transform(tree, factory, id, from, to)?,
        Action::AttachAmendment => amendment::attach(tree, factory, id)?,
        Action::StartAmendmentBlock => amendment::start_block(tree, factory, id)?,
        Action::EndAmendmentBlock => amendment::end_block(tree, id)?,
        Action::Renumber | Action::Update | Action::SetNorm => {
            return Err(EditorError::ActionRequiresInput(action));
        }
    };

    renumber_all(tree);
    Ok(outcome)
}

/// Set the authored number of an amendment provision; `0` makes it the
/// sole provision of its kind.
pub fn renumber(tree: &mut ProvisionTree, id: NodeId, number: u32) -> Result<Outcome> {
    validate_provision_number(number)?;
    tree.get_mut(id)?.number = (number > 0).then_some(number);
    renumber_all(tree);
    Ok(Outcome::focus(id))
}

/// Replace the text of a provision. Inside amendment blocks omissis and
/// placeholder lines are normalized.
pub fn update_text(tree: &mut ProvisionTree, id: NodeId, content: &str) -> Result<Outcome> {
    let content = if hierarchy::is_amendment_provision(tree, id) {
        normalize_if_omissis(content)
    } else {
        content.to_string()
    };
    tree.get_mut(id)?.text = content;
    Ok(Outcome::focus(id))
}

/// Record the amended norm on the head of the block containing `id`.
pub fn set_norm(tree: &mut ProvisionTree, id: NodeId, urn: &str) -> Result<Outcome> {
    validate_norm_urn(urn)?;
    let head = hierarchy::amendment_block_head(tree, id).ok_or(EditorError::ActionNotAvailable {
        action: Action::SetNorm,
        node: id,
    })?;
    let head_node = tree.get_mut(head)?;
    head_node
        .amendment
        .get_or_insert_with(AmendmentMetadata::default)
        .norm = Some(urn.to_string());
    Ok(Outcome::focus(head))
}

/// Give a freshly created provision what its place demands: block heads get
/// amendment metadata and amendment provisions a provisional number.
fn settle(tree: &mut ProvisionTree, id: NodeId) -> Result<()> {
    let Some(parent) = tree.parent(id) else {
        return Ok(());
    };

    if hierarchy::amendment_container(tree, id) == Some(parent) && tree.get(id)?.amendment.is_none() {
        let norm = tree
            .children(parent)
            .iter()
            .take_while(|&&head| head != id)
            .filter_map(|&head| tree.node(head)?.amendment.as_ref()?.norm.clone())
            .last();
        tree.get_mut(id)?.amendment = Some(AmendmentMetadata {
            norm,
            closed: false,
        });
    }

    if hierarchy::is_amendment_provision(tree, id) {
        assign_provisional_number(tree, id)?;
    }
    Ok(())
}

/// Number a new amendment provision after its previous same-kind sibling.
fn assign_provisional_number(tree: &mut ProvisionTree, id: NodeId) -> Result<()> {
    let kind = tree.get(id)?.kind;
    if !kind.is_numbered() || tree.get(id)?.number.is_some() {
        return Ok(());
    }
    if hierarchy::is_sole_of_kind(tree, id) && kind.spec().has_sole_form {
        return Ok(());
    }

    let number = match hierarchy::previous_same_kind(tree, id, false) {
        Some(previous) => {
            let previous_number = match tree.get(previous)?.number {
                Some(number) => number,
                None => {
                    tree.get_mut(previous)?.number = Some(1);
                    1
                }
            };
            previous_number + 1
        }
        None => 1,
    };
    tree.get_mut(id)?.number = Some(number);
    Ok(())
}
