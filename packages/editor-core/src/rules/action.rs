//! Actions a provision can be subjected to.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hierarchy;
use crate::model::{NodeId, ProvisionKind, ProvisionTree};

/// Position of a provision in the article ladder, used as the source and
/// destination of transformations.
///
/// Items are split by scope: an item of the caput and an item of a
/// paragraph convert differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionSlot {
    Article,
    Paragraph,
    CaputItem,
    ParagraphItem,
    SubItem,
    SubSubItem,
    Omissis,
}

impl ProvisionSlot {
    /// Slot currently occupied by a provision, if it has one.
    pub fn of(tree: &ProvisionTree, id: NodeId) -> Option<Self> {
        let slot = match tree.kind(id)? {
            ProvisionKind::Article => Self::Article,
            ProvisionKind::Paragraph => Self::Paragraph,
            ProvisionKind::Item => Self::item_under(tree, tree.parent(id)?),
            ProvisionKind::SubItem => Self::SubItem,
            ProvisionKind::SubSubItem => Self::SubSubItem,
            ProvisionKind::Omissis => Self::Omissis,
            _ => return None,
        };
        Some(slot)
    }

    /// Item slot for a new item placed under `parent`.
    pub fn item_under(tree: &ProvisionTree, parent: NodeId) -> Self {
        if tree.kind(parent) == Some(ProvisionKind::Paragraph) {
            Self::ParagraphItem
        } else {
            Self::CaputItem
        }
    }

    /// Kind of the provision that fills the slot.
    pub fn kind(self) -> ProvisionKind {
        match self {
            Self::Article => ProvisionKind::Article,
            Self::Paragraph => ProvisionKind::Paragraph,
            Self::CaputItem | Self::ParagraphItem => ProvisionKind::Item,
            Self::SubItem => ProvisionKind::SubItem,
            Self::SubSubItem => ProvisionKind::SubSubItem,
            Self::Omissis => ProvisionKind::Omissis,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Article => "Artigo",
            Self::Paragraph => "Parágrafo",
            Self::CaputItem => "Inciso de Caput",
            Self::ParagraphItem => "Inciso de Parágrafo",
            Self::SubItem => "Alínea",
            Self::SubSubItem => "Item",
            Self::Omissis => "Omissis",
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Paragraph => "paragraph",
            Self::CaputItem => "caput_item",
            Self::ParagraphItem => "paragraph_item",
            Self::SubItem => "sub_item",
            Self::SubSubItem => "sub_sub_item",
            Self::Omissis => "omissis",
        }
    }
}

impl fmt::Display for ProvisionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// An editing action.
///
/// `Add`, `Update` and `SetNorm` are programmatic operations; they are never
/// offered by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    MoveUp,
    MoveDown,
    Renumber,
    StartAmendmentBlock,
    EndAmendmentBlock,
    AttachAmendment,
    AddArticle,
    AddParagraph,
    AddItem,
    AddSubItem,
    AddSubSubItem,
    Transform {
        from: ProvisionSlot,
        to: ProvisionSlot,
    },
    Remove,
    Add,
    Update,
    SetNorm,
}

impl Action {
    /// Label shown in menus; also the sort key of the catalog.
    pub fn description(&self) -> String {
        let text = match self {
            Self::MoveUp => "Mover para cima",
            Self::MoveDown => "Mover para baixo",
            Self::Renumber => "Renumerar dispositivo",
            Self::StartAmendmentBlock => "Iniciar novo bloco de alteração",
            Self::EndAmendmentBlock => "Finalizar bloco de alteração",
            Self::AttachAmendment => "Adicionar bloco de alteração",
            Self::AddArticle => "Adicionar Artigo",
            Self::AddParagraph => "Adicionar Parágrafo",
            Self::AddItem => "Adicionar Inciso",
            Self::AddSubItem => "Adicionar Alínea",
            Self::AddSubSubItem => "Adicionar Item",
            Self::Transform {
                to: ProvisionSlot::Omissis,
                ..
            } => "Transformar em Omissis",
            Self::Transform { from, to } => {
                return format!("Transformar {from} em {to}");
            }
            Self::Remove => "Remover dispositivo",
            Self::Add => "Adicionar dispositivo",
            Self::Update => "Atualizar dispositivo",
            Self::SetNorm => "Informar norma alterada",
        };
        text.to_string()
    }

    /// Stable machine name, used in logs.
    pub fn name(&self) -> String {
        let name = match self {
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
            Self::Renumber => "renumber",
            Self::StartAmendmentBlock => "start_amendment_block",
            Self::EndAmendmentBlock => "end_amendment_block",
            Self::AttachAmendment => "attach_amendment",
            Self::AddArticle => "add_article",
            Self::AddParagraph => "add_paragraph",
            Self::AddItem => "add_item",
            Self::AddSubItem => "add_sub_item",
            Self::AddSubSubItem => "add_sub_sub_item",
            Self::Transform { from, to } => {
                return format!("transform_{}_to_{}", from.name(), to.name());
            }
            Self::Remove => "remove",
            Self::Add => "add",
            Self::Update => "update",
            Self::SetNorm => "set_norm",
        };
        name.to_string()
    }

    /// Actions reserved for programmatic use.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Add | Self::Update | Self::SetNorm)
    }

    /// Transformation of the provision `id` into `to`, when it has a slot.
    pub fn transform(tree: &ProvisionTree, id: NodeId, to: ProvisionSlot) -> Option<Self> {
        ProvisionSlot::of(tree, id).map(|from| Self::Transform { from, to })
    }

    /// Item slot matching the scope of `id`'s grandparent.
    pub fn item_scope_of_grandparent(tree: &ProvisionTree, id: NodeId) -> ProvisionSlot {
        match hierarchy::grandparent(tree, id) {
            Some(grandparent) => ProvisionSlot::item_under(tree, grandparent),
            None => ProvisionSlot::CaputItem,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_transform_description() {
        let action = Action::Transform {
            from: ProvisionSlot::SubItem,
            to: ProvisionSlot::ParagraphItem,
        };
        assert_eq!(action.to_string(), "Transformar Alínea em Inciso de Parágrafo");
        assert_eq!(action.name(), "transform_sub_item_to_paragraph_item");
    }

    #[test]
    fn test_omissis_description() {
        let action = Action::Transform {
            from: ProvisionSlot::Paragraph,
            to: ProvisionSlot::Omissis,
        };
        assert_eq!(action.description(), "Transformar em Omissis");
    }

    #[test]
    fn test_internal_actions() {
        assert!(Action::Add.is_internal());
        assert!(Action::Update.is_internal());
        assert!(Action::SetNorm.is_internal());
        assert!(!Action::Remove.is_internal());
    }

    #[test]
    fn test_serializes_with_tag() {
        let json = serde_json::to_string(&Action::Transform {
            from: ProvisionSlot::CaputItem,
            to: ProvisionSlot::SubItem,
        })
        .unwrap();
        assert_eq!(
            json,
            r#"{"action":"transform","from":"caput_item","to":"sub_item"}"#
        );
        assert_eq!(
            serde_json::to_string(&Action::MoveUp).unwrap(),
            r#"{"action":"move_up"}"#
        );
    }
}
