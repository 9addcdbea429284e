//! Read-model projection handed to the rendering surface.
//!
//! An [`Element`] is a flat, serializable copy of one provision. The
//! articulation root, amendment containers and caputs are never projected;
//! the caput's items appear directly below their article.

use serde::Serialize;

use crate::hierarchy;
use crate::model::{Diagnostic, NodeId, ProvisionKind, ProvisionTree, Situation};

/// Flattened view of one provision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub id: NodeId,
    pub kind: ProvisionKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub text: String,
    pub editable: bool,
    /// Number of projected ancestors.
    pub depth: usize,
    pub agglomerator: bool,
    /// Whether the provision sits inside an amendment block.
    pub amendment: bool,
    /// Amended norm, on block heads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norm: Option<String>,
    pub situation: Situation,
    /// Nearest projected ancestor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Element {
    /// Project a provision; `None` for unknown ids and structural-only nodes.
    pub fn project(tree: &ProvisionTree, id: NodeId) -> Option<Self> {
        if !hierarchy::is_projected(tree, id) {
            return None;
        }
        let node = tree.node(id)?;
        let mut projected_ancestors = tree
            .ancestors(id)
            .filter(|&ancestor| hierarchy::is_projected(tree, ancestor));
        let parent = projected_ancestors.next();
        let depth = parent.map_or(0, |_| 1 + projected_ancestors.count());

        Some(Self {
            id,
            kind: node.kind,
            label: node.label.clone(),
            number: node.number,
            text: node.text.clone(),
            editable: !node.is_suppressed() && node.kind != ProvisionKind::Omissis,
            depth,
            agglomerator: node.kind.is_agglomerator(),
            amendment: hierarchy::is_amendment_provision(tree, id),
            norm: node.amendment.as_ref().and_then(|meta| meta.norm.clone()),
            situation: node.situation,
            parent,
            diagnostics: node.diagnostics.clone(),
        })
    }
}

/// Project every provision of the tree in reading order.
pub fn project_all(tree: &ProvisionTree) -> Vec<Element> {
    project_ids(tree, &tree.reading_order())
}

/// Project the given provisions, skipping the ones that are not projected.
pub fn project_ids(tree: &ProvisionTree, ids: &[NodeId]) -> Vec<Element> {
    ids.iter()
        .filter_map(|&id| Element::project(tree, id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{load_outline_str, DefaultFactory};
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"
provisions:
  - kind: chapter
    text: "Disposições Gerais"
    children:
      - kind: article
        text: "O programa compreende:"
        children:
          - kind: item
            text: "ações."
        amendment:
          - kind: article
            number: 2
            norm: "urn:lex:br:federal:lei:2000-01-01;1"
            text: "Novo texto.” (NR)"
"#;

    #[test]
    fn test_caput_and_containers_are_hidden() {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let elements = project_all(&tree);
        let kinds: Vec<_> = elements.iter().map(|element| element.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProvisionKind::Chapter,
                ProvisionKind::Article,
                ProvisionKind::Item,
                ProvisionKind::Article
            ]
        );
    }

    #[test]
    fn test_depth_and_parent_skip_caput() {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let elements = project_all(&tree);
        let (chapter, article, item, amended) = (&elements[0], &elements[1], &elements[2], &elements[3]);

        assert_eq!(chapter.depth, 0);
        assert!(chapter.agglomerator);
        assert_eq!(article.depth, 1);
        assert_eq!(item.parent, Some(article.id));
        assert_eq!(item.depth, 2);
        assert_eq!(amended.parent, Some(article.id));
        assert!(amended.amendment);
        assert_eq!(amended.norm.as_deref(), Some("urn:lex:br:federal:lei:2000-01-01;1"));
        assert_eq!(amended.label, "Art. 2º");
    }

    #[test]
    fn test_serializes_without_empty_options() {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let chapter = Element::project(&tree, tree.children(tree.root())[0]).unwrap();
        let json = serde_json::to_value(&chapter).unwrap();
        assert_eq!(json["kind"], "chapter");
        assert_eq!(json["label"], "CAPÍTULO ÚNICO");
        assert!(json.get("norm").is_none());
        assert!(json.get("parent").is_none());
    }
}
