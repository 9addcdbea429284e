//! Outline ingestion format.
//!
//! An outline is the hand-off shape between an external parser (or a test
//! fixture) and the core: a nested list of provisions, with amendment blocks
//! listed under the article that introduces them.
//!
//! ```yaml
//! provisions:
//!   - kind: article
//!     text: "A Lei nº 8.112 passa a vigorar com a seguinte alteração:"
//!     amendment:
//!       - kind: article
//!         number: 5
//!         norm: "urn:lex:br:federal:lei:1990-12-11;8112"
//!         text: "Texto novo.” (NR)"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{validate_norm_urn, validate_provision_number, MAX_DOCUMENT_SIZE, MAX_OUTLINE_DEPTH};
use crate::error::{EditorError, Result};

use super::factory::ProvisionFactory;
use super::kind::ProvisionKind;
use super::numbering::renumber_all;
use super::provision::{AmendmentMetadata, NodeId, Situation};
use super::tree::ProvisionTree;

/// A whole document outline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub provisions: Vec<OutlineNode>,
}

/// One provision of an outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub kind: ProvisionKind,
    #[serde(default)]
    pub text: String,
    /// Only honoured inside amendment blocks; elsewhere numbers are computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default)]
    pub situation: Situation,
    /// Amended norm; only meaningful on an amendment block head.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norm: Option<String>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
    /// Amendment block heads introduced by this article.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amendment: Vec<OutlineNode>,
}

/// Parse an outline from YAML (JSON is accepted as well).
pub fn parse_outline(content: &str) -> Result<Outline> {
    if content.len() > MAX_DOCUMENT_SIZE {
        return Err(EditorError::DocumentTooLarge {
            size: content.len(),
            max: MAX_DOCUMENT_SIZE,
        });
    }
    Ok(serde_yaml_ng::from_str(content)?)
}

/// Parse an outline and build its tree.
pub fn load_outline_str(content: &str, factory: &impl ProvisionFactory) -> Result<ProvisionTree> {
    build_tree(&parse_outline(content)?, factory)
}

/// Read an outline file and build its tree.
pub fn load_outline_file(path: &Path, factory: &impl ProvisionFactory) -> Result<ProvisionTree> {
    let size = fs::metadata(path)?.len() as usize;
    if size > MAX_DOCUMENT_SIZE {
        return Err(EditorError::DocumentTooLarge {
            size,
            max: MAX_DOCUMENT_SIZE,
        });
    }
    let content = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), size, "Loading outline");
    load_outline_str(&content, factory)
}

/// Build a fully linked, numbered tree from an outline.
pub fn build_tree(outline: &Outline, factory: &impl ProvisionFactory) -> Result<ProvisionTree> {
    let mut tree = ProvisionTree::new();
    let root = tree.root();
    let mut builder = Builder {
        tree: &mut tree,
        factory,
    };
    for node in &outline.provisions {
        builder.add(root, node, 1, false)?;
    }
    renumber_all(&mut tree);
    Ok(tree)
}

struct Builder<'a, F> {
    tree: &'a mut ProvisionTree,
    factory: &'a F,
}

impl<F: ProvisionFactory> Builder<'_, F> {
    fn add(&mut self, parent: NodeId, node: &OutlineNode, depth: usize, in_amendment: bool) -> Result<NodeId> {
        if depth > MAX_OUTLINE_DEPTH {
            return Err(EditorError::InvalidDocument(format!(
                "outline nesting exceeds {MAX_OUTLINE_DEPTH} levels"
            )));
        }
        if node.kind == ProvisionKind::Caput {
            return Err(EditorError::InvalidDocument(
                "caput is implied by its article and cannot be listed".to_string(),
            ));
        }

        let id = self.factory.create(self.tree, parent, node.kind, None, None)?;
        {
            let provision = self.tree.get_mut(id)?;
            if !node.text.is_empty() {
                provision.text = node.text.clone();
            }
            provision.situation = node.situation;
            if in_amendment {
                if let Some(number) = node.number {
                    validate_provision_number(number)?;
                }
                provision.number = node.number;
            }
        }

        let caput = self.tree.child_of_kind(id, ProvisionKind::Caput);
        for child in &node.children {
            let target = match caput {
                Some(caput) if child.kind != ProvisionKind::Paragraph => caput,
                _ => id,
            };
            self.add(target, child, depth + 1, in_amendment)?;
        }

        if !node.amendment.is_empty() {
            if node.kind != ProvisionKind::Article || in_amendment {
                return Err(EditorError::InvalidDocument(format!(
                    "only articles outside amendment blocks can introduce amendments (found {})",
                    node.kind
                )));
            }
            let container = self
                .factory
                .create(self.tree, id, ProvisionKind::Articulation, None, None)?;
            for head in &node.amendment {
                let head_id = self.add(container, head, depth + 1, true)?;
                if let Some(norm) = &head.norm {
                    validate_norm_urn(norm)?;
                }
                self.tree.get_mut(head_id)?.amendment = Some(AmendmentMetadata {
                    norm: head.norm.clone(),
                    closed: head.closed,
                });
            }
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::factory::DefaultFactory;
    use pretty_assertions::assert_eq;

    const SIMPLE: &str = r#"
provisions:
  - kind: article
    text: "Fica instituído o programa:"
    children:
      - kind: item
        text: "primeiro;"
      - kind: item
        text: "segundo."
      - kind: paragraph
        text: "O programa será permanente."
  - kind: article
    text: "A Lei nº 8.112 passa a vigorar com a seguinte alteração:"
    amendment:
      - kind: article
        number: 5
        norm: "urn:lex:br:federal:lei:1990-12-11;8112"
        text: "Texto novo.” (NR)"
"#;

    #[test]
    fn test_build_routes_items_to_caput() {
        let tree = load_outline_str(SIMPLE, &DefaultFactory).unwrap();
        let root = tree.root();
        let first = tree.children(root)[0];
        let caput = tree.child_of_kind(first, ProvisionKind::Caput).unwrap();
        assert_eq!(tree.children(caput).len(), 2);
        assert_eq!(tree.children(first).len(), 2);
        assert_eq!(tree.get(first).unwrap().label, "Art. 1º");
    }

    #[test]
    fn test_build_amendment_block() {
        let tree = load_outline_str(SIMPLE, &DefaultFactory).unwrap();
        let second = tree.children(tree.root())[1];
        let container = tree
            .child_of_kind(second, ProvisionKind::Articulation)
            .unwrap();
        let head = tree.children(container)[0];
        let node = tree.get(head).unwrap();
        assert_eq!(node.number, Some(5));
        assert_eq!(node.label, "Art. 5º");
        assert_eq!(
            node.amendment.as_ref().and_then(|m| m.norm.as_deref()),
            Some("urn:lex:br:federal:lei:1990-12-11;8112")
        );
    }

    #[test]
    fn test_rejects_oversized_amendment_number() {
        let yaml = r#"
provisions:
  - kind: article
    text: "Altera:"
    amendment:
      - kind: article
        number: 4294967295
        text: "Texto.” (NR)"
"#;
        let err = load_outline_str(yaml, &DefaultFactory).unwrap_err();
        assert!(matches!(err, EditorError::NumberOutOfRange { number: 4294967295, .. }));
    }

    #[test]
    fn test_rejects_invalid_norm() {
        let yaml = r#"
provisions:
  - kind: article
    text: "Altera:"
    amendment:
      - kind: article
        norm: "lei 8112"
        text: "Texto.” (NR)"
"#;
        let err = load_outline_str(yaml, &DefaultFactory).unwrap_err();
        assert!(matches!(err, EditorError::InvalidNormUrn(_)));
    }

    #[test]
    fn test_rejects_invalid_containment() {
        let yaml = r#"
provisions:
  - kind: item
    text: "inciso"
    children:
      - kind: paragraph
        text: "Parágrafo."
"#;
        let err = load_outline_str(yaml, &DefaultFactory).unwrap_err();
        assert!(matches!(err, EditorError::InvalidContainment { .. }));
    }

    #[test]
    fn test_rejects_oversized_document() {
        let content = "#".repeat(MAX_DOCUMENT_SIZE + 1);
        let err = parse_outline(&content).unwrap_err();
        assert!(matches!(err, EditorError::DocumentTooLarge { .. }));
    }

    #[test]
    fn test_accepts_json() {
        let json = r#"{"provisions": [{"kind": "article", "text": "Texto."}]}"#;
        let tree = load_outline_str(json, &DefaultFactory).unwrap();
        assert_eq!(tree.reading_order().len(), 2);
    }
}
