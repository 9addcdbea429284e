//! Quoted citation of a provision, as used in amendment commands.

use crate::config::OMISSIS_TEXT;
use crate::error::Result;
use crate::hierarchy;
use crate::model::{NodeId, ProvisionKind, ProvisionTree};
use crate::text;

/// Render `“<label> <text>”` for a provision.
///
/// When the provision keeps content below it that is not being cited, an
/// omissis line closes the citation instead.
pub fn citation_text(tree: &ProvisionTree, id: NodeId) -> Result<String> {
    let owner = hierarchy::visible_owner(tree, id);
    let node = tree.get(owner)?;

    let body = text::strip_tags(&node.text);
    let mut citation = if node.label.is_empty() {
        format!("“{}", body.trim())
    } else {
        format!("“{} {}", node.label, body.trim())
    };

    if needs_omissis(tree, owner) {
        citation.push('\n');
        citation.push_str(OMISSIS_TEXT);
    }
    citation.push('”');
    Ok(citation)
}

fn needs_omissis(tree: &ProvisionTree, id: NodeId) -> bool {
    !hierarchy::is_amendment_provision(tree, id) && has_unsuppressed_content(tree, id)
}

/// Children that count for an article are its caput items and paragraphs.
fn has_unsuppressed_content(tree: &ProvisionTree, id: NodeId) -> bool {
    if tree.kind(id) != Some(ProvisionKind::Article) {
        return hierarchy::has_non_suppressed_child(tree, id);
    }
    tree.children(id).iter().any(|&child| match tree.kind(child) {
        Some(ProvisionKind::Caput) => hierarchy::has_non_suppressed_child(tree, child),
        Some(ProvisionKind::Articulation) | None => false,
        Some(_) => tree.node(child).is_some_and(|node| !node.is_suppressed()),
    })
}
