//! Amendment blocks: attaching a container, opening and closing blocks,
//! authored numbers and the amended norm.

use crate::config::DEFAULT_AMENDMENT_TEXT;
use crate::error::{EditorError, Result};
use crate::hierarchy;
use crate::model::{AmendmentMetadata, NodeId, ProvisionFactory, ProvisionKind, ProvisionTree};

use super::{settle, Outcome};

/// Open an amendment container under an article with one empty block.
pub(super) fn attach(tree: &mut ProvisionTree, factory: &impl ProvisionFactory, id: NodeId) -> Result<Outcome> {
    let container = factory.create(tree, id, ProvisionKind::Articulation, None, None)?;
    let head = factory.create(tree, container, ProvisionKind::Article, None, None)?;
    {
        let node = tree.get_mut(head)?;
        node.text = DEFAULT_AMENDMENT_TEXT.to_string();
        node.amendment = Some(AmendmentMetadata::default());
    }
    settle(tree, head)?;
    tracing::debug!(article = %id, head = %head, "Attached amendment block");
    Ok(Outcome::focus(head))
}

/// Close the block ending at `id` and open the next one after it, aimed
/// at the same norm.
pub(super) fn start_block(
    tree: &mut ProvisionTree,
    factory: &impl ProvisionFactory,
    id: NodeId,
) -> Result<Outcome> {
    let head = block_head(tree, id)?;
    let container = tree
        .parent(head)
        .ok_or_else(|| EditorError::InvalidDocument(format!("block head {head} is detached")))?;

    let metadata = tree
        .get_mut(head)?
        .amendment
        .get_or_insert_with(AmendmentMetadata::default);
    metadata.closed = true;
    let norm = metadata.norm.clone();

    let created = factory.create(tree, container, ProvisionKind::Article, Some(head), None)?;
    {
        let node = tree.get_mut(created)?;
        node.text = DEFAULT_AMENDMENT_TEXT.to_string();
        node.amendment = Some(AmendmentMetadata {
            norm,
            closed: false,
        });
    }
    settle(tree, created)?;
    tracing::debug!(previous = %head, head = %created, "Started amendment block");
    Ok(Outcome::focus(created))
}

/// Close the block ending at `id`; the blocks after it leave the amendment
/// and become ordinary articles right after the host article.
pub(super) fn end_block(tree: &mut ProvisionTree, id: NodeId) -> Result<Outcome> {
    let head = block_head(tree, id)?;
    let later = hierarchy::subsequent_amendment_blocks(tree, id);
    if later
        .iter()
        .any(|&block| tree.kind(block) != Some(ProvisionKind::Article))
    {
        return Err(EditorError::InvalidDocument(format!(
            "blocks after {head} are not all articles"
        )));
    }

    let container = tree
        .parent(head)
        .ok_or_else(|| EditorError::InvalidDocument(format!("block head {head} is detached")))?;
    let host = tree
        .parent(container)
        .ok_or_else(|| EditorError::InvalidDocument(format!("container {container} is detached")))?;
    let host_parent = tree
        .parent(host)
        .ok_or_else(|| EditorError::InvalidDocument(format!("article {host} is detached")))?;

    if let Some(metadata) = tree.get_mut(head)?.amendment.as_mut() {
        metadata.closed = true;
    }

    let position = tree.position(host).unwrap_or_default() + 1;
    for (offset, &block) in later.iter().enumerate() {
        tree.move_to(block, host_parent, position + offset)?;
        let node = tree.get_mut(block)?;
        node.amendment = None;
        node.number = None;
    }

    tracing::debug!(head = %head, released = later.len(), "Ended amendment block");
    Ok(Outcome {
        focus: later.first().copied().or(Some(id)),
        moved: later,
    })
}

fn block_head(tree: &ProvisionTree, id: NodeId) -> Result<NodeId> {
    hierarchy::amendment_block_head(tree, id)
        .ok_or_else(|| EditorError::InvalidDocument(format!("provision {id} is not in an amendment block")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{load_outline_str, renumber_all, DefaultFactory};
    use pretty_assertions::assert_eq;

    const NORM: &str = "urn:lex:br:federal:lei:1990-12-11;8112";

    const DOCUMENT: &str = r#"
provisions:
  - kind: article
    text: "A Lei nº 8.112 passa a vigorar com as seguintes alterações:"
    amendment:
      - kind: article
        number: 5
        norm: "urn:lex:br:federal:lei:1990-12-11;8112"
        text: "Texto do art. 5º."
      - kind: article
        number: 9
        norm: "urn:lex:br:federal:lei:1990-12-11;8112"
        text: "Texto do art. 9º.” (NR)"
  - kind: article
    text: "Esta Lei entra em vigor na data de sua publicação."
"#;

    fn heads(tree: &ProvisionTree) -> Vec<NodeId> {
        let host = tree.children(tree.root())[0];
        let container = hierarchy::owned_container(tree, host).unwrap();
        tree.children(container).to_vec()
    }

    #[test]
    fn test_start_block_inherits_norm() {
        let mut tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let first = heads(&tree)[0];
        let outcome = start_block(&mut tree, &DefaultFactory, first).unwrap();
        let created = outcome.focus.unwrap();

        assert_eq!(heads(&tree)[1], created);
        let node = tree.get(created).unwrap();
        assert_eq!(node.text, DEFAULT_AMENDMENT_TEXT);
        assert_eq!(node.number, Some(6));
        assert_eq!(
            node.amendment.as_ref().and_then(|m| m.norm.as_deref()),
            Some(NORM)
        );
        assert!(tree.get(first).unwrap().amendment.as_ref().unwrap().closed);
    }

    #[test]
    fn test_end_block_releases_later_articles() {
        let mut tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let before = heads(&tree);
        let (first, second) = (before[0], before[1]);
        let outcome = end_block(&mut tree, first).unwrap();
        renumber_all(&mut tree);

        assert_eq!(outcome.moved, vec![second]);
        assert_eq!(heads(&tree), vec![first]);
        assert_eq!(tree.parent(second), Some(tree.root()));
        assert_eq!(tree.position(second), Some(1));
        let node = tree.get(second).unwrap();
        assert!(node.amendment.is_none());
        assert_eq!(node.label, "Art. 2º");
    }

    #[test]
    fn test_attach_creates_container_last() {
        let mut tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let article = tree.children(tree.root())[1];
        let outcome = attach(&mut tree, &DefaultFactory, article).unwrap();
        let head = outcome.focus.unwrap();
        let container = tree.parent(head).unwrap();
        assert_eq!(tree.children(article).last(), Some(&container));
        assert_eq!(tree.get(head).unwrap().number, None);
        assert!(hierarchy::is_amendment_provision(&tree, head));
    }
}
