//! Read-only traversal helpers over the provision tree.
//!
//! Positional predicates ("first", "last", "sole", "penultimate") are
//! answered from the nearest same-kind neighbours. For articles the run
//! spans the whole articulation (or the whole amendment container) across
//! agglomerators; for every other kind it is the parent's children of the
//! same kind. No query walks the whole document.

use crate::model::{NodeId, ProvisionKind, ProvisionTree};

/// Same-kind run a provision belongs to, in reading order.
///
/// Proportional to the run length; the positional predicates below only
/// look at neighbours and never build the run.
pub fn same_kind_run(tree: &ProvisionTree, id: NodeId) -> Vec<NodeId> {
    if tree.kind(id).is_none() {
        return Vec::new();
    }
    let mut first = id;
    while let Some(previous) = previous_same_kind(tree, first, false) {
        first = previous;
    }
    let mut run = vec![first];
    while let Some(next) = run.last().and_then(|&last| next_same_kind(tree, last, false)) {
        run.push(next);
    }
    run
}

/// Previous provision of the same kind, optionally treating omissis as a
/// same-kind placeholder.
pub fn previous_same_kind(tree: &ProvisionTree, id: NodeId, include_omissis: bool) -> Option<NodeId> {
    neighbour(tree, id, false, include_omissis)
}

/// Next provision of the same kind, optionally treating omissis as a
/// same-kind placeholder.
pub fn next_same_kind(tree: &ProvisionTree, id: NodeId, include_omissis: bool) -> Option<NodeId> {
    neighbour(tree, id, true, include_omissis)
}

/// Immediately preceding sibling, whatever its kind.
pub fn previous_sibling(tree: &ProvisionTree, id: NodeId) -> Option<NodeId> {
    let parent = tree.parent(id)?;
    let position = tree.position(id)?;
    position
        .checked_sub(1)
        .and_then(|previous| tree.children(parent).get(previous).copied())
}

/// Immediately following sibling, whatever its kind.
pub fn next_sibling(tree: &ProvisionTree, id: NodeId) -> Option<NodeId> {
    let parent = tree.parent(id)?;
    let position = tree.position(id)?;
    tree.children(parent).get(position + 1).copied()
}

pub fn is_first_of_kind(tree: &ProvisionTree, id: NodeId) -> bool {
    tree.contains(id) && previous_same_kind(tree, id, false).is_none()
}

pub fn is_last_of_kind(tree: &ProvisionTree, id: NodeId) -> bool {
    tree.contains(id) && next_same_kind(tree, id, false).is_none()
}

pub fn is_sole_of_kind(tree: &ProvisionTree, id: NodeId) -> bool {
    is_first_of_kind(tree, id) && is_last_of_kind(tree, id)
}

pub fn is_penultimate_of_kind(tree: &ProvisionTree, id: NodeId) -> bool {
    next_same_kind(tree, id, false).is_some_and(|next| next_same_kind(tree, next, false).is_none())
}

/// Same-kind provisions whose first/last/sole/penultimate status can change
/// when `id` appears, disappears or moves: two before it and one after,
/// with and without omissis placeholders.
pub fn positional_neighbours(tree: &ProvisionTree, id: NodeId) -> Vec<NodeId> {
    let mut neighbours = Vec::new();
    for include_omissis in [false, true] {
        if let Some(previous) = previous_same_kind(tree, id, include_omissis) {
            neighbours.push(previous);
            neighbours.extend(previous_same_kind(tree, previous, include_omissis));
        }
        neighbours.extend(next_same_kind(tree, id, include_omissis));
    }
    neighbours
}

fn neighbour(tree: &ProvisionTree, id: NodeId, forward: bool, include_omissis: bool) -> Option<NodeId> {
    let kind = tree.kind(id)?;
    if kind == ProvisionKind::Article {
        return article_neighbour(tree, id, forward, include_omissis);
    }

    let parent = tree.parent(id)?;
    let position = tree.position(id)?;
    let siblings = tree.children(parent);
    let matches = |candidate: &&NodeId| match tree.kind(**candidate) {
        Some(other) if other == kind => true,
        Some(ProvisionKind::Omissis) => include_omissis,
        _ => false,
    };
    if forward {
        siblings[position + 1..].iter().find(matches).copied()
    } else {
        siblings[..position].iter().rev().find(matches).copied()
    }
}

/// Nearest article-level provision (an article, or an omissis standing
/// between articles) in one direction.
///
/// Articles are numbered across agglomerators, so the walk climbs out of
/// and dives into agglomerators but stops at the articulation or amendment
/// container holding the article. Nested containers are never entered.
fn article_neighbour(tree: &ProvisionTree, id: NodeId, forward: bool, include_omissis: bool) -> Option<NodeId> {
    let mut current = id;
    loop {
        let parent = tree.parent(current)?;
        let position = tree.position(current)?;
        let siblings = tree.children(parent);
        let beyond = if forward {
            &siblings[position + 1..]
        } else {
            &siblings[..position]
        };
        if let Some(found) = first_article_level(tree, beyond, forward, include_omissis) {
            return Some(found);
        }
        if !tree.kind(parent).is_some_and(ProvisionKind::is_agglomerator) {
            return None;
        }
        current = parent;
    }
}

fn first_article_level(tree: &ProvisionTree, nodes: &[NodeId], forward: bool, include_omissis: bool) -> Option<NodeId> {
    let pick = |&node: &NodeId| -> Option<NodeId> {
        match tree.kind(node) {
            Some(ProvisionKind::Article) => Some(node),
            Some(ProvisionKind::Omissis) if include_omissis => Some(node),
            Some(kind) if kind.is_agglomerator() => {
                first_article_level(tree, tree.children(node), forward, include_omissis)
            }
            _ => None,
        }
    };
    if forward {
        nodes.iter().find_map(pick)
    } else {
        nodes.iter().rev().find_map(pick)
    }
}

/// Check whether a provision sits inside an amendment block.
///
/// Walks the parent chain; a broken chain or a cycle is logged and reported
/// as `false`.
pub fn is_amendment_provision(tree: &ProvisionTree, id: NodeId) -> bool {
    let root = tree.root();
    let mut current = id;
    for _ in 0..=tree.len() {
        let Some(node) = tree.node(current) else {
            tracing::warn!(node = %current, "Broken parent chain while looking for an amendment block");
            return false;
        };
        match node.parent() {
            None if current == root => return false,
            None => {
                tracing::warn!(node = %current, "Detached provision while looking for an amendment block");
                return false;
            }
            Some(parent) => {
                if parent != root && tree.kind(parent) == Some(ProvisionKind::Articulation) {
                    return true;
                }
                current = parent;
            }
        }
    }
    tracing::warn!(node = %id, "Parent chain does not reach the root");
    false
}

/// Amendment container enclosing a provision.
pub fn amendment_container(tree: &ProvisionTree, id: NodeId) -> Option<NodeId> {
    tree.enclosing_container(id)
}

/// Head of the amendment block containing a provision (possibly itself).
pub fn amendment_block_head(tree: &ProvisionTree, id: NodeId) -> Option<NodeId> {
    let container = amendment_container(tree, id)?;
    std::iter::once(id)
        .chain(tree.ancestors(id))
        .find(|&node| tree.parent(node) == Some(container))
}

/// Last projected provision of a block in reading order.
pub fn block_terminal(tree: &ProvisionTree, head: NodeId) -> NodeId {
    tree.descendants(head)
        .into_iter()
        .rev()
        .find(|&node| is_projected(tree, node))
        .unwrap_or(head)
}

/// Check whether a provision is the terminal node of its amendment block
/// (the "current last amendment").
pub fn is_block_terminal(tree: &ProvisionTree, id: NodeId) -> bool {
    amendment_block_head(tree, id).is_some_and(|head| block_terminal(tree, head) == id)
}

/// Heads of the blocks following this provision's block in its container.
pub fn subsequent_amendment_blocks(tree: &ProvisionTree, id: NodeId) -> Vec<NodeId> {
    let Some(head) = amendment_block_head(tree, id) else {
        return Vec::new();
    };
    let Some(container) = tree.parent(head) else {
        return Vec::new();
    };
    tree.children(container)
        .iter()
        .skip_while(|&&node| node != head)
        .skip(1)
        .copied()
        .collect()
}

pub fn has_subsequent_amendment_blocks(tree: &ProvisionTree, id: NodeId) -> bool {
    !subsequent_amendment_blocks(tree, id).is_empty()
}

/// Check whether a provision belongs to the last amendment block of the document.
pub fn is_last_amendment_block(tree: &ProvisionTree, id: NodeId) -> bool {
    let Some(head) = amendment_block_head(tree, id) else {
        return false;
    };
    let Some(container) = tree.parent(head) else {
        return false;
    };
    tree.children(container).last() == Some(&head)
        && !holds_container(tree, head)
        && !container_follows(tree, container)
}

/// Check whether any amendment container comes after `node` in reading
/// order, looking only at the provisions that follow it at each level up.
fn container_follows(tree: &ProvisionTree, node: NodeId) -> bool {
    let mut current = node;
    while let (Some(parent), Some(position)) = (tree.parent(current), tree.position(current)) {
        let later = &tree.children(parent)[position + 1..];
        if later.iter().any(|&sibling| holds_container(tree, sibling)) {
            return true;
        }
        current = parent;
    }
    false
}

/// Check whether a subtree contains an amendment container. Only articles
/// own containers, so the enumeration below them is not searched.
fn holds_container(tree: &ProvisionTree, id: NodeId) -> bool {
    match tree.kind(id) {
        Some(ProvisionKind::Articulation) => true,
        Some(ProvisionKind::Article) => owned_container(tree, id).is_some(),
        Some(kind) if kind.is_agglomerator() => tree
            .children(id)
            .iter()
            .any(|&child| holds_container(tree, child)),
        _ => false,
    }
}

/// Amendment container owned by an article, if any.
pub fn owned_container(tree: &ProvisionTree, article: NodeId) -> Option<NodeId> {
    tree.child_of_kind(article, ProvisionKind::Articulation)
}

/// Check whether an article introduces at least one amendment block.
pub fn has_amendment(tree: &ProvisionTree, id: NodeId) -> bool {
    owned_container(tree, id).is_some_and(|container| !tree.children(container).is_empty())
}

/// Check whether a provision has content below it.
///
/// For an article this means items in its caput or paragraphs; the caput
/// itself and the amendment container do not count.
pub fn has_children(tree: &ProvisionTree, id: NodeId) -> bool {
    if tree.kind(id) == Some(ProvisionKind::Article) {
        return tree.children(id).iter().any(|&child| match tree.kind(child) {
            Some(ProvisionKind::Caput) => !tree.children(child).is_empty(),
            Some(ProvisionKind::Articulation) | None => false,
            Some(_) => true,
        });
    }
    !tree.children(id).is_empty()
}

/// Check whether an article's caput has items (any other kind: its own children).
pub fn has_enumeration_children(tree: &ProvisionTree, id: NodeId) -> bool {
    match tree.child_of_kind(id, ProvisionKind::Caput) {
        Some(caput) => !tree.children(caput).is_empty(),
        None => !tree.children(id).is_empty(),
    }
}

pub fn has_generic_child(tree: &ProvisionTree, id: NodeId) -> bool {
    has_child_of_kind(tree, id, ProvisionKind::Generic)
}

pub fn has_omissis_child(tree: &ProvisionTree, id: NodeId) -> bool {
    has_child_of_kind(tree, id, ProvisionKind::Omissis)
}

fn has_child_of_kind(tree: &ProvisionTree, id: NodeId, kind: ProvisionKind) -> bool {
    tree.children(id)
        .iter()
        .any(|&child| tree.kind(child) == Some(kind))
}

/// Check whether at least one child is not suppressed.
pub fn has_non_suppressed_child(tree: &ProvisionTree, id: NodeId) -> bool {
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.node(child))
        .any(|child| !child.is_suppressed())
}

/// Provisions that live inside an article: paragraphs and the enumeration
/// ladder, plus omissis standing among them.
pub fn is_article_part(tree: &ProvisionTree, id: NodeId) -> bool {
    match tree.kind(id) {
        Some(kind) if kind == ProvisionKind::Paragraph || kind.is_enumeration() => true,
        Some(ProvisionKind::Omissis) => tree
            .parent(id)
            .and_then(|parent| tree.kind(parent))
            .is_some_and(|parent| {
                matches!(parent, ProvisionKind::Article | ProvisionKind::Caput | ProvisionKind::Paragraph)
                    || parent.is_enumeration()
            }),
        _ => false,
    }
}

/// Nearest article enclosing a provision (the provision itself excluded).
pub fn enclosing_article(tree: &ProvisionTree, id: NodeId) -> Option<NodeId> {
    tree.ancestors(id)
        .find(|&ancestor| tree.kind(ancestor) == Some(ProvisionKind::Article))
}

pub fn grandparent(tree: &ProvisionTree, id: NodeId) -> Option<NodeId> {
    tree.parent(id).and_then(|parent| tree.parent(parent))
}

/// Node that takes over the children of a removed agglomerator: the
/// previous agglomerator of the same kind under the same parent, or the
/// parent itself.
pub fn absorbing_node(tree: &ProvisionTree, id: NodeId) -> Option<NodeId> {
    let parent = tree.parent(id)?;
    let kind = tree.kind(id)?;
    let previous = tree
        .children(parent)
        .iter()
        .take_while(|&&sibling| sibling != id)
        .filter(|&&sibling| tree.kind(sibling) == Some(kind))
        .last()
        .copied();
    Some(previous.unwrap_or(parent))
}

/// Check whether removing an agglomerator can keep all its children.
pub fn can_dissolve(tree: &ProvisionTree, id: NodeId) -> bool {
    let Some(target) = absorbing_node(tree, id).and_then(|target| tree.kind(target)) else {
        return false;
    };
    tree.children(id)
        .iter()
        .filter_map(|&child| tree.kind(child))
        .all(|child| target.can_contain(child))
}

/// Provision that owns the visible text for a node: the article for a caput.
pub fn visible_owner(tree: &ProvisionTree, id: NodeId) -> NodeId {
    match (tree.kind(id), tree.parent(id)) {
        (Some(ProvisionKind::Caput), Some(article)) => article,
        _ => id,
    }
}

/// Check whether a node is projected into the read model.
///
/// The articulation root, amendment containers and caputs are structural
/// only and are never shown.
pub fn is_projected(tree: &ProvisionTree, id: NodeId) -> bool {
    !matches!(
        tree.kind(id),
        None | Some(ProvisionKind::Articulation | ProvisionKind::Caput)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{load_outline_str, DefaultFactory};

    const DOCUMENT: &str = r#"
provisions:
  - kind: chapter
    text: "Das Disposições Gerais"
    children:
      - kind: article
        text: "Primeiro:"
        children:
          - kind: item
            text: "um;"
          - kind: item
            text: "dois;"
          - kind: omissis
          - kind: item
            text: "três."
  - kind: chapter
    text: "Das Disposições Finais"
    children:
      - kind: article
        text: "A Lei passa a vigorar com as seguintes alterações:"
        amendment:
          - kind: article
            number: 3
            text: "Texto:"
            children:
              - kind: item
                number: 1
                text: "novo.” (NR)"
          - kind: article
            number: 4
            text: "Outro.” (NR)"
"#;

    fn fixture() -> ProvisionTree {
        load_outline_str(DOCUMENT, &DefaultFactory).unwrap()
    }

    fn find(tree: &ProvisionTree, text: &str) -> NodeId {
        tree.reading_order()
            .into_iter()
            .find(|&id| tree.node(id).is_some_and(|node| node.text == text))
            .unwrap()
    }

    #[test]
    fn test_article_run_crosses_chapters() {
        let tree = fixture();
        let first = find(&tree, "Primeiro:");
        let second = find(&tree, "A Lei passa a vigorar com as seguintes alterações:");
        assert_eq!(same_kind_run(&tree, first), vec![first, second]);
        assert!(is_first_of_kind(&tree, first));
        assert!(is_last_of_kind(&tree, second));
        assert!(is_penultimate_of_kind(&tree, first));
        assert_eq!(next_same_kind(&tree, first, false), Some(second));
    }

    #[test]
    fn test_omissis_counts_as_neighbour_when_requested() {
        let tree = fixture();
        let dois = find(&tree, "dois;");
        let tres = find(&tree, "três.");
        assert_eq!(next_same_kind(&tree, dois, false), Some(tres));
        let omissis = next_same_kind(&tree, dois, true).unwrap();
        assert_eq!(tree.kind(omissis), Some(ProvisionKind::Omissis));
        assert_eq!(previous_sibling(&tree, tres), Some(omissis));
    }

    #[test]
    fn test_amendment_queries() {
        let tree = fixture();
        let host = find(&tree, "A Lei passa a vigorar com as seguintes alterações:");
        let head = find(&tree, "Texto:");
        let terminal = find(&tree, "novo.” (NR)");
        let last_head = find(&tree, "Outro.” (NR)");

        assert!(!is_amendment_provision(&tree, host));
        assert!(is_amendment_provision(&tree, terminal));
        assert!(has_amendment(&tree, host));
        assert_eq!(amendment_block_head(&tree, terminal), Some(head));
        assert!(is_block_terminal(&tree, terminal));
        assert!(!is_block_terminal(&tree, head));
        assert_eq!(subsequent_amendment_blocks(&tree, terminal), vec![last_head]);
        assert!(!is_last_amendment_block(&tree, head));
        assert!(is_last_amendment_block(&tree, last_head));
    }

    #[test]
    fn test_amendment_articles_have_their_own_run() {
        let tree = fixture();
        let head = find(&tree, "Texto:");
        let last_head = find(&tree, "Outro.” (NR)");
        assert_eq!(same_kind_run(&tree, head), vec![head, last_head]);
    }

    #[test]
    fn test_has_children_looks_through_caput() {
        let tree = fixture();
        let first = find(&tree, "Primeiro:");
        let last_head = find(&tree, "Outro.” (NR)");
        assert!(has_children(&tree, first));
        assert!(has_enumeration_children(&tree, first));
        assert!(!has_children(&tree, last_head));
    }

    #[test]
    fn test_detached_node_is_not_amendment() {
        let mut tree = fixture();
        let terminal = find(&tree, "novo.” (NR)");
        tree.detach(terminal).unwrap();
        assert!(!is_amendment_provision(&tree, terminal));
    }

    #[test]
    fn test_article_neighbours_skip_empty_agglomerators() {
        let tree = load_outline_str(
            r#"
provisions:
  - kind: chapter
    text: "Primeiro"
    children:
      - kind: article
        text: "Um."
  - kind: chapter
    text: "Vazio"
  - kind: omissis
  - kind: chapter
    text: "Terceiro"
    children:
      - kind: section
        text: "Única"
        children:
          - kind: article
            text: "Dois."
"#,
            &DefaultFactory,
        )
        .unwrap();
        let one = find(&tree, "Um.");
        let two = find(&tree, "Dois.");

        assert_eq!(next_same_kind(&tree, one, false), Some(two));
        assert_eq!(previous_same_kind(&tree, two, false), Some(one));
        let placeholder = next_same_kind(&tree, one, true).unwrap();
        assert_eq!(tree.kind(placeholder), Some(ProvisionKind::Omissis));
        assert_eq!(previous_same_kind(&tree, two, true), Some(placeholder));
        assert!(is_penultimate_of_kind(&tree, one));
        assert!(!is_sole_of_kind(&tree, two));
        assert_eq!(same_kind_run(&tree, two), vec![one, two]);
    }

    #[test]
    fn test_last_block_of_earlier_host_is_not_last_in_document() {
        let tree = load_outline_str(
            r#"
provisions:
  - kind: article
    text: "A Lei nº 1 passa a vigorar com a seguinte alteração:"
    amendment:
      - kind: article
        number: 2
        text: "Primeira.” (NR)"
  - kind: chapter
    text: "Finais"
    children:
      - kind: article
        text: "A Lei nº 2 passa a vigorar com a seguinte alteração:"
        amendment:
          - kind: article
            number: 5
            text: "Segunda.” (NR)"
"#,
            &DefaultFactory,
        )
        .unwrap();
        assert!(!is_last_amendment_block(&tree, find(&tree, "Primeira.” (NR)")));
        assert!(is_last_amendment_block(&tree, find(&tree, "Segunda.” (NR)")));
    }
}
