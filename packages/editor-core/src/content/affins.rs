//! Provisions whose diagnostics may change when a given provision changes.

use std::collections::BTreeSet;

use crate::hierarchy;
use crate::model::{NodeId, ProvisionKind, ProvisionTree};

/// Affected set of a provision: itself, its positional neighbours, its
/// siblings inside an article, its visible parent, enclosing agglomerators
/// and, inside an amendment, the whole block with its fellow heads and host
/// article.
///
/// Articles and agglomerators only pull in their nearest neighbours, so the
/// set stays small however many articles the document has.
///
/// Only projected provisions are returned.
pub fn affins(tree: &ProvisionTree, id: NodeId) -> BTreeSet<NodeId> {
    let mut set = BTreeSet::new();
    if !tree.contains(id) {
        return set;
    }

    set.insert(id);
    set.extend(hierarchy::positional_neighbours(tree, id));
    if let Some(parent) = tree.parent(id) {
        if !tree.kind(parent).is_some_and(ProvisionKind::is_structural) {
            set.extend(tree.children(parent).iter().copied());
        }
        set.extend(hierarchy::previous_sibling(tree, id));
        set.extend(hierarchy::next_sibling(tree, id));
        set.insert(hierarchy::visible_owner(tree, parent));
    }
    set.extend(
        tree.ancestors(id)
            .filter(|&ancestor| tree.kind(ancestor).is_some_and(|kind| kind.is_agglomerator())),
    );

    if let Some(head) = hierarchy::amendment_block_head(tree, id) {
        set.insert(head);
        set.extend(tree.descendants(head));
        if let Some(container) = tree.parent(head) {
            set.extend(tree.children(container).iter().copied());
            set.extend(tree.parent(container));
        }
    }
    if let Some(container) = hierarchy::owned_container(tree, id) {
        set.extend(tree.children(container).iter().copied());
    }

    set.retain(|&node| hierarchy::is_projected(tree, node));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{load_outline_str, DefaultFactory};
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"
provisions:
  - kind: article
    text: "Caput:"
    children:
      - kind: item
        text: "um:"
        children:
          - kind: sub_item
            text: "a;"
          - kind: sub_item
            text: "b."
      - kind: item
        text: "dois."
  - kind: article
    text: "A Lei passa a vigorar com a seguinte alteração:"
    amendment:
      - kind: article
        number: 4
        text: "Caput alterado:"
        children:
          - kind: item
            text: "inciso.” (NR)"
"#;

    #[test]
    fn test_sub_item_affects_siblings_and_parent_item() {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let article = tree.children(tree.root())[0];
        let caput = tree.child_of_kind(article, ProvisionKind::Caput).unwrap();
        let item = tree.children(caput)[0];
        let sub_items = tree.children(item).to_vec();

        let set = affins(&tree, sub_items[1]);
        assert!(set.contains(&sub_items[0]));
        assert!(set.contains(&item));
        assert!(!set.contains(&article));
        assert!(!set.contains(&caput));
    }

    #[test]
    fn test_caput_item_affects_article() {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let article = tree.children(tree.root())[0];
        let caput = tree.child_of_kind(article, ProvisionKind::Caput).unwrap();
        let item = tree.children(caput)[1];
        assert!(affins(&tree, item).contains(&article));
    }

    #[test]
    fn test_amendment_provision_affects_block_and_host() {
        let tree = load_outline_str(DOCUMENT, &DefaultFactory).unwrap();
        let host = tree.children(tree.root())[1];
        let container = hierarchy::owned_container(&tree, host).unwrap();
        let head = tree.children(container)[0];
        let caput = tree.child_of_kind(head, ProvisionKind::Caput).unwrap();
        let item = tree.children(caput)[0];

        let set = affins(&tree, item);
        assert!(set.contains(&head));
        assert!(set.contains(&host));
    }

    #[test]
    fn test_article_pulls_in_only_nearby_articles() {
        let mut yaml = String::from("provisions:\n");
        for n in 0..400 {
            yaml.push_str(&format!("  - kind: article\n    text: \"Artigo número {n}.\"\n"));
        }
        let tree = load_outline_str(&yaml, &DefaultFactory).unwrap();
        let articles = tree.children(tree.root()).to_vec();

        let middle = affins(&tree, articles[200]);
        assert_eq!(
            middle.into_iter().collect::<Vec<_>>(),
            vec![articles[198], articles[199], articles[200], articles[201]]
        );

        let last = affins(&tree, articles[399]);
        assert_eq!(
            last.into_iter().collect::<Vec<_>>(),
            vec![articles[397], articles[398], articles[399]]
        );
    }
}
