//! Renumbering pass and label generation.
//!
//! Numbers are recomputed for every same-kind run outside amendment blocks.
//! Articles form a single run across the articulation, crossing
//! agglomerators; every other kind is numbered per parent. Inside amendment
//! blocks numbers mirror the amended norm and are left untouched, but labels
//! are still regenerated from them.

use std::collections::HashMap;

use super::kind::ProvisionKind;
use super::provision::NodeId;
use super::tree::ProvisionTree;

/// Recompute numbers and labels for the whole tree.
pub fn renumber_all(tree: &mut ProvisionTree) {
    let order = tree.reading_order();
    let mut assignments: Vec<(NodeId, Option<u32>)> = Vec::new();

    let articles: Vec<NodeId> = order
        .iter()
        .copied()
        .filter(|&id| {
            tree.kind(id) == Some(ProvisionKind::Article) && tree.enclosing_container(id).is_none()
        })
        .collect();
    assignments.extend(number_run(&articles, ProvisionKind::Article));

    let parents = std::iter::once(tree.root()).chain(order.iter().copied());
    for parent in parents {
        if is_authored_scope(tree, parent) {
            continue;
        }
        let mut runs: HashMap<ProvisionKind, Vec<NodeId>> = HashMap::new();
        for &child in tree.children(parent) {
            let Some(kind) = tree.kind(child) else { continue };
            if kind.is_numbered() && kind != ProvisionKind::Article {
                runs.entry(kind).or_default().push(child);
            }
        }
        for (kind, run) in runs {
            assignments.extend(number_run(&run, kind));
        }
    }

    for (id, number) in assignments {
        if let Ok(node) = tree.get_mut(id) {
            node.number = number;
        }
    }

    for id in order {
        if let Ok(node) = tree.get_mut(id) {
            node.label = label_for(node.kind, node.number);
        }
    }
}

/// Children of an amendment container (or of any node inside one) carry
/// authored numbers.
fn is_authored_scope(tree: &ProvisionTree, parent: NodeId) -> bool {
    let is_container =
        tree.kind(parent) == Some(ProvisionKind::Articulation) && parent != tree.root();
    is_container || tree.enclosing_container(parent).is_some()
}

fn number_run(run: &[NodeId], kind: ProvisionKind) -> Vec<(NodeId, Option<u32>)> {
    let sole = run.len() == 1 && kind.spec().has_sole_form;
    run.iter()
        .enumerate()
        .map(|(index, &id)| {
            let number = if sole { None } else { Some(index as u32 + 1) };
            (id, number)
        })
        .collect()
}

/// Display label of a provision; a pure function of kind and number.
pub fn label_for(kind: ProvisionKind, number: Option<u32>) -> String {
    use ProvisionKind::*;

    match (kind, number) {
        (Article, None) => "Artigo único.".to_string(),
        (Article, Some(n)) => format!("Art. {}", ordinal(n)),
        (Paragraph, None) => "Parágrafo único.".to_string(),
        (Paragraph, Some(n)) => format!("§ {}", ordinal(n)),
        (Item, n) => format!("{} –", roman(n.unwrap_or(1))),
        (SubItem, n) => format!("{})", letters(n.unwrap_or(1))),
        (SubSubItem, n) => format!("{}.", n.unwrap_or(1)),
        (Book, n) => agglomerator_label("LIVRO", "ÚNICO", n),
        (Title, n) => agglomerator_label("TÍTULO", "ÚNICO", n),
        (Chapter, n) => agglomerator_label("CAPÍTULO", "ÚNICO", n),
        (Section, n) => agglomerator_label("Seção", "única", n),
        (Subsection, n) => agglomerator_label("Subseção", "única", n),
        (Articulation | Caput | Omissis | Generic, _) => String::new(),
    }
}

fn agglomerator_label(name: &str, sole: &str, number: Option<u32>) -> String {
    match number {
        Some(n) => format!("{name} {}", roman(n)),
        None => format!("{name} {sole}"),
    }
}

/// Ordinal indicator is used up to nine, cardinal from ten on.
fn ordinal(n: u32) -> String {
    if n < 10 {
        format!("{n}º")
    } else {
        n.to_string()
    }
}

/// Upper-case Roman numeral.
pub fn roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut result = String::new();
    for (value, symbol) in TABLE {
        while n >= value {
            result.push_str(symbol);
            n -= value;
        }
    }
    result
}

/// Bijective base-26 lower-case letters: 1 → a, 26 → z, 27 → aa.
pub fn letters(mut n: u32) -> String {
    let mut result = Vec::new();
    while n > 0 {
        n -= 1;
        result.push(char::from(b'a' + (n % 26) as u8));
        n /= 26;
    }
    result.iter().rev().collect()
}
