//! Structural and textual validation of provisions.
//!
//! Every rule that matches fires; the output is an ordered list of
//! diagnostics, never a first-match verdict. Findings are data: nothing in
//! here fails or blocks an edit.

use crate::config::{AMENDMENT_CLOSING, CONCISE_TEXT_LIMIT, DEFAULT_AMENDMENT_TEXT, OMISSIS_TEXT};
use crate::hierarchy;
use crate::model::kind::indicator_name;
use crate::model::{Diagnostic, NodeId, Provision, ProvisionKind, ProvisionTree};
use crate::text;

use super::indicators::{
    ends_with_citation, ends_with_quote, ends_with_sequence_indicator, has_amendment_closing,
    has_closing_quote_with_nr, has_continuation_indicator, has_expansion_indicator,
    has_final_indicator, introduces_amendment,
};

/// Validate a single provision against its current position in the tree.
pub fn validate(tree: &ProvisionTree, id: NodeId) -> Vec<Diagnostic> {
    let Some(node) = tree.node(id) else {
        return Vec::new();
    };
    match node.kind {
        ProvisionKind::Caput | ProvisionKind::Articulation => Vec::new(),
        kind if kind.is_agglomerator() => validate_agglomerator(node),
        _ => validate_provision(tree, id, node),
    }
}

/// Validate every provision and store the findings on the nodes.
pub fn validate_tree(tree: &mut ProvisionTree) {
    let findings: Vec<_> = tree
        .reading_order()
        .into_iter()
        .map(|id| (id, validate(tree, id)))
        .collect();
    for (id, diagnostics) in findings {
        if let Ok(node) = tree.get_mut(id) {
            node.diagnostics = diagnostics;
        }
    }
}

/// Recompute and store diagnostics for the given provisions only.
pub fn revalidate(tree: &mut ProvisionTree, ids: &[NodeId]) {
    let findings: Vec<_> = ids
        .iter()
        .filter(|&&id| tree.contains(id))
        .map(|&id| (id, validate(tree, id)))
        .collect();
    for (id, diagnostics) in findings {
        if let Ok(node) = tree.get_mut(id) {
            node.diagnostics = diagnostics;
        }
    }
}

fn validate_agglomerator(node: &Provision) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let kind = node.kind;

    if text::normalize(&node.text).is_empty() {
        diagnostics.push(Diagnostic::error(format!(
            "Não foi informado um texto para {} {}",
            kind.definite_article(),
            kind.description()
        )));
    }
    if text::ends_with_punctuation(&node.text) {
        diagnostics.push(Diagnostic::error(format!(
            "Não pode haver sinal de pontuação ao final do texto d{} {}",
            kind.definite_article(),
            kind.description()
        )));
    }
    if text::contains_tags(&node.text) {
        diagnostics.push(Diagnostic::error(format!(
            "Texto d{} {} não pode possuir formatação",
            kind.definite_article(),
            kind.description()
        )));
    }

    diagnostics
}

/// Facts about a provision that the rules below keep asking for.
struct Facts<'a> {
    kind: ProvisionKind,
    text: &'a str,
    has_text: bool,
    amendment: bool,
    article_part: bool,
    sole: bool,
    last: bool,
    penultimate: bool,
    has_children: bool,
    has_enumeration_children: bool,
    has_amendment: bool,
    terminal: bool,
    parent_has_generic: bool,
    parent_has_omissis: bool,
}

impl<'a> Facts<'a> {
    fn gather(tree: &ProvisionTree, id: NodeId, node: &'a Provision) -> Self {
        let parent = tree.parent(id);
        let amendment = hierarchy::is_amendment_provision(tree, id);
        Self {
            kind: node.kind,
            text: &node.text,
            has_text: !text::normalize(&node.text).is_empty(),
            amendment,
            article_part: hierarchy::is_article_part(tree, id),
            sole: hierarchy::is_sole_of_kind(tree, id),
            last: hierarchy::is_last_of_kind(tree, id),
            penultimate: hierarchy::is_penultimate_of_kind(tree, id),
            has_children: hierarchy::has_children(tree, id),
            has_enumeration_children: hierarchy::has_enumeration_children(tree, id),
            has_amendment: hierarchy::has_amendment(tree, id),
            terminal: amendment && hierarchy::is_block_terminal(tree, id),
            parent_has_generic: parent.is_some_and(|p| hierarchy::has_generic_child(tree, p)),
            parent_has_omissis: parent.is_some_and(|p| hierarchy::has_omissis_child(tree, p)),
        }
    }

    fn is(&self, kind: ProvisionKind) -> bool {
        self.kind == kind
    }

    fn is_article_or_paragraph(&self) -> bool {
        self.is(ProvisionKind::Article) || self.is(ProvisionKind::Paragraph)
    }

    /// Enumeration-ladder provisions subject to the sibling sequence rules.
    fn in_sequence(&self) -> bool {
        self.article_part && !self.is(ProvisionKind::Paragraph) && !self.is(ProvisionKind::Omissis)
    }

    fn continuation(&self) -> bool {
        has_continuation_indicator(self.kind, self.text)
    }

    fn expansion(&self) -> bool {
        has_expansion_indicator(self.kind, self.text)
    }

    fn description(&self) -> &'static str {
        self.kind.description()
    }
}

fn validate_provision(tree: &ProvisionTree, id: NodeId, node: &Provision) -> Vec<Diagnostic> {
    let facts = Facts::gather(tree, id, node);
    let mut diagnostics = Vec::new();

    common_rules(&facts, &mut diagnostics);

    if let Some(indicators) = facts.kind.indicators() {
        let sequence = indicator_name(indicators.sequence[0]);
        let expansion = indicator_name(indicators.expansion);
        let final_of_sequence = indicator_name(indicators.final_of_sequence);

        sequence_rules(&facts, sequence, &mut diagnostics);
        if facts.amendment {
            amendment_rules(tree, id, &facts, sequence, expansion, final_of_sequence, &mut diagnostics);
        } else {
            ordinary_rules(tree, id, &facts, sequence, expansion, final_of_sequence, &mut diagnostics);
        }
    } else if facts.amendment {
        amendment_closure_rules(tree, id, &facts, &mut diagnostics);
    }

    diagnostics
}

fn common_rules(facts: &Facts<'_>, diagnostics: &mut Vec<Diagnostic>) {
    if !facts.has_text {
        diagnostics.push(Diagnostic::error(format!(
            "Não foi informado um texto para {} {}",
            facts.kind.definite_article(),
            facts.description()
        )));
        return;
    }
    if !text::is_valid_html(facts.text) {
        diagnostics.push(Diagnostic::error("O conteúdo do dispositivo não é um HTML válido"));
    }
    if text::visible_len(facts.text) > CONCISE_TEXT_LIMIT {
        diagnostics.push(Diagnostic::warning(
            "Pelo princípio da concisão, o texto dos dispositivos não deve ser extenso, \
             devendo ser utilizadas frases curtas e concisas",
        ));
    }
}

/// Capitalization and sibling sequence rules shared by ordinary and amendment provisions.
fn sequence_rules(facts: &Facts<'_>, sequence: &str, diagnostics: &mut Vec<Diagnostic>) {
    if !facts.has_text {
        return;
    }

    if facts.article_part
        && !facts.is(ProvisionKind::Paragraph)
        && text::starts_with_uppercase(facts.text)
    {
        diagnostics.push(Diagnostic::warning(format!(
            "{} deveria iniciar com letra minúscula, a não ser que se trate de uma situação \
             especial, como nome próprio",
            facts.description()
        )));
    }

    if facts.in_sequence()
        && !facts.sole
        && !facts.last
        && !facts.penultimate
        && !facts.has_children
        && !ends_with_sequence_indicator(facts.kind, facts.text)
    {
        let message = if facts.continuation() {
            format!(
                "{} deveria terminar com {sequence}. A variação informada só é permitida para o penúltimo elemento",
                facts.description()
            )
        } else {
            format!("{} deveria terminar com {sequence}", facts.description())
        };
        diagnostics.push(Diagnostic::error(message));
    }

    if facts.is_article_or_paragraph()
        && !facts.amendment
        && !text::starts_with_ellipsis(facts.text)
        && !text::starts_with_uppercase(facts.text)
    {
        diagnostics.push(Diagnostic::error(format!(
            "{} deveria iniciar com letra maiúscula",
            facts.description()
        )));
    }
}

fn ordinary_rules(
    tree: &ProvisionTree,
    id: NodeId,
    facts: &Facts<'_>,
    sequence: &str,
    expansion: &str,
    final_of_sequence: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if !facts.has_text {
        return;
    }

    if facts.has_enumeration_children && !facts.expansion() {
        diagnostics.push(Diagnostic::error(format!(
            "{} deveria terminar com {expansion}",
            facts.description()
        )));
    }

    let followed_by_omissis = hierarchy::next_same_kind(tree, id, true)
        .is_some_and(|next| tree.kind(next) == Some(ProvisionKind::Omissis));
    if facts.in_sequence()
        && (facts.sole || facts.last)
        && !facts.parent_has_generic
        && !followed_by_omissis
        && !facts.has_children
        && !has_final_indicator(facts.kind, facts.text)
    {
        diagnostics.push(Diagnostic::error(format!(
            "Último dispositivo de uma sequência deveria terminar com {final_of_sequence}"
        )));
    }

    if facts.in_sequence()
        && !facts.sole
        && facts.penultimate
        && !facts.has_children
        && !facts.continuation()
    {
        let tokens = facts
            .kind
            .indicators()
            .map(|indicators| indicators.sequence.join(", "))
            .unwrap_or_default();
        diagnostics.push(Diagnostic::error(format!(
            "{} deveria terminar com uma das seguintes possibilidades: {tokens}",
            facts.description()
        )));
    }

    if facts.is_article_or_paragraph()
        && !facts.has_children
        && !facts.has_amendment
        && !facts.sole
        && !facts.continuation()
        && !ends_with_citation(facts.text)
    {
        diagnostics.push(Diagnostic::error(format!(
            "{} deveria terminar com {sequence}",
            facts.description()
        )));
    }

    if facts.is(ProvisionKind::Article) {
        if facts.has_amendment && !facts.expansion() && !introduces_amendment(facts.text) {
            diagnostics.push(Diagnostic::error(format!(
                "{} deveria terminar com {expansion}",
                facts.description()
            )));
        }
        if !facts.has_amendment && !facts.has_enumeration_children && facts.expansion() {
            diagnostics.push(Diagnostic::error(format!(
                "{} deveria terminar com {sequence}",
                facts.description()
            )));
        }
        if facts.has_amendment && !amended_norm_informed(tree, id) {
            diagnostics.push(Diagnostic::error("É necessário informar a norma a ser alterada"));
        }
    }
}

/// Every block introduced by the article names the norm it amends.
fn amended_norm_informed(tree: &ProvisionTree, article: NodeId) -> bool {
    let Some(container) = hierarchy::owned_container(tree, article) else {
        return true;
    };
    tree.children(container).iter().all(|&head| {
        tree.node(head)
            .and_then(|node| node.amendment.as_ref())
            .is_some_and(|metadata| metadata.norm.is_some())
    })
}

fn amendment_rules(
    tree: &ProvisionTree,
    id: NodeId,
    facts: &Facts<'_>,
    sequence: &str,
    expansion: &str,
    final_of_sequence: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if facts.has_text
        && facts.text != OMISSIS_TEXT
        && facts.has_enumeration_children
        && !facts.expansion()
    {
        diagnostics.push(Diagnostic::error(format!(
            "{} deveria terminar com {expansion}",
            facts.description()
        )));
    }

    if facts.has_text
        && facts.is(ProvisionKind::Paragraph)
        && !facts.has_children
        && !facts.sole
        && !facts.last
        && !facts.continuation()
    {
        diagnostics.push(Diagnostic::error(format!(
            "{} deveria terminar com {sequence}",
            facts.description()
        )));
    }

    amendment_closure_rules(tree, id, facts, diagnostics);

    if facts.has_text
        && facts.in_sequence()
        && !facts.parent_has_omissis
        && facts.sole
        && !facts.parent_has_generic
        && !facts.has_children
        && !has_final_indicator(facts.kind, facts.text)
        && !facts.terminal
    {
        diagnostics.push(Diagnostic::error(format!(
            "Último dispositivo de uma sequência deveria terminar com {final_of_sequence}"
        )));
    }
}

/// Quote and (NR) rules of an amendment block; these apply to every kind.
fn amendment_closure_rules(
    tree: &ProvisionTree,
    id: NodeId,
    facts: &Facts<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if facts.terminal && (!facts.has_text || !has_amendment_closing(facts.text)) {
        diagnostics.push(Diagnostic::error(format!(
            "O último dispositivo do bloco de alteração deve terminar com: {AMENDMENT_CLOSING}"
        )));
    }

    if !facts.has_text {
        return;
    }

    if !facts.terminal
        && ends_with_quote(facts.text)
        && !ends_with_citation(facts.text)
        && !has_closing_quote_with_nr(facts.text)
    {
        diagnostics.push(Diagnostic::error(
            "Somente o último dispositivo do bloco de alteração poderia ser finalizado com aspas",
        ));
    }

    if !facts.terminal && has_closing_quote_with_nr(facts.text) {
        diagnostics.push(Diagnostic::error(
            "Somente o último dispositivo do bloco de alteração poderia terminar com \u{201D} (NR)",
        ));
    }

    let is_head = hierarchy::amendment_block_head(tree, id) == Some(id);
    if is_head
        && !facts.has_children
        && (facts.text == DEFAULT_AMENDMENT_TEXT || facts.text == OMISSIS_TEXT)
    {
        diagnostics.push(Diagnostic::error("Não foi informada nenhuma alteração"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{load_outline_str, DefaultFactory, Severity};
    use pretty_assertions::assert_eq;

    fn tree(yaml: &str) -> ProvisionTree {
        load_outline_str(yaml, &DefaultFactory).unwrap()
    }

    fn find(tree: &ProvisionTree, text: &str) -> NodeId {
        tree.reading_order()
            .into_iter()
            .find(|&id| tree.node(id).is_some_and(|node| node.text == text))
            .unwrap()
    }

    fn errors(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.as_str())
            .collect()
    }

    #[test]
    fn test_article_without_sequence_indicator() {
        let tree = tree(
            r#"
provisions:
  - kind: article
    text: "Primeiro artigo."
  - kind: article
    text: "institui o programa"
  - kind: article
    text: "Terceiro artigo."
  - kind: article
    text: "Quarto artigo."
"#,
        );
        let id = find(&tree, "institui o programa");
        let diagnostics = validate(&tree, id);
        let about_indicator: Vec<_> = errors(&diagnostics)
            .into_iter()
            .filter(|message| message.contains("ponto"))
            .collect();
        assert_eq!(about_indicator, vec!["Artigo deveria terminar com ponto (.)"]);
    }

    #[test]
    fn test_well_formed_articles_have_no_findings() {
        let tree = tree(
            r#"
provisions:
  - kind: article
    text: "Fica instituído o programa:"
    children:
      - kind: item
        text: "primeiro;"
      - kind: item
        text: "segundo; e"
      - kind: item
        text: "terceiro."
  - kind: article
    text: "Esta Lei entra em vigor na data de sua publicação."
"#,
        );
        for id in tree.reading_order() {
            assert_eq!(validate(&tree, id), Vec::<Diagnostic>::new(), "unexpected findings for {id}");
        }
    }

    #[test]
    fn test_item_sequence_rules() {
        let tree = tree(
            r#"
provisions:
  - kind: article
    text: "Fica instituído o programa:"
    children:
      - kind: item
        text: "Primeiro"
      - kind: item
        text: "segundo"
      - kind: item
        text: "terceiro"
"#,
        );
        let first = validate(&tree, find(&tree, "Primeiro"));
        assert_eq!(
            errors(&first),
            vec!["Inciso deveria terminar com ponto e vírgula (;)"]
        );
        assert!(first.iter().any(|d| d.severity == Severity::Warning));

        let penultimate = validate(&tree, find(&tree, "segundo"));
        assert_eq!(
            errors(&penultimate),
            vec!["Inciso deveria terminar com uma das seguintes possibilidades: ;, ; e, ; ou"]
        );

        let last = validate(&tree, find(&tree, "terceiro"));
        assert_eq!(
            errors(&last),
            vec!["Último dispositivo de uma sequência deveria terminar com ponto (.)"]
        );
    }

    #[test]
    fn test_continuation_variant_only_for_penultimate() {
        let tree = tree(
            r#"
provisions:
  - kind: article
    text: "Fica instituído o programa:"
    children:
      - kind: item
        text: "primeiro; e"
      - kind: item
        text: "segundo;"
      - kind: item
        text: "terceiro."
"#,
        );
        let diagnostics = validate(&tree, find(&tree, "primeiro; e"));
        assert_eq!(
            errors(&diagnostics),
            vec!["Inciso deveria terminar com ponto e vírgula (;). A variação informada só é permitida para o penúltimo elemento"]
        );
    }

    #[test]
    fn test_expansion_indicator_required() {
        let tree = tree(
            r#"
provisions:
  - kind: article
    text: "Fica instituído o programa."
    children:
      - kind: item
        text: "único."
"#,
        );
        let article = find(&tree, "Fica instituído o programa.");
        assert_eq!(
            errors(&validate(&tree, article)),
            vec!["Artigo deveria terminar com dois pontos (:)"]
        );
    }

    #[test]
    fn test_agglomerator_rules() {
        let tree = tree(
            r#"
provisions:
  - kind: chapter
    text: "Das <b>Disposições</b> Gerais."
    children:
      - kind: article
        text: "Texto."
  - kind: section
"#,
        );
        let chapter = tree.children(tree.root())[0];
        assert_eq!(
            errors(&validate(&tree, chapter)),
            vec![
                "Não pode haver sinal de pontuação ao final do texto do Capítulo",
                "Texto do Capítulo não pode possuir formatação",
            ]
        );
        let section = tree.children(tree.root())[1];
        assert_eq!(
            errors(&validate(&tree, section)),
            vec!["Não foi informado um texto para a Seção"]
        );
    }

    #[test]
    fn test_invalid_html_and_length() {
        let long = "a".repeat(CONCISE_TEXT_LIMIT + 1);
        let yaml = format!(
            "provisions:\n  - kind: article\n    text: \"<b>Texto.\"\n  - kind: article\n    text: \"A{long}.\"\n"
        );
        let tree = tree(&yaml);
        let broken = find(&tree, "<b>Texto.");
        assert!(errors(&validate(&tree, broken)).contains(&"O conteúdo do dispositivo não é um HTML válido"));

        let verbose = tree.children(tree.root())[1];
        assert!(validate(&tree, verbose)
            .iter()
            .any(|d| d.severity == Severity::Warning && d.message.contains("concisão")));
    }

    const AMENDMENT: &str = r#"
provisions:
  - kind: article
    text: "A Lei nº 8.112, de 1990, passa a vigorar com a seguinte alteração:"
    amendment:
      - kind: article
        number: 5
        norm: "urn:lex:br:federal:lei:1990-12-11;8112"
        text: "TERMINAL"
"#;

    fn amendment_with(terminal: &str) -> (ProvisionTree, NodeId) {
        let tree = tree(&AMENDMENT.replace("TERMINAL", terminal));
        let id = find(&tree, terminal.replace('\\', "").as_str());
        (tree, id)
    }

    #[test]
    fn test_amendment_terminal_with_closing() {
        let (tree, id) = amendment_with(r#"O servidor terá direito a férias.\"(NR)"#);
        assert_eq!(validate(&tree, id), Vec::<Diagnostic>::new());
    }

    #[test]
    fn test_amendment_terminal_without_nr() {
        let (tree, id) = amendment_with(r#"O servidor terá direito a férias.\""#);
        let diagnostics = validate(&tree, id);
        let closure: Vec<_> = errors(&diagnostics)
            .into_iter()
            .filter(|message| message.contains("(NR)"))
            .collect();
        assert_eq!(
            closure,
            vec!["O último dispositivo do bloco de alteração deve terminar com: .\u{201D} (NR)"]
        );
    }

    #[test]
    fn test_host_article_is_valid() {
        let (tree, _) = amendment_with("Texto.” (NR)");
        let host = tree.children(tree.root())[0];
        assert_eq!(validate(&tree, host), Vec::<Diagnostic>::new());
    }

    #[test]
    fn test_host_article_requires_norm() {
        let tree = tree(&AMENDMENT.replace("TERMINAL", "Texto.” (NR)").replace(
            "        norm: \"urn:lex:br:federal:lei:1990-12-11;8112\"\n",
            "",
        ));
        let host = tree.children(tree.root())[0];
        assert_eq!(
            errors(&validate(&tree, host)),
            vec!["É necessário informar a norma a ser alterada"]
        );
    }

    #[test]
    fn test_default_amendment_text_signals_no_change() {
        let (tree, id) = amendment_with(DEFAULT_AMENDMENT_TEXT);
        assert!(errors(&validate(&tree, id)).contains(&"Não foi informada nenhuma alteração"));
    }

    #[test]
    fn test_validate_tree_is_idempotent() {
        let (mut tree, _) = amendment_with("Texto sem fechamento");
        validate_tree(&mut tree);
        let first = tree.clone();
        validate_tree(&mut tree);
        assert_eq!(tree, first);
    }
}
