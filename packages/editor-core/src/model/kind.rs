//! Provision kinds and their declarative specifications.
//!
//! Each kind has a [`KindSpec`] describing containment, punctuation
//! indicators and display vocabulary. The table is closed: every kind is
//! matched exhaustively, so adding a kind forces every rule to be revisited.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a provision in the legislative hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionKind {
    /// Document root (or the container of an amendment when nested in an article).
    Articulation,
    /// Livro.
    Book,
    /// Título.
    Title,
    /// Capítulo.
    Chapter,
    /// Seção.
    Section,
    /// Subseção.
    Subsection,
    /// Artigo.
    Article,
    /// The article's own introductory paragraph.
    Caput,
    /// Parágrafo.
    Paragraph,
    /// Inciso.
    Item,
    /// Alínea.
    SubItem,
    /// Item de alínea.
    SubSubItem,
    /// Omitted-text block.
    Omissis,
    /// Placeholder for a provision whose kind is not known.
    Generic,
}

/// Punctuation tokens a kind uses to close its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicators {
    /// Tokens for a non-final sibling; the first one is the plain form, the
    /// others are continuation variants ("; e", "; ou").
    pub sequence: &'static [&'static str],
    /// Token for the last sibling of a sequence.
    pub final_of_sequence: &'static str,
    /// Token meaning "expanded by the children below".
    pub expansion: &'static str,
}

const ARTICLE_INDICATORS: Indicators = Indicators {
    sequence: &["."],
    final_of_sequence: ".",
    expansion: ":",
};

const ENUMERATION_INDICATORS: Indicators = Indicators {
    sequence: &[";", "; e", "; ou"],
    final_of_sequence: ".",
    expansion: ":",
};

/// Declarative specification of a provision kind.
#[derive(Debug, Clone, Copy)]
pub struct KindSpec {
    /// The kind described.
    pub kind: ProvisionKind,
    /// Kinds allowed as direct children, in priority order (first is the default).
    pub children: &'static [ProvisionKind],
    /// Display name used in diagnostics ("Artigo", "Alínea").
    pub description: &'static str,
    /// Portuguese definite article matching the description's gender.
    pub definite_article: &'static str,
    /// Punctuation indicators, when the kind carries sequenced text.
    pub indicators: Option<Indicators>,
    /// Whether a single sibling of this kind is shown without a numeral.
    pub has_sole_form: bool,
}

use ProvisionKind::*;

const AGGLOMERATOR_CONTENT: &[ProvisionKind] = &[Article, Omissis];

const SPECS: &[KindSpec] = &[
    KindSpec {
        kind: Articulation,
        children: &[
            Article, Book, Title, Chapter, Section, Subsection, Paragraph, Item, SubItem,
            SubSubItem, Omissis, Generic,
        ],
        description: "Articulação",
        definite_article: "a",
        indicators: None,
        has_sole_form: false,
    },
    KindSpec {
        kind: Book,
        children: &[Title, Chapter, Article, Omissis],
        description: "Livro",
        definite_article: "o",
        indicators: None,
        has_sole_form: true,
    },
    KindSpec {
        kind: Title,
        children: &[Chapter, Article, Omissis],
        description: "Título",
        definite_article: "o",
        indicators: None,
        has_sole_form: true,
    },
    KindSpec {
        kind: Chapter,
        children: &[Section, Article, Omissis],
        description: "Capítulo",
        definite_article: "o",
        indicators: None,
        has_sole_form: true,
    },
    KindSpec {
        kind: Section,
        children: &[Subsection, Article, Omissis],
        description: "Seção",
        definite_article: "a",
        indicators: None,
        has_sole_form: true,
    },
    KindSpec {
        kind: Subsection,
        children: AGGLOMERATOR_CONTENT,
        description: "Subseção",
        definite_article: "a",
        indicators: None,
        has_sole_form: true,
    },
    KindSpec {
        kind: Article,
        children: &[Caput, Paragraph, Omissis, Generic, Articulation],
        description: "Artigo",
        definite_article: "o",
        indicators: Some(ARTICLE_INDICATORS),
        has_sole_form: true,
    },
    KindSpec {
        kind: Caput,
        children: &[Item, Omissis, Generic],
        description: "Caput",
        definite_article: "o",
        indicators: Some(ARTICLE_INDICATORS),
        has_sole_form: false,
    },
    KindSpec {
        kind: Paragraph,
        children: &[Item, Omissis, Generic],
        description: "Parágrafo",
        definite_article: "o",
        indicators: Some(ARTICLE_INDICATORS),
        has_sole_form: true,
    },
    KindSpec {
        kind: Item,
        children: &[SubItem, Omissis, Generic],
        description: "Inciso",
        definite_article: "o",
        indicators: Some(ENUMERATION_INDICATORS),
        has_sole_form: false,
    },
    KindSpec {
        kind: SubItem,
        children: &[SubSubItem, Omissis, Generic],
        description: "Alínea",
        definite_article: "a",
        indicators: Some(ENUMERATION_INDICATORS),
        has_sole_form: false,
    },
    KindSpec {
        kind: SubSubItem,
        children: &[],
        description: "Item",
        definite_article: "o",
        indicators: Some(ENUMERATION_INDICATORS),
        has_sole_form: false,
    },
    KindSpec {
        kind: Omissis,
        children: &[],
        description: "Omissis",
        definite_article: "o",
        indicators: None,
        has_sole_form: false,
    },
    KindSpec {
        kind: Generic,
        children: &[Generic, Omissis],
        description: "Dispositivo",
        definite_article: "o",
        indicators: None,
        has_sole_form: false,
    },
];

impl ProvisionKind {
    /// All kinds, in table order.
    pub const ALL: [ProvisionKind; 14] = [
        Articulation, Book, Title, Chapter, Section, Subsection, Article, Caput, Paragraph,
        Item, SubItem, SubSubItem, Omissis, Generic,
    ];

    /// Specification of this kind.
    #[must_use]
    pub fn spec(self) -> &'static KindSpec {
        // SPECS is ordered like the enum declaration.
        &SPECS[self as usize]
    }

    /// Kinds allowed as direct children.
    #[must_use]
    pub fn allowed_children(self) -> &'static [ProvisionKind] {
        self.spec().children
    }

    /// Kinds allowed as direct parent.
    pub fn allowed_parents(self) -> impl Iterator<Item = ProvisionKind> {
        Self::ALL
            .into_iter()
            .filter(move |parent| parent.allowed_children().contains(&self))
    }

    /// Check whether `child` may be placed directly under this kind.
    #[must_use]
    pub fn can_contain(self, child: ProvisionKind) -> bool {
        self.allowed_children().contains(&child)
    }

    /// Structural grouping kinds that hold articles but no text of their own.
    #[must_use]
    pub fn is_agglomerator(self) -> bool {
        matches!(self, Book | Title | Chapter | Section | Subsection)
    }

    /// Kinds validated with the restricted rule set.
    #[must_use]
    pub fn is_structural(self) -> bool {
        self.is_agglomerator() || self == Articulation
    }

    /// Kinds forming the enumeration ladder below articles and paragraphs.
    #[must_use]
    pub fn is_enumeration(self) -> bool {
        matches!(self, Item | SubItem | SubSubItem)
    }

    /// Kinds that receive a number from the renumbering pass.
    #[must_use]
    pub fn is_numbered(self) -> bool {
        !matches!(self, Articulation | Caput | Omissis | Generic)
    }

    /// Next kind down the enumeration ladder.
    #[must_use]
    pub fn enumeration_child(self) -> Option<ProvisionKind> {
        match self {
            Caput | Paragraph => Some(Item),
            Item => Some(SubItem),
            SubItem => Some(SubSubItem),
            _ => None,
        }
    }

    /// Display name used in diagnostics.
    #[must_use]
    pub fn description(self) -> &'static str {
        self.spec().description
    }

    /// Portuguese definite article ("o", "a").
    #[must_use]
    pub fn definite_article(self) -> &'static str {
        self.spec().definite_article
    }

    /// Punctuation indicators, if the kind has sequenced text.
    #[must_use]
    pub fn indicators(self) -> Option<Indicators> {
        self.spec().indicators
    }
}

impl fmt::Display for ProvisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Human-readable name of an indicator token.
#[must_use]
pub fn indicator_name(indicator: &str) -> &'static str {
    match indicator {
        "." => "ponto (.)",
        ";" => "ponto e vírgula (;)",
        "; e" => "ponto e vírgula seguido de 'e' (; e)",
        "; ou" => "ponto e vírgula seguido de 'ou' (; ou)",
        ":" => "dois pontos (:)",
        _ => "o indicador esperado",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_table_matches_enum_order() {
        for kind in ProvisionKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn test_containment() {
        assert!(Article.can_contain(Caput));
        assert!(Caput.can_contain(Item));
        assert!(Paragraph.can_contain(Item));
        assert!(!Paragraph.can_contain(SubItem));
        assert!(!SubSubItem.can_contain(Omissis));
        assert!(Chapter.can_contain(Article));
    }

    #[test]
    fn test_allowed_parents() {
        let parents: Vec<_> = Item.allowed_parents().collect();
        assert_eq!(parents, vec![Articulation, Caput, Paragraph]);
    }

    #[test]
    fn test_enumeration_ladder() {
        assert_eq!(Paragraph.enumeration_child(), Some(Item));
        assert_eq!(Item.enumeration_child(), Some(SubItem));
        assert_eq!(SubSubItem.enumeration_child(), None);
    }

    #[test]
    fn test_indicators() {
        let item = Item.indicators().unwrap();
        assert_eq!(item.sequence[0], ";");
        assert_eq!(item.expansion, ":");
        assert!(Chapter.indicators().is_none());
        assert_eq!(indicator_name(item.sequence[0]), "ponto e vírgula (;)");
    }
}
