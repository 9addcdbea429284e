//! Provision nodes and the data they carry: ids, amendment metadata and
//! validation findings.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::kind::ProvisionKind;

/// Arena index of a provision inside a [`ProvisionTree`](super::ProvisionTree).
///
/// Ids are never reused: once a subtree is removed its ids stay dangling and
/// lookups return [`EditorError::NodeNotFound`](crate::error::EditorError::NodeNotFound).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Create an id from a raw arena index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle tag of a provision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Situation {
    #[default]
    Normal,
    /// Newly inserted by the author.
    Inserted,
    /// Struck but kept in place; siblings are not renumbered around it.
    Suppressed,
}

/// Metadata carried by the head of an amendment block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendmentMetadata {
    /// LexML URN of the norm being amended.
    pub norm: Option<String>,
    /// Whether the block has been closed by the author.
    pub closed: bool,
}

/// Severity of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single validation finding attached to a provision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// A node of the legislative hierarchy.
///
/// Parent and children are arena indices owned by the tree. The parent link
/// is only used for upward traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Provision {
    pub kind: ProvisionKind,
    /// Display identifier derived from kind and number by the renumbering pass.
    pub label: String,
    /// Ordinal among same-kind siblings; `None` for a sole provision.
    pub number: Option<u32>,
    /// Authored HTML-constrained fragment.
    pub text: String,
    pub situation: Situation,
    /// Present only on amendment block heads.
    pub amendment: Option<AmendmentMetadata>,
    /// Cache of the last validation pass.
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Provision {
    /// Create a detached provision with empty text.
    pub fn new(kind: ProvisionKind) -> Self {
        Self {
            kind,
            label: String::new(),
            number: None,
            text: String::new(),
            situation: Situation::Normal,
            amendment: None,
            diagnostics: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style text setter.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.situation == Situation::Suppressed
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}
