//! Error types for the editing core.
//!
//! Uses the dual-error pattern: `EditorError` for library consumers with
//! detailed context, and a crate-wide `Result` alias. Structural-validity
//! findings are not errors; they travel as [`Diagnostic`](crate::model::Diagnostic)
//! data attached to the provisions.

use thiserror::Error;

use crate::model::{NodeId, ProvisionKind};
use crate::rules::Action;

/// Main error type for the editing core.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The node id does not refer to a live provision in the tree.
    #[error("Provision {0} does not exist in this articulation")]
    NodeNotFound(NodeId),

    /// A provision kind was placed under a parent that cannot contain it.
    #[error("{child:?} cannot be placed under {parent:?}")]
    InvalidContainment {
        parent: ProvisionKind,
        child: ProvisionKind,
    },

    /// An action was invoked on a node whose catalog does not offer it.
    #[error("Action '{action}' is not available for provision {node}")]
    ActionNotAvailable { action: Action, node: NodeId },

    /// The action needs user input and must go through its dedicated entry point.
    #[error("Action '{0}' requires additional input")]
    ActionRequiresInput(Action),

    /// Invalid LexML URN for the amended norm.
    #[error("Invalid norm URN: '{0}'. Expected urn:lex:br:<authority>:<type>:<YYYY-MM-DD>;<number>")]
    InvalidNormUrn(String),

    /// An authored provision number is above the configured maximum.
    #[error("Provision number {number} is out of range (max {max})")]
    NumberOutOfRange { number: u32, max: u32 },

    /// Document input exceeds the configured size limit.
    #[error("Document exceeds maximum size ({size} bytes, max {max})")]
    DocumentTooLarge { size: usize, max: usize },

    /// Document input is structurally unusable.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Validation found errors (used by the command-line front end).
    #[error("{0} provision(s) with validation errors")]
    ValidationFailed(usize),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for editing operations.
pub type Result<T> = std::result::Result<T, EditorError>;
