//! Provision hierarchy model.
//!
//! The tree owns every provision in an arena; kinds, containment and
//! labelling conventions are declared in [`kind`] and [`numbering`].

pub mod factory;
pub mod kind;
pub mod numbering;
pub mod outline;
pub mod provision;
pub mod tree;

pub use factory::{DefaultFactory, ProvisionFactory};
pub use kind::{Indicators, ProvisionKind};
pub use numbering::{label_for, renumber_all};
pub use outline::{load_outline_file, load_outline_str, Outline, OutlineNode};
pub use provision::{AmendmentMetadata, Diagnostic, NodeId, Provision, Severity, Situation};
pub use tree::ProvisionTree;
