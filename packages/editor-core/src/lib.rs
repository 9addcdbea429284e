//! lexedit - Structured editing core for legislative text.
//!
//! The core keeps one document as a tree of provisions (articles,
//! paragraphs, items and their groupings), validates the text of each
//! provision against Brazilian legislative drafting rules, offers the
//! editing actions that make sense for each provision and applies them as
//! atomic, undoable transitions that emit typed events for a rendering
//! surface.
//!
//! # Example
//!
//! ```
//! use lexedit_core::model::{load_outline_str, DefaultFactory};
//! use lexedit_core::EditorState;
//!
//! let outline = r#"
//! provisions:
//!   - kind: article
//!     text: "Esta Lei entra em vigor na data de sua publicação."
//! "#;
//! let tree = load_outline_str(outline, &DefaultFactory).unwrap();
//! let (state, events) = EditorState::load(tree);
//!
//! assert_eq!(events.names(), vec!["DocumentLoaded"]);
//! assert_eq!(state.elements()[0].label, "Artigo único.");
//! ```
//!
//! # Architecture
//!
//! - [`model`]: Provision kinds, the arena tree, the factory and the outline loader
//! - [`hierarchy`]: Read-only positional and amendment-block queries
//! - [`content`]: Text indicators and the content validator
//! - [`rules`]: Per-kind action catalog
//! - [`executor`]: Tree surgery behind each action
//! - [`reducer`]: Document state machine with undo/redo
//! - [`element`] and [`events`]: Read model and event batches
//! - [`citation`]: Quoted citation of a provision
//! - [`cli`]: Command-line interface

pub mod citation;
pub mod cli;
pub mod config;
pub mod content;
pub mod element;
pub mod error;
pub mod events;
pub mod executor;
pub mod hierarchy;
pub mod history;
pub mod model;
pub mod reducer;
pub mod rules;
pub mod text;

// Re-export commonly used items
pub use element::Element;
pub use error::{EditorError, Result};
pub use events::{EventBatch, StateEvent};
pub use model::{NodeId, ProvisionKind, ProvisionTree};
pub use reducer::EditorState;
pub use rules::{Action, ProvisionSlot};
