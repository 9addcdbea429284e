//! Content rules for provision text.

pub mod affins;
pub mod indicators;
pub mod validator;

pub use affins::affins;
pub use indicators::normalize_if_omissis;
pub use validator::{revalidate, validate, validate_tree};
