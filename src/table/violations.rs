//! Problems found while validating a transition table.

use thiserror::Error;

/// A single defect in a transition table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TableViolation {
    #[error("Rule '{from}' -> '{to}' is declared more than once")]
    DuplicateRule { from: String, to: String },

    #[error("Rule '{from}' -> '{to}' has an empty state label")]
    EmptyLabel { from: String, to: String },
}
