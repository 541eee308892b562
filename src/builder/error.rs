//! Build errors for transition tables and machine builders.

use crate::table::TableViolation;
use thiserror::Error;

/// Errors that can occur when building tables and machines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .register()")]
    MissingInitialState,

    #[error("Invalid transition table: {}", describe(.0))]
    InvalidTable(Vec<TableViolation>),
}

fn describe(violations: &[TableViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_table_lists_every_violation() {
        let err = BuildError::InvalidTable(vec![
            TableViolation::DuplicateRule {
                from: "a".into(),
                to: "b".into(),
            },
            TableViolation::EmptyLabel {
                from: "".into(),
                to: "b".into(),
            },
        ]);

        assert_eq!(
            err.to_string(),
            "Invalid transition table: Rule 'a' -> 'b' is declared more than once; \
             Rule '' -> 'b' has an empty state label"
        );
    }
}
