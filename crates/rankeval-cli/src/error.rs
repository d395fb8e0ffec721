//! Input parsing errors for the CLI.

use thiserror::Error;

/// Errors raised while parsing pipe-delimited input files.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Line does not have the expected number of `|`-separated fields
    #[error("line {line}: expected {expected} '|'-separated fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// Relevance grade is not an integer
    #[error("line {line}: invalid relevance grade '{value}'")]
    InvalidGrade { line: usize, value: String },
    /// A required identifier field is blank
    #[error("line {line}: empty {field}")]
    EmptyField { line: usize, field: &'static str },
}
