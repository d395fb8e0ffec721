//! Error types for rankeval-core.
//!
//! Every metric validates its inputs at the function boundary and returns an
//! [`EvalError`] instead of panicking. Batch operations evaluate all elements
//! before failing so callers see every offending query at once.

use thiserror::Error;

/// Errors that can occur while computing an evaluation metric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// Depth `k` is outside `1..=len` for an unpadded precision computation
    #[error("Invalid depth k={k}: must be between 1 and {len}")]
    InvalidDepth { k: usize, len: usize },
    /// Total relevant-document count is zero, so AP has no normalizer
    #[error("Invalid normalizer: relevant document count must be greater than 0")]
    InvalidNormalizer,
    /// A relevance judgment sequence with no positions
    #[error("Relevance judgments are empty")]
    EmptyJudgments,
    /// A relevance value other than 0 or 1
    #[error("Non-binary relevance value {value} at position {position}")]
    NonBinaryRelevance { position: usize, value: u8 },
    /// Ranked lists passed to a correlation have different lengths
    #[error("Ranked lists differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
    /// Ranked lists passed to a correlation rank different identifiers
    #[error("Ranked lists do not contain the same identifiers")]
    SetMismatch,
    /// An identifier occurs more than once within a single ranked list
    #[error("Duplicate identifier at position {position} of the {list} ranking")]
    DuplicateIdentifier { list: RankingSide, position: usize },
    /// Too few items to define a rank correlation
    #[error("Rank correlation needs at least 2 items, got {len}")]
    TooFewItems { len: usize },
    /// A batch aggregate was requested over zero elements
    #[error("Cannot aggregate an empty batch")]
    EmptyBatch,
    /// One or more batch elements failed validation
    #[error("{} of the batch elements are invalid (first at index {}: {})", .failures.len(), first_index(.failures), first_reason(.failures))]
    InvalidBatch { failures: Vec<(usize, EvalError)> },
}

/// Which side of a ranked-list pair an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingSide {
    Left,
    Right,
}

impl std::fmt::Display for RankingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingSide::Left => f.write_str("left"),
            RankingSide::Right => f.write_str("right"),
        }
    }
}

fn first_index(failures: &[(usize, EvalError)]) -> usize {
    failures.first().map(|(index, _)| *index).unwrap_or_default()
}

fn first_reason(failures: &[(usize, EvalError)]) -> String {
    failures
        .first()
        .map(|(_, err)| err.to_string())
        .unwrap_or_default()
}

/// Shorthand result type for metric computations.
pub type EvalResult<T> = Result<T, EvalError>;
