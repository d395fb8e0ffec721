//! # rankeval-core
//!
//! Statistical evaluation engine for ranked-retrieval quality.
//!
//! Every operation is a pure function over in-memory inputs: relevance
//! judgment sequences, relevant-document counts, and ranked identifier lists.
//! Reading qrels or run files is left to callers such as `rankeval-cli`.
//!
//! ## Modules
//!
//! - [`evaluation`] - Precision@k, AP, MAP, gMAP and Kendall's tau
//! - [`config`] - Default cutoffs and significance-test thresholds
//! - [`error`] - Validation errors returned by every metric
//!
//! ## Features
//!
//! - `parallel` - score batch elements on the rayon thread pool

pub mod config;
pub mod error;
pub mod evaluation;

pub use error::{EvalError, EvalResult};
