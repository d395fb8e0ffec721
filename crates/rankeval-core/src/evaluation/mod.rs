//! Evaluation metrics for ranked retrieval.
//!
//! This module provides the standard Information Retrieval (IR) metrics for
//! binary relevance judgments, plus rank correlation for comparing two
//! systems' orderings.
//!
//! # Overview
//!
//! - **Binary relevance**: every ranked position is judged 0 (not relevant) or 1 (relevant)
//! - **External normalizer**: AP divides by the query's total relevant-document
//!   count, which is supplied by the caller, not counted from the list
//! - **Typed validation**: invalid depths, normalizers and batches return
//!   [`EvalError`](crate::error::EvalError) instead of panicking
//!
//! # Example
//!
//! ```
//! use rankeval_core::evaluation::{average_precision, mean_average_precision, JudgedList};
//!
//! let rel = vec![1, 1, 0, 0, 1, 0, 0, 1, 0, 0];
//! let ap = average_precision(&rel, 10).unwrap();
//! assert!((ap - 0.31).abs() < 1e-9);
//!
//! let batch = vec![JudgedList::new(rel, 10), JudgedList::new(vec![0, 1], 1)];
//! let map = mean_average_precision(&batch).unwrap();
//! assert!((map - 0.405).abs() < 1e-9);
//! ```
//!
//! # Metrics Reference
//!
//! | Metric | Description | Function |
//! |--------|-------------|----------|
//! | P@k | Fraction of top-k that are relevant | [`precision_at_k`] |
//! | P@k (padded) | P@k with unjudged tail counted as non-relevant | [`precision_at_k_padded`] |
//! | Mean P@k | P@k averaged over queries | [`mean_precision_at_k`] |
//! | AP | Precision averaged over relevant ranks | [`average_precision`] |
//! | MAP | Arithmetic mean of AP | [`mean_average_precision`] |
//! | gMAP | Geometric mean of AP | [`geometric_mean_average_precision`] |
//! | Kendall's tau | Agreement between two rankings | [`kendall_tau`] |

pub mod correlation;
pub mod metrics;
pub mod stats;

// Metrics
pub use metrics::{
    average_precision, average_precision_each, geometric_mean_average_precision,
    mean_average_precision, mean_precision_at_k, precision_at_k, precision_at_k_padded,
    BatchSummary, JudgedList, QueryMetrics,
};
// Correlation
pub use correlation::{align_rankings, kendall_tau, AlignedRanks, KendallTau, PValueMethod};
