//! Precision and average-precision metrics over binary relevance judgments.
//!
//! This module implements the classic set of ranked-retrieval metrics:
//! - Precision@k (strict and zero-padded)
//! - Mean Precision@k across queries
//! - AP (Average Precision), normalized by the true relevant-document count
//! - MAP (Mean Average Precision)
//! - gMAP (Geometric Mean Average Precision), aggregated in log space
//!
//! All functions take a relevance judgment sequence: one `0`/`1` value per
//! rank position, top result first.
//!
//! # References
//!
//! - Zhai & Massung (2016). "Text Data Management and Analysis", Chapter 9
//! - Voorhees & Harman (2005). "TREC: Experiment and Evaluation in Information Retrieval"

use crate::error::{EvalError, EvalResult};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Judged ranked list for a single query.
///
/// Pairs the binary relevance of each ranked position with the number of
/// relevant documents the query has in the whole corpus. The count is usually
/// larger than the number of `1`s in `relevance`, since only a prefix of the
/// ranking is judged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgedList {
    /// Binary relevance per rank position (1 = relevant)
    pub relevance: Vec<u8>,
    /// Total relevant documents for the query in the corpus
    pub relevant_count: usize,
}

impl JudgedList {
    /// Creates a judged list from relevance values and the corpus-wide relevant count.
    pub fn new(relevance: Vec<u8>, relevant_count: usize) -> Self {
        Self {
            relevance,
            relevant_count,
        }
    }

    /// Number of judged rank positions.
    pub fn len(&self) -> usize {
        self.relevance.len()
    }

    /// Returns true if no rank position was judged.
    pub fn is_empty(&self) -> bool {
        self.relevance.is_empty()
    }

    /// Number of relevant documents present in the judged ranking.
    pub fn relevant_found(&self) -> usize {
        count_relevant(&self.relevance)
    }

    /// Average precision of this list.
    pub fn average_precision(&self) -> EvalResult<f64> {
        average_precision(&self.relevance, self.relevant_count)
    }
}

/// Metrics for a single query's judged ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMetrics {
    /// Average precision normalized by the corpus-wide relevant count
    pub average_precision: f64,
    /// Padded precision@k for each requested k
    pub precision_at_k: BTreeMap<usize, f64>,
    /// Number of judged rank positions
    pub judged: usize,
    /// Relevant documents found in the judged ranking
    pub relevant_found: usize,
}

impl QueryMetrics {
    /// Computes AP and precision at each of `k_values` for one ranking.
    ///
    /// Precision uses [`precision_at_k_padded`], so cutoffs beyond the judged
    /// depth are allowed and count unjudged positions as non-relevant.
    pub fn compute(relevance: &[u8], relevant_count: usize, k_values: &[usize]) -> EvalResult<Self> {
        let average_precision = average_precision(relevance, relevant_count)?;

        let mut precision_map = BTreeMap::new();
        for &k in k_values {
            precision_map.insert(k, precision_at_k_padded(relevance, k)?);
        }

        Ok(Self {
            average_precision,
            precision_at_k: precision_map,
            judged: relevance.len(),
            relevant_found: count_relevant(relevance),
        })
    }
}

/// Aggregate metrics over a batch of queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Number of queries aggregated
    pub num_queries: usize,
    /// Mean Average Precision
    pub map: f64,
    /// Geometric Mean Average Precision
    pub gmap: f64,
    /// Mean padded precision@k for each requested k
    pub mean_precision_at_k: BTreeMap<usize, f64>,
}

impl BatchSummary {
    /// Computes MAP, gMAP and mean precision@k for a batch.
    ///
    /// Fails with [`EvalError::EmptyBatch`] for an empty batch and with
    /// [`EvalError::InvalidBatch`] listing every invalid query otherwise.
    #[instrument(skip_all, fields(queries = batch.len()))]
    pub fn compute(batch: &[JudgedList], k_values: &[usize]) -> EvalResult<Self> {
        let average_precisions = collect_batch(average_precision_each(batch))?;

        let mut mean_precision = BTreeMap::new();
        for &k in k_values {
            let precisions = collect_batch(
                batch
                    .iter()
                    .map(|list| precision_at_k_padded(&list.relevance, k))
                    .collect(),
            )?;
            mean_precision.insert(k, arithmetic_mean(&precisions));
        }

        Ok(Self {
            num_queries: batch.len(),
            map: arithmetic_mean(&average_precisions),
            gmap: geometric_mean(&average_precisions),
            mean_precision_at_k: mean_precision,
        })
    }
}

// ============================================================================
// Precision@k
// ============================================================================

/// Computes Precision@k.
///
/// Precision@k is the fraction of the top k positions that are relevant.
///
/// # Formula
///
/// ```text
/// P@k = (rel[0] + ... + rel[k-1]) / k
/// ```
///
/// # Errors
///
/// - [`EvalError::InvalidDepth`] unless `1 <= k <= relevance.len()`
/// - [`EvalError::NonBinaryRelevance`] if any value is not 0 or 1
///
/// # Example
///
/// ```
/// use rankeval_core::evaluation::precision_at_k;
///
/// let rel = [1, 1, 0, 0, 1];
/// assert_eq!(precision_at_k(&rel, 2).unwrap(), 1.0);
/// assert_eq!(precision_at_k(&rel, 5).unwrap(), 0.6);
/// ```
pub fn precision_at_k(relevance: &[u8], k: usize) -> EvalResult<f64> {
    if k == 0 || k > relevance.len() {
        return Err(EvalError::InvalidDepth {
            k,
            len: relevance.len(),
        });
    }
    validate_judgments(relevance)?;

    Ok(count_relevant(&relevance[..k]) as f64 / k as f64)
}

/// Computes Precision@k, treating positions past the end of the list as non-relevant.
///
/// Equivalent to extending `relevance` with zeros up to length `k` and calling
/// [`precision_at_k`]. This gives a conservative lower bound when the judged
/// list is shorter than the requested depth.
///
/// # Errors
///
/// - [`EvalError::InvalidDepth`] if `k == 0`
/// - [`EvalError::EmptyJudgments`] if `relevance` is empty
/// - [`EvalError::NonBinaryRelevance`] if any value is not 0 or 1
pub fn precision_at_k_padded(relevance: &[u8], k: usize) -> EvalResult<f64> {
    if k == 0 {
        return Err(EvalError::InvalidDepth {
            k,
            len: relevance.len(),
        });
    }
    if k <= relevance.len() {
        return precision_at_k(relevance, k);
    }
    validate_judgments(relevance)?;

    // Padding contributes zeros only, so the numerator is the full-list count
    Ok(count_relevant(relevance) as f64 / k as f64)
}

/// Computes mean Precision@k across several ranked lists at one depth.
///
/// Every list must satisfy the strict bound of [`precision_at_k`]; pad short
/// lists beforehand if deeper cutoffs are needed.
///
/// # Errors
///
/// - [`EvalError::EmptyBatch`] if `lists` is empty
/// - [`EvalError::InvalidBatch`] with each failing list's index and error
#[instrument(skip_all, fields(queries = lists.len(), k))]
pub fn mean_precision_at_k<R: AsRef<[u8]>>(lists: &[R], k: usize) -> EvalResult<f64> {
    let precisions = collect_batch(
        lists
            .iter()
            .map(|rel| precision_at_k(rel.as_ref(), k))
            .collect(),
    )?;
    Ok(arithmetic_mean(&precisions))
}

// ============================================================================
// AP (Average Precision)
// ============================================================================

/// Computes Average Precision for a single query.
///
/// Sums Precision@j over every relevant position j and divides by the total
/// number of relevant documents for the query, which is supplied by the
/// caller rather than inferred from the list. Relevant documents that were
/// never retrieved therefore contribute zero precision.
///
/// # Formula
///
/// ```text
/// AP = (1 / R) * Σ P@j * rel[j-1]   for j in 1..=N
/// ```
///
/// # Arguments
///
/// * `relevance` - Binary relevance per rank position, top result first
/// * `relevant_count` - Total relevant documents for the query (`R`)
///
/// # Returns
///
/// AP in `[0, 1]` whenever `relevant_count` is at least the number of `1`s
/// in `relevance`. Returns 0.0 for a list with no relevant positions. The
/// count is not checked against the list, so an understated count can push
/// the result above 1.
///
/// # Errors
///
/// - [`EvalError::EmptyJudgments`] if `relevance` is empty
/// - [`EvalError::NonBinaryRelevance`] if any value is not 0 or 1
/// - [`EvalError::InvalidNormalizer`] if `relevant_count == 0`
pub fn average_precision(relevance: &[u8], relevant_count: usize) -> EvalResult<f64> {
    validate_judgments(relevance)?;
    if relevant_count == 0 {
        return Err(EvalError::InvalidNormalizer);
    }

    let mut precision_sum = 0.0;
    let mut relevant_seen = 0usize;

    for (i, &rel) in relevance.iter().enumerate() {
        if rel == 1 {
            relevant_seen += 1;
            // Precision@(i+1)
            precision_sum += relevant_seen as f64 / (i + 1) as f64;
        }
    }

    Ok(precision_sum / relevant_count as f64)
}

/// Computes Average Precision for every list in a batch.
///
/// Results are returned in batch order, one per list, so callers can report
/// per-query failures. With the `parallel` feature the lists are scored on
/// the rayon pool; the output order is unchanged.
pub fn average_precision_each(batch: &[JudgedList]) -> Vec<EvalResult<f64>> {
    #[cfg(feature = "parallel")]
    {
        batch
            .par_iter()
            .map(JudgedList::average_precision)
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        batch.iter().map(JudgedList::average_precision).collect()
    }
}

// ============================================================================
// MAP / gMAP
// ============================================================================

/// Computes Mean Average Precision over a batch of queries.
///
/// MAP is the arithmetic mean of [`average_precision`] across the batch.
/// Batch order does not affect the result beyond floating-point summation,
/// which always runs left to right.
///
/// # Errors
///
/// - [`EvalError::EmptyBatch`] if `batch` is empty
/// - [`EvalError::InvalidBatch`] with each failing query's index and error
#[instrument(skip_all, fields(queries = batch.len()))]
pub fn mean_average_precision(batch: &[JudgedList]) -> EvalResult<f64> {
    let average_precisions = collect_batch(average_precision_each(batch))?;
    Ok(arithmetic_mean(&average_precisions))
}

/// Computes Geometric Mean Average Precision over a batch of queries.
///
/// gMAP is `exp(mean(ln(AP)))`, computed in log space so products of many
/// small AP values do not underflow. It rewards improvements on poorly
/// performing queries more than MAP does.
///
/// A query with AP = 0 drives the aggregate to exactly 0. This is the
/// intended outcome (the mean of logs is -inf), not an error.
///
/// # Errors
///
/// Same as [`mean_average_precision`].
#[instrument(skip_all, fields(queries = batch.len()))]
pub fn geometric_mean_average_precision(batch: &[JudgedList]) -> EvalResult<f64> {
    let average_precisions = collect_batch(average_precision_each(batch))?;
    Ok(geometric_mean(&average_precisions))
}

// ============================================================================
// Internal helpers
// ============================================================================

fn validate_judgments(relevance: &[u8]) -> EvalResult<()> {
    if relevance.is_empty() {
        return Err(EvalError::EmptyJudgments);
    }
    match relevance.iter().position(|&value| value > 1) {
        Some(position) => Err(EvalError::NonBinaryRelevance {
            position,
            value: relevance[position],
        }),
        None => Ok(()),
    }
}

#[inline]
fn count_relevant(relevance: &[u8]) -> usize {
    relevance.iter().filter(|&&rel| rel == 1).count()
}

/// Splits per-element results into values or a single batch error.
fn collect_batch(results: Vec<EvalResult<f64>>) -> EvalResult<Vec<f64>> {
    if results.is_empty() {
        return Err(EvalError::EmptyBatch);
    }

    let mut values = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => values.push(value),
            Err(err) => failures.push((index, err)),
        }
    }

    if failures.is_empty() {
        Ok(values)
    } else {
        Err(EvalError::InvalidBatch { failures })
    }
}

/// Arithmetic mean, summed left to right. Callers guarantee a non-empty slice.
fn arithmetic_mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Geometric mean in log space with an explicit zero path.
fn geometric_mean(values: &[f64]) -> f64 {
    if let Some(index) = values.iter().position(|&v| v == 0.0) {
        debug!(index, "Zero average precision in batch, gMAP is 0");
        return 0.0;
    }

    let mean_log = values.iter().map(|v| v.ln()).sum::<f64>() / values.len() as f64;
    mean_log.exp()
}

// ============================================================================
// Tests
// ============================================================================
