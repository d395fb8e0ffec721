//! Rank correlation between two orderings of the same items.
//!
//! [`kendall_tau`] compares two rankings of one identifier set, e.g. the
//! document lists two retrieval systems return for the same query. The
//! rankings are first aligned by identifier into two position vectors
//! ([`align_rankings`]), then concordant and discordant pairs are counted.
//!
//! # Ties
//!
//! Each identifier may appear only once per ranking. Duplicates are rejected
//! with [`EvalError::DuplicateIdentifier`], so the aligned position vectors
//! are always permutations and tau-b reduces to tau-a.
//!
//! # Example
//!
//! ```
//! use rankeval_core::evaluation::kendall_tau;
//!
//! let a = ["D", "E", "B", "A", "C"];
//! let b = ["B", "C", "A", "D", "E"];
//! let result = kendall_tau(&a, &b).unwrap();
//! assert!((result.tau - -0.4).abs() < 1e-12);
//! ```

use crate::config::KENDALL_EXACT_MAX_ITEMS;
use crate::error::{EvalError, EvalResult, RankingSide};
use crate::evaluation::stats::{kendall_asymptotic_p_value, kendall_exact_p_value};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Positions of each identifier in two rankings, ordered by identifier.
///
/// `left[i]` and `right[i]` are the 0-based positions of the i-th identifier
/// (in sorted identifier order) within the left and right rankings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRanks {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
}

impl AlignedRanks {
    /// Number of aligned identifiers.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Returns true if no identifiers were aligned.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// How the p-value of a [`KendallTau`] result was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PValueMethod {
    /// Exact null distribution of the discordant-pair count
    Exact,
    /// Normal approximation
    Asymptotic,
}

/// Kendall rank correlation with its two-sided significance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KendallTau {
    /// Correlation coefficient in [-1, 1]
    pub tau: f64,
    /// Two-sided p-value for the null hypothesis of no association
    pub p_value: f64,
    /// Distribution used for the p-value
    pub method: PValueMethod,
    /// Number of ranked items
    pub n: usize,
    /// Pairs ordered the same way in both rankings
    pub concordant: u64,
    /// Pairs ordered oppositely
    pub discordant: u64,
}

/// Aligns two rankings of the same identifiers into position vectors.
///
/// Builds an identifier → position map for each ranking and walks both in
/// identifier order.
///
/// # Errors
///
/// Checked in this order:
/// - [`EvalError::LengthMismatch`] if the rankings differ in length
/// - [`EvalError::DuplicateIdentifier`] if either ranking repeats an identifier
/// - [`EvalError::SetMismatch`] if the identifier sets differ
pub fn align_rankings<T: Ord>(left: &[T], right: &[T]) -> EvalResult<AlignedRanks> {
    if left.len() != right.len() {
        return Err(EvalError::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    let left_positions = position_map(left, RankingSide::Left)?;
    let right_positions = position_map(right, RankingSide::Right)?;

    if !left_positions.keys().eq(right_positions.keys()) {
        return Err(EvalError::SetMismatch);
    }

    Ok(AlignedRanks {
        left: left_positions.into_values().collect(),
        right: right_positions.into_values().collect(),
    })
}

/// Computes Kendall's tau between two rankings of the same identifiers.
///
/// # Formula
///
/// ```text
/// tau = (concordant - discordant) / (n(n-1)/2)
/// ```
///
/// Discordant pairs are counted as inversions of the right-hand positions
/// taken in left-hand order, in O(n log n).
///
/// The p-value is two-sided. It uses the exact null distribution for
/// rankings of up to [`KENDALL_EXACT_MAX_ITEMS`] items (or when at most one
/// pair separates the rankings from perfect agreement or disagreement) and
/// the normal approximation otherwise.
///
/// # Errors
///
/// Everything [`align_rankings`] rejects, plus
/// [`EvalError::TooFewItems`] for rankings of fewer than two items.
pub fn kendall_tau<T: Ord>(left: &[T], right: &[T]) -> EvalResult<KendallTau> {
    let aligned = align_rankings(left, right)?;
    let n = aligned.len();
    if n < 2 {
        return Err(EvalError::TooFewItems { len: n });
    }

    // right positions listed in left-rank order; inversions are discordant pairs
    let mut right_by_left = vec![0usize; n];
    for (&l, &r) in aligned.left.iter().zip(aligned.right.iter()) {
        right_by_left[l] = r;
    }
    let discordant = merge_sort_inversions(&mut right_by_left);

    let total_pairs = (n as u64) * (n as u64 - 1) / 2;
    let concordant = total_pairs - discordant;
    let statistic = concordant as f64 - discordant as f64;
    let tau = statistic / total_pairs as f64;

    let closest_extreme = discordant.min(total_pairs - discordant);
    let (p_value, method) = if n <= KENDALL_EXACT_MAX_ITEMS || closest_extreme <= 1 {
        (
            kendall_exact_p_value(n, closest_extreme as usize),
            PValueMethod::Exact,
        )
    } else {
        (
            kendall_asymptotic_p_value(n, statistic),
            PValueMethod::Asymptotic,
        )
    };
    debug!(n, tau, p_value, ?method, "Computed Kendall's tau");

    Ok(KendallTau {
        tau,
        p_value,
        method,
        n,
        concordant,
        discordant,
    })
}

fn position_map<T: Ord>(ranking: &[T], side: RankingSide) -> EvalResult<BTreeMap<&T, usize>> {
    let mut positions = BTreeMap::new();
    for (position, id) in ranking.iter().enumerate() {
        if positions.insert(id, position).is_some() {
            return Err(EvalError::DuplicateIdentifier {
                list: side,
                position,
            });
        }
    }
    Ok(positions)
}

/// Count inversions in a slice using merge sort. O(n log n).
///
/// An inversion is a pair `(i, j)` where `i < j` but `arr[i] > arr[j]`.
/// The slice is sorted in place as a side effect.
fn merge_sort_inversions(arr: &mut [usize]) -> u64 {
    if arr.len() <= 1 {
        return 0;
    }
    let mut scratch = vec![0usize; arr.len()];
    merge_sort_inversions_with_scratch(arr, &mut scratch)
}

fn merge_sort_inversions_with_scratch(arr: &mut [usize], scratch: &mut [usize]) -> u64 {
    let n = arr.len();
    if n <= 1 {
        return 0;
    }
    let mid = n / 2;
    let (left, right) = arr.split_at_mut(mid);
    let (scratch_left, scratch_right) = scratch.split_at_mut(mid);

    let mut count = merge_sort_inversions_with_scratch(left, scratch_left)
        + merge_sort_inversions_with_scratch(right, scratch_right);

    let (mut i, mut j, mut out) = (0usize, 0usize, 0usize);
    while i < left.len() && j < right.len() {
        if left[i] <= right[j] {
            scratch[out] = left[i];
            i += 1;
        } else {
            scratch[out] = right[j];
            count += (left.len() - i) as u64;
            j += 1;
        }
        out += 1;
    }

    if i < left.len() {
        let left_remaining = left.len() - i;
        scratch[out..out + left_remaining].copy_from_slice(&left[i..]);
        out += left_remaining;
    }
    if j < right.len() {
        scratch[out..n].copy_from_slice(&right[j..]);
    }

    arr.copy_from_slice(&scratch[..n]);
    count
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// O(n²) reference count over aligned position vectors.
    fn naive_tau(a: &[usize], b: &[usize]) -> f64 {
        let n = a.len();
        let mut score = 0i64;
        for i in 0..n {
            for j in i + 1..n {
                let da = a[i] as i64 - a[j] as i64;
                let db = b[i] as i64 - b[j] as i64;
                score += (da * db).signum();
            }
        }
        score as f64 / (n * (n - 1) / 2) as f64
    }

    #[test]
    fn test_align_rankings_textbook() {
        let a = ["D", "E", "B", "A", "C"];
        let b = ["B", "C", "A", "D", "E"];
        let aligned = align_rankings(&a, &b).unwrap();

        // Identifier order A, B, C, D, E
        assert_eq!(aligned.left, vec![3, 2, 4, 0, 1]);
        assert_eq!(aligned.right, vec![2, 0, 1, 3, 4]);
    }

    #[test]
    fn test_kendall_tau_textbook() {
        let a = ["D", "E", "B", "A", "C"];
        let b = ["B", "C", "A", "D", "E"];
        let result = kendall_tau(&a, &b).unwrap();

        assert!((result.tau - -0.4).abs() < 1e-12);
        assert_eq!(result.concordant, 3);
        assert_eq!(result.discordant, 7);
        // 2 * 29 / 5!
        assert!((result.p_value - 0.483_333_333).abs() < 1e-6);
        assert_eq!(result.method, PValueMethod::Exact);
    }

    #[test]
    fn test_kendall_tau_self_correlation() {
        let x = ["q", "w", "e", "r", "t"];
        let result = kendall_tau(&x, &x).unwrap();
        assert_eq!(result.tau, 1.0);
        assert!((result.p_value - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_kendall_tau_reversed() {
        let x: Vec<u32> = (0..8).collect();
        let rev: Vec<u32> = x.iter().rev().copied().collect();
        let result = kendall_tau(&x, &rev).unwrap();
        assert_eq!(result.tau, -1.0);
        assert_eq!(result.discordant, 28);
    }

    #[test]
    fn test_kendall_tau_two_items() {
        let result = kendall_tau(&["a", "b"], &["b", "a"]).unwrap();
        assert_eq!(result.tau, -1.0);
        assert_eq!(result.p_value, 1.0);
    }

    #[test]
    fn test_kendall_tau_large_uses_asymptotic() {
        let x: Vec<u32> = (0..100).collect();
        // Swap adjacent pairs: 50 discordant pairs out of 4950
        let mut y = x.clone();
        for pair in y.chunks_mut(2) {
            pair.swap(0, 1);
        }
        let result = kendall_tau(&x, &y).unwrap();
        assert_eq!(result.method, PValueMethod::Asymptotic);
        assert_eq!(result.discordant, 50);
        assert!(result.tau > 0.97);
        assert!(result.p_value < 1e-10);
    }

    #[test]
    fn test_kendall_tau_large_near_perfect_uses_exact() {
        let x: Vec<u32> = (0..50).collect();
        let mut y = x.clone();
        y.swap(10, 11);
        let result = kendall_tau(&x, &y).unwrap();
        assert_eq!(result.method, PValueMethod::Exact);
        assert_eq!(result.discordant, 1);
    }

    #[test]
    fn test_kendall_tau_matches_naive() {
        // Deterministic pseudo-random permutations via multiplicative hashing
        for seed in 1..20u64 {
            let n = 7 + (seed as usize % 30);
            let mut ids: Vec<u64> = (0..n as u64).collect();
            ids.sort_by_key(|&v| (v.wrapping_mul(2_654_435_761).wrapping_add(seed * 97)) % 1_000_003);
            let base: Vec<u64> = (0..n as u64).collect();

            let aligned = align_rankings(&base, &ids).unwrap();
            let result = kendall_tau(&base, &ids).unwrap();
            let naive = naive_tau(&aligned.left, &aligned.right);
            assert!((result.tau - naive).abs() < 1e-12, "seed {}", seed);
        }
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            kendall_tau(&["a", "b", "c"], &["a", "b"]),
            Err(EvalError::LengthMismatch { left: 3, right: 2 })
        );
    }

    #[test]
    fn test_set_mismatch() {
        assert_eq!(
            kendall_tau(&["a", "b", "c"], &["a", "b", "d"]),
            Err(EvalError::SetMismatch)
        );
    }

    #[test]
    fn test_duplicate_identifier() {
        assert_eq!(
            kendall_tau(&["a", "b", "a"], &["a", "b", "c"]),
            Err(EvalError::DuplicateIdentifier {
                list: RankingSide::Left,
                position: 2
            })
        );
        // Same multiset on both sides is still rejected
        assert_eq!(
            kendall_tau(&["a", "b", "c"], &["c", "c", "b"]),
            Err(EvalError::DuplicateIdentifier {
                list: RankingSide::Right,
                position: 1
            })
        );
    }

    #[test]
    fn test_too_few_items() {
        assert_eq!(
            kendall_tau(&["a"], &["a"]),
            Err(EvalError::TooFewItems { len: 1 })
        );
        let empty: [&str; 0] = [];
        assert_eq!(
            kendall_tau(&empty, &empty),
            Err(EvalError::TooFewItems { len: 0 })
        );
    }

    #[test]
    fn test_merge_sort_inversions() {
        let mut arr = vec![3, 1, 2, 0];
        assert_eq!(merge_sort_inversions(&mut arr), 5);
        assert_eq!(arr, vec![0, 1, 2, 3]);
    }
}
