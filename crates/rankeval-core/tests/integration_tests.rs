//! End-to-end tests for the public evaluation API.
//!
//! These tests walk through the worked examples of a typical IR evaluation:
//! 1. Per-query metrics: precision@k and AP for a judged ranking
//! 2. Batch aggregates: MAP, gMAP and mean precision@k over several queries
//! 3. System comparison: Kendall's tau between two rankings of one pool
//!
//! Run with: `cargo test -p rankeval-core --test integration_tests`

use rankeval_core::config::DEFAULT_K_VALUES;
use rankeval_core::evaluation::{
    average_precision, geometric_mean_average_precision, kendall_tau, mean_average_precision,
    mean_precision_at_k, precision_at_k, precision_at_k_padded, BatchSummary, JudgedList,
    PValueMethod, QueryMetrics,
};
use rankeval_core::EvalError;

// ============================================================================
// Test Fixtures
// ============================================================================

/// Ranked list from Zhai & Massung, Chapter 9: relevant at ranks 1, 2, 5, 8.
fn textbook_ranking() -> Vec<u8> {
    vec![1, 1, 0, 0, 1, 0, 0, 1, 0, 0]
}

/// Four queries with ten judged positions each.
fn four_query_batch() -> Vec<JudgedList> {
    vec![
        JudgedList::new(textbook_ranking(), 10),
        JudgedList::new(vec![1, 1, 0, 1, 0, 0, 1, 1, 0, 0], 10),
        JudgedList::new(vec![0, 0, 1, 1, 0, 1, 0, 1, 0, 1], 10),
        JudgedList::new(vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1], 10),
    ]
}

// ============================================================================
// Per-query metrics
// ============================================================================

#[test]
fn test_textbook_precision_curve() {
    let rel = textbook_ranking();
    let expected = [1.0, 1.0, 0.667, 0.5, 0.6, 0.5, 0.429, 0.5, 0.444, 0.4];

    let curve: Vec<f64> = (1..=rel.len())
        .map(|k| precision_at_k(&rel, k).unwrap())
        .collect();

    for (k, (got, want)) in curve.iter().zip(expected.iter()).enumerate() {
        assert!(
            (got - want).abs() < 0.001,
            "P@{}: got {:.3}, want {:.3}",
            k + 1,
            got,
            want
        );
    }
}

#[test]
fn test_textbook_average_precision() {
    let rel = textbook_ranking();
    // (P@1 + P@2 + P@5 + P@8) / 10 = (1 + 1 + 0.6 + 0.5) / 10
    let ap = average_precision(&rel, 10).unwrap();
    assert!((ap - 0.31).abs() < 1e-9, "AP = {}", ap);
}

#[test]
fn test_average_precision_non_increasing_in_normalizer() {
    let rel = textbook_ranking();
    let mut previous = f64::INFINITY;
    for r in 1..=50 {
        let ap = average_precision(&rel, r).unwrap();
        assert!(ap <= previous, "AP rose from {} to {} at R={}", previous, ap, r);
        assert!(ap >= 0.0);
        previous = ap;
    }
}

#[test]
fn test_padded_precision_past_judged_depth() {
    let rel = textbook_ranking();
    let full_depth = precision_at_k(&rel, rel.len()).unwrap();

    for k in rel.len() + 1..=30 {
        let padded = precision_at_k_padded(&rel, k).unwrap();
        let mut extended = rel.clone();
        extended.resize(k, 0);
        assert_eq!(padded, precision_at_k(&extended, k).unwrap());
        assert!(padded <= full_depth);
    }
    assert!(matches!(
        precision_at_k(&rel, 11),
        Err(EvalError::InvalidDepth { k: 11, len: 10 })
    ));
}

#[test]
fn test_query_metrics_at_default_cutoffs() {
    let metrics = QueryMetrics::compute(&textbook_ranking(), 10, DEFAULT_K_VALUES).unwrap();

    let cutoffs: Vec<usize> = metrics.precision_at_k.keys().copied().collect();
    assert_eq!(cutoffs, DEFAULT_K_VALUES);
    assert!((metrics.precision_at_k[&10] - 0.4).abs() < 1e-12);
    assert!((metrics.precision_at_k[&20] - 0.2).abs() < 1e-12);
}

// ============================================================================
// Batch aggregates
// ============================================================================

#[test]
fn test_map_and_gmap_over_batch() {
    let batch = four_query_batch();
    let aps: Vec<f64> = batch
        .iter()
        .map(|list| list.average_precision().unwrap())
        .collect();

    let map = mean_average_precision(&batch).unwrap();
    let gmap = geometric_mean_average_precision(&batch).unwrap();

    let expected_map = aps.iter().sum::<f64>() / aps.len() as f64;
    let expected_gmap = (aps.iter().map(|ap| ap.ln()).sum::<f64>() / aps.len() as f64).exp();

    assert!((map - expected_map).abs() < 1e-12);
    assert!((gmap - expected_gmap).abs() < 1e-12);
    assert!(gmap < map, "AM-GM: gMAP {} should be below MAP {}", gmap, map);
}

#[test]
fn test_batch_order_does_not_change_aggregates() {
    let batch = four_query_batch();
    let mut reversed = batch.clone();
    reversed.reverse();

    let map = mean_average_precision(&batch).unwrap();
    let map_rev = mean_average_precision(&reversed).unwrap();
    let gmap = geometric_mean_average_precision(&batch).unwrap();
    let gmap_rev = geometric_mean_average_precision(&reversed).unwrap();

    assert!((map - map_rev).abs() < 1e-12);
    assert!((gmap - gmap_rev).abs() < 1e-12);
}

#[test]
fn test_zero_ap_query_zeroes_gmap_only() {
    let mut batch = four_query_batch();
    let map_before = mean_average_precision(&batch).unwrap();

    batch.push(JudgedList::new(vec![0; 10], 5));

    let gmap = geometric_mean_average_precision(&batch).unwrap();
    let map = mean_average_precision(&batch).unwrap();

    assert_eq!(gmap, 0.0);
    assert!((map - map_before * 4.0 / 5.0).abs() < 1e-12);
}

#[test]
fn test_batch_summary_matches_individual_metrics() {
    let batch = four_query_batch();
    let summary = BatchSummary::compute(&batch, &[5, 10]).unwrap();
    let lists: Vec<Vec<u8>> = batch.iter().map(|l| l.relevance.clone()).collect();

    assert_eq!(summary.num_queries, 4);
    assert_eq!(summary.map, mean_average_precision(&batch).unwrap());
    assert_eq!(summary.gmap, geometric_mean_average_precision(&batch).unwrap());
    assert!((summary.mean_precision_at_k[&5] - mean_precision_at_k(&lists, 5).unwrap()).abs() < 1e-12);
    assert!((summary.mean_precision_at_k[&10] - mean_precision_at_k(&lists, 10).unwrap()).abs() < 1e-12);
}

#[test]
fn test_batch_errors() {
    assert_eq!(mean_average_precision(&[]), Err(EvalError::EmptyBatch));

    let mut batch = four_query_batch();
    batch[1].relevant_count = 0;
    batch[3].relevance[4] = 2;

    match geometric_mean_average_precision(&batch) {
        Err(EvalError::InvalidBatch { failures }) => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0], (1, EvalError::InvalidNormalizer));
            assert_eq!(
                failures[1],
                (
                    3,
                    EvalError::NonBinaryRelevance {
                        position: 4,
                        value: 2
                    }
                )
            );
        }
        other => panic!("Expected InvalidBatch, got {:?}", other),
    }
}

// ============================================================================
// Rank correlation
// ============================================================================

#[test]
fn test_kendall_tau_two_systems() {
    let system_a = ["D", "E", "B", "A", "C"];
    let system_b = ["B", "C", "A", "D", "E"];

    let result = kendall_tau(&system_a, &system_b).unwrap();
    assert!((result.tau + 0.4).abs() < 1e-12);
    assert!((result.p_value - 0.4833).abs() < 1e-3);
    assert_eq!(result.method, PValueMethod::Exact);

    // Symmetric in its arguments
    let swapped = kendall_tau(&system_b, &system_a).unwrap();
    assert_eq!(swapped.tau, result.tau);
    assert_eq!(swapped.p_value, result.p_value);
}

#[test]
fn test_kendall_tau_owned_identifiers() {
    let a: Vec<String> = (0..40).map(|i| format!("doc-{:03}", i)).collect();
    let b: Vec<String> = a.iter().rev().cloned().collect();

    let same = kendall_tau(&a, &a).unwrap();
    let reversed = kendall_tau(&a, &b).unwrap();

    assert_eq!(same.tau, 1.0);
    assert_eq!(reversed.tau, -1.0);
    // c = 0 stays on the exact path regardless of size
    assert_eq!(same.method, PValueMethod::Exact);
    assert!(same.p_value < 1e-40);
}
