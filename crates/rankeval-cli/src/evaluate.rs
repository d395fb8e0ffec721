//! Evaluation of runs against qrels, and rank correlation between runs.
//!
//! This is the glue between the file formats and `rankeval-core`: each
//! query's ranking is converted into a binary relevance sequence plus the
//! query's total relevant count, then scored with the core metrics.

use crate::qrels::Qrels;
use crate::run::Run;
use anyhow::{Context, Result};
use rankeval_core::evaluation::{kendall_tau, BatchSummary, JudgedList, KendallTau, QueryMetrics};
use serde::Serialize;
use tracing::{info, warn};

/// Full result of `rankeval evaluate`.
#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub k_values: Vec<usize>,
    pub summary: BatchSummary,
    pub queries: Vec<QueryEvaluation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedQuery>,
}

/// Metrics for one evaluated query.
#[derive(Debug, Serialize)]
pub struct QueryEvaluation {
    pub query_id: String,
    pub relevant_count: usize,
    #[serde(flatten)]
    pub metrics: QueryMetrics,
}

/// A query left out of the aggregates, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedQuery {
    pub query_id: String,
    pub reason: String,
}

/// Full result of `rankeval correlate`.
#[derive(Debug, Serialize)]
pub struct CorrelationReport {
    pub queries: Vec<QueryCorrelation>,
}

/// Kendall's tau for one query, or why it could not be computed.
#[derive(Debug, Serialize)]
pub struct QueryCorrelation {
    pub query_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kendall: Option<KendallTau>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Binary relevance of each ranked document for a query.
pub fn relevance_sequence(qrels: &Qrels, query_id: &str, ranking: &[String]) -> Vec<u8> {
    ranking
        .iter()
        .map(|doc_id| u8::from(qrels.is_relevant(query_id, doc_id)))
        .collect()
}

/// Scores every query in `run` against `qrels`.
///
/// Queries without relevant judgments (AP has no normalizer) and judged
/// queries missing from the run are skipped and listed in the report.
/// Cutoffs are reported in ascending order with repeats removed.
pub fn evaluate_run(run: &Run, qrels: &Qrels, k_values: &[usize]) -> Result<EvaluationReport> {
    let mut cutoffs = k_values.to_vec();
    cutoffs.sort_unstable();
    cutoffs.dedup();
    let k_values = cutoffs.as_slice();

    let mut skipped = Vec::new();
    let mut query_ids = Vec::new();
    let mut batch = Vec::new();

    for (query_id, ranking) in run.iter() {
        let relevant_count = qrels.relevant_count(query_id);
        if relevant_count == 0 {
            warn!(query_id, "Skipping query without relevant judgments");
            skipped.push(SkippedQuery {
                query_id: query_id.to_string(),
                reason: "no relevant judgments".to_string(),
            });
            continue;
        }
        query_ids.push(query_id.to_string());
        batch.push(JudgedList::new(
            relevance_sequence(qrels, query_id, ranking),
            relevant_count,
        ));
    }

    for query_id in qrels.query_ids() {
        if run.ranking(query_id).is_none() && qrels.relevant_count(query_id) > 0 {
            warn!(query_id, "Skipping judged query missing from run");
            skipped.push(SkippedQuery {
                query_id: query_id.to_string(),
                reason: "no ranked documents".to_string(),
            });
        }
    }

    let summary =
        BatchSummary::compute(&batch, k_values).context("Failed to aggregate run metrics")?;

    let queries = query_ids
        .into_iter()
        .zip(batch.iter())
        .map(|(query_id, list)| {
            let metrics = QueryMetrics::compute(&list.relevance, list.relevant_count, k_values)
                .with_context(|| format!("Failed to score query {}", query_id))?;
            Ok(QueryEvaluation {
                query_id,
                relevant_count: list.relevant_count,
                metrics,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Evaluated {} queries ({} skipped): MAP={:.4} gMAP={:.4}",
        summary.num_queries,
        skipped.len(),
        summary.map,
        summary.gmap
    );

    Ok(EvaluationReport {
        k_values: cutoffs,
        summary,
        queries,
        skipped,
    })
}

/// Computes Kendall's tau per query between two runs.
///
/// Every query present in either run gets an entry. Queries that cannot be
/// correlated (missing from one run, different document sets, too short)
/// carry the error message instead of a result.
pub fn correlate_runs(run_a: &Run, run_b: &Run) -> CorrelationReport {
    let mut query_ids: Vec<&str> = run_a.iter().map(|(q, _)| q).collect();
    query_ids.extend(run_b.iter().map(|(q, _)| q));
    query_ids.sort_unstable();
    query_ids.dedup();

    let queries = query_ids
        .into_iter()
        .map(|query_id| {
            let outcome = match (run_a.ranking(query_id), run_b.ranking(query_id)) {
                (Some(a), Some(b)) => kendall_tau(a, b).map_err(|e| e.to_string()),
                (Some(_), None) => Err("missing from second run".to_string()),
                (None, _) => Err("missing from first run".to_string()),
            };
            if let Err(reason) = &outcome {
                warn!(query_id, "Cannot correlate query: {}", reason);
            }
            let (kendall, error) = match outcome {
                Ok(result) => (Some(result), None),
                Err(reason) => (None, Some(reason)),
            };
            QueryCorrelation {
                query_id: query_id.to_string(),
                kendall,
                error,
            }
        })
        .collect();

    CorrelationReport { queries }
}
