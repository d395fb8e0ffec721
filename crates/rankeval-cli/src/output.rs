//! Output formatting for evaluation reports.
//!
//! Supports both human-readable terminal output and JSON for scripting.

use crate::evaluate::{CorrelationReport, EvaluationReport};
use rankeval_core::evaluation::PValueMethod;
use serde::Serialize;
use std::fmt::Write;

/// Formats any report as pretty-printed JSON.
pub fn format_json<T: Serialize>(report: &T) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Formats an evaluation report for the terminal.
pub fn format_evaluation_human(report: &EvaluationReport, per_query: bool) -> String {
    let mut output = String::new();
    let summary = &report.summary;

    let _ = writeln!(output, "Queries evaluated: {}", summary.num_queries);
    if !report.skipped.is_empty() {
        let _ = writeln!(output, "Queries skipped:   {}", report.skipped.len());
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "{:<10} {:>8}", "MAP", format!("{:.4}", summary.map));
    let _ = writeln!(output, "{:<10} {:>8}", "gMAP", format!("{:.4}", summary.gmap));
    for (k, precision) in &summary.mean_precision_at_k {
        let _ = writeln!(output, "{:<10} {:>8}", format!("P@{}", k), format!("{:.4}", precision));
    }

    if per_query {
        let _ = writeln!(output);
        let _ = write!(output, "{:<12} {:>4} {:>8}", "query", "R", "AP");
        for k in &report.k_values {
            let _ = write!(output, " {:>8}", format!("P@{}", k));
        }
        let _ = writeln!(output);

        for query in &report.queries {
            let _ = write!(
                output,
                "{:<12} {:>4} {:>8.4}",
                truncate_text(&query.query_id, 12),
                query.relevant_count,
                query.metrics.average_precision
            );
            for k in &report.k_values {
                match query.metrics.precision_at_k.get(k) {
                    Some(precision) => {
                        let _ = write!(output, " {:>8.4}", precision);
                    }
                    None => {
                        let _ = write!(output, " {:>8}", "-");
                    }
                }
            }
            let _ = writeln!(output);
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(output);
        for skipped in &report.skipped {
            let _ = writeln!(output, "skipped {}: {}", skipped.query_id, skipped.reason);
        }
    }

    output
}

/// Formats a correlation report for the terminal.
pub fn format_correlation_human(report: &CorrelationReport) -> String {
    if report.queries.is_empty() {
        return "No queries to correlate.".to_string();
    }

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:<12} {:>5} {:>8} {:>10}  method",
        "query", "n", "tau", "p-value"
    );

    for query in &report.queries {
        let query_id = truncate_text(&query.query_id, 12);
        match (&query.kendall, &query.error) {
            (Some(result), _) => {
                let method = match result.method {
                    PValueMethod::Exact => "exact",
                    PValueMethod::Asymptotic => "asymptotic",
                };
                let _ = writeln!(
                    output,
                    "{:<12} {:>5} {:>8.4} {:>10.3e}  {}",
                    query_id, result.n, result.tau, result.p_value, method
                );
            }
            (None, Some(error)) => {
                let _ = writeln!(output, "{:<12} error: {}", query_id, error);
            }
            (None, None) => {}
        }
    }

    output
}

/// Truncates text to max_len characters, adding "..." if truncated.
fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
