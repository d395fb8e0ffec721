//! Run files: ranked retrieval output per query.
//!
//! One line per retrieved document, in rank order within each query:
//!
//! ```text
//! query_id|doc_id
//! ```
//!
//! Lines for different queries may interleave. If a document appears twice
//! for the same query, the first (higher) rank wins.

use crate::error::InputError;
use anyhow::Result;
use std::collections::{BTreeMap, HashSet};
use std::io::BufRead;
use tracing::warn;

/// Ranked document ids per query, ordered by query id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    rankings: BTreeMap<String, Vec<String>>,
}

impl Run {
    /// Parses a run file. Blank lines are skipped.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        let mut rankings: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut duplicates = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (query_id, doc_id) = parse_run_line(line, idx + 1)?;

            if !seen.insert((query_id.to_string(), doc_id.to_string())) {
                duplicates += 1;
                continue;
            }
            rankings
                .entry(query_id.to_string())
                .or_default()
                .push(doc_id.to_string());
        }

        if duplicates > 0 {
            warn!("Ignored {} repeated documents in run", duplicates);
        }
        Ok(Self { rankings })
    }

    /// Ranked documents for a query, best first.
    pub fn ranking(&self, query_id: &str) -> Option<&[String]> {
        self.rankings.get(query_id).map(Vec::as_slice)
    }

    /// Iterates over (query id, ranking) in query id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rankings
            .iter()
            .map(|(query_id, docs)| (query_id.as_str(), docs.as_slice()))
    }

    /// Number of queries with at least one ranked document.
    pub fn num_queries(&self) -> usize {
        self.rankings.len()
    }
}

fn parse_run_line(line: &str, line_no: usize) -> Result<(&str, &str), InputError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() != 2 {
        return Err(InputError::FieldCount {
            line: line_no,
            expected: 2,
            found: fields.len(),
        });
    }
    if fields[0].is_empty() {
        return Err(InputError::EmptyField {
            line: line_no,
            field: "query id",
        });
    }
    if fields[1].is_empty() {
        return Err(InputError::EmptyField {
            line: line_no,
            field: "doc id",
        });
    }
    Ok((fields[0], fields[1]))
}
