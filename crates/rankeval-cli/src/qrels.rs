//! Qrels (query relevance judgments) parsing and binarization.
//!
//! Qrels files hold one judgment per line:
//!
//! ```text
//! query_id|doc_id|grade
//! ```
//!
//! Grades are integers; the collections we evaluate use 0 (not relevant),
//! 1 (relevant) and 2 (highly relevant). MAP-style metrics need binary
//! judgments, so [`binarize_qrels`] folds every grade above 1 into 1.

use crate::error::InputError;
use anyhow::Result;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::debug;

/// A single relevance judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrelRecord {
    pub query_id: String,
    pub doc_id: String,
    pub grade: i32,
}

/// Relevance judgments indexed by query and document.
#[derive(Debug, Clone, Default)]
pub struct Qrels {
    judgments: HashMap<String, HashMap<String, i32>>,
}

impl Qrels {
    /// Builds the index from parsed records. A later record for the same
    /// (query, doc) pair overrides an earlier one.
    pub fn from_records(records: impl IntoIterator<Item = QrelRecord>) -> Self {
        let mut judgments: HashMap<String, HashMap<String, i32>> = HashMap::new();
        for record in records {
            judgments
                .entry(record.query_id)
                .or_default()
                .insert(record.doc_id, record.grade);
        }
        Self { judgments }
    }

    /// Parses and indexes a qrels file.
    pub fn read<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Self::from_records(parse_qrels(reader)?))
    }

    /// Returns true if `doc_id` is judged relevant for `query_id`.
    ///
    /// Unjudged documents are not relevant.
    pub fn is_relevant(&self, query_id: &str, doc_id: &str) -> bool {
        self.judgments
            .get(query_id)
            .and_then(|docs| docs.get(doc_id))
            .is_some_and(|&grade| grade > 0)
    }

    /// Number of documents judged relevant for `query_id`.
    pub fn relevant_count(&self, query_id: &str) -> usize {
        self.judgments
            .get(query_id)
            .map(|docs| docs.values().filter(|&&grade| grade > 0).count())
            .unwrap_or(0)
    }

    /// Query ids with at least one judgment, in sorted order.
    pub fn query_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.judgments.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of judgments.
    pub fn len(&self) -> usize {
        self.judgments.values().map(|docs| docs.len()).sum()
    }

    /// Returns true if no judgments were loaded.
    pub fn is_empty(&self) -> bool {
        self.judgments.is_empty()
    }
}

/// Counts reported by [`binarize_qrels`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinarizeStats {
    /// Judgments written
    pub written: usize,
    /// Judgments whose grade was folded to 1
    pub remapped: usize,
}

/// Maps a graded judgment to binary relevance.
///
/// Grades above 1 become 1; 0, 1 and any other grade pass through unchanged.
pub fn binarize_grade(grade: i32) -> i32 {
    if grade > 1 {
        1
    } else {
        grade
    }
}

/// Parses a qrels file. Blank lines are skipped.
pub fn parse_qrels<R: BufRead>(reader: R) -> Result<Vec<QrelRecord>> {
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(parse_qrel_line(line, idx + 1)?);
    }
    debug!("Parsed {} qrels", records.len());
    Ok(records)
}

/// Rewrites a qrels stream with binary grades.
pub fn binarize_qrels<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<BinarizeStats> {
    let mut stats = BinarizeStats::default();
    for record in parse_qrels(reader)? {
        let binary = binarize_grade(record.grade);
        if binary != record.grade {
            stats.remapped += 1;
        }
        writeln!(writer, "{}|{}|{}", record.query_id, record.doc_id, binary)?;
        stats.written += 1;
    }
    writer.flush()?;
    Ok(stats)
}

fn parse_qrel_line(line: &str, line_no: usize) -> Result<QrelRecord, InputError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(InputError::FieldCount {
            line: line_no,
            expected: 3,
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
    let grade = fields[2].parse().map_err(|_| InputError::InvalidGrade {
        line: line_no,
        value: fields[2].to_string(),
    })?;

    Ok(QrelRecord {
        query_id: fields[0].to_string(),
        doc_id: fields[1].to_string(),
        grade,
    })
}
