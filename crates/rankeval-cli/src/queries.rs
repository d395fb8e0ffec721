//! Query normalization and tokenization.
//!
//! Turns raw query lines (`query_id|text`) into one line per surviving term:
//!
//! ```text
//! query_id|term|query_length
//! ```
//!
//! Normalization steps, in order:
//! 1. Trim and lowercase the text
//! 2. Split on whitespace
//! 3. Drop stop words (matched against the whole whitespace-delimited word)
//! 4. Split each remaining word on `-` and `/`
//! 5. Strip ASCII punctuation from each piece
//!
//! `query_length` is the number of pieces produced for the query. Pieces left
//! empty by punctuation stripping are kept, so `"--"` style words still count.

use crate::error::InputError;
use crate::stopwords::StopWords;
use anyhow::Result;
use std::io::{BufRead, Write};

/// Counts reported by [`tokenize_queries`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizeStats {
    /// Query lines read
    pub queries: usize,
    /// Term lines written
    pub terms: usize,
}

/// Normalizes one query text into its terms.
pub fn tokenize_query(text: &str, stop_words: &StopWords) -> Vec<String> {
    let normalized = text.trim().to_lowercase();
    normalized
        .split_whitespace()
        .filter(|word| !stop_words.contains(word))
        .flat_map(|word| word.split(['-', '/']))
        .map(|piece| piece.chars().filter(|c| !c.is_ascii_punctuation()).collect())
        .collect()
}

/// Tokenizes a stream of `query_id|text` lines. Blank lines are skipped.
pub fn tokenize_queries<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    stop_words: &StopWords,
) -> Result<TokenizeStats> {
    let mut stats = TokenizeStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (query_id, text) = split_query_line(&line, idx + 1)?;

        let terms = tokenize_query(text, stop_words);
        for term in &terms {
            writeln!(writer, "{}|{}|{}", query_id, term, terms.len())?;
        }
        stats.queries += 1;
        stats.terms += terms.len();
    }

    writer.flush()?;
    Ok(stats)
}

fn split_query_line(line: &str, line_no: usize) -> Result<(&str, &str), InputError> {
    let (query_id, text) = line.split_once('|').ok_or(InputError::FieldCount {
        line: line_no,
        expected: 2,
        found: 1,
    })?;
    let query_id = query_id.trim();
    if query_id.is_empty() {
        return Err(InputError::EmptyField {
            line: line_no,
            field: "query id",
        });
    }
    Ok((query_id, text))
}
