//! Configuration and path resolution for the CLI.
//!
//! Handles the stop-word list used by `tokenize` and the output paths the
//! preprocessing commands write to when `-o` is not given:
//! - Stop words: `--stopwords` flag, then `$RANKEVAL_STOPWORDS`, then the
//!   built-in English list
//! - Outputs: derived from the input file name

use crate::stopwords::StopWords;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable for a custom stop-word file
pub const STOPWORDS_ENV: &str = "RANKEVAL_STOPWORDS";

/// Suffix appended to the qrels file stem by `binarize`
pub const BINARY_QRELS_SUFFIX: &str = "binary";

/// Suffix appended to the queries file stem by `tokenize`
pub const TOKENS_SUFFIX: &str = "tokens";

/// Extension of derived output files
const OUTPUT_EXTENSION: &str = "csv";

/// Picks the stop-word file to load, if any.
///
/// The flag wins over the environment value. An empty environment value
/// counts as unset.
pub fn resolve_stopwords_path(flag: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    env_value
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
}

/// Loads the stop-word list for `tokenize`.
pub fn load_stop_words(flag: Option<&Path>) -> Result<StopWords> {
    match resolve_stopwords_path(flag, std::env::var(STOPWORDS_ENV).ok()) {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open stop-word file: {}", path.display()))?;
            let words = StopWords::read(BufReader::new(file))
                .with_context(|| format!("Failed to read stop-word file: {}", path.display()))?;
            if words.is_empty() {
                warn!("Stop-word file {} is empty, no words will be dropped", path.display());
            } else {
                info!("Loaded {} stop words from {}", words.len(), path.display());
            }
            Ok(words)
        }
        None => Ok(StopWords::english()),
    }
}

/// Derives an output path next to `input`: `dir/stem_<suffix>.csv`.
///
/// `qrels.csv` becomes `qrels_binary.csv`; `queries.txt` becomes
/// `queries_tokens.csv`.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_{}.{}", stem, suffix, OUTPUT_EXTENSION))
}
