//! rankeval CLI - Offline evaluation of ranked retrieval runs.
//!
//! # Usage
//!
//! ```bash
//! # Fold graded judgments into binary relevance
//! rankeval binarize qrels.csv            # writes qrels_binary.csv
//!
//! # Normalize queries into terms
//! rankeval tokenize queries.txt --stopwords my_stopwords.txt
//!
//! # Score a run against judgments
//! rankeval evaluate --qrels qrels.csv --run run.txt --k 1,5,10
//! rankeval evaluate --qrels qrels.csv --run run.txt --per-query --json
//!
//! # Compare the orderings of two runs
//! rankeval correlate --run-a bm25.txt --run-b dense.txt
//! ```

mod config;
mod error;
mod evaluate;
mod output;
mod qrels;
mod queries;
mod run;
mod stopwords;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qrels::Qrels;
use rankeval_core::config::DEFAULT_K_VALUES;
use run::Run;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Offline evaluation of ranked retrieval runs.
///
/// Computes precision at cutoffs, MAP and gMAP against relevance judgments,
/// and Kendall's tau between the orderings of two runs.
#[derive(Parser)]
#[command(name = "rankeval", version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Map graded judgments (query_id|doc_id|grade) to binary relevance
    Binarize {
        /// Qrels file to read
        input: PathBuf,

        /// Output file (default: <input stem>_binary.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize query lines (query_id|text) into query_id|term|length rows
    Tokenize {
        /// Query file to read
        input: PathBuf,

        /// Output file (default: <input stem>_tokens.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop-word file, one word per line (overrides $RANKEVAL_STOPWORDS)
        #[arg(long)]
        stopwords: Option<PathBuf>,
    },

    /// Score a run (query_id|doc_id, ranked) against qrels
    Evaluate {
        /// Qrels file (query_id|doc_id|grade)
        #[arg(long)]
        qrels: PathBuf,

        /// Run file (query_id|doc_id in rank order)
        #[arg(long)]
        run: PathBuf,

        /// Comma-separated precision cutoffs
        #[arg(long = "k", value_delimiter = ',', default_values_t = DEFAULT_K_VALUES.to_vec())]
        k_values: Vec<usize>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,

        /// Include per-query metrics in human output
        #[arg(long)]
        per_query: bool,
    },

    /// Kendall's tau per query between two runs over the same documents
    Correlate {
        /// First run file
        #[arg(long)]
        run_a: PathBuf,

        /// Second run file
        #[arg(long)]
        run_b: PathBuf,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Binarize { input, output } => {
            let output = output.unwrap_or_else(|| {
                config::default_output_path(&input, config::BINARY_QRELS_SUFFIX)
            });
            let stats = qrels::binarize_qrels(open_input(&input)?, create_output(&output)?)
                .with_context(|| format!("Failed to binarize {}", input.display()))?;
            info!("Remapped {} graded judgments", stats.remapped);
            println!("Wrote {} judgments to {}", stats.written, output.display());
        }
        Command::Tokenize {
            input,
            output,
            stopwords,
        } => {
            let stop_words = config::load_stop_words(stopwords.as_deref())?;
            let output = output
                .unwrap_or_else(|| config::default_output_path(&input, config::TOKENS_SUFFIX));
            let stats =
                queries::tokenize_queries(open_input(&input)?, create_output(&output)?, &stop_words)
                    .with_context(|| format!("Failed to tokenize {}", input.display()))?;
            println!(
                "Wrote {} terms for {} queries to {}",
                stats.terms,
                stats.queries,
                output.display()
            );
        }
        Command::Evaluate {
            qrels,
            run,
            k_values,
            json,
            per_query,
        } => {
            let judgments = Qrels::read(open_input(&qrels)?)
                .with_context(|| format!("Failed to parse qrels: {}", qrels.display()))?;
            if judgments.is_empty() {
                warn!("No judgments in {}, every query will be skipped", qrels.display());
            }
            let ranked = Run::read(open_input(&run)?)
                .with_context(|| format!("Failed to parse run: {}", run.display()))?;
            info!(
                "Loaded {} judgments and {} ranked queries",
                judgments.len(),
                ranked.num_queries()
            );

            let report = evaluate::evaluate_run(&ranked, &judgments, &k_values)?;
            let rendered = if json {
                output::format_json(&report)
            } else {
                output::format_evaluation_human(&report, per_query)
            };
            println!("{}", rendered);
        }
        Command::Correlate { run_a, run_b, json } => {
            let first = Run::read(open_input(&run_a)?)
                .with_context(|| format!("Failed to parse run: {}", run_a.display()))?;
            let second = Run::read(open_input(&run_b)?)
                .with_context(|| format!("Failed to parse run: {}", run_b.display()))?;

            let report = evaluate::correlate_runs(&first, &second);
            let rendered = if json {
                output::format_json(&report)
            } else {
                output::format_correlation_human(&report)
            };
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(BufReader::new(file))
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
