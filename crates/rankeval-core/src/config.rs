//! Evaluation configuration constants.
//!
//! These values are shared by the metric summaries, the CLI, and the
//! benchmarks so every report uses the same cutoffs.
//!
//! # Usage
//!
//! ```
//! use rankeval_core::config::DEFAULT_K_VALUES;
//!
//! assert_eq!(DEFAULT_K_VALUES, &[1, 5, 10, 20]);
//! ```

// =============================================================================
// Precision Cutoffs
// =============================================================================

/// Depths at which summaries report precision@k.
///
/// Summaries use the padded precision so lists shorter than a cutoff are
/// scored as if the unjudged tail were non-relevant.
pub const DEFAULT_K_VALUES: &[usize] = &[1, 5, 10, 20];

// =============================================================================
// Kendall's Tau Significance
// =============================================================================

/// Largest ranking size for which Kendall's tau uses the exact null
/// distribution of the discordant-pair count.
///
/// Above this size the p-value comes from the normal approximation. The
/// cutoff matches the automatic method selection of common statistics
/// packages, so p-values agree with them.
pub const KENDALL_EXACT_MAX_ITEMS: usize = 33;
