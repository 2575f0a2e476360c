//! Tabular Diff: row alignment and cell-level diffing for spreadsheet-like data.
//!
//! This crate provides functionality for:
//! - Aligning the rows of two datasets despite reordering, insertion and deletion
//!   (position, key column, adaptive weighted matching, or exact-row sequence alignment)
//! - Classifying every cell of every aligned row as unchanged, added, removed or modified
//! - Character-level inline diffs for modified text cells
//! - Cooperative (yielding) execution and stale-result discarding for interactive callers
//!
//! Parsing files into [`Dataset`]s and rendering results are left to the caller.
//!
//! # Quick Start
//!
//! ```
//! use tabular_diff::{ComparisonOptions, Dataset, RowKind, compare};
//!
//! let original = Dataset::from_values(vec![vec!["A", "1"], vec!["B", "2"], vec!["C", "3"]]);
//! let modified = Dataset::from_values(vec![vec!["B", "2"], vec!["C", "3"], vec!["D", "4"]]);
//!
//! let result = compare(&original, &modified, &ComparisonOptions::default());
//! assert_eq!(result.summary.added_rows, 1);
//! assert_eq!(result.summary.removed_rows, 1);
//! assert!(result.rows.iter().any(|row| row.kind == RowKind::Unchanged));
//! ```

mod addressing;
pub mod alignment;
mod cancel;
mod cell_diff;
mod config;
mod dataset;
mod diff;
mod engine;
pub(crate) mod hashing;
mod inline_diff;
pub(crate) mod normalize;
#[cfg(feature = "perf-metrics")]
#[doc(hidden)]
pub mod perf;
mod progress;

pub use addressing::{column_index, column_letter};
pub use alignment::{
    AlignedRow, AlignmentKind, AlignmentOutcome, ColumnProfile, MatchStats, SolverKind,
    align_rows, suggest_key_column,
};
pub use cancel::{RequestToken, RequestTokens};
pub use cell_diff::diff_row_cells;
pub use config::{ComparisonOptions, ComparisonOptionsBuilder, ConfigError, MatchTuning, MatchingStrategy};
pub use dataset::{Cell, CellKind, CellValue, ColumnMeta, Dataset, Row};
pub use diff::{
    CellChange, ColumnChange, DiffCell, DiffResult, DiffRow, DiffSummary, DiffView, RowKind,
};
#[cfg(feature = "perf-metrics")]
pub use engine::compare_with_metrics;
pub use engine::{compare, compare_cooperative, compare_with_progress};
pub use inline_diff::{FragmentKind, INLINE_DIFF_WORK_LIMIT, InlineDiff, InlineFragment};
pub use progress::{CooperativeYield, NoProgress, NoYield, ProgressCallback, YieldFn};
