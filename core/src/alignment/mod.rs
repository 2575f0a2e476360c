//! Row alignment strategies.
//!
//! Every strategy turns two datasets into a list of [`AlignedRow`] entries: matched pairs
//! plus unmatched rows on either side. The list is a partial injection both ways: no
//! original or modified index appears in more than one entry.
//!
//! 1. **Position** (`positional.rs`)
//!    - Row `i` pairs with row `i`; the tail of the longer side is added/removed.
//!
//! 2. **Key column** (`keyed.rs`)
//!    - Rows pair by the normalized value of one designated column, first unused match wins.
//!
//! 3. **Adaptive** (`adaptive.rs`)
//!    - Column profiling (`profile.rs`) weights each column by how well it discriminates rows.
//!    - Weighted row similarity (`similarity.rs`) scores every candidate pair.
//!    - Up to `greedy_row_threshold` rows the optimal assignment solver (`lap.rs`) pairs
//!      rows, and a dynamic threshold (`threshold.rs`) rejects weak pairs. Above it the
//!      two-pass greedy matcher (`greedy.rs`) runs instead.
//!
//! 4. **Sequence** (`sequence.rs`)
//!    - Longest common subsequence over exact row signatures: pure insert/delete detection
//!      that preserves relative order. Unlike the adaptive strategy, two rows only match
//!      when every compared cell is equal after normalization.

pub(crate) mod adaptive;
pub(crate) mod greedy;
pub(crate) mod keyed;
pub(crate) mod lap;
pub(crate) mod positional;
pub(crate) mod profile;
pub(crate) mod sequence;
pub(crate) mod similarity;
pub(crate) mod threshold;

pub use adaptive::{MatchStats, SolverKind};
pub use keyed::{align_by_key, suggest_key_column};
pub use lap::{solve_assignment, solve_assignment_with_progress};
pub use positional::align_by_position;
pub use profile::{ColumnProfile, column_weights, profile_columns};
pub use sequence::align_sequence;
pub use similarity::row_similarity;
pub use threshold::dynamic_threshold;

use crate::config::{ComparisonOptions, MatchingStrategy};
use crate::dataset::Dataset;
use crate::engine::scheduler::Scheduler;
use crate::progress::CooperativeYield;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentKind {
    Matched,
    Added,
    Removed,
}

/// One entry of an alignment.
///
/// `Matched` carries both indices, `Removed` only `original`, `Added` only `modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AlignedRow {
    pub original: Option<usize>,
    pub modified: Option<usize>,
    pub kind: AlignmentKind,
}

impl AlignedRow {
    pub fn matched(original: usize, modified: usize) -> AlignedRow {
        AlignedRow {
            original: Some(original),
            modified: Some(modified),
            kind: AlignmentKind::Matched,
        }
    }

    pub fn added(modified: usize) -> AlignedRow {
        AlignedRow {
            original: None,
            modified: Some(modified),
            kind: AlignmentKind::Added,
        }
    }

    pub fn removed(original: usize) -> AlignedRow {
        AlignedRow {
            original: Some(original),
            modified: None,
            kind: AlignmentKind::Removed,
        }
    }

    fn display_key(&self) -> (usize, bool, usize) {
        let position = self.original.or(self.modified).unwrap_or(0);
        (
            position,
            self.original.is_none(),
            self.modified.unwrap_or(usize::MAX),
        )
    }
}

/// Result of aligning two datasets.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentOutcome {
    pub rows: Vec<AlignedRow>,
    /// The strategy that actually ran (after any fallback).
    pub strategy: MatchingStrategy,
    /// Present for the adaptive strategy only.
    pub stats: Option<MatchStats>,
}

/// Orders entries for display: by original index, with added rows placed at their
/// modified index and after any original-side row at the same position.
pub(crate) fn sort_for_display(rows: &mut [AlignedRow]) {
    rows.sort_by_key(AlignedRow::display_key);
}

/// True when no index appears in more than one entry on either side, and every entry's
/// indices are consistent with its kind.
pub(crate) fn is_partial_injection(rows: &[AlignedRow], original_len: usize, modified_len: usize) -> bool {
    let mut seen_original = vec![false; original_len];
    let mut seen_modified = vec![false; modified_len];

    for row in rows {
        let shape_ok = match row.kind {
            AlignmentKind::Matched => row.original.is_some() && row.modified.is_some(),
            AlignmentKind::Added => row.original.is_none() && row.modified.is_some(),
            AlignmentKind::Removed => row.original.is_some() && row.modified.is_none(),
        };
        if !shape_ok {
            return false;
        }
        if let Some(idx) = row.original {
            match seen_original.get_mut(idx) {
                Some(seen) if !*seen => *seen = true,
                _ => return false,
            }
        }
        if let Some(idx) = row.modified {
            match seen_modified.get_mut(idx) {
                Some(seen) if !*seen => *seen = true,
                _ => return false,
            }
        }
    }
    true
}

/// Aligns two datasets with the strategy named in `options`, blocking until done.
pub fn align_rows(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
) -> AlignmentOutcome {
    let mut scheduler = Scheduler::blocking(None, &options.tuning);
    futures::executor::block_on(align(original, modified, options, &mut scheduler))
}

pub(crate) async fn align<Y: CooperativeYield>(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
    scheduler: &mut Scheduler<'_, Y>,
) -> AlignmentOutcome {
    let outcome = match options.matching_strategy {
        MatchingStrategy::Position => positional_outcome(original, modified),
        MatchingStrategy::KeyColumn => match options.key_column_index {
            Some(key) => AlignmentOutcome {
                rows: align_by_key(original, modified, key, options),
                strategy: MatchingStrategy::KeyColumn,
                stats: None,
            },
            None => {
                log::warn!("key-column strategy requested without a key column; using position");
                positional_outcome(original, modified)
            }
        },
        MatchingStrategy::Adaptive => {
            let (rows, stats) =
                adaptive::align_adaptive(original, modified, options, scheduler).await;
            AlignmentOutcome {
                rows,
                strategy: MatchingStrategy::Adaptive,
                stats: Some(stats),
            }
        }
        MatchingStrategy::Sequence => AlignmentOutcome {
            rows: sequence::sequence_rows(original, modified, options, scheduler).await,
            strategy: MatchingStrategy::Sequence,
            stats: None,
        },
    };

    log::debug!(
        "aligned {} x {} rows with {} strategy into {} entries",
        original.row_count(),
        modified.row_count(),
        outcome.strategy.as_str(),
        outcome.rows.len()
    );
    debug_assert!(
        is_partial_injection(&outcome.rows, original.row_count(), modified.row_count()),
        "alignment must not reuse a row index"
    );

    outcome
}

fn positional_outcome(original: &Dataset, modified: &Dataset) -> AlignmentOutcome {
    AlignmentOutcome {
        rows: align_by_position(original.row_count(), modified.row_count()),
        strategy: MatchingStrategy::Position,
        stats: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_order_interleaves_added_rows_after_originals() {
        let mut rows = vec![
            AlignedRow::added(2),
            AlignedRow::matched(2, 1),
            AlignedRow::matched(1, 0),
            AlignedRow::removed(0),
        ];
        sort_for_display(&mut rows);
        assert_eq!(
            rows,
            vec![
                AlignedRow::removed(0),
                AlignedRow::matched(1, 0),
                AlignedRow::matched(2, 1),
                AlignedRow::added(2),
            ]
        );
    }

    #[test]
    fn injection_check_rejects_reused_indices() {
        let ok = [AlignedRow::matched(0, 1), AlignedRow::added(0), AlignedRow::removed(1)];
        assert!(is_partial_injection(&ok, 2, 2));

        let reused = [AlignedRow::matched(0, 0), AlignedRow::matched(1, 0)];
        assert!(!is_partial_injection(&reused, 2, 2));

        let malformed = [AlignedRow {
            original: None,
            modified: Some(0),
            kind: AlignmentKind::Matched,
        }];
        assert!(!is_partial_injection(&malformed, 1, 1));

        let out_of_range = [AlignedRow::removed(5)];
        assert!(!is_partial_injection(&out_of_range, 1, 0));
    }

    #[test]
    fn missing_key_column_falls_back_to_position() {
        let original = Dataset::from_values(vec![vec!["a"], vec!["b"]]);
        let modified = Dataset::from_values(vec![vec!["b"]]);
        let options = ComparisonOptions {
            matching_strategy: MatchingStrategy::KeyColumn,
            key_column_index: None,
            ..Default::default()
        };

        let outcome = align_rows(&original, &modified, &options);
        assert_eq!(outcome.strategy, MatchingStrategy::Position);
        assert_eq!(
            outcome.rows,
            vec![AlignedRow::matched(0, 0), AlignedRow::removed(1)]
        );
    }
}
