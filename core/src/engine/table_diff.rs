use crate::addressing::column_letter;
use crate::alignment::{self, AlignedRow, AlignmentKind};
use crate::cell_diff::CellDiffer;
use crate::config::ComparisonOptions;
use crate::dataset::Dataset;
use crate::diff::{ColumnChange, DiffResult, DiffRow, DiffSummary, RowKind};
#[cfg(feature = "perf-metrics")]
use crate::perf::Phase;
use crate::progress::CooperativeYield;

use super::scheduler::Scheduler;

pub(super) async fn diff_tables<Y: CooperativeYield>(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
    scheduler: &mut Scheduler<'_, Y>,
) -> DiffResult {
    #[cfg(feature = "perf-metrics")]
    {
        scheduler.metrics.start_phase(Phase::Total);
        scheduler.metrics.start_phase(Phase::Alignment);
        scheduler
            .metrics
            .add_rows_processed((original.row_count() + modified.row_count()) as u64);
    }

    scheduler.progress("alignment", 0.0);
    let outcome = alignment::align(original, modified, options, scheduler).await;
    scheduler.progress("alignment", 1.0);

    #[cfg(feature = "perf-metrics")]
    {
        scheduler.metrics.end_phase(Phase::Alignment);
        scheduler.metrics.start_phase(Phase::CellDiff);
    }

    let column_count = original.column_count().max(modified.column_count());
    let differ = CellDiffer::new(options);
    let total = outcome.rows.len();
    let mut rows = Vec::with_capacity(total);
    for (done, aligned) in outcome.rows.iter().enumerate() {
        rows.push(diff_row(aligned, original, modified, column_count, &differ));
        scheduler.row_checkpoint("cell_diff", done + 1, total).await;
    }

    #[cfg(feature = "perf-metrics")]
    {
        let pairs = outcome
            .rows
            .iter()
            .filter(|r| r.kind == AlignmentKind::Matched)
            .count();
        scheduler
            .metrics
            .add_cells_compared((pairs * column_count) as u64);
        scheduler.metrics.end_phase(Phase::CellDiff);
    }

    let columns = column_changes(&rows, original, modified, column_count);
    let summary = summarize(&rows);
    scheduler.progress("cell_diff", 1.0);

    #[cfg(feature = "perf-metrics")]
    scheduler.metrics.end_phase(Phase::Total);

    log::debug!(
        "diff complete: {} added, {} removed, {} modified, {} unchanged rows",
        summary.added_rows,
        summary.removed_rows,
        summary.modified_rows,
        summary.unchanged_rows
    );

    DiffResult {
        rows,
        columns,
        summary,
        strategy: outcome.strategy,
        solver: outcome.stats.map(|stats| stats.solver),
    }
}

fn diff_row(
    aligned: &AlignedRow,
    original: &Dataset,
    modified: &Dataset,
    column_count: usize,
    differ: &CellDiffer,
) -> DiffRow {
    let row_a = aligned.original.and_then(|idx| original.rows.get(idx));
    let row_b = aligned.modified.and_then(|idx| modified.rows.get(idx));
    let cells = differ.diff_row(row_a, row_b, column_count);

    let kind = match aligned.kind {
        AlignmentKind::Added => RowKind::Added,
        AlignmentKind::Removed => RowKind::Removed,
        AlignmentKind::Matched if cells.iter().any(|c| c.change.is_change()) => RowKind::Modified,
        AlignmentKind::Matched => RowKind::Unchanged,
    };

    DiffRow {
        original_index: aligned.original,
        modified_index: aligned.modified,
        kind,
        cells,
    }
}

fn column_changes(
    rows: &[DiffRow],
    original: &Dataset,
    modified: &Dataset,
    column_count: usize,
) -> Vec<ColumnChange> {
    let mut changed = vec![0usize; column_count];
    for row in rows {
        for cell in row.changed_cells() {
            if let Some(count) = changed.get_mut(cell.column) {
                *count += 1;
            }
        }
    }

    changed
        .into_iter()
        .enumerate()
        .map(|(index, changed_cells)| ColumnChange {
            index,
            letter: column_letter(index),
            label: original
                .column(index)
                .and_then(|meta| meta.label.clone())
                .or_else(|| modified.column(index).and_then(|meta| meta.label.clone())),
            has_changes: changed_cells > 0,
            changed_cells,
        })
        .collect()
}

fn summarize(rows: &[DiffRow]) -> DiffSummary {
    let mut summary = DiffSummary {
        total_rows: rows.len(),
        ..Default::default()
    };
    for row in rows {
        match row.kind {
            RowKind::Added => summary.added_rows += 1,
            RowKind::Removed => summary.removed_rows += 1,
            RowKind::Unchanged => summary.unchanged_rows += 1,
            RowKind::Modified => {
                summary.modified_rows += 1;
                summary.modified_cells += row.changed_cells().count();
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingStrategy;
    use crate::diff::CellChange;

    fn run(original: &Dataset, modified: &Dataset, options: &ComparisonOptions) -> DiffResult {
        let mut scheduler = Scheduler::blocking(None, &options.tuning);
        futures::executor::block_on(diff_tables(original, modified, options, &mut scheduler))
    }

    #[test]
    fn position_strategy_classifies_rows_and_columns() {
        let original = Dataset::from_values(vec![vec!["a", "1"], vec!["b", "2"]]);
        let modified = Dataset::from_values(vec![vec!["a", "1"], vec!["b", "3"], vec!["c", "4"]]);
        let options = ComparisonOptions {
            matching_strategy: MatchingStrategy::Position,
            ..Default::default()
        };

        let result = run(&original, &modified, &options);
        let kinds: Vec<RowKind> = result.rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![RowKind::Unchanged, RowKind::Modified, RowKind::Added]);
        assert_eq!(result.rows[1].cells[1].change, CellChange::Modified);

        assert_eq!(
            result.summary,
            DiffSummary {
                added_rows: 1,
                removed_rows: 0,
                modified_rows: 1,
                unchanged_rows: 1,
                modified_cells: 1,
                total_rows: 3,
            }
        );
        assert_eq!(result.columns[0].changed_cells, 1);
        assert_eq!(result.columns[1].changed_cells, 2);
        assert!(result.columns.iter().all(|c| c.has_changes));
        assert_eq!(result.solver, None);
    }

    #[test]
    fn column_labels_come_from_either_side() {
        let original = Dataset::from_values(vec![vec!["x"]]).with_labels(["id"]);
        let modified = Dataset::from_values(vec![vec!["x", "y"]]).with_labels(["key", "name"]);
        let result = run(&original, &modified, &ComparisonOptions::default());

        let labels: Vec<Option<&str>> = result.columns.iter().map(|c| c.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("id"), Some("name")]);
        assert_eq!(result.columns[1].letter, "B");
    }
}
