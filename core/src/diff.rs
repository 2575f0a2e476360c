//! Diff results for tabular comparison.
//!
//! This module defines the output handed to rendering/export collaborators:
//! - [`DiffCell`]: classification of one column within one aligned row
//! - [`DiffRow`]: an aligned row with its classification and cells
//! - [`ColumnChange`] and [`DiffSummary`]: aggregates over all rows
//! - [`DiffResult`]: the complete, immutable result of one comparison
//! - [`DiffView`]: a borrowed, filtered projection for display

use crate::alignment::SolverKind;
use crate::config::{ComparisonOptions, MatchingStrategy};
use crate::dataset::{Cell, CellValue};
use crate::inline_diff::InlineDiff;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellChange {
    Unchanged,
    Added,
    Removed,
    Modified,
}

impl CellChange {
    pub fn is_change(&self) -> bool {
        *self != CellChange::Unchanged
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffCell {
    pub column: usize,
    pub change: CellChange,
    pub original: Option<Cell>,
    pub modified: Option<Cell>,
}

impl DiffCell {
    /// Character-level edit script for a modified text cell, computed lazily.
    ///
    /// `None` for any other cell, including modified cells holding non-text values.
    pub fn inline_diff(&self) -> Option<InlineDiff> {
        if self.change != CellChange::Modified {
            return None;
        }
        match (
            &self.original.as_ref()?.value,
            &self.modified.as_ref()?.value,
        ) {
            (CellValue::Text(a), CellValue::Text(b)) => Some(InlineDiff::new(a.as_str(), b.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Unchanged,
    Modified,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffRow {
    pub original_index: Option<usize>,
    pub modified_index: Option<usize>,
    pub kind: RowKind,
    pub cells: Vec<DiffCell>,
}

impl DiffRow {
    pub fn cell(&self, column: usize) -> Option<&DiffCell> {
        self.cells.get(column)
    }

    pub fn changed_cells(&self) -> impl Iterator<Item = &DiffCell> {
        self.cells.iter().filter(|c| c.change.is_change())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnChange {
    pub index: usize,
    pub letter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// True when any cell in this column, in any row, is not unchanged.
    pub has_changes: bool,
    pub changed_cells: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added_rows: usize,
    pub removed_rows: usize,
    pub modified_rows: usize,
    pub unchanged_rows: usize,
    /// Cells classified modified, added or removed inside matched rows.
    pub modified_cells: usize,
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    pub rows: Vec<DiffRow>,
    pub columns: Vec<ColumnChange>,
    pub summary: DiffSummary,
    /// Strategy that actually ran, after any fallback.
    pub strategy: MatchingStrategy,
    /// Solver used by the adaptive strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver: Option<SolverKind>,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        self.summary.added_rows + self.summary.removed_rows + self.summary.modified_rows > 0
    }

    /// Applies `hide_unchanged_rows` / `hide_unchanged_columns` from `options`.
    pub fn view(&self, options: &ComparisonOptions) -> DiffView<'_> {
        let rows = self
            .rows
            .iter()
            .filter(|row| !options.hide_unchanged_rows || row.kind != RowKind::Unchanged)
            .collect();
        let columns = self
            .columns
            .iter()
            .filter(|col| !options.hide_unchanged_columns || col.has_changes)
            .collect();
        DiffView { rows, columns }
    }
}

/// Display projection of a [`DiffResult`] with the row/column filters applied.
#[derive(Debug, Clone)]
pub struct DiffView<'a> {
    pub rows: Vec<&'a DiffRow>,
    pub columns: Vec<&'a ColumnChange>,
}

impl<'a> DiffView<'a> {
    /// Cells of `row` restricted to the visible columns, in column order.
    pub fn cells(&self, row: &'a DiffRow) -> impl Iterator<Item = &'a DiffCell> + '_ {
        self.columns.iter().filter_map(move |col| row.cell(col.index))
    }
}
