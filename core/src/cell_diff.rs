//! Per-cell classification within one aligned row.

use crate::config::ComparisonOptions;
use crate::dataset::{Cell, Row};
use crate::diff::{CellChange, DiffCell};
use crate::normalize::Normalizer;

/// Classifies the cells of one aligned pair. Either side may be absent for added and
/// removed rows.
pub fn diff_row_cells(
    original: Option<&Row>,
    modified: Option<&Row>,
    column_count: usize,
    options: &ComparisonOptions,
) -> Vec<DiffCell> {
    CellDiffer::new(options).diff_row(original, modified, column_count)
}

pub(crate) struct CellDiffer {
    normalizer: Normalizer,
    compare_formulas: bool,
}

impl CellDiffer {
    pub(crate) fn new(options: &ComparisonOptions) -> CellDiffer {
        CellDiffer {
            normalizer: Normalizer::new(options),
            compare_formulas: options.compare_formulas,
        }
    }

    pub(crate) fn diff_row(
        &self,
        original: Option<&Row>,
        modified: Option<&Row>,
        column_count: usize,
    ) -> Vec<DiffCell> {
        (0..column_count)
            .map(|col| {
                let a = original.and_then(|row| row.get(col));
                let b = modified.and_then(|row| row.get(col));
                let change = match (original.is_some(), modified.is_some()) {
                    (true, true) => self.classify(col, a, b),
                    (false, _) => self.one_sided(col, b, CellChange::Added),
                    (_, false) => self.one_sided(col, a, CellChange::Removed),
                };
                DiffCell {
                    column: col,
                    change,
                    original: a.cloned(),
                    modified: b.cloned(),
                }
            })
            .collect()
    }

    /// Classification of one column of a matched pair.
    pub(crate) fn classify(&self, col: usize, a: Option<&Cell>, b: Option<&Cell>) -> CellChange {
        if self.normalizer.is_ignored(col) {
            return CellChange::Unchanged;
        }

        let a = a.filter(|cell| !self.is_empty(cell));
        let b = b.filter(|cell| !self.is_empty(cell));
        match (a, b) {
            (None, None) => CellChange::Unchanged,
            (None, Some(_)) => CellChange::Added,
            (Some(_), None) => CellChange::Removed,
            (Some(a), Some(b)) => {
                if self.values_equal(a, b) && self.formulas_equal(a, b) {
                    CellChange::Unchanged
                } else {
                    CellChange::Modified
                }
            }
        }
    }

    fn one_sided(&self, col: usize, cell: Option<&Cell>, change: CellChange) -> CellChange {
        if self.normalizer.is_ignored(col) || cell.is_none_or(|c| self.is_empty(c)) {
            CellChange::Unchanged
        } else {
            change
        }
    }

    /// Empty after normalization, and without a formula when formulas are compared.
    fn is_empty(&self, cell: &Cell) -> bool {
        self.normalizer.value(&cell.value).is_empty()
            && (!self.compare_formulas || self.formula(cell).is_none())
    }

    fn values_equal(&self, a: &Cell, b: &Cell) -> bool {
        self.normalizer.value(&a.value) == self.normalizer.value(&b.value)
    }

    fn formulas_equal(&self, a: &Cell, b: &Cell) -> bool {
        !self.compare_formulas || self.formula(a) == self.formula(b)
    }

    fn formula<'a>(&self, cell: &'a Cell) -> Option<std::borrow::Cow<'a, str>> {
        self.normalizer
            .formula(cell.formula.as_deref())
            .filter(|f| !f.is_empty())
    }
}
