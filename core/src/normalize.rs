//! Value normalization shared by profiling, scoring, signatures and cell diffing.

use crate::config::ComparisonOptions;
use crate::dataset::{CellValue, Dataset, Row};
use rustc_hash::FxHashSet;
use std::borrow::Cow;

/// Applies the whitespace/case folding rules of one comparison.
#[derive(Debug, Clone)]
pub(crate) struct Normalizer {
    ignore_whitespace: bool,
    ignore_case: bool,
    ignored: FxHashSet<usize>,
}

impl Normalizer {
    pub(crate) fn new(options: &ComparisonOptions) -> Normalizer {
        Normalizer {
            ignore_whitespace: options.ignore_whitespace,
            ignore_case: options.ignore_case,
            ignored: options.ignored_columns.iter().copied().collect(),
        }
    }

    pub(crate) fn is_ignored(&self, col: usize) -> bool {
        self.ignored.contains(&col)
    }

    pub(crate) fn text<'a>(&self, text: Cow<'a, str>) -> Cow<'a, str> {
        if !self.ignore_whitespace && !self.ignore_case {
            return text;
        }

        let folded = if self.ignore_whitespace {
            Cow::Owned(text.split_whitespace().collect::<Vec<_>>().join(" "))
        } else {
            text
        };

        if self.ignore_case {
            Cow::Owned(folded.to_lowercase())
        } else {
            folded
        }
    }

    pub(crate) fn value<'a>(&self, value: &'a CellValue) -> Cow<'a, str> {
        self.text(value.canonical_text())
    }

    /// Normalized value at `col`; a missing cell reads as the empty string.
    pub(crate) fn cell_at<'a>(&self, row: &'a Row, col: usize) -> Cow<'a, str> {
        match row.get(col) {
            Some(cell) => self.value(&cell.value),
            None => Cow::Borrowed(""),
        }
    }

    pub(crate) fn formula<'a>(&self, formula: Option<&'a str>) -> Option<Cow<'a, str>> {
        formula.map(|f| self.text(Cow::Borrowed(f)))
    }
}

/// Every cell of a dataset normalized once up front, so that pairwise scoring does not
/// re-fold the same strings.
#[derive(Debug, Clone)]
pub(crate) struct NormalizedRows {
    rows: Vec<Vec<String>>,
}

impl NormalizedRows {
    pub(crate) fn build(dataset: &Dataset, normalizer: &Normalizer) -> NormalizedRows {
        let rows = dataset
            .rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|cell| normalizer.value(&cell.value).into_owned())
                    .collect()
            })
            .collect();
        NormalizedRows { rows }
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn row(&self, idx: usize) -> &[String] {
        self.rows.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn max_width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// True when every cell of the row normalizes to the empty string.
    pub(crate) fn is_blank(&self, idx: usize) -> bool {
        self.row(idx).iter().all(String::is_empty)
    }
}

pub(crate) fn value_at(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer(ignore_whitespace: bool, ignore_case: bool) -> Normalizer {
        Normalizer::new(&ComparisonOptions {
            ignore_whitespace,
            ignore_case,
            ..Default::default()
        })
    }

    #[test]
    fn whitespace_folding_collapses_runs_and_trims() {
        let n = normalizer(true, false);
        assert_eq!(n.text(Cow::Borrowed("  a \t b\n c ")), "a b c");
        assert_eq!(n.text(Cow::Borrowed("   ")), "");
    }

    #[test]
    fn case_folding_lowercases() {
        let n = normalizer(false, true);
        assert_eq!(n.text(Cow::Borrowed("AbC")), "abc");
        assert_eq!(n.text(Cow::Borrowed(" X ")), " x ");
    }

    #[test]
    fn no_flags_borrows_input() {
        let n = normalizer(false, false);
        assert!(matches!(n.text(Cow::Borrowed(" A ")), Cow::Borrowed(" A ")));
    }

    #[test]
    fn blank_rows_are_detected_after_normalization() {
        let ds = Dataset::from_values(vec![vec!["", "  "], vec!["", "x"]]);
        let rows = NormalizedRows::build(&ds, &normalizer(true, false));
        assert!(rows.is_blank(0));
        assert!(!rows.is_blank(1));
        assert_eq!(value_at(rows.row(1), 5), "");
    }
}
