//! Tabular input data structures.
//!
//! This module defines the in-memory representation handed to the diff core by a parsing
//! collaborator:
//! - [`Dataset`]: ordered rows plus column metadata
//! - [`Row`]: an ordered sequence of cells (rows in one dataset may differ in length)
//! - [`Cell`]: a typed value with optional formula text
//! - [`CellValue`]: the closed set of value variants, with one canonical text projection

use crate::addressing::column_letter;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::hash::{Hash, Hasher};

/// A cell value as produced by parsing.
///
/// Equality treats `-0.0` and `0.0` as the same number and all NaNs as equal so that
/// values can be used as hash keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(f64),
    #[serde(rename = "boolean")]
    Bool(bool),
    Date(NaiveDateTime),
    #[default]
    Empty,
}

/// Type tag of a [`Cell`], derived from its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Text,
    Number,
    Boolean,
    Date,
    Empty,
}

impl CellValue {
    /// The canonical string projection shared by profiling, scoring, signatures and diffing.
    pub fn canonical_text(&self) -> Cow<'_, str> {
        match self {
            CellValue::Text(s) => Cow::Borrowed(s.as_str()),
            CellValue::Number(n) => Cow::Owned(number_text(*n)),
            CellValue::Bool(true) => Cow::Borrowed("true"),
            CellValue::Bool(false) => Cow::Borrowed("false"),
            CellValue::Date(dt) => Cow::Owned(date_text(dt)),
            CellValue::Empty => Cow::Borrowed(""),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellValue::Text(_) => CellKind::Text,
            CellValue::Number(_) => CellKind::Number,
            CellValue::Bool(_) => CellKind::Boolean,
            CellValue::Date(_) => CellKind::Date,
            CellValue::Empty => CellKind::Empty,
        }
    }

}

fn number_text(n: f64) -> String {
    if n == 0.0 {
        // Collapses -0.0.
        return "0".to_string();
    }
    n.to_string()
}

/// `%.f` prints no fraction for whole seconds, otherwise 3, 6 or 9 digits as needed.
fn date_text(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

fn normalize_float_bits(n: f64) -> u64 {
    if n == 0.0 {
        0.0f64.to_bits()
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => {
                normalize_float_bits(*a) == normalize_float_bits(*b)
            }
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Date(a), CellValue::Date(b)) => a == b,
            (CellValue::Empty, CellValue::Empty) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Text(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            CellValue::Number(n) => {
                1u8.hash(state);
                normalize_float_bits(*n).hash(state);
            }
            CellValue::Bool(b) => {
                2u8.hash(state);
                b.hash(state);
            }
            CellValue::Date(dt) => {
                3u8.hash(state);
                dt.hash(state);
            }
            CellValue::Empty => 4u8.hash(state),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::Date(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

/// A single cell: value plus optional formula text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    #[serde(flatten)]
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Cell {
        Cell {
            value: value.into(),
            formula: None,
        }
    }

    pub fn with_formula(value: impl Into<CellValue>, formula: impl Into<String>) -> Cell {
        Cell {
            value: value.into(),
            formula: Some(formula.into()),
        }
    }

    pub fn empty() -> Cell {
        Cell::default()
    }

    pub fn kind(&self) -> CellKind {
        self.value.kind()
    }
}

impl<T: Into<CellValue>> From<T> for Cell {
    fn from(value: T) -> Self {
        Cell::new(value)
    }
}

/// An ordered sequence of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Row {
        Row { cells }
    }

    pub fn from_values<I, V>(values: I) -> Row
    where
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        Row {
            cells: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, col: usize) -> Option<&Cell> {
        self.cells.get(col)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Display metadata for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    pub index: usize,
    /// Spreadsheet letter (`A`, `B`, ..., `AA`).
    pub letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ColumnMeta {
    pub fn new(index: usize) -> ColumnMeta {
        ColumnMeta {
            index,
            letter: column_letter(index),
            label: None,
        }
    }

    pub fn with_label(index: usize, label: impl Into<String>) -> ColumnMeta {
        ColumnMeta {
            label: Some(label.into()),
            ..ColumnMeta::new(index)
        }
    }
}

/// Read-only tabular input: rows plus column metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub rows: Vec<Row>,
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
}

impl Dataset {
    /// Builds a dataset whose column metadata covers the widest row.
    pub fn from_rows(rows: Vec<Row>) -> Dataset {
        let width = rows.iter().map(Row::len).max().unwrap_or(0);
        Dataset {
            rows,
            columns: (0..width).map(ColumnMeta::new).collect(),
        }
    }

    pub fn from_values<R, I, V>(rows: R) -> Dataset
    where
        R: IntoIterator<Item = I>,
        I: IntoIterator<Item = V>,
        V: Into<Cell>,
    {
        Dataset::from_rows(rows.into_iter().map(Row::from_values).collect())
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Dataset
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (index, label) in labels.into_iter().enumerate() {
            match self.columns.get_mut(index) {
                Some(meta) => meta.label = Some(label.into()),
                None => self.columns.push(ColumnMeta::with_label(index, label)),
            }
        }
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// The larger of the declared column metadata and the widest row.
    pub fn column_count(&self) -> usize {
        self.max_row_len().max(self.columns.len())
    }

    pub fn max_row_len(&self) -> usize {
        self.rows.iter().map(Row::len).max().unwrap_or(0)
    }

    pub fn column(&self, index: usize) -> Option<&ColumnMeta> {
        self.columns.iter().find(|meta| meta.index == index)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn canonical_text_projects_every_variant() {
        assert_eq!(CellValue::from("abc").canonical_text(), "abc");
        assert_eq!(CellValue::Number(3.0).canonical_text(), "3");
        assert_eq!(CellValue::Number(-0.0).canonical_text(), "0");
        assert_eq!(CellValue::Number(2.5).canonical_text(), "2.5");
        assert_eq!(CellValue::Bool(true).canonical_text(), "true");
        assert_eq!(CellValue::Empty.canonical_text(), "");

        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(14, 5, 0))
            .expect("valid date");
        assert_eq!(CellValue::Date(dt).canonical_text(), "2024-03-09T14:05:00");
    }

    #[test]
    fn signed_zero_numbers_compare_equal() {
        assert_eq!(CellValue::Number(0.0), CellValue::Number(-0.0));
        assert_ne!(CellValue::Number(1.0), CellValue::from("1"));
    }

    #[test]
    fn date_text_keeps_sub_millisecond_precision() {
        let at = |nano: u32| {
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .and_then(|d| d.and_hms_nano_opt(10, 0, 0, nano))
                .map(CellValue::Date)
                .expect("valid date")
        };

        assert_eq!(at(1_000_000).canonical_text(), "2024-01-01T10:00:00.001");
        assert_eq!(at(1_400_000).canonical_text(), "2024-01-01T10:00:00.001400");
        assert_eq!(at(500).canonical_text(), "2024-01-01T10:00:00.000000500");
        assert_ne!(at(1_000_000).canonical_text(), at(1_400_000).canonical_text());
    }

    #[test]
    fn empty_value_has_empty_kind() {
        assert_eq!(Cell::new(CellValue::Empty).kind(), CellKind::Empty);
        assert_eq!(CellValue::Empty.canonical_text(), "");
    }

    #[test]
    fn column_count_covers_ragged_rows() {
        let ds = Dataset::from_values(vec![vec!["a"], vec!["b", "c", "d"]]);
        assert_eq!(ds.column_count(), 3);
        assert_eq!(ds.columns[2].letter, "C");

        let labelled = ds.with_labels(["id", "name", "qty", "extra"]);
        assert_eq!(labelled.column_count(), 4);
        assert_eq!(labelled.column(3).and_then(|c| c.label.as_deref()), Some("extra"));
    }

    #[test]
    fn cells_serialize_with_type_tag() {
        let cell = Cell::with_formula(3.0, "=1+2");
        let json = serde_json::to_string(&cell).expect("serialize cell");
        assert_eq!(json, r#"{"type":"number","value":3.0,"formula":"=1+2"}"#);

        let parsed: Cell = serde_json::from_str(r#"{"type":"empty"}"#).expect("parse empty cell");
        assert_eq!(parsed, Cell::empty());
    }
}
