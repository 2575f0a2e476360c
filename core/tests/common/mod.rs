//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use tabular_diff::{
    CellChange, ComparisonOptions, Dataset, DiffResult, MatchingStrategy, RowKind,
};

pub fn dataset(rows: &[&[&str]]) -> Dataset {
    Dataset::from_values(rows.iter().map(|row| row.iter().copied()))
}

/// `rows` rows of `[id, name, group]` with `id = "id{i}"`.
pub fn numbered_rows(rows: usize, prefix: &str) -> Dataset {
    Dataset::from_values((0..rows).map(|i| {
        vec![
            format!("id{i}"),
            format!("{prefix}-{i}"),
            format!("g{}", i % 7),
        ]
    }))
}

pub fn options_with(strategy: MatchingStrategy) -> ComparisonOptions {
    ComparisonOptions {
        matching_strategy: strategy,
        ..Default::default()
    }
}

pub fn key_options(key: usize) -> ComparisonOptions {
    ComparisonOptions {
        matching_strategy: MatchingStrategy::KeyColumn,
        key_column_index: Some(key),
        ..Default::default()
    }
}

/// `(original_index, modified_index, kind)` for every row of a result.
pub fn row_shape(result: &DiffResult) -> Vec<(Option<usize>, Option<usize>, RowKind)> {
    result
        .rows
        .iter()
        .map(|row| (row.original_index, row.modified_index, row.kind))
        .collect()
}

pub fn cell_changes(result: &DiffResult, row: usize) -> Vec<CellChange> {
    result.rows[row].cells.iter().map(|c| c.change).collect()
}

pub fn to_json(result: &DiffResult) -> String {
    serde_json::to_string(result).expect("serialize diff result")
}
