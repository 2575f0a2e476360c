use super::profile::profile_normalized;
use super::{AlignedRow, sort_for_display};
use crate::config::ComparisonOptions;
use crate::dataset::Dataset;
use crate::normalize::{NormalizedRows, Normalizer, value_at};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Pairs rows by the normalized, trimmed value of `key_column`.
///
/// Each original row, in order, takes the first not-yet-used modified row with the same
/// key. Duplicate keys therefore pair up in row order; surplus duplicates end up removed
/// or added.
pub fn align_by_key(
    original: &Dataset,
    modified: &Dataset,
    key_column: usize,
    options: &ComparisonOptions,
) -> Vec<AlignedRow> {
    let normalizer = Normalizer::new(options);
    let rows_a = NormalizedRows::build(original, &normalizer);
    let rows_b = NormalizedRows::build(modified, &normalizer);

    let mut lookup: FxHashMap<&str, VecDeque<usize>> = FxHashMap::default();
    for idx in 0..rows_b.len() {
        lookup
            .entry(key_of(&rows_b, idx, key_column))
            .or_default()
            .push_back(idx);
    }

    let mut used_b = vec![false; rows_b.len()];
    let mut rows = Vec::with_capacity(rows_a.len() + rows_b.len());
    for idx in 0..rows_a.len() {
        let candidate = lookup
            .get_mut(key_of(&rows_a, idx, key_column))
            .and_then(VecDeque::pop_front);
        match candidate {
            Some(modified_idx) => {
                used_b[modified_idx] = true;
                rows.push(AlignedRow::matched(idx, modified_idx));
            }
            None => rows.push(AlignedRow::removed(idx)),
        }
    }
    rows.extend(
        used_b
            .iter()
            .enumerate()
            .filter(|&(_, used)| !used)
            .map(|(idx, _)| AlignedRow::added(idx)),
    );

    sort_for_display(&mut rows);
    rows
}

fn key_of(rows: &NormalizedRows, idx: usize, key_column: usize) -> &str {
    value_at(rows.row(idx), key_column).trim()
}

/// Suggests a column that can serve as a row key for both datasets.
///
/// Candidates are non-ignored columns whose normalized values are present in every row and
/// distinct within each dataset. The candidate with the highest profile weight wins; ties
/// go to the lowest index.
pub fn suggest_key_column(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
) -> Option<usize> {
    if original.is_empty() && modified.is_empty() {
        return None;
    }

    let normalizer = Normalizer::new(options);
    let rows_a = NormalizedRows::build(original, &normalizer);
    let rows_b = NormalizedRows::build(modified, &normalizer);
    let profiles = profile_normalized(&rows_a, &rows_b, &normalizer);

    let mut best: Option<(usize, f64)> = None;
    for profile in &profiles {
        let col = profile.index;
        if normalizer.is_ignored(col)
            || !is_unique_and_dense(&rows_a, col)
            || !is_unique_and_dense(&rows_b, col)
        {
            continue;
        }
        if best.is_none_or(|(_, weight)| profile.weight > weight) {
            best = Some((col, profile.weight));
        }
    }

    if let Some((col, weight)) = best {
        log::debug!("suggested key column {col} (weight {weight:.3})");
    }
    best.map(|(col, _)| col)
}

fn is_unique_and_dense(rows: &NormalizedRows, col: usize) -> bool {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    (0..rows.len()).all(|idx| {
        let key = key_of(rows, idx, col);
        !key.is_empty() && seen.insert(key)
    })
}
