//! Column profiling: how much each column helps tell rows apart.
//!
//! A column that is both distinctive and densely populated (an ID, an email) should
//! dominate row matching over sparse or low-cardinality columns (a status flag).

use crate::config::ComparisonOptions;
use crate::dataset::Dataset;
use crate::normalize::{NormalizedRows, Normalizer, value_at};
use rustc_hash::FxHashSet;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub index: usize,
    /// Distinct non-empty values over non-empty cells; 0 when the column has no values.
    pub unique_ratio: f64,
    pub empty_ratio: f64,
    /// Normalized weight; weights over non-ignored columns sum to 1, ignored columns get 0.
    pub weight: f64,
}

/// Profiles every column of both datasets together.
pub fn profile_columns(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
) -> Vec<ColumnProfile> {
    let normalizer = Normalizer::new(options);
    let rows_a = NormalizedRows::build(original, &normalizer);
    let rows_b = NormalizedRows::build(modified, &normalizer);
    profile_normalized(&rows_a, &rows_b, &normalizer)
}

pub fn column_weights(profiles: &[ColumnProfile]) -> Vec<f64> {
    profiles.iter().map(|p| p.weight).collect()
}

pub(crate) fn profile_normalized(
    rows_a: &NormalizedRows,
    rows_b: &NormalizedRows,
    normalizer: &Normalizer,
) -> Vec<ColumnProfile> {
    let ncols = rows_a.max_width().max(rows_b.max_width());
    let total = rows_a.len() + rows_b.len();

    let mut profiles: Vec<ColumnProfile> = (0..ncols)
        .map(|col| {
            let mut distinct: FxHashSet<&str> = FxHashSet::default();
            let mut non_empty = 0usize;

            for rows in [rows_a, rows_b] {
                for idx in 0..rows.len() {
                    let value = value_at(rows.row(idx), col);
                    if !value.is_empty() {
                        non_empty += 1;
                        distinct.insert(value);
                    }
                }
            }

            let empty = total - non_empty;
            let unique_ratio = if non_empty == 0 {
                0.0
            } else {
                distinct.len() as f64 / non_empty as f64
            };
            let empty_ratio = if total == 0 {
                0.0
            } else {
                empty as f64 / total as f64
            };
            let weight = if normalizer.is_ignored(col) {
                0.0
            } else {
                unique_ratio * (1.0 - empty_ratio)
            };

            ColumnProfile {
                index: col,
                unique_ratio,
                empty_ratio,
                weight,
            }
        })
        .collect();

    normalize_weights(&mut profiles, normalizer);
    profiles
}

fn normalize_weights(profiles: &mut [ColumnProfile], normalizer: &Normalizer) {
    let sum: f64 = profiles.iter().map(|p| p.weight).sum();
    if sum > 0.0 {
        for profile in profiles.iter_mut() {
            profile.weight /= sum;
        }
        return;
    }

    let active = profiles
        .iter()
        .filter(|p| !normalizer.is_ignored(p.index))
        .count();
    if active == 0 {
        return;
    }
    let equal = 1.0 / active as f64;
    for profile in profiles.iter_mut() {
        profile.weight = if normalizer.is_ignored(profile.index) {
            0.0
        } else {
            equal
        };
    }
}
