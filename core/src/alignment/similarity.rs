use crate::config::ComparisonOptions;
use crate::dataset::Row;
use crate::normalize::{NormalizedRows, Normalizer, value_at};

/// Weighted equality score in `[0, 1]` between two rows.
///
/// Each non-ignored column whose normalized values are equal contributes its weight.
/// A missing weight counts as 0 and a missing cell as the empty string.
pub fn row_similarity(a: &Row, b: &Row, weights: &[f64], options: &ComparisonOptions) -> f64 {
    let normalizer = Normalizer::new(options);
    let width = a.len().max(b.len()).max(weights.len());

    (0..width)
        .filter(|&col| !normalizer.is_ignored(col))
        .filter(|&col| normalizer.cell_at(a, col) == normalizer.cell_at(b, col))
        .map(|col| weights.get(col).copied().unwrap_or(0.0))
        .sum()
}

/// [`row_similarity`] over rows that were normalized up front.
pub(crate) fn normalized_similarity(
    a: &[String],
    b: &[String],
    weights: &[f64],
    normalizer: &Normalizer,
) -> f64 {
    let mut score = 0.0;
    for (col, &weight) in weights.iter().enumerate() {
        if weight == 0.0 || normalizer.is_ignored(col) {
            continue;
        }
        if value_at(a, col) == value_at(b, col) {
            score += weight;
        }
    }
    score
}

/// Scores original/modified row pairs by index and counts how many it evaluated.
pub(crate) struct PairScorer<'a> {
    rows_a: &'a NormalizedRows,
    rows_b: &'a NormalizedRows,
    weights: &'a [f64],
    normalizer: &'a Normalizer,
    evaluations: u64,
}

impl<'a> PairScorer<'a> {
    pub(crate) fn new(
        rows_a: &'a NormalizedRows,
        rows_b: &'a NormalizedRows,
        weights: &'a [f64],
        normalizer: &'a Normalizer,
    ) -> Self {
        Self {
            rows_a,
            rows_b,
            weights,
            normalizer,
            evaluations: 0,
        }
    }

    pub(crate) fn score(&mut self, original: usize, modified: usize) -> f64 {
        self.evaluations = self.evaluations.saturating_add(1);
        normalized_similarity(
            self.rows_a.row(original),
            self.rows_b.row(modified),
            self.weights,
            self.normalizer,
        )
    }

    pub(crate) fn evaluations(&self) -> u64 {
        self.evaluations
    }
}
