use super::greedy::greedy_match;
use super::profile::{ColumnProfile, column_weights, profile_normalized};
use super::similarity::PairScorer;
use super::threshold::dynamic_threshold;
use super::{AlignedRow, lap, sort_for_display};
use crate::config::{ComparisonOptions, MatchTuning};
use crate::dataset::Dataset;
use crate::engine::scheduler::Scheduler;
use crate::normalize::{NormalizedRows, Normalizer};
#[cfg(feature = "perf-metrics")]
use crate::perf::Phase;
use crate::progress::CooperativeYield;
use serde::Serialize;

/// Fixed-point scale for `1 - similarity` costs handed to the integer solver.
const COST_SCALE: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverKind {
    Hungarian,
    Greedy,
}

/// Diagnostics from one adaptive alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchStats {
    pub solver: SolverKind,
    /// Row-pair similarity computations performed.
    pub similarity_evaluations: u64,
    /// Acceptance threshold applied to solver pairs; `None` on the greedy path.
    pub threshold: Option<f64>,
    pub profiles: Vec<ColumnProfile>,
}

pub(crate) async fn align_adaptive<Y: CooperativeYield>(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
    scheduler: &mut Scheduler<'_, Y>,
) -> (Vec<AlignedRow>, MatchStats) {
    let tuning = &options.tuning;
    let normalizer = Normalizer::new(options);
    let rows_a = NormalizedRows::build(original, &normalizer);
    let rows_b = NormalizedRows::build(modified, &normalizer);

    #[cfg(feature = "perf-metrics")]
    scheduler.metrics.start_phase(Phase::Profile);
    let profiles = profile_normalized(&rows_a, &rows_b, &normalizer);
    #[cfg(feature = "perf-metrics")]
    scheduler.metrics.end_phase(Phase::Profile);

    let weights = column_weights(&profiles);
    let mut scorer = PairScorer::new(&rows_a, &rows_b, &weights, &normalizer);
    let largest = rows_a.len().max(rows_b.len());

    let (pairs, solver, threshold) = if largest > tuning.greedy_row_threshold {
        log::debug!(
            "{largest} rows exceed greedy_row_threshold {}; using greedy matcher",
            tuning.greedy_row_threshold
        );
        let candidates_a: Vec<usize> = (0..rows_a.len()).filter(|&i| !rows_a.is_blank(i)).collect();
        let candidates_b: Vec<usize> = (0..rows_b.len()).filter(|&j| !rows_b.is_blank(j)).collect();
        let pairs = greedy_match(&mut scorer, &candidates_a, &candidates_b, tuning, scheduler).await;
        (pairs, SolverKind::Greedy, None)
    } else {
        let (pairs, threshold) =
            optimal_pairs(&mut scorer, rows_a.len(), rows_b.len(), tuning, scheduler).await;
        (pairs, SolverKind::Hungarian, Some(threshold))
    };

    #[cfg(feature = "perf-metrics")]
    scheduler
        .metrics
        .add_similarity_evaluations(scorer.evaluations());

    let rows = assemble(&pairs, rows_a.len(), rows_b.len());
    let stats = MatchStats {
        solver,
        similarity_evaluations: scorer.evaluations(),
        threshold,
        profiles,
    };
    (rows, stats)
}

/// Optimal assignment over the full cost matrix, then the dynamic threshold over the
/// scores of the assigned pairs.
async fn optimal_pairs<Y: CooperativeYield>(
    scorer: &mut PairScorer<'_>,
    len_a: usize,
    len_b: usize,
    tuning: &MatchTuning,
    scheduler: &mut Scheduler<'_, Y>,
) -> (Vec<(usize, usize)>, f64) {
    if len_a == 0 || len_b == 0 {
        return (Vec::new(), tuning.default_threshold);
    }

    let mut similarities = Vec::with_capacity(len_a);
    let mut costs = Vec::with_capacity(len_a);
    for i in 0..len_a {
        let row: Vec<f64> = (0..len_b).map(|j| scorer.score(i, j)).collect();
        costs.push(row.iter().map(|&s| similarity_to_cost(s)).collect::<Vec<i64>>());
        similarities.push(row);
        scheduler.row_checkpoint("cost_matrix", i + 1, len_a).await;
    }

    let assignment = lap::solve_rect(&costs, COST_SCALE as i64, scheduler).await;
    let candidates: Vec<(usize, usize, f64)> = assignment
        .iter()
        .enumerate()
        .filter_map(|(i, slot)| slot.map(|j| (i, j, similarities[i][j])))
        .collect();

    let scores: Vec<f64> = candidates.iter().map(|&(_, _, score)| score).collect();
    let threshold = dynamic_threshold(&scores, tuning);
    let accepted: Vec<(usize, usize)> = candidates
        .iter()
        .filter(|&&(_, _, score)| score >= threshold)
        .map(|&(i, j, _)| (i, j))
        .collect();

    log::debug!(
        "optimal assignment kept {}/{} pairs at threshold {threshold:.3}",
        accepted.len(),
        candidates.len()
    );
    (accepted, threshold)
}

fn similarity_to_cost(similarity: f64) -> i64 {
    ((1.0 - similarity) * COST_SCALE).round() as i64
}

fn assemble(pairs: &[(usize, usize)], len_a: usize, len_b: usize) -> Vec<AlignedRow> {
    let mut used_a = vec![false; len_a];
    let mut used_b = vec![false; len_b];
    let mut rows = Vec::with_capacity(len_a + len_b);

    for &(i, j) in pairs {
        used_a[i] = true;
        used_b[j] = true;
        rows.push(AlignedRow::matched(i, j));
    }
    rows.extend((0..len_a).filter(|&i| !used_a[i]).map(AlignedRow::removed));
    rows.extend((0..len_b).filter(|&j| !used_b[j]).map(AlignedRow::added));

    sort_for_display(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alignment::AlignmentKind;

    fn align(
        original: &Dataset,
        modified: &Dataset,
        options: &ComparisonOptions,
    ) -> (Vec<AlignedRow>, MatchStats) {
        let mut scheduler = Scheduler::blocking(None, &options.tuning);
        futures::executor::block_on(align_adaptive(original, modified, options, &mut scheduler))
    }

    #[test]
    fn shifted_rows_pair_by_content() {
        let original = Dataset::from_values(vec![vec!["A", "1"], vec!["B", "2"], vec!["C", "3"]]);
        let modified = Dataset::from_values(vec![vec!["B", "2"], vec!["C", "3"], vec!["D", "4"]]);

        let (rows, stats) = align(&original, &modified, &ComparisonOptions::default());
        assert_eq!(
            rows,
            vec![
                AlignedRow::removed(0),
                AlignedRow::matched(1, 0),
                AlignedRow::matched(2, 1),
                AlignedRow::added(2),
            ]
        );
        assert_eq!(stats.solver, SolverKind::Hungarian);
        assert_eq!(stats.threshold, Some(0.3));
        assert_eq!(stats.similarity_evaluations, 9);
    }

    #[test]
    fn reordered_rows_still_match() {
        let original = Dataset::from_values(vec![vec!["1", "x"], vec!["2", "y"], vec!["3", "z"]]);
        let modified = Dataset::from_values(vec![vec!["3", "z"], vec!["1", "x"], vec!["2", "y"]]);

        let (rows, _) = align(&original, &modified, &ComparisonOptions::default());
        assert_eq!(
            rows,
            vec![
                AlignedRow::matched(0, 1),
                AlignedRow::matched(1, 2),
                AlignedRow::matched(2, 0),
            ]
        );
    }

    #[test]
    fn empty_side_is_all_added_or_removed() {
        let data = Dataset::from_values(vec![vec!["a"], vec!["b"]]);
        let (rows, stats) = align(&Dataset::default(), &data, &ComparisonOptions::default());
        assert!(rows.iter().all(|r| r.kind == AlignmentKind::Added));
        assert_eq!(rows.len(), 2);
        assert_eq!(stats.threshold, Some(0.5));
        assert_eq!(stats.similarity_evaluations, 0);
    }

    #[test]
    fn greedy_path_skips_blank_rows() {
        let original = Dataset::from_values(vec![vec!["a", "1"], vec!["", ""], vec!["b", "2"]]);
        let modified = Dataset::from_values(vec![vec!["", ""], vec!["b", "2"], vec!["a", "1"]]);
        let options = ComparisonOptions::builder()
            .greedy_row_threshold(2)
            .build()
            .expect("valid options");

        let (rows, stats) = align(&original, &modified, &options);
        assert_eq!(stats.solver, SolverKind::Greedy);
        assert_eq!(stats.threshold, None);
        assert_eq!(
            rows,
            vec![
                AlignedRow::matched(0, 2),
                AlignedRow::added(0),
                AlignedRow::removed(1),
                AlignedRow::matched(2, 1),
            ]
        );
    }

    #[test]
    fn cost_conversion_is_monotonic() {
        assert_eq!(similarity_to_cost(1.0), 0);
        assert_eq!(similarity_to_cost(0.0), COST_SCALE as i64);
        assert!(similarity_to_cost(0.8) < similarity_to_cost(0.7));
    }
}
