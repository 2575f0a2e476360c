//! Two-pass greedy matcher for inputs too large for the cubic solver.
//!
//! Pass one only takes near-certain pairs (`anchor_similarity`), so a mediocre early match
//! cannot consume a row that a later original row needed. Pass two revisits the rows still
//! unmatched with the lower `secondary_similarity` bar. Each pass is O(n * m) scorings.

use super::similarity::PairScorer;
use crate::config::MatchTuning;
use crate::engine::scheduler::Scheduler;
use crate::progress::CooperativeYield;

/// Pairs `candidates_a` with `candidates_b` (row indices), scanning originals in order.
/// Returns `(original, modified)` pairs in original order.
pub(crate) async fn greedy_match<Y: CooperativeYield>(
    scorer: &mut PairScorer<'_>,
    candidates_a: &[usize],
    candidates_b: &[usize],
    tuning: &MatchTuning,
    scheduler: &mut Scheduler<'_, Y>,
) -> Vec<(usize, usize)> {
    let mut taken = vec![false; candidates_b.len()];
    let mut assigned: Vec<Option<usize>> = vec![None; candidates_a.len()];

    let passes = [
        ("greedy_anchors", tuning.anchor_similarity),
        ("greedy_fill", tuning.secondary_similarity),
    ];

    for (phase, bar) in passes {
        for (pos, &original) in candidates_a.iter().enumerate() {
            if assigned[pos].is_none() {
                if let Some((slot, score)) = best_available(scorer, original, candidates_b, &taken) {
                    if score >= bar {
                        taken[slot] = true;
                        assigned[pos] = Some(slot);
                    }
                }
            }
            scheduler
                .row_checkpoint(phase, pos + 1, candidates_a.len())
                .await;
        }
    }

    candidates_a
        .iter()
        .zip(assigned)
        .filter_map(|(&original, slot)| slot.map(|slot| (original, candidates_b[slot])))
        .collect()
}

/// Highest-scoring untaken candidate; ties keep the lowest index.
fn best_available(
    scorer: &mut PairScorer<'_>,
    original: usize,
    candidates_b: &[usize],
    taken: &[bool],
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (slot, &modified) in candidates_b.iter().enumerate() {
        if taken[slot] {
            continue;
        }
        let score = scorer.score(original, modified);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((slot, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComparisonOptions;
    use crate::dataset::Dataset;
    use crate::normalize::{NormalizedRows, Normalizer};

    fn run(
        original: &Dataset,
        modified: &Dataset,
        weights: &[f64],
        tuning: &MatchTuning,
    ) -> (Vec<(usize, usize)>, u64) {
        let options = ComparisonOptions::default();
        let normalizer = Normalizer::new(&options);
        let rows_a = NormalizedRows::build(original, &normalizer);
        let rows_b = NormalizedRows::build(modified, &normalizer);
        let mut scorer = PairScorer::new(&rows_a, &rows_b, weights, &normalizer);
        let cand_a: Vec<usize> = (0..rows_a.len()).collect();
        let cand_b: Vec<usize> = (0..rows_b.len()).collect();
        let mut scheduler = Scheduler::blocking(None, tuning);
        let pairs = futures::executor::block_on(greedy_match(
            &mut scorer,
            &cand_a,
            &cand_b,
            tuning,
            &mut scheduler,
        ));
        (pairs, scorer.evaluations())
    }

    #[test]
    fn anchors_claim_exact_rows_before_fuzzy_fill() {
        // Row 0 is a weaker match for modified row 0 than row 1 is; without the anchor pass
        // row 0 would claim it first.
        let original = Dataset::from_values(vec![vec!["a", "x", "1"], vec!["a", "x", "2"]]);
        let modified = Dataset::from_values(vec![vec!["a", "x", "2"], vec!["b", "x", "1"]]);
        let weights = [0.4, 0.2, 0.4];

        let (pairs, _) = run(&original, &modified, &weights, &MatchTuning::default());
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn rows_below_secondary_bar_stay_unmatched() {
        let original = Dataset::from_values(vec![vec!["a", "1"], vec!["q", "9"]]);
        let modified = Dataset::from_values(vec![vec!["a", "1"], vec!["z", "8"]]);
        let (pairs, _) = run(&original, &modified, &[0.5, 0.5], &MatchTuning::default());
        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn evaluations_stay_within_two_passes() {
        let original = Dataset::from_values((0..20).map(|i| vec![format!("r{i}")]));
        let modified = Dataset::from_values((0..20).map(|i| vec![format!("s{i}")]));
        let (pairs, evaluations) = run(&original, &modified, &[1.0], &MatchTuning::default());
        assert!(pairs.is_empty());
        assert_eq!(evaluations, 2 * 20 * 20);
    }
}
