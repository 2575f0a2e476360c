//! Order-preserving alignment over exact row signatures.
//!
//! Rows match only when their signatures are equal, i.e. every compared cell is equal after
//! normalization. The result is the longest common subsequence of the two signature lists,
//! with everything off the subsequence reported as removed or added in place.

use super::AlignedRow;
use crate::config::ComparisonOptions;
use crate::dataset::Dataset;
use crate::engine::scheduler::Scheduler;
use crate::hashing::{RowSignature, row_signature};
use crate::normalize::{NormalizedRows, Normalizer};
use crate::progress::CooperativeYield;

/// Aligns by longest common subsequence, blocking until done.
pub fn align_sequence(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
) -> Vec<AlignedRow> {
    let mut scheduler = Scheduler::blocking(None, &options.tuning);
    futures::executor::block_on(sequence_rows(original, modified, options, &mut scheduler))
}

pub(crate) async fn sequence_rows<Y: CooperativeYield>(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
    scheduler: &mut Scheduler<'_, Y>,
) -> Vec<AlignedRow> {
    let normalizer = Normalizer::new(options);
    let sigs_a = signatures(&NormalizedRows::build(original, &normalizer), &normalizer);
    let sigs_b = signatures(&NormalizedRows::build(modified, &normalizer), &normalizer);
    lcs_alignment(&sigs_a, &sigs_b, scheduler).await
}

fn signatures(rows: &NormalizedRows, normalizer: &Normalizer) -> Vec<RowSignature> {
    (0..rows.len())
        .map(|idx| row_signature(rows.row(idx), normalizer))
        .collect()
}

async fn lcs_alignment<Y: CooperativeYield>(
    a: &[RowSignature],
    b: &[RowSignature],
    scheduler: &mut Scheduler<'_, Y>,
) -> Vec<AlignedRow> {
    let m = a.len();
    let n = b.len();
    if m == 0 && n == 0 {
        return Vec::new();
    }

    // dp[i * width + j] = LCS length of a[..i] and b[..j].
    let width = n + 1;
    let mut dp = vec![0u32; (m + 1) * width];
    for i in 1..=m {
        for j in 1..=n {
            dp[i * width + j] = if a[i - 1] == b[j - 1] {
                dp[(i - 1) * width + j - 1] + 1
            } else {
                dp[(i - 1) * width + j].max(dp[i * width + j - 1])
            };
        }
        scheduler.row_checkpoint("lcs", i, m).await;
    }

    let mut reversed = Vec::with_capacity(m + n);
    let (mut i, mut j) = (m, n);
    while i > 0 || j > 0 {
        if i > 0 && j > 0 && a[i - 1] == b[j - 1] {
            reversed.push(AlignedRow::matched(i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if j == 0 || (i > 0 && dp[(i - 1) * width + j] > dp[i * width + j - 1]) {
            reversed.push(AlignedRow::removed(i - 1));
            i -= 1;
        } else {
            reversed.push(AlignedRow::added(j - 1));
            j -= 1;
        }
    }

    reversed.reverse();
    reversed
}
