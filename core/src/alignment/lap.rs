//! Linear assignment solver (Hungarian algorithm).
//!
//! Dense O(n^3) primal-dual implementation over integer costs with row/column potentials.
//! Each outer iteration grows an alternating tree from one row using a Dijkstra-like
//! relaxation over reduced costs, then augments along the recorded path. Ties resolve to
//! the lowest column index, so identical inputs always give identical assignments.
//!
//! The solver body is async so the cooperative comparison can suspend every
//! `solver_checkpoint_interval` rows; the blocking wrappers drive it with a no-op yield.

use crate::config::MatchTuning;
use crate::engine::scheduler::Scheduler;
use crate::progress::{CooperativeYield, ProgressCallback};

/// Solves a (possibly rectangular) assignment, blocking until done.
///
/// Missing entries are padded with `pad_cost`. `result[i]` is the column assigned to row `i`,
/// or `None` when the row was assigned to a padding column.
pub fn solve_assignment(costs: &[Vec<i64>], pad_cost: i64) -> Vec<Option<usize>> {
    let mut scheduler = Scheduler::blocking(None, &MatchTuning::default());
    futures::executor::block_on(solve_rect(costs, pad_cost, &mut scheduler))
}

/// [`solve_assignment`] reporting progress every `interval` outer iterations.
pub fn solve_assignment_with_progress(
    costs: &[Vec<i64>],
    pad_cost: i64,
    interval: usize,
    progress: &dyn ProgressCallback,
) -> Vec<Option<usize>> {
    let tuning = MatchTuning {
        solver_checkpoint_interval: interval,
        ..Default::default()
    };
    let mut scheduler = Scheduler::blocking(Some(progress), &tuning);
    futures::executor::block_on(solve_rect(costs, pad_cost, &mut scheduler))
}

pub(crate) async fn solve_rect<Y: CooperativeYield>(
    costs: &[Vec<i64>],
    pad_cost: i64,
    scheduler: &mut Scheduler<'_, Y>,
) -> Vec<Option<usize>> {
    let rows = costs.len();
    let cols = costs.iter().map(|row| row.len()).max().unwrap_or(0);
    let size = rows.max(cols);

    if size == 0 {
        return Vec::new();
    }

    let mut square = vec![vec![pad_cost; size]; size];
    for (i, row) in costs.iter().enumerate() {
        for (j, &cost) in row.iter().enumerate() {
            square[i][j] = cost;
        }
    }

    let real_cols: Vec<usize> = costs.iter().map(Vec::len).collect();
    solve(&square, scheduler)
        .await
        .into_iter()
        .take(rows)
        .enumerate()
        .map(|(i, j)| (j < real_cols[i]).then_some(j))
        .collect()
}

pub(crate) async fn solve<Y: CooperativeYield>(
    costs: &[Vec<i64>],
    scheduler: &mut Scheduler<'_, Y>,
) -> Vec<usize> {
    let n = costs.len();
    if n == 0 {
        return Vec::new();
    }

    debug_assert!(costs.iter().all(|row| row.len() == n));

    let inf = i64::MAX / 4;
    let mut u = vec![0i64; n + 1];
    let mut v = vec![0i64; n + 1];
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![inf; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = inf;
            let mut j1 = 0usize;

            // Ascending scan with strict `<`: on equal reduced costs the lowest column wins
            // both the relaxation and the next tree column.
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = costs[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }

        scheduler.solver_checkpoint(i, n).await;
    }

    let mut assignment = vec![0usize; n];
    for j in 1..=n {
        if p[j] > 0 {
            assignment[p[j] - 1] = j - 1;
        }
    }
    assignment
}
