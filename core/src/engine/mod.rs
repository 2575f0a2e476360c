//! Comparison entry points.
//!
//! All entry points run the same async pipeline: align rows, classify cells per aligned
//! pair, aggregate column flags and summary counts. The blocking variants drive it with
//! [`NoYield`](crate::progress::NoYield); [`compare_cooperative`] awaits the caller's
//! yield at every checkpoint.
//!
//! ## Module Structure
//!
//! - `table_diff`: pipeline body and aggregation
//! - `scheduler`: checkpoint controller (progress, yield, metrics)

pub(crate) mod scheduler;
mod table_diff;

use crate::config::ComparisonOptions;
use crate::dataset::Dataset;
use crate::diff::DiffResult;
#[cfg(feature = "perf-metrics")]
use crate::perf::DiffMetrics;
use crate::progress::{CooperativeYield, ProgressCallback};
use scheduler::Scheduler;

/// Compares two datasets, blocking until the result is ready.
pub fn compare(original: &Dataset, modified: &Dataset, options: &ComparisonOptions) -> DiffResult {
    let mut scheduler = Scheduler::blocking(None, &options.tuning);
    futures::executor::block_on(table_diff::diff_tables(
        original,
        modified,
        options,
        &mut scheduler,
    ))
}

pub fn compare_with_progress(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
    progress: &dyn ProgressCallback,
) -> DiffResult {
    let mut scheduler = Scheduler::blocking(Some(progress), &options.tuning);
    futures::executor::block_on(table_diff::diff_tables(
        original,
        modified,
        options,
        &mut scheduler,
    ))
}

/// Compares two datasets, suspending on `yielder` every checkpoint interval.
///
/// Produces exactly the result [`compare`] would. Pair with
/// [`RequestTokens`](crate::RequestTokens) to drop results of superseded comparisons.
pub async fn compare_cooperative<Y: CooperativeYield>(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
    yielder: Y,
    progress: Option<&dyn ProgressCallback>,
) -> DiffResult {
    let mut scheduler = Scheduler::new(yielder, progress, &options.tuning);
    let result = table_diff::diff_tables(original, modified, options, &mut scheduler).await;
    log::debug!("cooperative comparison passed {} checkpoints", scheduler.checkpoints());
    result
}

#[cfg(feature = "perf-metrics")]
pub fn compare_with_metrics(
    original: &Dataset,
    modified: &Dataset,
    options: &ComparisonOptions,
) -> (DiffResult, DiffMetrics) {
    let mut scheduler = Scheduler::blocking(None, &options.tuning);
    let result = futures::executor::block_on(table_diff::diff_tables(
        original,
        modified,
        options,
        &mut scheduler,
    ));
    (result, scheduler.metrics)
}
