use crate::config::MatchTuning;
#[cfg(feature = "perf-metrics")]
use crate::perf::DiffMetrics;
use crate::progress::{CooperativeYield, NoYield, ProgressCallback};

/// Per-invocation checkpoint controller.
///
/// Owns the caller's yield strategy and progress sink for one comparison. Loops call
/// `solver_checkpoint`/`row_checkpoint` after every unit of work; at each interval boundary
/// the scheduler reports progress and awaits the yield.
pub(crate) struct Scheduler<'a, Y> {
    yielder: Y,
    progress: Option<&'a dyn ProgressCallback>,
    solver_interval: usize,
    row_interval: usize,
    last_progress_phase: Option<&'static str>,
    last_progress_percent: Option<f32>,
    checkpoints: u64,
    #[cfg(feature = "perf-metrics")]
    pub(crate) metrics: DiffMetrics,
}

impl<'a> Scheduler<'a, NoYield> {
    pub(crate) fn blocking(
        progress: Option<&'a dyn ProgressCallback>,
        tuning: &MatchTuning,
    ) -> Self {
        Scheduler::new(NoYield, progress, tuning)
    }
}

impl<'a, Y: CooperativeYield> Scheduler<'a, Y> {
    pub(crate) fn new(
        yielder: Y,
        progress: Option<&'a dyn ProgressCallback>,
        tuning: &MatchTuning,
    ) -> Self {
        Self {
            yielder,
            progress,
            solver_interval: tuning.solver_checkpoint_interval.max(1),
            row_interval: tuning.row_checkpoint_interval.max(1),
            last_progress_phase: None,
            last_progress_percent: None,
            checkpoints: 0,
            #[cfg(feature = "perf-metrics")]
            metrics: DiffMetrics::default(),
        }
    }

    pub(crate) fn checkpoints(&self) -> u64 {
        self.checkpoints
    }

    pub(crate) fn progress(&mut self, phase: &'static str, percent: f32) {
        let Some(callback) = self.progress else {
            return;
        };

        let clamped = if percent.is_finite() {
            percent.clamp(0.0, 1.0)
        } else {
            0.0
        };

        if self.last_progress_phase == Some(phase) && self.last_progress_percent == Some(clamped) {
            return;
        }

        self.last_progress_phase = Some(phase);
        self.last_progress_percent = Some(clamped);
        callback.on_progress(phase, clamped);
    }

    /// Called after each outer iteration of the assignment solver (`done` is 1-based).
    pub(crate) async fn solver_checkpoint(&mut self, done: usize, total: usize) {
        let interval = self.solver_interval;
        self.checkpoint("matching", done, total, interval).await;
    }

    /// Called after each row of a row loop (`done` is 1-based).
    pub(crate) async fn row_checkpoint(&mut self, phase: &'static str, done: usize, total: usize) {
        let interval = self.row_interval;
        self.checkpoint(phase, done, total, interval).await;
    }

    async fn checkpoint(&mut self, phase: &'static str, done: usize, total: usize, interval: usize) {
        if done == 0 || done % interval != 0 {
            return;
        }

        self.checkpoints = self.checkpoints.saturating_add(1);
        #[cfg(feature = "perf-metrics")]
        self.metrics.add_checkpoint();

        self.progress(phase, done as f32 / total.max(1) as f32);
        self.yielder.yield_now().await;
    }
}
