//! Progress reporting and cooperative yielding for long-running comparisons.
//!
//! The matcher calls the progress callback at fixed checkpoints (solver outer iterations,
//! row loops) with a best-effort fraction in `[0.0, 1.0]`. Callers should treat progress as
//! advisory and not assume monotonicity across phases.
//!
//! At the same checkpoints the cooperative entry points await a [`CooperativeYield`], which
//! lets a caller on a single-threaded executor hand control back to its event loop. The
//! blocking entry points use [`NoYield`], which completes immediately.

use std::future::{Future, ready};

pub trait ProgressCallback: Send {
    fn on_progress(&self, phase: &str, percent: f32);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_progress(&self, _phase: &str, _percent: f32) {}
}

impl<F> ProgressCallback for F
where
    F: Fn(&str, f32) + Send,
{
    fn on_progress(&self, phase: &str, percent: f32) {
        self(phase, percent)
    }
}

/// Suspension point awaited at every checkpoint of a cooperative comparison.
pub trait CooperativeYield {
    fn yield_now(&mut self) -> impl Future<Output = ()>;
}

/// Never suspends; used by the blocking entry points.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoYield;

impl CooperativeYield for NoYield {
    fn yield_now(&mut self) -> impl Future<Output = ()> {
        ready(())
    }
}

/// Adapts a closure returning a future, e.g. `YieldFn(tokio::task::yield_now)`.
pub struct YieldFn<F>(pub F);

impl<F, Fut> CooperativeYield for YieldFn<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    fn yield_now(&mut self) -> impl Future<Output = ()> {
        (self.0)()
    }
}

impl<Y: CooperativeYield + ?Sized> CooperativeYield for &mut Y {
    fn yield_now(&mut self) -> impl Future<Output = ()> {
        (**self).yield_now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_act_as_progress_callbacks() {
        let seen = Mutex::new(Vec::new());
        let callback = |phase: &str, percent: f32| {
            if let Ok(mut seen) = seen.lock() {
                seen.push((phase.to_string(), percent));
            }
        };
        callback.on_progress("matching", 0.5);
        let seen = seen.into_inner().expect("lock not poisoned");
        assert_eq!(seen, vec![("matching".to_string(), 0.5)]);
    }

    #[test]
    fn yield_fn_invokes_closure_each_time() {
        let mut calls = 0;
        {
            let mut yielder = YieldFn(|| {
                calls += 1;
                ready(())
            });
            futures::executor::block_on(async {
                yielder.yield_now().await;
                yielder.yield_now().await;
            });
        }
        assert_eq!(calls, 2);
    }
}
