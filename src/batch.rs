//! Runs a fixed number of iterations in bounded batches, handing control back to the host between
//! batches so it can repaint or respond.

use std::time::Duration;

/// How far a batched run has come.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Progress {
    pub done: u32,
    pub total: u32,
}

/// Splits `total` iterations into batch lengths of at most `per_batch`. The last batch holds the
/// remainder.
#[derive(Debug, Clone)]
pub struct Batches {
    remaining: u32,
    per_batch: u32,
}

impl Batches {
    /// A `per_batch` of zero is treated as one.
    pub fn new(total: u32, per_batch: u32) -> Self {
        Batches {
            remaining: total,
            per_batch: per_batch.max(1),
        }
    }
}

impl Iterator for Batches {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.remaining == 0 {
            return None;
        }
        let len = self.remaining.min(self.per_batch);
        self.remaining -= len;
        Some(len)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.div_ceil(self.per_batch) as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Batches {}

/// The host side of a batched run. `yield_now` is called between two batches and never after the
/// last one. It sees the run's state read-only.
pub trait Scheduler<C: ?Sized> {
    fn yield_now(&mut self, ctx: &C, progress: Progress);
}

/// Runs every batch back to back.
#[derive(Debug, Default, Copy, Clone)]
pub struct Immediate;

impl<C: ?Sized> Scheduler<C> for Immediate {
    fn yield_now(&mut self, _ctx: &C, _progress: Progress) {}
}

/// Sleeps for `interval` between batches, like waiting for the next frame.
#[derive(Debug, Default, Copy, Clone)]
pub struct Paced {
    pub interval: Duration,
}

impl<C: ?Sized> Scheduler<C> for Paced {
    fn yield_now(&mut self, _ctx: &C, _progress: Progress) {
        if !self.interval.is_zero() {
            std::thread::sleep(self.interval);
        }
    }
}

/// Calls `iteration` exactly `total` times in batches of at most `per_batch`, yielding to
/// `scheduler` between batches, then calls `on_end` once.
///
/// `ctx` is the state the callbacks share. With `total == 0`, `on_end` runs immediately and the
/// scheduler is never called.
pub fn run<C, S>(
    scheduler: &mut S,
    ctx: &mut C,
    total: u32,
    per_batch: u32,
    mut iteration: impl FnMut(&mut C),
    on_end: impl FnOnce(&mut C),
) where
    C: ?Sized,
    S: Scheduler<C> + ?Sized,
{
    let mut done = 0;
    for (index, len) in Batches::new(total, per_batch).enumerate() {
        if index > 0 {
            let progress = Progress { done, total };
            tracing::trace!(done, total, "yielding between batches");
            scheduler.yield_now(ctx, progress);
        }
        for _ in 0..len {
            iteration(ctx);
        }
        done += len;
    }
    on_end(ctx);
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Default)]
    struct Log {
        calls: u32,
        ended: u32,
        calls_at_end: Option<u32>,
    }

    #[derive(Default)]
    struct Recorder {
        yields: Vec<Progress>,
        calls_seen: Vec<u32>,
    }

    impl Scheduler<Log> for Recorder {
        fn yield_now(&mut self, ctx: &Log, progress: Progress) {
            self.yields.push(progress);
            self.calls_seen.push(ctx.calls);
        }
    }

    fn run_logged(total: u32, per_batch: u32) -> (Log, Recorder) {
        let mut log = Log::default();
        let mut recorder = Recorder::default();
        run(
            &mut recorder,
            &mut log,
            total,
            per_batch,
            |log| log.calls += 1,
            |log| {
                log.ended += 1;
                log.calls_at_end = Some(log.calls);
            },
        );
        (log, recorder)
    }

    #[test]
    fn test_batches() {
        assert_eq!(Batches::new(137, 50).collect::<Vec<_>>(), vec![50, 50, 50, 37]);
        assert_eq!(Batches::new(100, 50).collect::<Vec<_>>(), vec![50, 50]);
        assert_eq!(Batches::new(3, 50).collect::<Vec<_>>(), vec![3]);
        assert_eq!(Batches::new(0, 50).count(), 0);
        assert_eq!(Batches::new(2, 0).collect::<Vec<_>>(), vec![1, 1]);
        assert_eq!(Batches::new(137, 50).len(), 4);
    }

    #[test]
    fn test_run_uneven() {
        let (log, recorder) = run_logged(137, 50);
        assert_eq!(log.calls, 137);
        assert_eq!(log.ended, 1);
        assert_eq!(log.calls_at_end, Some(137));
        assert_eq!(recorder.calls_seen, vec![50, 100, 150]);
        assert_eq!(
            recorder.yields,
            vec![
                Progress {
                    done: 50,
                    total: 137
                },
                Progress {
                    done: 100,
                    total: 137
                },
                Progress {
                    done: 150,
                    total: 137
                },
            ]
        );
    }

    #[test]
    fn test_run_zero() {
        let (log, recorder) = run_logged(0, 50);
        assert_eq!(log.calls, 0);
        assert_eq!(log.ended, 1);
        assert!(recorder.yields.is_empty());
    }

    #[test]
    fn test_run_single_batch_never_yields() {
        let (log, recorder) = run_logged(50, 50);
        assert_eq!(log.calls, 50);
        assert_eq!(log.ended, 1);
        assert!(recorder.yields.is_empty());
    }

    #[test]
    fn test_paced_and_immediate() {
        let mut count = 0u32;
        run(&mut Immediate, &mut count, 7, 2, |c| *c += 1, |_| {});
        assert_eq!(count, 7);

        let mut paced = Paced {
            interval: Duration::from_millis(1),
        };
        let mut count = 0u32;
        let start = std::time::Instant::now();
        run(&mut paced, &mut count, 3, 1, |c| *c += 1, |_| {});
        assert_eq!(count, 3);
        assert!(start.elapsed() >= Duration::from_millis(2));
    }
}
