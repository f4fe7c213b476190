// pool.rs - Fan-out / fan-in over contiguous index blocks
//
// One tokio runtime with exactly `workers` threads lives for the whole run.
// Each call to `scatter` spawns one task per block, then awaits every handle
// before returning, so no generation can start while another is in flight.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::Arc;

use tokio::runtime::{Builder, Runtime};

use crate::error::{LifeError, LifeResult};

/// Splits `0..total` into `workers` contiguous blocks of `total / workers`
/// indices; the last block also takes the remainder.
pub fn partition(total: usize, workers: NonZeroUsize) -> Vec<Range<usize>> {
    let workers = workers.get();
    let chunk = total / workers;
    (0..workers)
        .map(|w| {
            let start = w * chunk;
            let end = if w == workers - 1 { total } else { start + chunk };
            start..end
        })
        .collect()
}

/// Persistent pool of worker threads reused for every generation.
pub struct WorkerPool {
    runtime: Runtime,
    workers: NonZeroUsize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> LifeResult<Self> {
        let workers = NonZeroUsize::new(workers)
            .ok_or_else(|| LifeError::config("worker count must be positive"))?;

        let runtime = Builder::new_multi_thread()
            .worker_threads(workers.get())
            .thread_name("life-worker")
            .build()
            .map_err(LifeError::Runtime)?;

        Ok(Self { runtime, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers.get()
    }

    /// Runs `job` once per block of `0..total` and stitches the blocks back
    /// together in index order.
    ///
    /// `job` receives its block of indices and the slice of the output it
    /// owns, `out[block]`. Blocks never overlap, so each slot of the result
    /// is written by exactly one worker. Blocks on the calling thread until
    /// every worker has joined.
    ///
    /// Spawned tasks must be `'static` and cannot borrow the caller's
    /// buffer, so each worker fills a block it owns and the blocks are
    /// appended in order once all of them have joined.
    pub fn scatter<T, F>(&self, total: usize, job: F) -> LifeResult<Vec<T>>
    where
        T: Copy + Default + Send + 'static,
        F: Fn(Range<usize>, &mut [T]) + Send + Sync + 'static,
    {
        let job = Arc::new(job);

        self.runtime.block_on(async {
            // Spawn the whole cohort before awaiting any of it
            let handles: Vec<_> = partition(total, self.workers)
                .into_iter()
                .map(|range| {
                    let job = Arc::clone(&job);
                    tokio::spawn(async move {
                        let mut block = vec![T::default(); range.len()];
                        job(range.clone(), &mut block);
                        (range, block)
                    })
                })
                .collect();

            // Join barrier: blocks arrive in spawn order, which is index order
            let mut out = Vec::with_capacity(total);
            for handle in handles {
                let (range, block) = handle.await?;
                debug_assert_eq!(range.start, out.len(), "blocks joined out of order");
                out.extend_from_slice(&block);
            }
            Ok::<_, LifeError>(out)
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool").field("workers", &self.workers).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn partition_gives_remainder_to_last_block() {
        assert_eq!(partition(10, nz(3)), vec![0..3, 3..6, 6..10]);
        assert_eq!(partition(12, nz(4)), vec![0..3, 3..6, 6..9, 9..12]);
        assert_eq!(partition(5, nz(1)), vec![0..5]);
    }

    #[test]
    fn partition_with_more_workers_than_items() {
        // Only the last block is non-empty when total / workers == 0.
        assert_eq!(partition(2, nz(4)), vec![0..0, 0..0, 0..0, 0..2]);
    }

    #[test]
    fn zero_workers_is_a_configuration_error() {
        assert!(matches!(WorkerPool::new(0), Err(LifeError::Configuration(_))));
    }

    #[test]
    fn scatter_preserves_index_order() {
        let pool = WorkerPool::new(4).unwrap();
        let out = pool
            .scatter(103, |range, out: &mut [u32]| {
                for (slot, i) in out.iter_mut().zip(range) {
                    *slot = i as u32 * 2;
                }
            })
            .unwrap();
        assert_eq!(out, (0..103).map(|i| i * 2).collect::<Vec<u32>>());
    }

    #[test]
    fn scatter_runs_every_block_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let pool = WorkerPool::new(3).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let out = pool
            .scatter(9, move |_, out: &mut [u8]| {
                seen.fetch_add(1, Ordering::SeqCst);
                out.fill(1);
            })
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(out, vec![1u8; 9]);
    }

    #[test]
    fn each_worker_sees_only_its_own_block() {
        let pool = WorkerPool::new(3).unwrap();
        let out = pool
            .scatter(10, |range, out: &mut [usize]| {
                assert_eq!(out.len(), range.len());
                out.fill(range.start);
            })
            .unwrap();
        assert_eq!(out, vec![0, 0, 0, 3, 3, 3, 6, 6, 6, 6]);
    }

    #[test]
    fn empty_range_yields_empty_output() {
        let pool = WorkerPool::new(4).unwrap();
        let out = pool.scatter(0, |_, out: &mut [u8]| out.fill(1)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn pool_is_reusable_across_calls() {
        let pool = WorkerPool::new(2).unwrap();
        for round in 0..50u32 {
            let out = pool.scatter(7, move |_, out: &mut [u32]| out.fill(round)).unwrap();
            assert!(out.iter().all(|&v| v == round));
        }
    }

    #[test]
    fn panicking_worker_surfaces_as_error() {
        let pool = WorkerPool::new(2).unwrap();
        let result = pool.scatter(4, |range: Range<usize>, _: &mut [u8]| {
            if range.start > 0 {
                panic!("boom");
            }
        });
        assert!(matches!(result, Err(LifeError::WorkerFailed(_))));
    }
}
