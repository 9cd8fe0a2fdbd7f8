// src/serializer/pool.rs

//! Fan-out/fan-in barrier over a bounded worker pool

use crate::error::{Error, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Bounded pool running serialization tasks
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl WorkerPool {
    /// Create a pool with the given number of worker threads (at least one)
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("splitset-worker-{}", i))
            .build()
            .map_err(|e| Error::ThreadPoolError(format!("failed to create thread pool: {}", e)))?;

        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `task` once per job and block until every started task finishes
    ///
    /// Results come back in job order regardless of completion order. Once a
    /// failure is observed, tasks that have not started yet are skipped;
    /// tasks already running are left to finish. The reported error is the
    /// one of the lowest-indexed failed job.
    pub fn join_all<J, T, F>(&self, jobs: &[J], task: F) -> Result<Vec<T>>
    where
        J: Sync,
        T: Send,
        F: Fn(&J) -> Result<T> + Sync,
    {
        let failed = AtomicBool::new(false);

        let outcomes: Vec<Option<Result<T>>> = self.pool.install(|| {
            jobs.par_iter()
                .map(|job| {
                    if failed.load(Ordering::Acquire) {
                        return None;
                    }
                    let result = task(job);
                    if result.is_err() {
                        failed.store(true, Ordering::Release);
                    }
                    Some(result)
                })
                .collect()
        });

        let mut results = Vec::with_capacity(outcomes.len());
        let mut skipped = 0;
        for outcome in outcomes {
            match outcome {
                Some(Ok(value)) => results.push(value),
                Some(Err(e)) => return Err(e),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            return Err(Error::InvariantViolation(format!(
                "{} tasks were skipped without a recorded failure",
                skipped
            )));
        }

        Ok(results)
    }
}
