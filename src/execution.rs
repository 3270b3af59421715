//! # Execution Policies
//!
//! Strategy objects controlling how many independent search trees are grown
//! for one decision and on which threads.
//!
//! [`Sequential`] grows a single tree in the calling thread. [`RootParallel`]
//! grows one tree per worker on a rayon thread pool; the trees share nothing
//! while growing, so the statistics path stays lock-free, and the solver
//! merges their root statistics only after every worker has finished. Since
//! each worker samples determinizations independently, summing their root
//! counts combines independent unbiased estimators and lowers the selection
//! variance without any synchronization during the search itself.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{Result, SearchError};

/// Controls how many independent trees a search grows and how the growth
/// work is scheduled.
pub trait ExecutionPolicy: Send + Sync {
    /// Number of independent trees grown per search.
    fn num_trees(&self) -> usize;

    /// Runs `grow` once per tree, returning every tree's result.
    ///
    /// Fails if any invocation fails; the results of other workers are
    /// discarded in that case.
    fn run<T, F>(&self, grow: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Send + Sync;
}

/// Grows one tree in the calling thread, spending the entire budget on it.
///
/// Baseline policy: always correct, no merge step, no threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sequential;

impl Sequential {
    pub fn new() -> Self {
        Sequential
    }
}

impl ExecutionPolicy for Sequential {
    fn num_trees(&self) -> usize {
        1
    }

    fn run<T, F>(&self, grow: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Send + Sync,
    {
        Ok(vec![grow(0)?])
    }
}

/// Grows N independent trees concurrently, one per worker thread.
///
/// Every worker spends the full configured budget on its own tree, so N
/// workers perform N times the simulations of a [`Sequential`] search with
/// the same settings, trading memory (N trees) for wall-clock speed and
/// lower selection variance.
pub struct RootParallel {
    pool: ThreadPool,
    workers: usize,
}

impl RootParallel {
    /// One worker per available CPU.
    pub fn new() -> Self {
        Self::with_workers(num_cpus::get())
    }

    /// A fixed number of workers; values below 1 are raised to 1.
    pub fn with_workers(workers: usize) -> Self {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .expect("failed to build the search thread pool");
        RootParallel { pool, workers }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for RootParallel {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionPolicy for RootParallel {
    fn num_trees(&self) -> usize {
        self.workers
    }

    fn run<T, F>(&self, grow: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Send + Sync,
    {
        // The collect is the join barrier: the merge step in the solver only
        // ever observes fully grown trees.
        self.pool.install(|| {
            (0..self.workers)
                .into_par_iter()
                .map(|index| {
                    grow(index).map_err(|source| SearchError::Worker {
                        index,
                        source: Box::new(source),
                    })
                })
                .collect()
        })
    }
}
