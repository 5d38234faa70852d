//! Fixed-size worker pools keyed by thread count.

use std::{
    collections::HashMap,
    num::NonZeroUsize,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

/// Largest number of distinct pool sizes kept alive by [`WorkerPool::with_threads`].
///
/// Sizes requested after the cache is full get a pool that is dropped, together with
/// its threads, once the caller releases it.
pub const MAX_CACHED_POOLS: usize = 8;

/// A fixed-size pool of worker threads.
///
/// Pools are created lazily through [`WorkerPool::with_threads`] and cached, so
/// repeated materializations with the same degree of parallelism reuse the same
/// threads instead of spawning new ones.
pub struct WorkerPool {
    threads: usize,
    thread_pool: rayon::ThreadPool,
}

impl WorkerPool {
    /// Returns a pool with exactly `threads` workers (at least one).
    ///
    /// The first [`MAX_CACHED_POOLS`] distinct sizes are cached for the lifetime of
    /// the process; other sizes get a fresh pool on every call.
    ///
    /// Returns `None` if the operating system refused to start the threads; callers
    /// are expected to fall back to running the work inline.
    pub fn with_threads(threads: usize) -> Option<Arc<WorkerPool>> {
        static POOLS: OnceLock<Mutex<PoolCache>> = OnceLock::new();

        POOLS
            .get_or_init(|| Mutex::new(PoolCache::new(MAX_CACHED_POOLS)))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_start(threads)
    }

    /// Number of worker threads in this pool.
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Provides access to the underlying thread pool.
    pub fn thread_pool(&self) -> &rayon::ThreadPool {
        &self.thread_pool
    }

    fn start(threads: usize) -> Option<Arc<WorkerPool>> {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("readidx_worker_{i}"))
            .build()
        {
            Ok(thread_pool) => {
                log::debug!("started worker pool with {threads} threads");
                Some(Arc::new(WorkerPool {
                    threads,
                    thread_pool,
                }))
            }
            Err(e) => {
                log::warn!("failed to start worker pool with {threads} threads: {e}");
                None
            }
        }
    }
}

struct PoolCache {
    pools: HashMap<usize, Arc<WorkerPool>>,
    capacity: usize,
}

impl PoolCache {
    fn new(capacity: usize) -> PoolCache {
        PoolCache {
            pools: HashMap::new(),
            capacity,
        }
    }

    fn get_or_start(&mut self, threads: usize) -> Option<Arc<WorkerPool>> {
        let threads = threads.max(1);
        if let Some(pool) = self.pools.get(&threads) {
            return Some(pool.clone());
        }
        let pool = WorkerPool::start(threads)?;
        if self.pools.len() < self.capacity {
            self.pools.insert(threads, pool.clone());
        } else {
            log::debug!("pool cache full, {threads}-thread pool is not kept");
        }
        Some(pool)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.pools.len()
    }
}

/// The number of hardware threads available to this process, or 1 if unknown.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
