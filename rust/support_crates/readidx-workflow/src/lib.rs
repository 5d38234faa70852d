//! Workflow execution utilities for data-parallel processing.
//!
//! # Key Components
//!
//! - [`worker_pool::WorkerPool`] - Fixed-size thread pools, one per requested degree
//!   of parallelism, created on first use and shared process-wide. At most
//!   [`worker_pool::MAX_CACHED_POOLS`] sizes are kept.
//! - [`data_parallel`] - Parallel `map` and `for_each` operations with automatic
//!   sequential fallback for small inputs, plus contiguous range partitioning.
//!
//! All parallelism here is fan-out/fan-in: every call returns only after all of the
//! work it spawned has completed.

pub mod data_parallel;
pub mod worker_pool;
