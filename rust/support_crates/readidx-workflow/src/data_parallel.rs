//! Parallel data processing utilities.
//!
//! This module provides functions for processing collections of data either sequentially
//! or in parallel, depending on the size of the collection and the requested degree of
//! parallelism:
//! - [`for_each`] - Execute a function for each item in an iterator
//! - [`map`] - Transform each item and collect the results in input order
//! - [`split_range`] - Partition `0..len` into contiguous, near-equal ranges
//!
//! Parallel execution runs on a [`WorkerPool`] sized to `max_degree` and joins all of
//! the spawned work before returning.

use std::ops::Range;

use rayon::prelude::*;

use crate::worker_pool::{WorkerPool, available_threads};

/// Executes a function for each item in an iterator, optionally in parallel.
///
/// # Arguments
///
/// * `max_degree` - Optional number of worker threads. If `None`, uses all available
///   hardware threads. If 1 or less, forces sequential execution.
/// * `items` - The items to process
/// * `f` - The function to apply to each item
///
/// # Behavior
///
/// - With one item or fewer, executes sequentially on the calling thread
/// - With `max_degree` of 1 or less, executes sequentially
/// - Otherwise, spawns one task per item on the worker pool and waits for all of them
pub fn for_each<T, F>(max_degree: Option<usize>, items: impl IntoIterator<Item = T>, f: F)
where
    F: Fn(T) + Send + Sync,
    T: Send,
{
    let items = items.into_iter();
    let pool = match parallel_pool(max_degree, items.size_hint().1) {
        Some(pool) => pool,
        None => {
            items.for_each(f);
            return;
        }
    };

    let f = &f;
    pool.thread_pool().in_place_scope(|scope| {
        for item in items {
            scope.spawn(move |_| f(item));
        }
    });
}

/// Maps a function over the items, optionally in parallel, returning the results
/// in input order.
///
/// Uses the same sequential-fallback rules as [`for_each`].
pub fn map<T, F, R>(max_degree: Option<usize>, items: impl IntoIterator<Item = T>, f: F) -> Vec<R>
where
    F: Fn(T) -> R + Send + Sync,
    T: Send,
    R: Send,
{
    let items = items.into_iter();
    match parallel_pool(max_degree, items.size_hint().1) {
        Some(pool) => {
            let items = items.collect::<Vec<_>>();
            pool.thread_pool()
                .install(|| items.into_par_iter().map(f).collect())
        }
        None => items.map(f).collect(),
    }
}

/// Splits `0..len` into at most `parts` contiguous ranges of `ceil(len / parts)`
/// elements each (the last one may be shorter).
///
/// Returns no ranges for `len == 0`; `parts == 0` is treated as 1.
pub fn split_range(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let chunk_size = len.div_ceil(parts.max(1));
    (0..len)
        .step_by(chunk_size)
        .map(|start| start..(start + chunk_size).min(len))
        .collect()
}

fn parallel_pool(
    max_degree: Option<usize>,
    upper_hint: Option<usize>,
) -> Option<std::sync::Arc<WorkerPool>> {
    if upper_hint.map(|hint| hint <= 1).unwrap_or(false) {
        return None;
    }
    let degree = max_degree.unwrap_or_else(available_threads);
    if degree <= 1 {
        return None;
    }
    WorkerPool::with_threads(degree)
}
