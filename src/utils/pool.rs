/*!
# Worker Pool

A fixed pool of worker threads mapping a function over independent work items. Items are fed
through a bounded channel and results are streamed back in completion order. The pool is a
generic utility for batch work around graphs (eg. fetching or reading many files) and is not
used by any graph representation.
*/

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
    vec,
};

use crossbeam::channel::{Receiver, bounded, unbounded};
use tracing::{debug, error};

use crate::error::{GraphError, Result};

/// A fixed number of workers processing items of a batch concurrently
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: usize,
    queue_capacity: usize,
    thread_name: String,
}

impl WorkerPool {
    /// Creates a pool with `workers` threads. A single worker processes items inline on the
    /// calling thread.
    ///
    /// # Errors
    /// Fails with [`GraphError::InvalidArgument`] if `workers == 0`.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(GraphError::invalid("a worker pool requires at least one worker"));
        }

        Ok(Self {
            workers,
            queue_capacity: 2 * workers,
            thread_name: "idgraphs-worker".to_owned(),
        })
    }

    /// Updates the number of items that may wait in the work channel
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Updates the name prefix of spawned threads
    pub fn thread_name<S: Into<String>>(mut self, name: S) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Returns the number of workers
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Applies `f` to every item and returns an iterator over the results in completion order.
    ///
    /// With several workers, a panic in `f` terminates only the worker it occurred in; the result
    /// of that item is missing and the panic is logged once the results are exhausted.
    ///
    /// With a single worker, all items are processed on the calling thread before this method
    /// returns, so a panic in `f` unwinds into the caller.
    ///
    /// # Errors
    /// Fails with [`GraphError::Io`] if a thread cannot be spawned.
    pub fn map_unordered<T, R, F>(&self, items: Vec<T>, f: F) -> Result<PoolResults<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        debug!(workers = self.workers, items = items.len(), "starting batch");

        if self.workers == 1 {
            let results: Vec<R> = items.into_iter().map(f).collect();
            return Ok(PoolResults {
                inner: Results::Inline(results.into_iter()),
            });
        }

        let (work_tx, work_rx) = bounded::<T>(self.queue_capacity);
        let (result_tx, result_rx) = unbounded::<R>();
        let f = Arc::new(f);

        let mut handles = Vec::with_capacity(self.workers + 1);
        handles.push(
            thread::Builder::new()
                .name(format!("{}-feeder", self.thread_name))
                .spawn(move || {
                    for item in items {
                        // all workers are gone
                        if work_tx.send(item).is_err() {
                            break;
                        }
                    }
                })?,
        );

        for i in 0..self.workers {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let f = Arc::clone(&f);

            handles.push(
                thread::Builder::new()
                    .name(format!("{}-{i}", self.thread_name))
                    .spawn(move || {
                        for item in work_rx {
                            // the results were dropped
                            if result_tx.send(f(item)).is_err() {
                                break;
                            }
                        }
                    })?,
            );
        }

        Ok(PoolResults {
            inner: Results::Threaded {
                receiver: Some(result_rx),
                handles,
            },
        })
    }
}

/// Results of [`WorkerPool::map_unordered`] in completion order.
///
/// Dropping the results early stops the workers after their current item and joins all threads.
#[derive(Debug)]
pub struct PoolResults<R> {
    inner: Results<R>,
}

#[derive(Debug)]
enum Results<R> {
    Inline(vec::IntoIter<R>),
    Threaded {
        receiver: Option<Receiver<R>>,
        handles: Vec<JoinHandle<()>>,
    },
}

impl<R> PoolResults<R> {
    /// Joins all threads, logging workers that panicked
    fn join(&mut self) {
        if let Results::Threaded { receiver, handles } = &mut self.inner {
            receiver.take();
            for handle in handles.drain(..) {
                let name = handle.thread().name().unwrap_or("<unnamed>").to_owned();
                if handle.join().is_err() {
                    error!(thread = name.as_str(), "worker panicked");
                }
            }
        }
    }
}

impl<R> Iterator for PoolResults<R> {
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let next = match &mut self.inner {
            Results::Inline(results) => return results.next(),
            Results::Threaded { receiver, .. } => receiver.as_ref()?.recv().ok(),
        };

        if next.is_none() {
            self.join();
        }
        next
    }
}

impl<R> Drop for PoolResults<R> {
    fn drop(&mut self) {
        self.join();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        time::Duration,
    };

    use itertools::Itertools;

    use super::*;

    #[test]
    fn zero_workers() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn map_all_items() {
        let pool = WorkerPool::new(4).unwrap().queue_capacity(1);
        let results = pool
            .map_unordered((0..100u64).collect(), |x| x * x)
            .unwrap()
            .sorted()
            .collect_vec();

        assert_eq!(results, (0..100u64).map(|x| x * x).collect_vec());
    }

    #[test]
    fn single_worker_runs_inline_in_order() {
        let pool = WorkerPool::new(1).unwrap();
        let caller = thread::current().id();
        let results = pool
            .map_unordered(vec!["a", "b", "c"], move |s| {
                assert_eq!(thread::current().id(), caller);
                s.to_uppercase()
            })
            .unwrap()
            .collect_vec();

        assert_eq!(results, ["A", "B", "C"]);
    }

    #[test]
    fn results_arrive_in_completion_order() {
        let release = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&release);

        let pool = WorkerPool::new(2).unwrap();
        let mut results = pool
            .map_unordered(vec!["slow", "fast"], move |item| {
                if item == "slow" {
                    while !flag.load(Ordering::Acquire) {
                        thread::sleep(Duration::from_millis(1));
                    }
                }
                item
            })
            .unwrap();

        assert_eq!(results.next(), Some("fast"));
        release.store(true, Ordering::Release);
        assert_eq!(results.next(), Some("slow"));
        assert_eq!(results.next(), None);
    }

    #[test]
    fn panicking_item_is_missing() {
        let pool = WorkerPool::new(3).unwrap().thread_name("panicky");
        let results = pool
            .map_unordered((0..20u32).collect(), |x| {
                assert_ne!(x, 7, "cannot process item");
                x
            })
            .unwrap()
            .collect_vec();

        assert_eq!(results.len(), 19);
        assert!(!results.contains(&7));
    }

    #[test]
    fn single_worker_panics_in_caller() {
        let pool = WorkerPool::new(1).unwrap();
        let outcome = std::panic::catch_unwind(|| {
            pool.map_unordered(vec![1u32, 2], |x| {
                assert_ne!(x, 2, "cannot process item");
                x
            })
        });
        assert!(outcome.is_err());
    }

    #[test]
    fn dropping_results_early_terminates() {
        let pool = WorkerPool::new(2).unwrap();
        let mut results = pool.map_unordered((0..10_000u32).collect(), |x| x).unwrap();
        assert!(results.next().is_some());
        drop(results);
    }
}
