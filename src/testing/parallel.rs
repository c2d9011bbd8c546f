//! Helpers for running test cases in parallel: a rayon-backed runner, a
//! cleanup registry and a counter shared between cases.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use rayon::prelude::*;
use tracing::debug;

pub const WORK_DELAY: Duration = Duration::from_millis(20);

/// Simulated unit of work; sleeps briefly and hands back its id.
pub fn do_work(id: usize) -> usize {
    thread::sleep(WORK_DELAY);
    debug!(id, "work done");
    id
}

/// Runs `f` over every case on the rayon pool. Results keep case order.
pub fn run_parallel<C, R, F>(cases: &[C], f: F) -> Vec<R>
where
    C: Sync,
    R: Send,
    F: Fn(&C) -> R + Sync + Send,
{
    cases.par_iter().map(f).collect()
}

type CleanupFn = Box<dyn FnOnce() + Send>;

/// Registered closures run in reverse registration order when dropped.
#[derive(Default)]
pub struct Cleanup {
    tasks: Mutex<Vec<CleanupFn>>,
}

impl Cleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, task: impl FnOnce() + Send + 'static) {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(task));
    }

    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Drop for Cleanup {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        while let Some(task) = tasks.pop() {
            task();
        }
    }
}

#[derive(Debug, Default)]
pub struct SharedCounter {
    value: Mutex<u64>,
}

impl SharedCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value after incrementing.
    pub fn increment(&self) -> u64 {
        let mut value = self.value.lock().unwrap_or_else(PoisonError::into_inner);
        *value += 1;
        *value
    }

    pub fn get(&self) -> u64 {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod parallel_tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_run_parallel_keeps_order() {
        let cases: Vec<usize> = (1..=5).collect();
        let results = run_parallel(&cases, |id| do_work(*id));
        assert_eq!(results, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parallel_is_faster_than_serial() {
        let cases: Vec<usize> = (0..8).collect();
        let start = Instant::now();
        run_parallel(&cases, |id| do_work(*id));
        let elapsed = start.elapsed();
        if rayon::current_num_threads() >= 4 {
            assert!(elapsed < WORK_DELAY * 8, "took {elapsed:?}");
        }
    }

    #[test]
    fn test_shared_counter_sees_every_increment() {
        let counter = SharedCounter::new();
        let cases: Vec<usize> = (0..100).collect();
        let mut seen = run_parallel(&cases, |_| counter.increment());
        seen.sort_unstable();
        assert_eq!(seen, (1..=100).collect::<Vec<u64>>());
        assert_eq!(counter.get(), 100);
    }

    #[test]
    fn test_cleanup_runs_lifo_on_drop() {
        let order = Arc::new(Mutex::new(Vec::new()));
        {
            let cleanup = Cleanup::new();
            for i in 1..=3 {
                let order = Arc::clone(&order);
                cleanup.register(move || order.lock().unwrap().push(i));
            }
            assert_eq!(cleanup.pending(), 3);
            assert!(order.lock().unwrap().is_empty());
        }
        assert_eq!(*order.lock().unwrap(), vec![3, 2, 1]);
    }
}
