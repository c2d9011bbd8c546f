//! Example: Mutexes, read-write locks, timeouts and lock ordering

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum LockError {
    #[error("Timeout trying to acquire lock after {0:?}")]
    LockTimeout(Duration),
}

/// Each of `threads` threads bumps a shared counter once.
pub fn counter(threads: usize) -> usize {
    let counter = Arc::new(Mutex::new(0));
    let handles: Vec<_> = (0..threads)
        .map(|id| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                let mut value = counter.lock().unwrap_or_else(PoisonError::into_inner);
                *value += 1;
                debug!(thread = id, counter = *value, "incremented");
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }
    let total = *counter.lock().unwrap_or_else(PoisonError::into_inner);
    total
}

/// One writer adds three keys while three readers take snapshots.
/// Returns the final map and the size of every snapshot the readers saw.
pub fn readers_and_writer() -> (BTreeMap<String, i32>, Vec<usize>) {
    let data = Arc::new(RwLock::new(BTreeMap::new()));

    let writer = {
        let data = Arc::clone(&data);
        thread::spawn(move || {
            for i in 0..3 {
                data.write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(format!("key{i}"), i);
                thread::sleep(Duration::from_millis(5));
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let data = Arc::clone(&data);
            thread::spawn(move || {
                (0..3)
                    .map(|_| {
                        let size = data.read().unwrap_or_else(PoisonError::into_inner).len();
                        thread::sleep(Duration::from_millis(3));
                        size
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let _ = writer.join();
    let mut sizes: Vec<usize> = readers
        .into_iter()
        .filter_map(|r| r.join().ok())
        .flatten()
        .collect();
    sizes.sort_unstable();

    let snapshot = data.read().unwrap_or_else(PoisonError::into_inner).clone();
    (snapshot, sizes)
}

/// The guard unlocks when `add_resource` returns.
pub fn guarded_resources(count: usize) -> Vec<String> {
    let resources = Mutex::new(Vec::new());
    let add_resource = |resources: &Mutex<Vec<String>>, resource: String| {
        let mut guard = resources.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push(resource);
    };

    thread::scope(|s| {
        for i in 0..count {
            let resources = &resources;
            s.spawn(move || add_resource(resources, format!("Resource {i}")));
        }
    });

    let mut list = resources.lock().unwrap_or_else(PoisonError::into_inner).clone();
    list.sort();
    list
}

/// Polls `try_lock` until it succeeds or `timeout` passes.
pub fn lock_with_timeout<T, R>(
    mutex: &Mutex<T>,
    timeout: Duration,
    f: impl FnOnce(&mut T) -> R,
) -> Result<R, LockError> {
    let deadline = Instant::now() + timeout;
    loop {
        match mutex.try_lock() {
            Ok(mut guard) => return Ok(f(&mut *guard)),
            Err(TryLockError::Poisoned(poisoned)) => return Ok(f(&mut *poisoned.into_inner())),
            Err(TryLockError::WouldBlock) => {
                if Instant::now() >= deadline {
                    return Err(LockError::LockTimeout(timeout));
                }
                thread::sleep(Duration::from_millis(1));
            }
        }
    }
}

/// Every thread takes `first` before `second`, whatever its id.
pub fn ordered_locking(threads: usize) -> Vec<String> {
    let first = Arc::new(Mutex::new(()));
    let second = Arc::new(Mutex::new(()));

    let handles: Vec<_> = (0..threads)
        .map(|id| {
            let first = Arc::clone(&first);
            let second = Arc::clone(&second);
            thread::spawn(move || {
                let _a = first.lock().unwrap_or_else(PoisonError::into_inner);
                thread::sleep(Duration::from_millis(2));
                let _b = second.lock().unwrap_or_else(PoisonError::into_inner);
                format!("Thread {id} acquired both locks")
            })
        })
        .collect();

    let mut lines: Vec<String> = handles.into_iter().filter_map(|h| h.join().ok()).collect();
    lines.sort();
    lines
}

/// The second `try_lock` fails while the first guard is still alive.
pub fn try_lock_twice() -> (bool, bool) {
    let mutex = Mutex::new(0);
    let first = mutex.try_lock();
    let first_ok = first.is_ok();
    let second_ok = mutex.try_lock().is_ok();
    drop(first);
    (first_ok, second_ok)
}

#[cfg(test)]
mod mutex_tests {
    use super::*;

    #[test]
    fn test_counter() {
        assert_eq!(counter(5), 5);
    }

    #[test]
    fn test_readers_and_writer() {
        let (data, sizes) = readers_and_writer();
        assert_eq!(data.len(), 3);
        assert_eq!(data["key2"], 2);
        assert_eq!(sizes.len(), 9);
        assert!(sizes.iter().all(|&s| s <= 3));
    }

    #[test]
    fn test_guarded_resources() {
        assert_eq!(
            guarded_resources(3),
            vec!["Resource 0", "Resource 1", "Resource 2"]
        );
    }

    #[test]
    fn test_lock_with_timeout() {
        let mutex = Arc::new(Mutex::new(0));
        let holder = {
            let mutex = Arc::clone(&mutex);
            let (ready_tx, ready_rx) = crossbeam::channel::bounded(0);
            let handle = thread::spawn(move || {
                let mut guard = mutex.lock().unwrap();
                *guard = 42;
                ready_tx.send(()).unwrap();
                thread::sleep(Duration::from_millis(100));
            });
            ready_rx.recv().unwrap();
            handle
        };

        let timeout = Duration::from_millis(20);
        assert_eq!(
            lock_with_timeout(&mutex, timeout, |v| *v),
            Err(LockError::LockTimeout(timeout))
        );

        holder.join().unwrap();
        assert_eq!(lock_with_timeout(&mutex, timeout, |v| *v), Ok(42));
    }

    #[test]
    fn test_ordered_locking_never_deadlocks() {
        let lines = ordered_locking(3);
        assert_eq!(
            lines,
            vec![
                "Thread 0 acquired both locks",
                "Thread 1 acquired both locks",
                "Thread 2 acquired both locks"
            ]
        );
    }

    #[test]
    fn test_try_lock_twice() {
        assert_eq!(try_lock_twice(), (true, false));
    }
}
