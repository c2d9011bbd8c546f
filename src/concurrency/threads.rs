//! Example: Spawning, joining and recovering threads

use super::panic_message;
use crossbeam::channel;
use std::thread;
use std::time::Duration;
use tracing::debug;

pub fn spawn_and_join() -> String {
    thread::spawn(|| "Hello from thread!".to_string())
        .join()
        .unwrap_or_default()
}

pub fn thread_with_parameter(num: i32) -> String {
    thread::spawn(move || format!("Number: {num}"))
        .join()
        .unwrap_or_default()
}

/// A quick and a slow thread; joining both means neither is cut short.
pub fn lifecycle() -> Vec<String> {
    let quick = thread::spawn(|| "Quick thread".to_string());
    let slow = thread::spawn(|| {
        thread::sleep(Duration::from_millis(20));
        "Slow thread".to_string()
    });

    [quick, slow]
        .into_iter()
        .filter_map(|handle| handle.join().ok())
        .collect()
}

/// Returns the start and finish lines of every worker, sorted.
pub fn multiple_workers(count: usize) -> (Vec<String>, Vec<String>) {
    let (tx, rx) = channel::unbounded();

    let handles: Vec<_> = (0..count)
        .map(|id| {
            let tx = tx.clone();
            thread::spawn(move || {
                let _ = tx.send((true, format!("Worker {id} started")));
                thread::sleep(Duration::from_millis(10));
                debug!(worker = id, "finished");
                let _ = tx.send((false, format!("Worker {id} finished")));
            })
        })
        .collect();
    drop(tx);

    for handle in handles {
        let _ = handle.join();
    }

    let (mut started, mut finished): (Vec<_>, Vec<_>) = rx.iter().partition(|(s, _)| *s);
    started.sort();
    finished.sort();
    (
        started.into_iter().map(|(_, line)| line).collect(),
        finished.into_iter().map(|(_, line)| line).collect(),
    )
}

/// `move` hands ownership of the captured string to the thread.
pub fn closure_capture() -> String {
    let message = String::from("Hello from closure");
    thread::spawn(move || message).join().unwrap_or_default()
}

/// Each iteration moves its own copy of `i`.
pub fn loop_capture() -> Vec<i32> {
    let handles: Vec<_> = (0..3).map(|i| thread::spawn(move || i)).collect();
    let mut seen: Vec<i32> = handles.into_iter().filter_map(|h| h.join().ok()).collect();
    seen.sort_unstable();
    seen
}

/// A panic stays inside its thread and surfaces as the `Err` from `join`.
pub fn panic_in_thread() -> String {
    let handle = thread::spawn(|| panic!("Something went wrong!"));
    match handle.join() {
        Ok(()) => "no panic".to_string(),
        Err(payload) => format!("Recovered from panic: {}", panic_message(payload.as_ref())),
    }
}

#[cfg(test)]
mod threads_tests {
    use super::*;

    #[test]
    fn test_basic_spawns() {
        assert_eq!(spawn_and_join(), "Hello from thread!");
        assert_eq!(thread_with_parameter(42), "Number: 42");
        assert_eq!(closure_capture(), "Hello from closure");
    }

    #[test]
    fn test_lifecycle_joins_both() {
        assert_eq!(lifecycle(), vec!["Quick thread", "Slow thread"]);
    }

    #[test]
    fn test_multiple_workers() {
        let (started, finished) = multiple_workers(5);
        assert_eq!(started.len(), 5);
        assert_eq!(finished.len(), 5);
        assert_eq!(started[0], "Worker 0 started");
        assert_eq!(finished[4], "Worker 4 finished");
    }

    #[test]
    fn test_loop_capture() {
        assert_eq!(loop_capture(), vec![0, 1, 2]);
    }

    #[test]
    fn test_panic_in_thread() {
        assert_eq!(panic_in_thread(), "Recovered from panic: Something went wrong!");
    }
}
