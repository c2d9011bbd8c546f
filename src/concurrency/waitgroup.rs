//! Example: Waiting for groups of threads with `WaitGroup` and scopes

use crossbeam::channel::{self, RecvTimeoutError};
use crossbeam::sync::WaitGroup;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WorkerError {
    #[error("error in worker {0}")]
    Failed(usize),
}

pub fn basic(workers: usize) -> Vec<String> {
    let wg = WaitGroup::new();
    let (tx, rx) = channel::unbounded();

    for id in 0..workers {
        let wg = wg.clone();
        let tx = tx.clone();
        thread::spawn(move || {
            let _ = tx.send(format!("Worker {id} finished"));
            drop(wg);
        });
    }
    wg.wait();
    drop(tx);

    let mut lines: Vec<String> = rx.try_iter().collect();
    lines.sort();
    lines
}

/// Worker `failing` reports an error; the rest succeed.
pub fn collect_errors(workers: usize, failing: usize) -> (Vec<usize>, Vec<WorkerError>) {
    let wg = WaitGroup::new();
    let (err_tx, err_rx) = channel::bounded(workers);
    let (ok_tx, ok_rx) = channel::bounded(workers);

    for id in 0..workers {
        let wg = wg.clone();
        let err_tx = err_tx.clone();
        let ok_tx = ok_tx.clone();
        thread::spawn(move || {
            let _wg = wg;
            if id == failing {
                let _ = err_tx.send(WorkerError::Failed(id));
                return;
            }
            let _ = ok_tx.send(id);
        });
    }
    wg.wait();

    let mut succeeded: Vec<usize> = ok_rx.try_iter().collect();
    succeeded.sort_unstable();
    (succeeded, err_rx.try_iter().collect())
}

/// Waits for the group on a helper thread and gives up after `timeout`.
/// Returns `true` when every worker finished in time.
pub fn wait_with_timeout(workers: usize, work: Duration, timeout: Duration) -> bool {
    let wg = WaitGroup::new();
    for _ in 0..workers {
        let wg = wg.clone();
        thread::spawn(move || {
            thread::sleep(work);
            drop(wg);
        });
    }

    let (done_tx, done_rx) = channel::bounded::<()>(0);
    thread::spawn(move || {
        wg.wait();
        drop(done_tx);
    });

    match done_rx.recv_timeout(timeout) {
        Err(RecvTimeoutError::Disconnected) | Ok(()) => true,
        Err(RecvTimeoutError::Timeout) => false,
    }
}

/// Stage two starts only after every stage-one thread has finished.
pub fn two_stages(per_stage: usize) -> Vec<String> {
    let log = Mutex::new(Vec::new());

    for stage in 1..=2 {
        let mut entries = Vec::new();
        thread::scope(|s| {
            let handles: Vec<_> = (0..per_stage)
                .map(|id| s.spawn(move || format!("Stage {stage} - Worker {id}")))
                .collect();
            entries.extend(handles.into_iter().filter_map(|h| h.join().ok()));
        });
        entries.sort();
        log.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(entries);
    }

    log.into_inner().unwrap_or_else(PoisonError::into_inner)
}

pub fn shared_counter(workers: usize) -> usize {
    let counter = Arc::new(Mutex::new(0));
    let wg = WaitGroup::new();

    for _ in 0..workers {
        let wg = wg.clone();
        let counter = Arc::clone(&counter);
        thread::spawn(move || {
            *counter.lock().unwrap_or_else(PoisonError::into_inner) += 1;
            drop(wg);
        });
    }
    wg.wait();

    let total = *counter.lock().unwrap_or_else(PoisonError::into_inner);
    total
}

/// Each worker fills its slot, then clears it when its guard drops.
pub fn cleanup(workers: usize) -> Vec<String> {
    struct Release<'a> {
        slot: &'a Mutex<String>,
    }

    impl Drop for Release<'_> {
        fn drop(&mut self) {
            self.slot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }
    }

    let resources: Vec<Mutex<String>> = (0..workers).map(|_| Mutex::new(String::new())).collect();

    thread::scope(|s| {
        for (id, slot) in resources.iter().enumerate() {
            s.spawn(move || {
                let _release = Release { slot };
                *slot.lock().unwrap_or_else(PoisonError::into_inner) = format!("Resource {id}");
                thread::sleep(Duration::from_millis(5));
            });
        }
    });

    resources
        .into_iter()
        .map(|slot| slot.into_inner().unwrap_or_else(PoisonError::into_inner))
        .collect()
}
