//! Example: Lock-free counters, flags, CAS loops and snapshot swapping

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use tracing::debug;

/// `threads` threads each add `per_thread` times.
pub fn counter(threads: usize, per_thread: usize) -> i64 {
    let counter = Arc::new(AtomicI64::new(0));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let counter = Arc::clone(&counter);
            thread::spawn(move || {
                for _ in 0..per_thread {
                    let now = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    debug!(counter = now, "incremented");
                }
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }
    counter.load(Ordering::SeqCst)
}

/// Store `true`, then swap it back to `false` with a compare-and-exchange.
/// Returns `(initial, swapped, final)`.
pub fn bool_flag() -> (bool, bool, bool) {
    let flag = AtomicBool::new(false);
    flag.store(true, Ordering::SeqCst);
    let initial = flag.load(Ordering::SeqCst);
    let swapped = flag
        .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok();
    (initial, swapped, flag.load(Ordering::SeqCst))
}

/// A value that can be replaced wholesale while readers hold older snapshots.
#[derive(Debug, Default)]
pub struct AtomicValue<T> {
    inner: RwLock<Arc<T>>,
}

impl<T> AtomicValue<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(Arc::new(value)),
        }
    }

    pub fn load(&self) -> Arc<T> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn store(&self, value: T) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(value);
    }

    /// Stores `value` and hands back the previous snapshot.
    pub fn swap(&self, value: T) -> Arc<T> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(value))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    pub value: i32,
}

pub fn pointer_like() -> i32 {
    let ptr = AtomicValue::new(Data { value: 42 });
    ptr.load().value
}

/// One increment on each integer width.
pub fn typed_increments() -> (i32, u32, i64, u64) {
    let i32v = AtomicI32::new(0);
    let u32v = AtomicU32::new(0);
    let i64v = AtomicI64::new(0);
    let u64v = AtomicU64::new(0);

    i32v.fetch_add(1, Ordering::Relaxed);
    u32v.fetch_add(1, Ordering::Relaxed);
    i64v.fetch_add(1, Ordering::Relaxed);
    u64v.fetch_add(1, Ordering::Relaxed);

    (
        i32v.load(Ordering::Relaxed),
        u32v.load(Ordering::Relaxed),
        i64v.load(Ordering::Relaxed),
        u64v.load(Ordering::Relaxed),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub enabled: bool,
}

/// Returns the settings before and after the swap.
pub fn config_swap() -> (ServerSettings, ServerSettings) {
    let config = AtomicValue::new(ServerSettings {
        host: "localhost".to_string(),
        port: 8080,
        enabled: true,
    });
    let before = config.load();

    config.store(ServerSettings {
        host: "example.com".to_string(),
        port: 9090,
        enabled: false,
    });
    let after = config.load();

    (before.as_ref().clone(), after.as_ref().clone())
}

/// Load, compute, compare-and-swap; retry on interference.
pub fn cas_increment(value: &AtomicI64) -> i64 {
    let mut current = value.load(Ordering::SeqCst);
    loop {
        let next = current + 1;
        match value.compare_exchange_weak(current, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next,
            Err(actual) => {
                debug!(expected = current, actual, "retrying update");
                current = actual;
            }
        }
    }
}
