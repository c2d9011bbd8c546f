//! Threads, channels, locks, atomics, wait groups and `select!`.
//!
//! Every function returns what it observed, sorted wherever thread
//! scheduling would otherwise make the order vary between runs.

pub mod atomic;
pub mod channels;
pub mod mutex;
pub mod select;
pub mod threads;
pub mod waitgroup;

use std::any::Any;

/// Extracts the message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
