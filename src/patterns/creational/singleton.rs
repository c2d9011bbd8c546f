//! Pattern: Singleton
//! Example: A process-wide, thread-safe key/value registry
//!
//! The instance is created lazily on first access and exactly once, no
//! matter how many threads race for it.

use lazy_static::lazy_static;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};

static INITIALIZATIONS: AtomicUsize = AtomicUsize::new(0);

lazy_static! {
    static ref INSTANCE: Singleton = {
        INITIALIZATIONS.fetch_add(1, Ordering::SeqCst);
        Singleton::new()
    };
}

#[derive(Debug, Default)]
pub struct Singleton {
    data: RwLock<BTreeMap<String, Value>>,
}

impl Singleton {
    /// The shared instance.
    pub fn instance() -> &'static Singleton {
        &INSTANCE
    }

    /// How many times the shared instance has been built (always 0 or 1).
    pub fn initializations() -> usize {
        INITIALIZATIONS.load(Ordering::SeqCst)
    }

    /// A private registry with the same behaviour, for isolated use.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn delete(&self, key: &str) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    pub fn clear(&self) {
        self.data
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.data.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Renders as `map[key1:value1 key2:value2]`, keys sorted.
impl fmt::Display for Singleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        let entries: Vec<String> = data
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{key}:{s}"),
                other => format!("{key}:{other}"),
            })
            .collect();
        write!(f, "map[{}]", entries.join(" "))
    }
}
