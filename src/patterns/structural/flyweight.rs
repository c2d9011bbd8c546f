//! Pattern: Flyweight
//! Example: Sharing intrinsic state between many lightweight handles

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug)]
pub struct ConcreteFlyweight {
    intrinsic_state: String,
}

impl ConcreteFlyweight {
    pub fn new(intrinsic_state: impl Into<String>) -> Self {
        Self {
            intrinsic_state: intrinsic_state.into(),
        }
    }

    pub fn operation(&self, extrinsic_state: &str) -> String {
        format!(
            "Intrinsic: {}, Extrinsic: {}",
            self.intrinsic_state, extrinsic_state
        )
    }
}

pub struct UnsharedConcreteFlyweight {
    all_state: String,
}

impl UnsharedConcreteFlyweight {
    pub fn new(all_state: impl Into<String>) -> Self {
        Self {
            all_state: all_state.into(),
        }
    }

    pub fn operation(&self) -> String {
        format!("Unshared: {}", self.all_state)
    }
}

#[derive(Debug, Default)]
pub struct FlyweightFactory {
    flyweights: RwLock<HashMap<String, Arc<ConcreteFlyweight>>>,
}

impl FlyweightFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared flyweight for `key`, creating it on first request.
    pub fn get_flyweight(&self, key: &str) -> Arc<ConcreteFlyweight> {
        if let Some(existing) = self
            .flyweights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
        {
            return Arc::clone(existing);
        }

        let mut flyweights = self
            .flyweights
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        // Another writer may have won the race between the two locks.
        Arc::clone(
            flyweights
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(ConcreteFlyweight::new(key))),
        )
    }

    pub fn count(&self) -> usize {
        self.flyweights
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct Client {
    factory: Arc<FlyweightFactory>,
}

impl Client {
    pub fn new(factory: Arc<FlyweightFactory>) -> Self {
        Self { factory }
    }

    pub fn use_flyweight(&self, key: &str, extrinsic_state: &str) -> String {
        self.factory.get_flyweight(key).operation(extrinsic_state)
    }

    pub fn use_unshared_flyweight(&self, all_state: &str) -> String {
        UnsharedConcreteFlyweight::new(all_state).operation()
    }
}
