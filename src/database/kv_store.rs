//! Example: An in-process key-value server with typed values
//!
//! Strings, lists, hashes, sets and sorted sets live in one keyspace with
//! optional expiry. Publish/subscribe fans messages out over crossbeam
//! channels.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

use crate::config::KvStoreConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    #[error("WRONGTYPE operation against key {0:?} holding the wrong kind of value")]
    WrongType(String),

    #[error("subscription to {0:?} closed")]
    Closed(String),
}

pub type Result<T> = std::result::Result<T, KvError>;

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    List(VecDeque<String>),
    Hash(BTreeMap<String, String>),
    Set(BTreeSet<String>),
    /// member -> score
    ZSet(BTreeMap<String, f64>),
}

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    expires_at: Option<Instant>,
}

impl Slot {
    fn persistent(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub channel: String,
    pub payload: String,
}

/// Receives messages published to one channel until dropped.
#[derive(Debug)]
pub struct Subscription {
    channel: String,
    receiver: Receiver<Message>,
}

impl Subscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Message>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(msg) => Ok(Some(msg)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(KvError::Closed(self.channel.clone())),
        }
    }

    pub fn try_recv(&self) -> Option<Message> {
        match self.receiver.try_recv() {
            Ok(msg) => Some(msg),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct KvStore {
    data: DashMap<String, Slot>,
    channels: DashMap<String, Vec<Sender<Message>>>,
    default_ttl: Option<Duration>,
}

impl KvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &KvStoreConfig) -> Self {
        Self {
            default_ttl: config.default_ttl_secs.map(Duration::from_secs),
            ..Self::default()
        }
    }

    fn purge_expired(&self, key: &str) {
        if self
            .data
            .remove_if(key, |_, slot| slot.is_expired(Instant::now()))
            .is_some()
        {
            debug!(key, "key expired");
        }
    }

    /// Applies `f` to the value at `key`, creating it with `empty` if missing.
    fn update<T>(
        &self,
        key: &str,
        empty: fn() -> Value,
        f: impl FnOnce(&mut Value) -> Option<T>,
    ) -> Result<T> {
        self.purge_expired(key);
        let mut slot = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| Slot::persistent(empty()));
        f(&mut slot.value).ok_or_else(|| KvError::WrongType(key.to_string()))
    }

    /// Reads the value at `key`; `Ok(None)` when absent or expired.
    fn read<T>(&self, key: &str, f: impl FnOnce(&Value) -> Option<T>) -> Result<Option<T>> {
        self.purge_expired(key);
        match self.data.get(key) {
            Some(slot) => f(&slot.value)
                .map(Some)
                .ok_or_else(|| KvError::WrongType(key.to_string())),
            None => Ok(None),
        }
    }

    // =========================================================================
    // Keys and strings
    // =========================================================================

    /// Stores a string. `ttl` of `None` falls back to the configured default.
    pub fn set(&self, key: &str, value: &str, ttl: Option<Duration>) {
        let expires_at = ttl.or(self.default_ttl).map(|ttl| Instant::now() + ttl);
        self.data.insert(
            key.to_string(),
            Slot {
                value: Value::Str(value.to_string()),
                expires_at,
            },
        );
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.read(key, |value| match value {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn exists(&self, key: &str) -> bool {
        self.purge_expired(key);
        self.data.contains_key(key)
    }

    pub fn del(&self, key: &str) -> bool {
        self.data.remove(key).is_some()
    }

    /// Remaining time to live; `None` for missing or persistent keys.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.purge_expired(key);
        let expires_at = self.data.get(key)?.expires_at?;
        Some(expires_at.saturating_duration_since(Instant::now()))
    }

    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.data.iter().filter(|slot| !slot.is_expired(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // =========================================================================
    // Lists
    // =========================================================================

    /// Pushes each value to the head in turn; returns the new length.
    pub fn lpush(&self, key: &str, values: &[&str]) -> Result<usize> {
        self.update(key, || Value::List(VecDeque::new()), |value| match value {
            Value::List(list) => {
                for v in values {
                    list.push_front(v.to_string());
                }
                Some(list.len())
            }
            _ => None,
        })
    }

    /// Inclusive range; negative indices count from the tail.
    pub fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<String>> {
        let list = self.read(key, |value| match value {
            Value::List(list) => {
                let len = list.len() as i64;
                let normalize = |i: i64| if i < 0 { len + i } else { i };
                let start = normalize(start).max(0);
                let stop = normalize(stop).min(len - 1);
                if start > stop {
                    return Some(Vec::new());
                }
                Some(
                    list.range(start as usize..=stop as usize)
                        .cloned()
                        .collect(),
                )
            }
            _ => None,
        })?;
        Ok(list.unwrap_or_default())
    }

    // =========================================================================
    // Hashes
    // =========================================================================

    /// Sets fields; returns how many were new.
    pub fn hset<K, V>(&self, key: &str, fields: impl IntoIterator<Item = (K, V)>) -> Result<usize>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.update(key, || Value::Hash(BTreeMap::new()), |value| match value {
            Value::Hash(hash) => Some(
                fields
                    .into_iter()
                    .map(|(k, v)| hash.insert(k.into(), v.into()))
                    .filter(Option::is_none)
                    .count(),
            ),
            _ => None,
        })
    }

    pub fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        let found = self.read(key, |value| match value {
            Value::Hash(hash) => Some(hash.get(field).cloned()),
            _ => None,
        })?;
        Ok(found.flatten())
    }

    pub fn hgetall(&self, key: &str) -> Result<BTreeMap<String, String>> {
        let hash = self.read(key, |value| match value {
            Value::Hash(hash) => Some(hash.clone()),
            _ => None,
        })?;
        Ok(hash.unwrap_or_default())
    }

    // =========================================================================
    // Sets
    // =========================================================================

    /// Adds members; returns how many were new.
    pub fn sadd(&self, key: &str, members: &[&str]) -> Result<usize> {
        self.update(key, || Value::Set(BTreeSet::new()), |value| match value {
            Value::Set(set) => Some(members.iter().filter(|m| set.insert(m.to_string())).count()),
            _ => None,
        })
    }

    /// Members in sorted order.
    pub fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let members = self.read(key, |value| match value {
            Value::Set(set) => Some(set.iter().cloned().collect()),
            _ => None,
        })?;
        Ok(members.unwrap_or_default())
    }

    pub fn sismember(&self, key: &str, member: &str) -> Result<bool> {
        let found = self.read(key, |value| match value {
            Value::Set(set) => Some(set.contains(member)),
            _ => None,
        })?;
        Ok(found.unwrap_or(false))
    }

    // =========================================================================
    // Sorted sets
    // =========================================================================

    /// Adds or rescores members; returns how many were new.
    pub fn zadd(&self, key: &str, members: &[(f64, &str)]) -> Result<usize> {
        self.update(key, || Value::ZSet(BTreeMap::new()), |value| match value {
            Value::ZSet(zset) => Some(
                members
                    .iter()
                    .filter(|(score, member)| zset.insert(member.to_string(), *score).is_none())
                    .count(),
            ),
            _ => None,
        })
    }

    /// Members with `min <= score <= max`, by score then member. Use
    /// `f64::INFINITY` for an open upper bound.
    pub fn zrange_by_score(&self, key: &str, min: f64, max: f64) -> Result<Vec<(String, f64)>> {
        let members = self.read(key, |value| match value {
            Value::ZSet(zset) => {
                let mut hits: Vec<(String, f64)> = zset
                    .iter()
                    .filter(|(_, score)| **score >= min && **score <= max)
                    .map(|(member, score)| (member.clone(), *score))
                    .collect();
                hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
                Some(hits)
            }
            _ => None,
        })?;
        Ok(members.unwrap_or_default())
    }

    // =========================================================================
    // Pub/sub
    // =========================================================================

    pub fn subscribe(&self, channel: &str) -> Subscription {
        let (tx, rx) = channel::unbounded();
        self.channels.entry(channel.to_string()).or_default().push(tx);
        Subscription {
            channel: channel.to_string(),
            receiver: rx,
        }
    }

    /// Delivers `payload` to every live subscriber; returns how many got it.
    pub fn publish(&self, channel: &str, payload: &str) -> usize {
        let Some(mut subscribers) = self.channels.get_mut(channel) else {
            return 0;
        };
        let message = Message {
            channel: channel.to_string(),
            payload: payload.to_string(),
        };
        subscribers.retain(|tx| tx.send(message.clone()).is_ok());
        let receivers = subscribers.len();
        debug!(channel, receivers, "message published");
        receivers
    }
}
