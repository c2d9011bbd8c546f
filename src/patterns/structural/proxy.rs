//! Pattern: Proxy
//! Example: Lazy, caching, protecting and virtual stand-ins for a subject

use std::cell::OnceCell;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

pub trait Subject {
    fn request(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct RealSubject {
    name: String,
}

impl RealSubject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Subject for RealSubject {
    fn request(&self) -> String {
        format!("RealSubject {} request", self.name)
    }
}

/// Builds its real subject on the first request.
pub struct Proxy {
    name: String,
    real_subject: OnceCell<RealSubject>,
}

impl Proxy {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            real_subject: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.real_subject.get().is_some()
    }
}

impl Subject for Proxy {
    fn request(&self) -> String {
        self.real_subject
            .get_or_init(|| RealSubject::new(self.name.clone()))
            .request()
    }
}

struct CacheEntry {
    response: String,
    stored_at: Instant,
}

/// Serves the last response until `ttl` elapses.
pub struct CachingProxy {
    real_subject: RealSubject,
    ttl: Duration,
    cache: Mutex<Option<CacheEntry>>,
}

impl CachingProxy {
    pub fn new(real_subject: RealSubject, ttl: Duration) -> Self {
        Self {
            real_subject,
            ttl,
            cache: Mutex::new(None),
        }
    }

    pub fn clear_cache(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_cached(&self) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|entry| entry.stored_at.elapsed() < self.ttl)
    }
}

impl Subject for CachingProxy {
    fn request(&self) -> String {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = cache.as_ref() {
            if entry.stored_at.elapsed() < self.ttl {
                return entry.response.clone();
            }
        }

        let response = self.real_subject.request();
        *cache = Some(CacheEntry {
            response: response.clone(),
            stored_at: Instant::now(),
        });
        response
    }
}

pub struct ProtectionProxy {
    real_subject: RealSubject,
    permission: String,
}

impl ProtectionProxy {
    pub fn new(real_subject: RealSubject, permission: impl Into<String>) -> Self {
        Self {
            real_subject,
            permission: permission.into(),
        }
    }
}

impl Subject for ProtectionProxy {
    fn request(&self) -> String {
        if self.permission != "admin" {
            return "Access denied".to_string();
        }
        self.real_subject.request()
    }
}

/// Creates a subject named `virtual` on first use.
#[derive(Default)]
pub struct VirtualProxy {
    real_subject: OnceCell<RealSubject>,
}

impl VirtualProxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.real_subject.get().is_some()
    }
}

impl Subject for VirtualProxy {
    fn request(&self) -> String {
        self.real_subject
            .get_or_init(|| {
                debug!("Initializing RealSubject...");
                RealSubject::new("virtual")
            })
            .request()
    }
}

pub struct Client {
    subject: Box<dyn Subject>,
}

impl Client {
    pub fn new(subject: Box<dyn Subject>) -> Self {
        Self { subject }
    }

    pub fn use_subject(&self) -> String {
        self.subject.request()
    }
}
