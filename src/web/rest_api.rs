//! Example: A JSON CRUD API over an in-memory item store, gated by an
//! `X-API-Version` header.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::middleware::{chain, logging, Middleware};
use super::router::Router;
use super::server::{empty, error_response, handler, header_str, json, Handler};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug)]
struct Inner {
    items: BTreeMap<u64, Item>,
    next_id: u64,
}

#[derive(Debug)]
pub struct ItemStore {
    inner: Mutex<Inner>,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All items ordered by id.
    pub fn list(&self) -> Vec<Item> {
        self.lock().items.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<Item> {
        self.lock().items.get(&id).cloned()
    }

    pub fn create(&self, input: ItemInput) -> Item {
        let mut inner = self.lock();
        let item = Item {
            id: inner.next_id,
            name: input.name,
            created_at: Utc::now(),
        };
        inner.next_id += 1;
        inner.items.insert(item.id, item.clone());
        item
    }

    /// Replaces the item's fields, keeping its id and creation time.
    pub fn update(&self, id: u64, input: ItemInput) -> Option<Item> {
        let mut inner = self.lock();
        let existing = inner.items.get_mut(&id)?;
        existing.name = input.name;
        Some(existing.clone())
    }

    pub fn delete(&self, id: u64) -> bool {
        self.lock().items.remove(&id).is_some()
    }
}

// =============================================================================
// Handlers
// =============================================================================

fn parse_id(req: &Request<Bytes>) -> Option<u64> {
    req.uri()
        .path()
        .strip_prefix("/items/")
        .and_then(|raw| raw.parse().ok())
}

fn parse_input(req: &Request<Bytes>) -> Option<ItemInput> {
    serde_json::from_slice(req.body()).ok()
}

pub fn list_or_create(store: &ItemStore, req: Request<Bytes>) -> Response<Full<Bytes>> {
    match *req.method() {
        Method::GET => json(StatusCode::OK, &store.list()),
        Method::POST => match parse_input(&req) {
            Some(input) => {
                let item = store.create(input);
                debug!(id = item.id, "item created");
                json(StatusCode::CREATED, &item)
            }
            None => error_response(StatusCode::BAD_REQUEST, "Invalid request body"),
        },
        _ => error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
    }
}

pub fn item_by_id(store: &ItemStore, req: Request<Bytes>) -> Response<Full<Bytes>> {
    if !matches!(*req.method(), Method::GET | Method::PUT | Method::DELETE) {
        return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
    }
    let Some(id) = parse_id(&req) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid ID");
    };
    let not_found = || error_response(StatusCode::NOT_FOUND, "Item not found");

    match *req.method() {
        Method::GET => store
            .get(id)
            .map(|item| json(StatusCode::OK, &item))
            .unwrap_or_else(not_found),
        Method::PUT => {
            if store.get(id).is_none() {
                return not_found();
            }
            let Some(input) = parse_input(&req) else {
                return error_response(StatusCode::BAD_REQUEST, "Invalid request body");
            };
            store
                .update(id, input)
                .map(|item| json(StatusCode::OK, &item))
                .unwrap_or_else(not_found)
        }
        _ => {
            if store.delete(id) {
                empty(StatusCode::NO_CONTENT)
            } else {
                not_found()
            }
        }
    }
}

/// Rejects requests whose `X-API-Version` differs from `version`.
pub fn version(version: impl Into<String>) -> Middleware {
    let version = version.into();
    Box::new(move |next: Handler| {
        let version = version.clone();
        Arc::new(move |req: Request<Bytes>| {
            if header_str(&req, "X-API-Version") != version {
                return error_response(StatusCode::BAD_REQUEST, "Unsupported API version");
            }
            next(req)
        })
    })
}

pub fn router(store: Arc<ItemStore>, api_version: &str) -> Router {
    let collection = {
        let store = Arc::clone(&store);
        handler(move |req| list_or_create(&store, req))
    };
    let member = handler(move |req| item_by_id(&store, req));

    Router::new()
        .route("/items", chain(collection, vec![logging(), version(api_version)]))
        .route("/items/", chain(member, vec![logging(), version(api_version)]))
}
