//! Example: Composable middleware around plain handlers
//!
//! A middleware takes the next handler and returns a wrapped one. `chain`
//! applies a list so that the first entry runs outermost.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use http_body_util::Full;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response, StatusCode};
use tracing::{error, info};

use super::router::Router;
use super::server::{empty, error_response, handler, header_str, peer_addr, text, Handler};
use crate::concurrency::panic_message;
use crate::config::MiddlewareConfig;

pub type Middleware = Box<dyn Fn(Handler) -> Handler + Send + Sync>;

pub fn chain(handler: Handler, middlewares: Vec<Middleware>) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(handler, |next, middleware| middleware(next))
}

/// Logs method, URI, peer and elapsed time after the inner handler returns.
pub fn logging() -> Middleware {
    Box::new(|next: Handler| {
        Arc::new(move |req: Request<Bytes>| {
            let start = Instant::now();
            let method = req.method().clone();
            let uri = req.uri().clone();
            let peer = peer_addr(&req);

            let resp = next(req);

            info!(
                %method,
                %uri,
                peer = ?peer,
                status = resp.status().as_u16(),
                elapsed = ?start.elapsed(),
                "request"
            );
            resp
        })
    })
}

pub fn auth(api_key: impl Into<String>) -> Middleware {
    let api_key = api_key.into();
    Box::new(move |next: Handler| {
        let api_key = api_key.clone();
        Arc::new(move |req: Request<Bytes>| {
            if header_str(&req, "X-API-Key") != api_key {
                return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
            }
            next(req)
        })
    })
}

/// Adds CORS headers and answers preflight `OPTIONS` requests itself.
pub fn cors(allowed_origin: impl Into<String>) -> Middleware {
    let origin = HeaderValue::from_str(&allowed_origin.into())
        .unwrap_or_else(|_| HeaderValue::from_static("*"));
    Box::new(move |next: Handler| {
        let origin = origin.clone();
        Arc::new(move |req: Request<Bytes>| {
            let mut resp = if req.method() == Method::OPTIONS {
                empty(StatusCode::OK)
            } else {
                next(req)
            };
            let headers = resp.headers_mut();
            headers.insert("Access-Control-Allow-Origin", origin.clone());
            headers.insert(
                "Access-Control-Allow-Methods",
                HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
            );
            headers.insert(
                "Access-Control-Allow-Headers",
                HeaderValue::from_static("Content-Type, Authorization"),
            );
            resp
        })
    })
}

/// Tags the request and the response with `X-Request-ID`.
pub fn request_id() -> Middleware {
    Box::new(|next: Handler| {
        Arc::new(move |mut req: Request<Bytes>| {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default();
            let id = HeaderValue::from(nanos as u64);

            req.headers_mut().insert("X-Request-ID", id.clone());
            let mut resp = next(req);
            resp.headers_mut().insert("X-Request-ID", id);
            resp
        })
    })
}

/// Sliding-window request counter keyed by client IP.
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    requests: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            requests: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_minute(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    /// Records a request at `now` unless the window is already full.
    pub fn allow(&self, ip: IpAddr, now: Instant) -> bool {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
        requests.retain(|_, times| {
            times.retain(|t| now.saturating_duration_since(*t) < self.window);
            !times.is_empty()
        });

        if requests.get(&ip).map_or(0, Vec::len) >= self.limit {
            return false;
        }
        requests.entry(ip).or_default().push(now);
        true
    }

    /// Clients with at least one request inside the window.
    pub fn tracked_clients(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub fn rate_limit(limiter: Arc<RateLimiter>) -> Middleware {
    Box::new(move |next: Handler| {
        let limiter = Arc::clone(&limiter);
        Arc::new(move |req: Request<Bytes>| {
            let ip = peer_addr(&req)
                .map(|addr| addr.ip())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
            if !limiter.allow(ip, Instant::now()) {
                return error_response(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded");
            }
            next(req)
        })
    })
}

/// Turns a panic in the inner handler into a 500.
pub fn recovery() -> Middleware {
    Box::new(|next: Handler| {
        Arc::new(move |req: Request<Bytes>| {
            match catch_unwind(AssertUnwindSafe(|| next(req))) {
                Ok(resp) => resp,
                Err(payload) => {
                    error!(panic = %panic_message(payload.as_ref()), "panic recovered");
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                }
            }
        })
    })
}

// =============================================================================
// Routes
// =============================================================================

pub fn home(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    text(StatusCode::OK, "Welcome to the Home Page!")
}

pub fn protected(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    text(StatusCode::OK, "This is a protected endpoint!")
}

pub fn panics(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    panic!("This is a panic!")
}

pub fn router(config: &MiddlewareConfig) -> Router {
    let limiter = Arc::new(RateLimiter::per_minute(config.rate_limit_per_minute as usize));
    let common = |extra: Option<Middleware>| {
        let mut stack = vec![
            logging(),
            cors(config.allowed_origin.clone()),
            rate_limit(Arc::clone(&limiter)),
            request_id(),
        ];
        stack.extend(extra);
        stack.push(recovery());
        stack
    };

    Router::new()
        .route("/", chain(handler(home), common(None)))
        .route(
            "/protected",
            chain(handler(protected), common(Some(auth(config.api_key.clone())))),
        )
        .route("/panic", chain(handler(panics), common(None)))
}
