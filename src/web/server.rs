//! Shared plumbing for the web examples: the handler type, response helpers,
//! request parsing and the hyper accept loop.
//!
//! Handlers are plain synchronous closures over a fully buffered request.
//! The accept loop does the async work (reading the body, writing the
//! response) and hands each request to a [`Router`].

use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Incoming;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use super::router::Router;
use crate::error::Result;

pub type Handler = Arc<dyn Fn(Request<Bytes>) -> Response<Full<Bytes>> + Send + Sync>;

/// Default cap on buffered request bodies.
pub const DEFAULT_BODY_LIMIT: usize = 10 << 20;

/// Wraps a closure as a shareable [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(Request<Bytes>) -> Response<Full<Bytes>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The connecting client's address, stored in the request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerAddr(pub SocketAddr);

pub fn peer_addr<B>(req: &Request<B>) -> Option<SocketAddr> {
    req.extensions().get::<PeerAddr>().map(|p| p.0)
}

// =============================================================================
// Responses
// =============================================================================

pub fn response(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(body.into()));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}

pub fn text(status: StatusCode, body: impl Into<String>) -> Response<Full<Bytes>> {
    response(status, "text/plain; charset=utf-8", body.into())
}

pub fn html(body: impl Into<String>) -> Response<Full<Bytes>> {
    response(StatusCode::OK, "text/html; charset=utf-8", body.into())
}

/// Serializes `value`; a serialization failure becomes a 500.
pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    match serde_json::to_vec(value) {
        Ok(body) => response(status, "application/json", body),
        Err(err) => {
            error!(%err, "failed to encode JSON response");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

pub fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let mut resp = text(status, message);
    resp.headers_mut()
        .insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    resp
}

pub fn empty(status: StatusCode) -> Response<Full<Bytes>> {
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = status;
    resp
}

// =============================================================================
// Request parsing
// =============================================================================

/// Decoded query string; the last occurrence of a key wins.
pub fn query_params<B>(req: &Request<B>) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

/// Decoded `application/x-www-form-urlencoded` body.
pub fn form_params(req: &Request<Bytes>) -> HashMap<String, String> {
    url::form_urlencoded::parse(req.body())
        .into_owned()
        .collect()
}

/// A request header as a string, empty when absent or not valid UTF-8.
pub fn header_str<'a, B>(req: &'a Request<B>, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

// =============================================================================
// Accept loop
// =============================================================================

/// Binds `addr` (e.g. `127.0.0.1:8080`) and serves `router` on it.
pub async fn serve(addr: &str, router: Router) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, router, DEFAULT_BODY_LIMIT).await
}

/// Accepts connections forever, one tokio task per connection.
pub async fn serve_listener(listener: TcpListener, router: Router, body_limit: usize) -> Result<()> {
    let router = Arc::new(router);
    info!(addr = %listener.local_addr()?, "server listening");

    loop {
        let (tcp, peer) = listener.accept().await?;
        let io = TokioIo::new(tcp);
        let router = Arc::clone(&router);

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let router = Arc::clone(&router);
                async move { Ok::<_, Infallible>(dispatch(req, peer, &router, body_limit).await) }
            });

            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                warn!(%peer, %err, "error serving connection");
            }
        });
    }
}

async fn dispatch(
    req: Request<Incoming>,
    peer: SocketAddr,
    router: &Router,
    body_limit: usize,
) -> Response<Full<Bytes>> {
    let (mut parts, body) = req.into_parts();
    let body = match Limited::new(body, body_limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            warn!(%peer, %err, "failed to read request body");
            return error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
        }
    };

    parts.extensions.insert(PeerAddr(peer));
    router.dispatch(Request::from_parts(parts, body))
}
