//! Path-based request routing.
//!
//! A pattern without a trailing slash matches that path exactly. A pattern
//! ending in `/` matches every path below it, so `/` is the catch-all. When
//! several patterns match, the longest one wins.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Request, Response, StatusCode};
use tracing::debug;

use super::server::{error_response, Handler};

#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<(String, Handler)>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `pattern`, replacing any earlier registration.
    pub fn route(mut self, pattern: &str, handler: Handler) -> Self {
        self.routes.retain(|(p, _)| p != pattern);
        self.routes.push((pattern.to_string(), handler));
        self
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(p, _)| p.as_str())
    }

    /// Finds the handler for `path`.
    pub fn lookup(&self, path: &str) -> Option<&Handler> {
        self.routes
            .iter()
            .filter(|(pattern, _)| matches(pattern, path))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, handler)| handler)
    }

    pub fn dispatch(&self, req: Request<Bytes>) -> Response<Full<Bytes>> {
        match self.lookup(req.uri().path()) {
            Some(handler) => handler(req),
            None => {
                debug!(path = req.uri().path(), "no route matched");
                error_response(StatusCode::NOT_FOUND, "404 page not found")
            }
        }
    }
}

fn matches(pattern: &str, path: &str) -> bool {
    if pattern.ends_with('/') {
        path.starts_with(pattern)
    } else {
        path == pattern
    }
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::web::server::{handler, text};
    use http_body_util::BodyExt;

    fn named(name: &'static str) -> Handler {
        handler(move |_| text(StatusCode::OK, name))
    }

    async fn hit(router: &Router, path: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(path).body(Bytes::new()).unwrap();
        let resp = router.dispatch(req);
        let status = resp.status();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_longest_pattern_wins() {
        let router = Router::new()
            .route("/", named("root"))
            .route("/items", named("list"))
            .route("/items/", named("one"))
            .route("/items/special", named("special"));

        assert_eq!(hit(&router, "/items").await.1, "list");
        assert_eq!(hit(&router, "/items/7").await.1, "one");
        assert_eq!(hit(&router, "/items/special").await.1, "special");
        assert_eq!(hit(&router, "/anything/else").await.1, "root");
    }

    #[tokio::test]
    async fn test_unmatched_path_is_404() {
        let router = Router::new().route("/only", named("only"));
        assert_eq!(
            hit(&router, "/only/child").await,
            (StatusCode::NOT_FOUND, "404 page not found".to_string())
        );
    }

    #[test]
    fn test_reregistering_replaces() {
        let router = Router::new().route("/a", named("x")).route("/a", named("y"));
        assert_eq!(router.patterns().count(), 1);
    }
}
