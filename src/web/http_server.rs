//! Example: A plain HTTP server with one handler per request feature
//! (methods, query strings, JSON, forms, paths, headers, errors).

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::router::Router;
use super::server::{error_response, form_params, handler, header_str, html, json, query_params, text};

const FORM_HTML: &str = r#"
<html>
    <body>
        <form method="POST">
            <input type="text" name="name" placeholder="Name">
            <input type="email" name="email" placeholder="Email">
            <button type="submit">Submit</button>
        </form>
    </body>
</html>
"#;

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonMessage {
    pub message: String,
    pub time: DateTime<Utc>,
}

pub fn router() -> Router {
    Router::new()
        .route("/", handler(home))
        .route("/methods", handler(methods))
        .route("/query", handler(query))
        .route("/json", handler(json_message))
        .route("/form", handler(form))
        .route("/path/", handler(path))
        .route("/headers", handler(headers))
        .route("/error", handler(error))
}

pub fn home(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    text(StatusCode::OK, "Welcome to the Home Page!")
}

pub fn methods(req: Request<Bytes>) -> Response<Full<Bytes>> {
    match *req.method() {
        Method::GET | Method::POST | Method::PUT | Method::DELETE => {
            text(StatusCode::OK, format!("This is a {} request", req.method()))
        }
        _ => error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
    }
}

pub fn query(req: Request<Bytes>) -> Response<Full<Bytes>> {
    let params = query_params(&req);
    let name = params.get("name").filter(|v| !v.is_empty());
    let age = params.get("age").filter(|v| !v.is_empty());

    match (name, age) {
        (Some(name), Some(age)) => text(
            StatusCode::OK,
            format!("Hello {name}, you are {age} years old"),
        ),
        _ => error_response(StatusCode::BAD_REQUEST, "Missing parameters"),
    }
}

pub fn json_message(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    json(
        StatusCode::OK,
        &JsonMessage {
            message: "Hello from JSON handler".to_string(),
            time: Utc::now(),
        },
    )
}

pub fn form(req: Request<Bytes>) -> Response<Full<Bytes>> {
    match *req.method() {
        Method::GET => html(FORM_HTML),
        Method::POST => {
            let params = form_params(&req);
            let field = |key: &str| params.get(key).map(String::as_str).unwrap_or("");
            text(
                StatusCode::OK,
                format!(
                    "Received form data: Name={}, Email={}",
                    field("name"),
                    field("email")
                ),
            )
        }
        _ => error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"),
    }
}

pub fn path(req: Request<Bytes>) -> Response<Full<Bytes>> {
    text(StatusCode::OK, format!("Path: {}", req.uri().path()))
}

pub fn headers(req: Request<Bytes>) -> Response<Full<Bytes>> {
    let body = format!(
        "User-Agent: {}\nAccept: {}",
        header_str(&req, "user-agent"),
        header_str(&req, "accept")
    );
    let mut resp = text(StatusCode::OK, body);
    resp.headers_mut()
        .insert("X-Custom-Header", HeaderValue::from_static("Hello"));
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    resp
}

pub fn error(_req: Request<Bytes>) -> Response<Full<Bytes>> {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "This is an error response")
}
