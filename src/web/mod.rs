//! HTTP examples on hyper: a shared server loop and router, plus one module
//! per server demo.

pub mod http_server;
pub mod middleware;
pub mod rest_api;
pub mod router;
pub mod server;
pub mod static_files;
pub mod templates;

pub use router::Router;
pub use server::{handler, serve, serve_listener, Handler};
