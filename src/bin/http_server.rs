//==============================================================================
// HTTP Server - basic routes, query strings, forms, JSON and headers
//==============================================================================

use anyhow::Context;
use colored::Colorize;
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::web::{http_server, serve};
use course_lab::CourseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let config = CourseConfig::load_validated().context("loading configuration")?;
    let router = http_server::router();

    println!("{}", "Basic HTTP server".bold().green());
    println!("Server starting on http://{}", config.server.address());
    for pattern in router.patterns() {
        println!("  {}", pattern.cyan());
    }

    serve(&config.server.address(), router)
        .await
        .context("HTTP server stopped")
}
