//==============================================================================
// Middleware Server - logging, CORS, rate limiting, request ids, auth and
// panic recovery wrapped around plain handlers
//==============================================================================

use anyhow::Context;
use colored::Colorize;
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::web::{middleware, serve};
use course_lab::CourseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let config = CourseConfig::load_validated().context("loading configuration")?;
    let router = middleware::router(&config.middleware);

    println!("{}", "Middleware server".bold().green());
    println!("Server starting on http://{}", config.server.address());
    println!(
        "  {} requires header X-API-Key: {}",
        "/protected".cyan(),
        config.middleware.api_key.yellow()
    );
    println!(
        "  rate limit: {} requests per minute per client",
        config.middleware.rate_limit_per_minute
    );

    serve(&config.server.address(), router)
        .await
        .context("HTTP server stopped")
}
