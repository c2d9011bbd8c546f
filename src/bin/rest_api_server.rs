//==============================================================================
// REST API Server - CRUD over an in-memory item store
//==============================================================================

use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use course_lab::logging::{init_logger, verbose_from_args};
use course_lab::web::rest_api::{self, ItemStore};
use course_lab::web::serve;
use course_lab::CourseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger(verbose_from_args());
    let config = CourseConfig::load_validated().context("loading configuration")?;
    let store = Arc::new(ItemStore::new());
    let router = rest_api::router(store, &config.rest_api.version);

    println!("{}", "REST API server".bold().green());
    println!("Server starting on http://{}", config.server.address());
    println!("  {} list, {} create", "GET /items".cyan(), "POST /items".cyan());
    println!(
        "  {} read, update, delete",
        "GET|PUT|DELETE /items/{id}".cyan()
    );
    println!("  API version: {}", config.rest_api.version);

    serve(&config.server.address(), router)
        .await
        .context("HTTP server stopped")
}
